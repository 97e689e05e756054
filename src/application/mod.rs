pub mod error;
pub mod intent;
pub mod state_manager;
pub mod task_list;
pub mod task_service;
pub mod view;

pub use error::*;
pub use intent::*;
pub use state_manager::*;
pub use task_list::*;
pub use task_service::*;
pub use view::*;
