pub mod error;
pub mod event;
pub mod task;

pub use error::*;
pub use event::*;
pub use task::*;
