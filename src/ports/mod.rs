pub mod config_store;
pub mod effects;
pub mod task_store;

pub use config_store::*;
pub use effects::*;
pub use task_store::*;
