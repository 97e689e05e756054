pub mod input_bar;

pub use input_bar::*;
