pub mod args;
pub mod commands;
pub mod display;
pub mod terminal;

pub use terminal::*;
