pub mod error;

pub mod replacement;

pub mod config;
pub mod display;
pub mod generate;
pub mod input;
