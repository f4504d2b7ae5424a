pub mod common;
pub mod repair;
