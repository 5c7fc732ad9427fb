pub mod actions;
pub mod runner;
