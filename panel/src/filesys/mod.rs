pub mod file;
pub mod tail;
