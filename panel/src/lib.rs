//! UGREEN panel library
//!
//! Core modules for the capture-device control panel.

pub mod app;
pub mod authn;
pub mod errors;
pub mod exec;
pub mod filesys;
pub mod logs;
pub mod server;
pub mod utils;
