// src/utils/mod.rs

//! Shared utilities.

pub mod http;
pub mod shutdown;
pub mod url;

pub use shutdown::{Shutdown, ShutdownHandle};
