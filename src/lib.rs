// src/lib.rs

//! albo-watch: municipal notice-board watcher.
//!
//! Polls the public notice board (albo pretorio) of a municipality,
//! persists every publication it has not seen before, and pushes a
//! Telegram alert for each new one.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
