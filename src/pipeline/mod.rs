// src/pipeline/mod.rs

//! Pipeline entry points.
//!
//! - `run_once`: one full fetch → dedupe → persist → notify cycle
//! - `run_forever`: fixed-interval polling until cancelled

pub mod cycle;
pub mod runner;

pub use cycle::{CycleStats, run_once};
pub use runner::run_forever;
