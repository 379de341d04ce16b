//! Document field extraction.

mod engine;
pub mod rules;

pub use engine::{ExtractionEngine, ExtractionResult};
