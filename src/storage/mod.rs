//! Output of extracted catalog models
//!
//! Models are written as NDJSON for a downstream catalog loader.

mod ndjson;

pub use ndjson::{NdjsonTarget, NdjsonWriter};
