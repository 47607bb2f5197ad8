//! Core ETL (Extract, Transform, Load) abstractions
//!
//! This module provides trait definitions for building data pipelines
//! that pull records from sources, project them onto catalog models, and
//! hand them to destinations.

mod chain;
mod extract;
mod load;
mod pipeline;
mod transform;

pub use chain::ModelExtractor;
pub use extract::{Extractor, VecExtractor};
pub use load::Loader;
pub use pipeline::Pipeline;
pub use transform::{ChainedTransformer, IdentityTransformer, Transformer};
