// Batch ingestion pipeline stages that need the async runtime

pub mod coordinator;
pub mod normalizer;

pub use coordinator::*;
pub use normalizer::*;
