// Pure domain services for the batch ingestion pipeline

pub mod flattener;
pub mod schema;

pub use flattener::*;
pub use schema::*;
