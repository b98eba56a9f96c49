// Backend Application Layer

pub mod commands;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod queries;
pub mod state;

pub use error::{AppError, ErrorDetail};
pub use metrics::Metrics;
pub use state::AppState;
