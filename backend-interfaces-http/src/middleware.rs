pub mod body;
pub mod metrics;

pub use body::*;
pub use metrics::*;
