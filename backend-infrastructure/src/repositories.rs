pub mod clickhouse_events;
pub mod memory_events;

pub use clickhouse_events::*;
pub use memory_events::*;
