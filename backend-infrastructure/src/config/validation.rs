use anyhow::{anyhow, Result};
use chrono::FixedOffset;

use backend_domain::parse_offset;

pub fn validate_worker_count(value: usize) -> Result<()> {
    if value == 0 {
        return Err(anyhow!("worker_count must be at least 1"));
    }
    Ok(())
}

pub fn validate_timestamp_offset(value: &str) -> Result<FixedOffset> {
    parse_offset(value).ok_or_else(|| anyhow!("timestamp_offset must look like +05:30, got '{}'", value))
}
