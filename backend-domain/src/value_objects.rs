// Domain value objects
pub mod identifiers;
pub mod location_code;
pub mod timestamp;

pub use identifiers::*;
pub use location_code::*;
pub use timestamp::*;
