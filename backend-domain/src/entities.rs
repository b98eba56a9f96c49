// Domain entities

pub mod batch;
pub mod event;
pub mod model;

pub use batch::*;
pub use event::*;
pub use model::*;
