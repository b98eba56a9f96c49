pub mod batch_commands;
pub mod event_commands;
