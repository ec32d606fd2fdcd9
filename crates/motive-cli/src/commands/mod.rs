pub mod cascade;
pub mod curves;
pub mod durations;
pub mod fade;
pub mod resize;
