pub mod job;
pub mod tracking;
