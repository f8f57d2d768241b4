pub mod schedule_ops;
pub mod stats;
pub mod tracker;
