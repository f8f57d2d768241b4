pub mod alarm;
pub mod config_io;
pub mod lock;
pub mod recovery;
pub mod schedule_io;
pub mod store;
