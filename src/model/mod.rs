pub mod config;
pub mod schedule;
pub mod task;
pub mod timer;
pub mod weekday;

pub use config::*;
pub use schedule::*;
pub use task::*;
pub use timer::*;
pub use weekday::*;
