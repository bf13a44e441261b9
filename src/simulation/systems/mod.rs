//! Systems run in order by the session schedule.

pub mod events;
pub mod history;
pub mod logging;
pub mod time_step;

pub use events::*;
pub use history::*;
pub use logging::*;
pub use time_step::*;
