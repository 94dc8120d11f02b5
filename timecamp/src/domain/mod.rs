pub mod formats;
mod lenient;
mod task;
mod time_entry;
mod timer;

pub use task::*;
pub use time_entry::*;
pub use timer::*;
