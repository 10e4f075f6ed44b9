pub mod format;
pub mod io;

pub use format::{format_amount, format_currency};
pub use io::{atomic_write, read_optional};
