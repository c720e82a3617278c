mod reading;

pub use reading::{SqliteReadingError, SqliteReadingRegistry};
