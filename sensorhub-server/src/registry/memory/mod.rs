mod reading;

use std::sync::PoisonError;

pub use reading::InMemoryReadingRegistry;

#[derive(Debug, thiserror::Error)]
pub enum InMemoryError {
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

impl<T> From<PoisonError<T>> for InMemoryError {
    fn from(err: PoisonError<T>) -> Self {
        InMemoryError::LockPoisoned(err.to_string())
    }
}
