pub mod api;
pub mod config;
pub mod registry;

use api::error::ApiError;
use registry::ReadingRegistry;

// AppState must be defined in lib.rs to be visible to all modules
#[derive(Clone)]
pub struct AppState<R> {
    /// `None` when the registry could not be opened at startup.
    pub registry: Option<R>,
    /// Maximum number of readings served by `/query`.
    pub query_limit: usize,
}

impl<R: ReadingRegistry> AppState<R> {
    pub fn new(registry: Option<R>, query_limit: usize) -> Self {
        Self {
            registry,
            query_limit,
        }
    }

    /// The registry, or a service-unavailable error if it never came up.
    pub fn registry(&self) -> Result<&R, ApiError> {
        self.registry.as_ref().ok_or(ApiError::ServiceUnavailable)
    }
}
