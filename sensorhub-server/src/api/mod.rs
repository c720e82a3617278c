pub mod error;
pub mod models;
pub mod pages;
pub mod readings;
pub mod series;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{AppState, registry::ReadingRegistry};

pub fn router<R>(state: AppState<R>) -> Router
where
    R: ReadingRegistry,
{
    Router::new()
        // Pages and health
        .route("/", get(pages::greeting).post(pages::health))
        .route("/health", get(pages::health).post(pages::health))
        .route("/index", get(pages::index))
        .route("/dashboard", get(pages::dashboard))
        // Readings
        .route("/agregar_dato_prueba", get(readings::add_test_reading::<R>))
        .route(
            "/receive_sensor_data",
            post(readings::receive_sensor_data::<R>),
        )
        .route(
            "/receive_sensor_data/",
            post(readings::receive_sensor_data::<R>),
        )
        // Dashboard datasource
        .route("/search", post(series::search))
        .route("/query", post(series::query::<R>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
