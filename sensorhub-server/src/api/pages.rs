use axum::response::{Html, IntoResponse};

pub async fn greeting() -> &'static str {
    "Mi primer hola mundo"
}

pub async fn health() -> &'static str {
    "OK"
}

/// GET /index
pub async fn index() -> impl IntoResponse {
    Html(include_str!("templates/index.html"))
}

/// GET /dashboard
pub async fn dashboard() -> impl IntoResponse {
    Html(include_str!("templates/dashboard.html"))
}
