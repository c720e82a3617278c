use reqwest::StatusCode;

use crate::sensor::ReadingPayload;

/// How the hub answered a posted reading.
#[derive(Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// The hub stored the reading (HTTP 201).
    Stored,
    /// Any other status, with the response body for debugging.
    Rejected { status: StatusCode, body: String },
}

/// Posts readings to the hub. Failed posts are reported, never retried.
#[derive(Clone)]
pub struct HubClient {
    http: reqwest::Client,
    url: String,
}

impl HubClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn send(&self, payload: &ReadingPayload) -> Result<SendOutcome, reqwest::Error> {
        let resp = self.http.post(&self.url).json(payload).send().await?;

        if resp.status() == StatusCode::CREATED {
            return Ok(SendOutcome::Stored);
        }

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Ok(SendOutcome::Rejected { status, body })
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::StatusCode as AxumStatus, routing::post};
    use serde_json::Value;
    use tokio::net::TcpListener;

    use super::*;

    async fn spawn_hub(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/receive_sensor_data/")
    }

    fn payload() -> ReadingPayload {
        ReadingPayload {
            sensor_type: "Temperature",
            value: 24.7,
            unit: "C",
        }
    }

    #[tokio::test]
    async fn created_means_stored() {
        let router = Router::new().route(
            "/receive_sensor_data/",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["sensor_type"], "Temperature");
                assert_eq!(body["unit"], "C");
                (AxumStatus::CREATED, "stored")
            }),
        );
        let client = HubClient::new(spawn_hub(router).await);

        assert_eq!(client.send(&payload()).await.unwrap(), SendOutcome::Stored);
    }

    #[tokio::test]
    async fn other_status_is_rejected_with_body() {
        let router = Router::new().route(
            "/receive_sensor_data/",
            post(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "db down") }),
        );
        let client = HubClient::new(spawn_hub(router).await);

        let outcome = client.send(&payload()).await.unwrap();
        assert_eq!(
            outcome,
            SendOutcome::Rejected {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "db down".to_owned(),
            }
        );
    }

    #[tokio::test]
    async fn unreachable_hub_is_an_error() {
        // Bind then drop to get a port nobody is listening on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HubClient::new(format!("http://{addr}/receive_sensor_data/"));
        assert!(client.send(&payload()).await.is_err());
    }
}
