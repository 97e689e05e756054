use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use crate::ports::{StoreOperation, TransportError, TransportResult};

const USER_AGENT: &str = concat!("todo-tui/", env!("CARGO_PKG_VERSION"));

/// Thin JSON client for the todo service.
///
/// No timeout is configured: a request runs until the server answers or the
/// connection fails.
#[derive(Clone)]
pub struct TodoClient {
    client: Client,
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> TransportResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::new(StoreOperation::Setup, e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        operation: StoreOperation,
    ) -> TransportResult<T> {
        let request = self.client.get(self.url(path));
        let response = Self::send(request, operation).await?;
        Self::handle_response(response, operation).await
    }

    pub async fn post<T: DeserializeOwned, R: serde::Serialize>(
        &self,
        path: &str,
        body: &R,
        operation: StoreOperation,
    ) -> TransportResult<T> {
        let request = self.client.post(self.url(path)).json(body);
        let response = Self::send(request, operation).await?;
        Self::handle_response(response, operation).await
    }

    pub async fn patch<T: DeserializeOwned, R: serde::Serialize>(
        &self,
        path: &str,
        body: &R,
        operation: StoreOperation,
    ) -> TransportResult<T> {
        let request = self.client.patch(self.url(path)).json(body);
        let response = Self::send(request, operation).await?;
        Self::handle_response(response, operation).await
    }

    /// DELETE ignores the response body; only the status matters.
    pub async fn delete(&self, path: &str, operation: StoreOperation) -> TransportResult<()> {
        let request = self.client.delete(self.url(path));
        let response = Self::send(request, operation).await?;
        Self::check_status(response, operation).await.map(|_| ())
    }

    async fn send(request: RequestBuilder, operation: StoreOperation) -> TransportResult<Response> {
        request
            .send()
            .await
            .map_err(|e| TransportError::new(operation, e.to_string()))
    }

    async fn check_status(response: Response, operation: StoreOperation) -> TransportResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::debug!("API error {} for {}: {}", status, operation, error_text);

        Err(TransportError::with_status(
            operation,
            status.as_u16(),
            format!("HTTP {status}"),
        ))
    }

    async fn handle_response<T: DeserializeOwned>(
        response: Response,
        operation: StoreOperation,
    ) -> TransportResult<T> {
        let response = Self::check_status(response, operation).await?;
        let status = response.status().as_u16();

        let response_text = response
            .text()
            .await
            .map_err(|e| TransportError::new(operation, e.to_string()))?;

        tracing::debug!("API Response: {}", response_text);

        serde_json::from_str(&response_text).map_err(|e| {
            TransportError::with_status(
                operation,
                status,
                format!("Failed to parse response: {e}. Response was: {response_text}"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let client = TodoClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.url("/api/todos"), "http://localhost:5000/api/todos");
    }

    #[tokio::test]
    async fn test_connection_failure_is_a_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = TodoClient::new("http://127.0.0.1:9").unwrap();
        let err = client
            .get::<Vec<serde_json::Value>>("/api/todos", StoreOperation::List)
            .await
            .unwrap_err();

        assert_eq!(err.operation, StoreOperation::List);
        assert_eq!(err.status, None);
        assert!(err.to_string().starts_with("Failed to list todos"));
    }
}
