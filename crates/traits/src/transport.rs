//! Transport trait for reaching the SIGA endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use siga_types::{ApiRequest, SigaError, UploadRequest};

/// Issues requests against the endpoint and yields the decoded JSON payload.
///
/// Implementations settle exactly once per call with either the payload or a
/// [`SigaError::Timeout`] / [`SigaError::Transport`]. Interpreting the
/// payload's `success` flag is left to the caller.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Perform a query-string request.
    async fn call(&self, request: &ApiRequest) -> Result<Value, SigaError>;

    /// Upload a single attachment.
    async fn upload(&self, request: UploadRequest) -> Result<Value, SigaError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn call(&self, request: &ApiRequest) -> Result<Value, SigaError> {
        (**self).call(request).await
    }

    async fn upload(&self, request: UploadRequest) -> Result<Value, SigaError> {
        (**self).upload(request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;
    use siga_types::Action;

    use super::*;

    struct Echo {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for Echo {
        async fn call(&self, request: &ApiRequest) -> Result<Value, SigaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({ "success": true, "action": request.action.as_str() }))
        }

        async fn upload(&self, _request: UploadRequest) -> Result<Value, SigaError> {
            Err(SigaError::transport("not supported"))
        }
    }

    #[tokio::test]
    async fn arc_forwards_to_inner() {
        let inner = Arc::new(Echo { calls: AtomicUsize::new(0) });
        let shared: Arc<Echo> = Arc::clone(&inner);

        let value = shared.call(&ApiRequest::new(Action::Test)).await.unwrap();
        assert_eq!(value["action"], "test");
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }
}
