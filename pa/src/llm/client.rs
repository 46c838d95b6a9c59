//! LlmClient trait definition

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ChatMessage, LlmError};

/// Stateless chat completion client
///
/// The endpoint keeps no conversation state, so callers own the history and
/// pass it whole on every call. Implementations only own transport details.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one completion request and wait for the full response
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError>;

    /// Streaming completion
    ///
    /// Sends each text fragment to `frag_tx` as it arrives and returns the
    /// concatenated response once the stream ends. A send error on `frag_tx`
    /// (receiver gone) never fails the call; the return value is the source
    /// of truth.
    async fn chat_stream(
        &self,
        messages: Vec<ChatMessage>,
        frag_tx: mpsc::Sender<String>,
    ) -> Result<String, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock chat client for unit tests
    ///
    /// Replays canned responses in order. `chat_stream` publishes each
    /// response as a single fragment before returning it, so callers still
    /// exercise their fragment path.
    pub struct MockChatClient {
        responses: Vec<String>,
        call_count: AtomicUsize,
    }

    impl MockChatClient {
        pub fn new(responses: Vec<String>) -> Self {
            debug!(response_count = %responses.len(), "MockChatClient::new: called");
            Self {
                responses,
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        fn next_response(&self) -> Result<String, LlmError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            self.responses.get(idx).cloned().ok_or_else(|| {
                debug!("MockChatClient: no more mock responses");
                LlmError::InvalidResponse("No more mock responses".to_string())
            })
        }
    }

    #[async_trait]
    impl LlmClient for MockChatClient {
        async fn complete(&self, _messages: Vec<ChatMessage>) -> Result<String, LlmError> {
            debug!("MockChatClient::complete: called");
            self.next_response()
        }

        async fn chat_stream(
            &self,
            _messages: Vec<ChatMessage>,
            frag_tx: mpsc::Sender<String>,
        ) -> Result<String, LlmError> {
            debug!("MockChatClient::chat_stream: called");
            let response = self.next_response()?;
            let _ = frag_tx.send(response.clone()).await;
            Ok(response)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_client_returns_responses_in_order() {
            let client = MockChatClient::new(vec!["Response 1".to_string(), "Response 2".to_string()]);

            let resp1 = client.complete(vec![ChatMessage::user("hi")]).await.unwrap();
            assert_eq!(resp1, "Response 1");

            let resp2 = client.complete(vec![ChatMessage::user("again")]).await.unwrap();
            assert_eq!(resp2, "Response 2");

            assert_eq!(client.call_count(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockChatClient::new(vec![]);
            let result = client.complete(vec![ChatMessage::user("hi")]).await;
            assert!(result.is_err());
        }

        #[tokio::test]
        async fn test_mock_client_streams_one_fragment() {
            let client = MockChatClient::new(vec!["streamed".to_string()]);
            let (tx, mut rx) = mpsc::channel(10);

            let full = client.chat_stream(vec![ChatMessage::user("hi")], tx).await.unwrap();
            assert_eq!(full, "streamed");
            assert_eq!(rx.recv().await, Some("streamed".to_string()));
            assert_eq!(rx.recv().await, None);
        }
    }
}
