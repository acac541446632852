//! Cancellation of in-flight calls

use crate::{Result, TransportError};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Run a client call until it finishes or `token` is cancelled
///
/// On cancellation the call future is dropped, which aborts the HTTP request,
/// and [`TransportError::Cancelled`] is returned.
pub async fn cancellable<T, F>(token: &CancellationToken, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            warn!("Ohmyfin request cancelled by caller");
            Err(TransportError::Cancelled.into())
        }
        result = call => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_call_returns_cancelled() {
        let token = CancellationToken::new();
        let trigger = token.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let result: Result<u32> = cancellable(&token, async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(42)
        })
        .await;

        assert!(matches!(
            result,
            Err(Error::Transport(TransportError::Cancelled))
        ));
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_call() {
        let token = CancellationToken::new();
        token.cancel();

        let result: Result<u32> = cancellable(&token, async { Ok(1) }).await;
        assert!(matches!(
            result,
            Err(Error::Transport(TransportError::Cancelled))
        ));
    }

    #[tokio::test]
    async fn test_completed_call_passes_through() {
        let token = CancellationToken::new();
        let result = cancellable(&token, async { Ok::<_, Error>("done") }).await;
        assert_eq!(result.unwrap(), "done");
    }
}
