//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap data access calls with a deadline
//! - Cancel the wrapped future cleanly on timeout (dropping it releases
//!   any connection it holds)
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors

use std::future::Future;
use std::time::Duration;

/// The deadline passed before the operation completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation timed out after {}ms", .0.as_millis())]
pub struct DeadlineExceeded(pub Duration);

/// Run `fut`, giving up after `deadline`.
pub async fn with_deadline<F, T, E>(deadline: Duration, fut: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<DeadlineExceeded>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(DeadlineExceeded(deadline).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Timeout(Duration),
        Inner,
    }

    impl From<DeadlineExceeded> for TestError {
        fn from(e: DeadlineExceeded) -> Self {
            TestError::Timeout(e.0)
        }
    }

    #[tokio::test]
    async fn test_fast_call_passes_through() {
        let ok: Result<u32, TestError> = with_deadline(Duration::from_millis(100), async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));

        let err: Result<u32, TestError> =
            with_deadline(Duration::from_millis(100), async { Err(TestError::Inner) }).await;
        assert_eq!(err, Err(TestError::Inner));
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let deadline = Duration::from_millis(20);
        let result: Result<(), TestError> = with_deadline(deadline, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert_eq!(result, Err(TestError::Timeout(deadline)));
    }
}
