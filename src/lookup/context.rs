//! Lookup Context
//!
//! Cancellation and deadline carried from the caller into a lookup source.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::LookupError;

// == Lookup Context ==
/// Cancellation token plus optional deadline for one lookup call chain.
///
/// Cloning is cheap and clones observe the same cancellation.
#[derive(Debug, Clone, Default)]
pub struct LookupContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl LookupContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives a context that also expires after `timeout`.
    ///
    /// The earlier of the existing deadline and the new one wins. Cancelling
    /// the parent cancels the child; cancelling the child leaves the parent alone.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(existing) if existing <= candidate => existing,
            _ => candidate,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Checks cancellation and deadline without waiting.
    pub fn check(&self) -> Result<(), LookupError> {
        if self.is_cancelled() {
            return Err(LookupError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(LookupError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    // == Run ==
    /// Drives `fut` until it finishes, the context is cancelled or the deadline passes.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, LookupError>
    where
        F: Future<Output = Result<T, LookupError>>,
    {
        self.check()?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(LookupError::Cancelled),
            _ = deadline => Err(LookupError::DeadlineExceeded),
            result = fut => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_completes() {
        let ctx = LookupContext::new();
        let result = ctx.run(async { Ok::<_, LookupError>(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_run_passes_inner_error_through() {
        let ctx = LookupContext::new();
        let result: Result<(), _> = ctx
            .run(async { Err(LookupError::Backend("boom".into())) })
            .await;
        assert_eq!(result, Err(LookupError::Backend("boom".into())));
    }

    #[tokio::test]
    async fn test_already_cancelled() {
        let ctx = LookupContext::new();
        ctx.cancel();
        let result = ctx.run(async { Ok::<_, LookupError>(()) }).await;
        assert_eq!(result, Err(LookupError::Cancelled));
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let ctx = LookupContext::new().with_timeout(Duration::from_millis(50));
        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok::<_, LookupError>(())
            })
            .await;
        assert_eq!(result, Err(LookupError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_cancel_mid_flight() {
        let ctx = LookupContext::new();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let result = ctx.run(std::future::pending::<Result<(), LookupError>>()).await;
        assert_eq!(result, Err(LookupError::Cancelled));
    }

    #[tokio::test]
    async fn test_child_inherits_cancellation() {
        let parent = LookupContext::new();
        let child = parent.with_timeout(Duration::from_secs(5));

        child.cancel();
        assert!(!parent.is_cancelled());

        let other = parent.with_timeout(Duration::from_secs(5));
        parent.cancel();
        assert!(other.is_cancelled());
    }

    #[tokio::test]
    async fn test_earlier_deadline_wins() {
        let short = LookupContext::new().with_timeout(Duration::from_millis(10));
        let nested = short.with_timeout(Duration::from_secs(60));
        assert_eq!(nested.deadline(), short.deadline());
    }
}
