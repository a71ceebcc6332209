use std::time::Duration;
use tokio::time::Instant;

/// Debounce followed by duplicate suppression for one input stream.
///
/// `push` restarts the quiet window. Once the window elapses the pending value
/// settles, and it is forwarded only if it differs from the last forwarded
/// value.
pub struct DebouncedInput<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
    last_forwarded: Option<T>,
}

impl<T: Clone + PartialEq> DebouncedInput<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            last_forwarded: None,
        }
    }

    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.window));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the pending value to settle.
    ///
    /// Never resolves while nothing is pending. Resolves to `None` when the
    /// settled value repeats the last forwarded one. Cancel safe: dropping the
    /// future keeps the pending value and its deadline.
    pub async fn settled(&mut self) -> Option<T> {
        let deadline = match &self.pending {
            Some((_, deadline)) => *deadline,
            None => std::future::pending().await,
        };
        tokio::time::sleep_until(deadline).await;

        let (value, _) = self.pending.take()?;
        if self.last_forwarded.as_ref() == Some(&value) {
            return None;
        }
        self.last_forwarded = Some(value.clone());
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn test_forwards_last_value_after_quiet_window() {
        let mut input = DebouncedInput::new(WINDOW);
        let start = Instant::now();

        input.push("r".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        input.push("ru".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        input.push("rust".to_string());

        assert_eq!(input.settled().await.as_deref(), Some("rust"));
        assert_eq!(start.elapsed(), Duration::from_millis(500));
        assert!(!input.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_suppresses_repeat_of_last_forwarded() {
        let mut input = DebouncedInput::new(WINDOW);

        input.push(1u64);
        assert_eq!(input.settled().await, Some(1));

        input.push(1);
        assert_eq!(input.settled().await, None);

        input.push(2);
        assert_eq!(input.settled().await, Some(2));

        input.push(1);
        assert_eq!(input.settled().await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_pending_never_settles() {
        let mut input: DebouncedInput<u64> = DebouncedInput::new(WINDOW);
        let waited = tokio::time::timeout(Duration::from_secs(5), input.settled()).await;
        assert!(waited.is_err());
    }
}
