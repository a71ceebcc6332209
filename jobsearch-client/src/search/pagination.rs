use tokio::sync::mpsc;

/// Page counter driven by "load more" signals.
///
/// Publishes page 0 as soon as it is created, then one index higher on every
/// [`load_more`](Self::load_more).
pub struct PaginationTrigger {
    current: u64,
    tx: mpsc::UnboundedSender<u64>,
}

impl PaginationTrigger {
    pub fn new(tx: mpsc::UnboundedSender<u64>) -> Self {
        // a closed receiver only means the search run is gone
        let _ = tx.send(0);
        Self { current: 0, tx }
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    /// Request the next page. Returns the new page index.
    pub fn load_more(&mut self) -> u64 {
        self.current += 1;
        let _ = self.tx.send(self.current);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_up_from_zero() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut trigger = PaginationTrigger::new(tx);

        assert_eq!(trigger.current(), 0);
        assert_eq!(trigger.load_more(), 1);
        assert_eq!(trigger.load_more(), 2);

        let mut published = Vec::new();
        while let Ok(page) = rx.try_recv() {
            published.push(page);
        }
        assert_eq!(published, vec![0, 1, 2]);
    }

    #[test]
    fn test_closed_receiver_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut trigger = PaginationTrigger::new(tx);
        assert_eq!(trigger.load_more(), 1);
    }
}
