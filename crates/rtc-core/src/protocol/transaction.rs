//! Thread-safe transaction id counter.
//!
//! Every client frame that expects an acknowledgment carries a transaction
//! id; the server echoes it back in the matching `ack` or `error` frame.
//! Ids only need to be unique per connection, so a plain atomic increment
//! is enough; no locking, no persistence.

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter for signaling transaction ids.
///
/// Starts at 1 so that 0 never appears on the wire and can be treated as
/// "no transaction" in logs. Wraps at `u64::MAX` without panicking, which
/// in practice no connection lives long enough to see.
///
/// # Examples
///
/// ```rust
/// use rtc_core::protocol::TransactionCounter;
///
/// let counter = TransactionCounter::new();
/// assert_eq!(counter.next(), 1);
/// assert_eq!(counter.next(), 2);
/// ```
pub struct TransactionCounter {
    inner: AtomicU64,
}

impl TransactionCounter {
    pub fn new() -> Self {
        Self {
            inner: AtomicU64::new(1),
        }
    }

    /// Returns the next transaction id and advances the counter.
    ///
    /// `Ordering::Relaxed` is sufficient: ids are only used for request
    /// correlation, not for memory synchronization between threads.
    pub fn next(&self) -> u64 {
        self.inner.fetch_add(1, Ordering::Relaxed)
    }

    /// The id the next call to [`next`](Self::next) would return. For
    /// diagnostics only; another thread may advance the counter at any time.
    pub fn peek(&self) -> u64 {
        self.inner.load(Ordering::Relaxed)
    }
}

impl Default for TransactionCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_counter_starts_at_one() {
        let counter = TransactionCounter::new();
        assert_eq!(counter.next(), 1);
    }

    #[test]
    fn test_counter_increments_monotonically() {
        let counter = TransactionCounter::new();
        let values: Vec<u64> = (0..100).map(|_| counter.next()).collect();
        for window in values.windows(2) {
            assert!(window[1] > window[0], "ids must be strictly increasing");
        }
    }

    #[test]
    fn test_counter_wraps_without_panicking() {
        let counter = TransactionCounter {
            inner: AtomicU64::new(u64::MAX),
        };
        assert_eq!(counter.next(), u64::MAX);
        assert_eq!(counter.next(), 0);
    }

    #[test]
    fn test_ids_are_unique_across_threads() {
        let counter = Arc::new(TransactionCounter::new());
        let threads = 8;
        let per_thread = 1000;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let c = Arc::clone(&counter);
                thread::spawn(move || (0..per_thread).map(|_| c.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().expect("thread panicked"))
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(
            all.len(),
            threads * per_thread,
            "no two threads may receive the same transaction id"
        );
    }

    #[test]
    fn test_peek_does_not_advance() {
        let counter = TransactionCounter::new();
        counter.next();
        assert_eq!(counter.peek(), 2);
        assert_eq!(counter.next(), 2);
    }
}
