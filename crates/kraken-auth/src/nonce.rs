//! Nonce sources for private requests
//!
//! Kraken rejects any private request whose nonce is not greater than the
//! last one it accepted for the same API key. All requests signed with one
//! key must therefore draw from one source.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

/// Issues strictly increasing nonces
///
/// Implementations must be safe to share across threads and tasks: two
/// concurrent callers never observe the same value, and a later call never
/// observes a smaller one.
pub trait NonceSource: Send + Sync + fmt::Debug {
    /// Issue the next nonce
    fn next_nonce(&self) -> u64;
}

/// Millisecond-clock nonce that never repeats or goes backwards
///
/// Issues `max(now_ms, last + 1)`, so bursts within one millisecond and
/// clock steps backwards still yield increasing values.
#[derive(Debug, Default)]
pub struct MillisNonce {
    last: AtomicU64,
}

impl MillisNonce {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NonceSource for MillisNonce {
    fn next_nonce(&self) -> u64 {
        let now = now_millis();
        let previous = match self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last + 1))
            }) {
            Ok(previous) | Err(previous) => previous,
        };

        if now <= previous {
            debug!(now, previous, "Nonce clock behind last issued value");
        }
        now.max(previous + 1)
    }
}

/// Plain counter nonce, mainly for tests and replayable fixtures
#[derive(Debug)]
pub struct CounterNonce {
    next: AtomicU64,
}

impl CounterNonce {
    /// First call to `next_nonce` returns `start`
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl NonceSource for CounterNonce {
    fn next_nonce(&self) -> u64 {
        self.next.fetch_add(1, Ordering::AcqRel)
    }
}

/// The process-wide nonce source shared by every client that is not given
/// its own
pub fn default_nonce_source() -> Arc<dyn NonceSource> {
    static SHARED: OnceLock<Arc<MillisNonce>> = OnceLock::new();
    SHARED.get_or_init(|| Arc::new(MillisNonce::new())).clone()
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::thread;

    #[test]
    fn test_millis_nonce_tracks_clock() {
        let source = MillisNonce::new();
        let before = now_millis();
        let nonce = source.next_nonce();
        assert!(nonce >= before);
    }

    #[test]
    fn test_millis_nonce_strictly_increasing_in_burst() {
        let source = MillisNonce::new();
        let mut last = source.next_nonce();
        for _ in 0..10_000 {
            let next = source.next_nonce();
            assert!(next > last, "{} should be greater than {}", next, last);
            last = next;
        }
    }

    #[test]
    fn test_millis_nonce_survives_clock_behind() {
        let source = MillisNonce::new();
        let ahead = now_millis() + 60_000;
        source.last.store(ahead, Ordering::SeqCst);
        assert_eq!(source.next_nonce(), ahead + 1);
        assert_eq!(source.next_nonce(), ahead + 2);
    }

    #[test]
    fn test_counter_nonce() {
        let source = CounterNonce::starting_at(42);
        assert_eq!(source.next_nonce(), 42);
        assert_eq!(source.next_nonce(), 43);
    }

    #[test]
    fn test_concurrent_nonces_are_unique() {
        let source = Arc::new(MillisNonce::new());
        let threads = 8;
        let per_thread = 2_000;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let source = Arc::clone(&source);
                thread::spawn(move || {
                    let mut issued = Vec::with_capacity(per_thread);
                    for _ in 0..per_thread {
                        issued.push(source.next_nonce());
                    }
                    issued
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            let issued = handle.join().unwrap();
            assert!(issued.windows(2).all(|w| w[0] < w[1]));
            all.extend(issued);
        }
        assert_eq!(all.len(), threads * per_thread);
    }

    #[test]
    fn test_issue_order_matches_value_order() {
        // Recording under the same lock as issuance gives the observed order.
        let source = Arc::new(MillisNonce::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let source = Arc::clone(&source);
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let mut log = log.lock().unwrap();
                        log.push(source.next_nonce());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 2_000);
        assert!(log.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_default_source_is_shared() {
        let a = default_nonce_source();
        let b = default_nonce_source();
        let first = a.next_nonce();
        let second = b.next_nonce();
        assert!(second > first);
    }
}
