//! Request nonces
//!
//! LeverJ rejects a request whose nonce is not larger than the previous
//! one, so nonces come from a [`NonceSource`] rather than straight from
//! the clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn current_time_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Supplies the nonce of each signed request
pub trait NonceSource: Send + Sync {
    fn next_nonce(&self) -> u64;
}

/// Millisecond clock nonce, bumped past the last value it handed out
///
/// Two calls within the same millisecond (or after the clock stepped
/// back) still get strictly increasing values.
#[derive(Debug, Default)]
pub struct ClockNonce {
    last: AtomicU64,
}

impl ClockNonce {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NonceSource for ClockNonce {
    fn next_nonce(&self) -> u64 {
        let now = current_time_ms();
        let bump = |last: u64| now.max(last.saturating_add(1));
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(bump(last)))
            .unwrap_or_else(|last| last);
        bump(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_current_time_ms() {
        assert!(current_time_ms() > 1_700_000_000_000);
    }

    #[test]
    fn test_clock_nonce_tracks_clock() {
        let source = ClockNonce::new();
        let before = current_time_ms();
        let nonce = source.next_nonce();
        assert!(nonce >= before);
    }

    #[test]
    fn test_clock_nonce_strictly_increasing() {
        let source = ClockNonce::new();
        let mut previous = source.next_nonce();
        for _ in 0..10_000 {
            let next = source.next_nonce();
            assert!(next > previous, "{} not > {}", next, previous);
            previous = next;
        }
    }

    #[test]
    fn test_clock_nonce_unique_across_threads() {
        let source = Arc::new(ClockNonce::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let source = Arc::clone(&source);
                std::thread::spawn(move || (0..1_000).map(|_| source.next_nonce()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for nonce in handle.join().unwrap() {
                assert!(seen.insert(nonce), "duplicate nonce {}", nonce);
            }
        }
        assert_eq!(seen.len(), 8_000);
    }
}
