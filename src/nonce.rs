//! Nonce and timestamp generation.
//!
//! Nonces are unique within one [`NonceCounter`]: every nonce carries a
//! strictly increasing offset taken from the counter. Uniqueness across
//! processes is not guaranteed.

use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;

#[derive(Debug)]
struct Inner {
    offset: AtomicU64,
    rng: Mutex<StdRng>,
}

/// Shared nonce state. Clones share the same offset and RNG.
///
/// Create one per process and hand clones to every [`NonceGenerator`].
#[derive(Clone, Debug)]
pub struct NonceCounter {
    inner: Arc<Inner>,
}

impl NonceCounter {
    /// Creates a counter whose RNG is seeded from the current time.
    pub fn new() -> Self {
        let seed = OffsetDateTime::now_utc().unix_timestamp_nanos() as u64;
        Self::with_seed(seed)
    }

    /// Creates a counter with a fixed RNG seed.
    pub fn with_seed(seed: u64) -> Self {
        NonceCounter {
            inner: Arc::new(Inner {
                offset: AtomicU64::new(0),
                rng: Mutex::new(StdRng::seed_from_u64(seed)),
            }),
        }
    }

    fn next_offset(&self) -> u64 {
        self.inner.offset.fetch_add(1, Ordering::Relaxed)
    }

    fn next_random(&self) -> u32 {
        // A poisoned lock still holds a usable RNG.
        let mut rng = self
            .inner
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen()
    }
}

impl Default for NonceCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Produces nonces and timestamps for requests.
#[derive(Clone, Debug, Default)]
pub struct NonceGenerator {
    counter: NonceCounter,
}

impl NonceGenerator {
    /// Creates a generator drawing from `counter`.
    pub fn new(counter: NonceCounter) -> Self {
        NonceGenerator { counter }
    }

    /// The counter this generator draws from.
    pub fn counter(&self) -> &NonceCounter {
        &self.counter
    }

    /// A fresh nonce: eight hex digits of randomness followed by the hex
    /// offset.
    pub fn nonce(&self) -> String {
        let random = self.counter.next_random();
        let offset = self.counter.next_offset();
        let nonce = format!("{:08x}{:x}", random, offset);
        trace!("generated nonce {} (offset {})", nonce, offset);
        nonce
    }

    /// Current UTC Unix time in seconds.
    pub fn timestamp(&self) -> String {
        timestamp()
    }
}

/// Current UTC Unix time in seconds, as a decimal string.
pub fn timestamp() -> String {
    OffsetDateTime::now_utc().unix_timestamp().to_string()
}
