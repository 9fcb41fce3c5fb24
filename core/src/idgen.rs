//! Report identifier generation.
//!
//! Reports without a `report_id` get one derived from the header's
//! `start_time` date plus a random suffix. The suffix source is injectable so
//! tests can pin it to a known value.

use chrono::DateTime;

/// Length of the generated report-id suffix.
pub const NONCE_LEN: usize = 40;

/// Source of the random suffix appended to generated report ids.
pub trait NonceGenerator: Send + Sync {
    /// Returns a fresh [`NONCE_LEN`]-character lowercase-ASCII suffix.
    fn nonce(&self) -> String;
}

/// Default generator: 40 uniformly random lowercase ASCII letters,
/// roughly 188 bits of entropy. Not cryptographic, but collision-free
/// for any realistic fleet size.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomNonce;

impl NonceGenerator for RandomNonce {
    fn nonce(&self) -> String {
        use rand::Rng;

        let mut rng = rand::rng();
        (0..NONCE_LEN)
            .map(|_| rng.random_range(b'a'..=b'z') as char)
            .collect()
    }
}

/// Deterministic generator for tests: always returns the same suffix.
#[derive(Debug, Clone)]
pub struct FixedNonce(String);

impl FixedNonce {
    pub fn new(nonce: impl Into<String>) -> Self {
        Self(nonce.into())
    }
}

impl NonceGenerator for FixedNonce {
    fn nonce(&self) -> String {
        self.0.clone()
    }
}

/// Calendar date (`YYYY-MM-DD`, UTC) of an epoch-seconds timestamp.
///
/// Returns `None` for timestamps outside the representable range.
pub fn report_date(start_time: f64) -> Option<String> {
    DateTime::from_timestamp(start_time as i64, 0).map(|dt| dt.format("%Y-%m-%d").to_string())
}
