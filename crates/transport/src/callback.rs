//! Callback id generation.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use rand::Rng;

const PREFIX: &str = "jsonp_callback";
const SUFFIX_LEN: usize = 9;
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates callback ids of the form `jsonp_callback_<millis>_<seq>_<rand>`.
///
/// The sequence number is strictly increasing per generator, so two ids from
/// the same generator never collide even within one millisecond. The random
/// suffix keeps ids from separate generators (or processes) apart.
#[derive(Debug, Default)]
pub struct CallbackIds {
    seq: AtomicU64,
}

impl CallbackIds {
    /// Create a generator starting at sequence zero.
    pub const fn new() -> Self {
        Self { seq: AtomicU64::new(0) }
    }

    /// Produce the next id. Always a valid JavaScript identifier.
    pub fn next_id(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        format!("{PREFIX}_{millis}_{seq}_{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_are_unique_and_identifier_safe() {
        let ids = CallbackIds::new();
        let generated: Vec<String> = (0..10_000).map(|_| ids.next_id()).collect();

        let unique: HashSet<&String> = generated.iter().collect();
        assert_eq!(unique.len(), generated.len());

        for id in &generated {
            assert!(id.starts_with("jsonp_callback_"));
            assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        }
    }
}
