//! Identifier normalization.
//!
//! Handles and secret words are typed by people into a form, so they are
//! compared case- and whitespace-insensitively.

use crate::attendance::types::{Event, Response};

/// Trims surrounding whitespace and lowercases. Idempotent.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Normalizes handle and secret word of every response in place.
pub fn normalize_responses(responses: &mut [Response]) {
    for r in responses.iter_mut() {
        r.handle = normalize(&r.handle);
        r.secret_word = normalize(&r.secret_word);
    }
}

/// Normalizes the secret word of every event in place.
pub fn normalize_events(events: &mut [Event]) {
    for e in events.iter_mut() {
        e.secret_word = normalize(&e.secret_word);
    }
}
