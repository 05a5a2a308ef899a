//! Form controllers for the admin panel. Each controller owns an in-memory
//! copy of its records; nothing reaches the site until a save or delete.

use chrono::Utc;

use crate::error::ClientError;

mod board;
mod events;
mod hero;
mod quick;

pub use board::{BoardDraft, BoardEditor, BoardField};
pub use events::{EventDraft, EventField, EventsEditor};
pub use hero::{HeroEditor, HeroField};
pub use quick::{QuickEditor, QuickForm};

/// Identifies a draft inside one controller, whether or not the site has
/// assigned it an id yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalKey(pub i64);

/// Hands out time-derived keys that never repeat within a controller, even
/// when several drafts are added in the same millisecond.
#[derive(Debug, Default)]
struct LocalKeys {
    last: i64,
}

impl LocalKeys {
    fn next(&mut self) -> LocalKey {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        LocalKey(self.last)
    }
}

/// Optional text fields store `None` when cleared.
fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_sequence(value: &str) -> Result<i64, ClientError> {
    value.trim().parse::<i64>().map_err(|_| {
        ClientError::validation(format!("sequence must be a whole number, got '{value}'"))
    })
}

#[cfg(test)]
#[path = "../tests/editors_tests.rs"]
mod tests;
