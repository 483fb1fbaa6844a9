//! Key event log.
//!
//! Short free-text facts the character should remember. Insertion order is chronological and
//! significant; the core only appends. The log has no cap.

use serde::{Deserialize, Serialize};

/// Append-only, chronologically ordered list of key events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyEventLog {
    events: Vec<String>,
}

impl KeyEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event at the end of the log.
    pub fn push(&mut self, event: impl Into<String>) {
        self.events.push(event.into());
    }

    pub fn as_slice(&self) -> &[String] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for KeyEventLog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_order() {
        let mut log = KeyEventLog::new();
        log.push("met at the library");
        log.push("shared a secret");
        assert_eq!(log.len(), 2);
        assert_eq!(log.as_slice()[0], "met at the library");
        assert_eq!(
            log.iter().collect::<Vec<_>>(),
            vec!["met at the library", "shared a secret"]
        );
    }

    #[test]
    fn test_collect_from_strings() {
        let log = KeyEventLog::new();
        assert!(log.is_empty());

        let log: KeyEventLog = ["a", "b"].into_iter().collect();
        assert_eq!(log.as_slice(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let log: KeyEventLog = ["a"].into_iter().collect();
        assert_eq!(serde_json::to_string(&log).unwrap(), r#"["a"]"#);
    }
}
