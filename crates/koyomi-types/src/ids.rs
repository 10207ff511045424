//! Typed identifiers for records and property templates.
//!
//! Both ID types wrap the opaque string the record store hands out. They are
//! transparent on the wire (plain JSON strings) and display verbatim for
//! logging. Freshly minted IDs are UUIDv7 in simple (hyphen-free) form so they
//! sort by creation time. The `short()` form (first 8 chars) is for
//! human-facing output only, never used as a lookup key.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A record identifier, as assigned by the record store.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

/// A property template identifier, as declared by the schema.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(String);

/// Error from parsing an identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("identifier cannot be empty")]
    Empty,
}

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_string_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Mint a new time-ordered ID (UUIDv7, simple form).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7().as_simple().to_string())
            }

            /// Parse from caller-provided text. Surrounding whitespace is trimmed.
            pub fn parse(s: &str) -> Result<Self, IdError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(IdError::Empty);
                }
                Ok(Self(trimmed.to_string()))
            }

            /// The raw identifier text.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// First 8 characters, for human display only (not lookup).
            pub fn short(&self) -> &str {
                match self.0.char_indices().nth(8) {
                    Some((end, _)) => &self.0[..end],
                    None => &self.0,
                }
            }

            /// Prefer a label for display; fall back to the short form.
            pub fn display_or(&self, label: Option<&str>) -> String {
                match label {
                    Some(l) if !l.is_empty() => l.to_string(),
                    _ => self.short().to_string(),
                }
            }

            /// Check if a query string matches this ID by prefix.
            pub fn matches_prefix(&self, prefix: &str) -> bool {
                self.0.starts_with(prefix)
            }
        }

        impl Default for $T {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<&str> for $T {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $T {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<$T> for String {
            fn from(id: $T) -> String {
                id.0
            }
        }

        impl AsRef<str> for $T {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $T {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $name, self.short())
            }
        }
    };
}

impl_string_id!(RecordId, "RecordId");
impl_string_id!(PropertyId, "PropertyId");

// ── Prefix resolution ───────────────────────────────────────────────────────

/// Error from ambiguous prefix resolution.
#[derive(Debug, thiserror::Error)]
pub enum PrefixError {
    #[error("no match for prefix '{0}'")]
    NoMatch(String),
    #[error("ambiguous prefix '{prefix}': matches {candidates:?}")]
    Ambiguous {
        prefix: String,
        candidates: Vec<String>,
    },
}

/// Resolve a query string against a set of record IDs and optional titles.
///
/// Resolution order:
/// 1. Exact ID match
/// 2. Exact title match
/// 3. Unique ID prefix match
/// 4. Error (no match or ambiguous)
pub fn resolve_record_prefix<'a>(
    records: impl Iterator<Item = (&'a RecordId, Option<&'a str>)>,
    query: &str,
) -> Result<RecordId, PrefixError> {
    let entries: Vec<(&RecordId, Option<&str>)> = records.collect();

    if let Some((id, _)) = entries.iter().find(|(id, _)| id.as_str() == query) {
        return Ok((*id).clone());
    }

    let titled: Vec<&RecordId> = entries
        .iter()
        .filter(|(_, title)| *title == Some(query))
        .map(|(id, _)| *id)
        .collect();
    match titled.len() {
        0 => {}
        1 => return Ok(titled[0].clone()),
        _ => {
            return Err(PrefixError::Ambiguous {
                prefix: query.to_string(),
                candidates: titled.iter().map(|id| id.to_string()).collect(),
            });
        }
    }

    let prefixed: Vec<&RecordId> = entries
        .iter()
        .filter(|(id, _)| id.matches_prefix(query))
        .map(|(id, _)| *id)
        .collect();
    match prefixed.len() {
        0 => Err(PrefixError::NoMatch(query.to_string())),
        1 => Ok(prefixed[0].clone()),
        _ => Err(PrefixError::Ambiguous {
            prefix: query.to_string(),
            candidates: prefixed.iter().map(|id| id.to_string()).collect(),
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_new_is_unique() {
        let a = RecordId::new();
        let b = RecordId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_new_is_simple_uuid() {
        let id = RecordId::new();
        assert_eq!(id.as_str().len(), 32);
        assert!(!id.as_str().contains('-'));
    }

    #[test]
    fn test_short_is_8_chars() {
        let id = PropertyId::from("7c0a9d4e-long-property");
        assert_eq!(id.short(), "7c0a9d4e");
    }

    #[test]
    fn test_short_keeps_short_ids_whole() {
        let id = RecordId::from("abc");
        assert_eq!(id.short(), "abc");
    }

    #[test]
    fn test_parse_trims_and_rejects_empty() {
        assert_eq!(RecordId::parse("  card-1 ").unwrap().as_str(), "card-1");
        assert_eq!(RecordId::parse("   ").unwrap_err(), IdError::Empty);
    }

    #[test]
    fn test_borrow_allows_str_lookup() {
        let mut map = HashMap::new();
        map.insert(RecordId::from("card-1"), 1);
        assert_eq!(map.get("card-1"), Some(&1));
    }

    #[test]
    fn test_display_or_prefers_label() {
        let id = RecordId::from("0123456789abcdef");
        assert_eq!(id.display_or(Some("Launch")), "Launch");
        assert_eq!(id.display_or(Some("")), "01234567");
        assert_eq!(id.display_or(None), "01234567");
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = RecordId::from("card-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"card-1\"");
        let parsed: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_debug_format() {
        let id = RecordId::from("card-1");
        assert_eq!(format!("{:?}", id), "RecordId(card-1)");
    }

    // ── Prefix resolution ───────────────────────────────────────────────

    fn sample() -> Vec<(RecordId, Option<String>)> {
        vec![
            (RecordId::from("a1b2c3"), Some("Launch".to_string())),
            (RecordId::from("a1ffff"), Some("Review".to_string())),
            (RecordId::from("b00000"), None),
        ]
    }

    fn resolve(entries: &[(RecordId, Option<String>)], query: &str) -> Result<RecordId, PrefixError> {
        resolve_record_prefix(entries.iter().map(|(id, t)| (id, t.as_deref())), query)
    }

    #[test]
    fn test_resolve_exact_id() {
        let entries = sample();
        assert_eq!(resolve(&entries, "b00000").unwrap(), RecordId::from("b00000"));
    }

    #[test]
    fn test_resolve_title() {
        let entries = sample();
        assert_eq!(resolve(&entries, "Review").unwrap(), RecordId::from("a1ffff"));
    }

    #[test]
    fn test_resolve_unique_prefix() {
        let entries = sample();
        assert_eq!(resolve(&entries, "a1b").unwrap(), RecordId::from("a1b2c3"));
    }

    #[test]
    fn test_resolve_ambiguous_prefix() {
        let entries = sample();
        assert!(matches!(
            resolve(&entries, "a1"),
            Err(PrefixError::Ambiguous { .. })
        ));
    }

    #[test]
    fn test_resolve_no_match() {
        let entries = sample();
        assert!(matches!(resolve(&entries, "zz"), Err(PrefixError::NoMatch(_))));
    }
}
