//! The fixed set of identifiers considered redeemable

use std::collections::HashSet;

/// Immutable token namespace. Membership never changes during a session.
#[derive(Debug, Clone)]
pub struct TokenUniverse {
    tokens: HashSet<String>,
}

impl TokenUniverse {
    /// Generate `{prefix}{zero-padded ordinal}` for ordinals 1..=count.
    ///
    /// With prefix "TOKEN", count 400, pad width 3 this yields TOKEN001
    /// through TOKEN400. Ordinals wider than `pad_width` keep their full
    /// digits rather than being truncated.
    pub fn generate(prefix: &str, count: usize, pad_width: usize) -> Self {
        let tokens = (1..=count)
            .map(|i| format!("{prefix}{i:0pad_width$}"))
            .collect();
        Self { tokens }
    }

    /// Build from an explicit list, for non-sequential identifier spaces.
    /// Entries are trimmed; blank entries are dropped.
    pub fn from_list<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = ids
            .into_iter()
            .map(|id| id.as_ref().trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        Self { tokens }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tokens.contains(id)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
