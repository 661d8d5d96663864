use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Textual form of the end marker.
pub const END_MARKER: &str = "$";

/// Textual form of the empty string.
pub const EPSILON: &str = "ε";

/// A grammar symbol.
///
/// The tag takes part in equality and hashing, so a terminal and a
/// non-terminal sharing the same name are never confused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Symbol {
    Terminal(String),
    NonTerminal(String),
    /// End of the input ($)
    EndMarker,
    /// Empty string (ε), only found in first sets.
    Epsilon,
}

impl Symbol {
    pub fn term(name: impl Into<String>) -> Self {
        Self::Terminal(name.into())
    }

    pub fn nterm(name: impl Into<String>) -> Self {
        Self::NonTerminal(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Terminal(name) | Self::NonTerminal(name) => name,
            Self::EndMarker => END_MARKER,
            Self::Epsilon => EPSILON,
        }
    }

    /// The symbol can label a column of the action table.
    #[inline(always)]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_) | Self::EndMarker)
    }

    #[inline(always)]
    pub fn is_non_terminal(&self) -> bool {
        matches!(self, Self::NonTerminal(_))
    }

    #[inline(always)]
    pub fn is_end_marker(&self) -> bool {
        matches!(self, Self::EndMarker)
    }

    #[inline(always)]
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Self::Epsilon)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Terminal(_) => 0,
            Self::NonTerminal(_) => 1,
            Self::EndMarker => 2,
            Self::Epsilon => 3,
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Symbols are ordered by name, then by kind.
impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name()
            .cmp(other.name())
            .then_with(|| self.rank().cmp(&other.rank()))
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::Symbol;

    #[test]
    fn test_001_kind_is_part_of_identity() {
        assert_ne!(Symbol::term("E"), Symbol::nterm("E"));
        assert_eq!(Symbol::term("id"), Symbol::term("id"));
    }

    #[test]
    fn test_002_ordering_by_name() {
        let mut symbols = vec![
            Symbol::nterm("T"),
            Symbol::term("+"),
            Symbol::EndMarker,
            Symbol::term("id"),
            Symbol::nterm("E"),
        ];
        symbols.sort();

        assert_eq!(
            symbols,
            vec![
                Symbol::EndMarker,
                Symbol::term("+"),
                Symbol::nterm("E"),
                Symbol::nterm("T"),
                Symbol::term("id"),
            ]
        );

        assert!(Symbol::term("a") < Symbol::nterm("a"));
    }

    #[test]
    fn test_003_display() {
        assert_eq!(Symbol::EndMarker.to_string(), "$");
        assert_eq!(Symbol::Epsilon.to_string(), "ε");
        assert_eq!(Symbol::nterm("E'").to_string(), "E'");
    }
}
