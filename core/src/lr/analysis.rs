use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    error::TableError,
    lookahead::{FirstSets, FollowSets},
    Grammar, Symbol,
};

/// The bottom-up analysis a table is built for.
///
/// Both share the LR(0) automaton, they differ in the terminals a
/// reduction is entered for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    /// Reduce on every terminal.
    Lr0,
    /// Reduce on Follow(A).
    #[default]
    Slr1,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 2] = [AnalysisType::Lr0, AnalysisType::Slr1];

    /// Prepares the lookahead policy of the analysis for a grammar.
    pub(crate) fn policy(self, grammar: &Grammar) -> ReducePolicy {
        match self {
            Self::Lr0 => ReducePolicy::Always(
                grammar
                    .terminals()
                    .iter()
                    .cloned()
                    .chain([Symbol::EndMarker])
                    .collect(),
            ),
            Self::Slr1 => {
                let first = FirstSets::compute(grammar);
                ReducePolicy::Follow(FollowSets::compute(grammar, &first))
            }
        }
    }
}

impl std::fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lr0 => write!(f, "LR(0)"),
            Self::Slr1 => write!(f, "SLR(1)"),
        }
    }
}

impl FromStr for AnalysisType {
    type Err = TableError;

    fn from_str(selector: &str) -> Result<Self, Self::Err> {
        let normalized: String = selector
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "lr0" => Ok(Self::Lr0),
            "slr" | "slr1" => Ok(Self::Slr1),
            _ => Err(TableError::UnsupportedAnalysis(selector.to_string())),
        }
    }
}

/// Terminals a completed item A -> α • is reduced on.
pub(crate) enum ReducePolicy {
    Always(Vec<Symbol>),
    Follow(FollowSets),
}

impl ReducePolicy {
    pub fn lookaheads(&self, head: &Symbol) -> Vec<Symbol> {
        match self {
            Self::Always(terminals) => terminals.clone(),
            Self::Follow(follow) => follow
                .get(head)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AnalysisType;
    use crate::error::TableError;

    #[test]
    fn test_001_selector() {
        assert_eq!("LR(0)".parse::<AnalysisType>(), Ok(AnalysisType::Lr0));
        assert_eq!("lr0".parse::<AnalysisType>(), Ok(AnalysisType::Lr0));
        assert_eq!("SLR(1)".parse::<AnalysisType>(), Ok(AnalysisType::Slr1));
        assert_eq!("slr".parse::<AnalysisType>(), Ok(AnalysisType::Slr1));
        assert_eq!(
            "LALR".parse::<AnalysisType>(),
            Err(TableError::UnsupportedAnalysis("LALR".to_string()))
        );
    }

    #[test]
    fn test_002_display_round_trip() {
        for analysis in AnalysisType::ALL {
            assert_eq!(analysis.to_string().parse::<AnalysisType>(), Ok(analysis));
        }
    }
}
