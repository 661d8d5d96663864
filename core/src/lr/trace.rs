use itertools::Itertools;
use prettytable::Table as PtTable;
use serde::{Deserialize, Serialize};

use crate::Symbol;

use super::{Action, StateId};

/// An element of the parser stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StackEntry {
    State(StateId),
    Symbol(Symbol),
}

impl StackEntry {
    pub fn state(&self) -> Option<StateId> {
        match self {
            Self::State(state) => Some(*state),
            Self::Symbol(_) => None,
        }
    }

    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            Self::Symbol(symbol) => Some(symbol),
            Self::State(_) => None,
        }
    }
}

impl std::fmt::Display for StackEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::State(state) => write!(f, "{}", state),
            Self::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

/// A snapshot of the parser, with the action taken from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfiguration {
    pub stack: Vec<StackEntry>,
    pub remaining_input: Vec<Symbol>,
    pub action: Action,
}

impl ParserConfiguration {
    /// The state on top of the stack.
    pub fn state(&self) -> Option<StateId> {
        self.stack.iter().rev().find_map(StackEntry::state)
    }

    pub fn lookahead(&self) -> Option<&Symbol> {
        self.remaining_input.first()
    }
}

/// The configurations of a parse, in order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParseTrace(Vec<ParserConfiguration>);

impl ParseTrace {
    pub(crate) fn push(&mut self, configuration: ParserConfiguration) {
        self.0.push(configuration)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParserConfiguration> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&ParserConfiguration> {
        self.0.last()
    }

    /// The parse ended on the accept action.
    pub fn is_accepted(&self) -> bool {
        matches!(self.last(), Some(configuration) if configuration.action == Action::Accept)
    }

    /// Number of configurations whose action was carried out.
    pub fn executed(&self) -> usize {
        self.iter().filter(|c| !c.action.is_error()).count()
    }
}

impl<'a> IntoIterator for &'a ParseTrace {
    type Item = &'a ParserConfiguration;
    type IntoIter = std::slice::Iter<'a, ParserConfiguration>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for ParseTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut table = PtTable::new();
        table.add_row(["#", "stack", "input", "action"].into_iter().collect());

        for (step, configuration) in self.iter().enumerate() {
            table.add_row(
                [
                    (step + 1).to_string(),
                    configuration.stack.iter().join(" "),
                    configuration.remaining_input.iter().join(" "),
                    configuration.action.to_string(),
                ]
                .into_iter()
                .collect(),
            );
        }

        write!(f, "{}", table)
    }
}
