use serde::{Deserialize, Serialize};

use crate::ProductionId;

use super::StateId;

/// A cell of the action table.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "target", rename_all = "snake_case")]
pub enum Action {
    Shift(StateId),
    Reduce(ProductionId),
    Accept,
    #[default]
    Error,
}

impl Action {
    #[inline(always)]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Shift(to) => write!(f, "s{}", to),
            Action::Reduce(to) => write!(f, "r{}", to),
            Action::Accept => write!(f, "acc"),
            Action::Error => write!(f, "err"),
        }
    }
}
