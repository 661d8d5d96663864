use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::symbol::{Symbol, EPSILON};

/// The production's index in the grammar.
///
/// Index 0 is always the augmented production.
pub type ProductionId = usize;

/// A grammar production
///
/// # Example
/// E -> E + T
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Production {
    pub id: ProductionId,
    pub head: Symbol,
    pub body: Vec<Symbol>,
}

impl Production {
    pub fn new<I>(id: ProductionId, head: Symbol, body: I) -> Self
    where
        I: IntoIterator<Item = Symbol>,
    {
        Self {
            id,
            head,
            body: body.into_iter().collect(),
        }
    }

    /// Number of symbols in the body.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// An ε-production.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the symbol found at the given position of the body.
    pub fn symbol_at(&self, position: usize) -> Option<&Symbol> {
        self.body.get(position)
    }

    /// Renders the body, ε for an empty one.
    pub fn body_to_string(&self) -> String {
        if self.body.is_empty() {
            EPSILON.to_string()
        } else {
            self.body.iter().join(" ")
        }
    }
}

impl std::fmt::Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}) {} -> {}", self.id, self.head, self.body_to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::Production;
    use crate::Symbol;

    #[test]
    fn test_001_display() {
        let production = Production::new(
            1,
            Symbol::nterm("E"),
            [Symbol::nterm("E"), Symbol::term("+"), Symbol::nterm("T")],
        );
        assert_eq!(production.to_string(), "(1) E -> E + T");

        let empty = Production::new(4, Symbol::nterm("A"), []);
        assert!(empty.is_empty());
        assert_eq!(empty.to_string(), "(4) A -> ε");
    }
}
