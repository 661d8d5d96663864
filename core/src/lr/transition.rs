use crate::{ItemSet, Symbol};

use super::{Automaton, StateId};

/// A state with its outgoing edges.
pub struct Transition<'a> {
    pub from: &'a ItemSet,
    pub edges: Vec<(&'a Symbol, StateId)>,
}

impl Automaton {
    pub fn transitions(&self) -> impl Iterator<Item = Transition<'_>> {
        self.states.iter().map(|set| Transition {
            from: set,
            edges: self
                .edges
                .iter()
                .filter(|(from, _, _)| set.id == *from)
                .map(|(_, sym, to)| (sym, *to))
                .collect(),
        })
    }
}
