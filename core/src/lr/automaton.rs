use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::{Grammar, Item, ItemSet, Symbol};

use super::StateId;

/// The canonical collection of LR(0) item sets and their goto function.
#[derive(Debug)]
pub struct Automaton {
    pub(super) states: Vec<ItemSet>,
    pub(super) edges: Vec<(StateId, Symbol, StateId)>,
    index: BTreeMap<BTreeSet<Item>, StateId>,
}

impl Automaton {
    /// Builds the automaton of the grammar.
    ///
    /// State #0 is the closure of S' -> • S, the other states are numbered in
    /// order of discovery.
    pub fn build(grammar: &Grammar) -> Self {
        let mut automaton = Self {
            states: Vec::default(),
            edges: Vec::default(),
            index: BTreeMap::default(),
        };

        automaton.push(ItemSet::close([Item::start()], grammar));
        let mut queue = VecDeque::from_iter([0]);

        while let Some(from) = queue.pop_front() {
            let symbols: Vec<Symbol> = automaton.states[from]
                .symbols_after_dot(grammar)
                .into_iter()
                .cloned()
                .collect();

            for symbol in symbols {
                let set = automaton.states[from].goto(&symbol, grammar);
                if set.is_empty() {
                    continue;
                }

                let (to, discovered) = automaton.push(set);
                if discovered {
                    log::trace!("{}", automaton.states[to].display(grammar));
                    queue.push_back(to);
                }

                log::trace!("#{} --{}--> #{}", from, symbol, to);
                automaton.edges.push((from, symbol, to));
            }
        }

        log::debug!(
            "built {} states and {} transitions",
            automaton.states.len(),
            automaton.edges.len()
        );

        automaton
    }

    /// Push a new set in the automaton, if it does not yet exist.
    ///
    /// Returns the id of the state, and whether it was discovered.
    fn push(&mut self, mut set: ItemSet) -> (StateId, bool) {
        if let Some(id) = self.index.get(set.items()) {
            return (*id, false);
        }

        let id = self.states.len();
        set.id = id;
        self.index.insert(set.items().clone(), id);
        self.states.push(set);
        (id, true)
    }

    pub fn state(&self, id: StateId) -> Option<&ItemSet> {
        self.states.get(id)
    }

    pub fn states(&self) -> &[ItemSet] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// goto(state, symbol), as recorded during construction.
    pub fn goto(&self, from: StateId, symbol: &Symbol) -> Option<StateId> {
        self.edges
            .iter()
            .find(|(state, sym, _)| *state == from && sym == symbol)
            .map(|(_, _, to)| *to)
    }

    /// Iterate over every recorded transition, in order of discovery.
    pub fn iter_edges(&self) -> impl Iterator<Item = (StateId, &Symbol, StateId)> {
        self.edges.iter().map(|(from, sym, to)| (*from, sym, *to))
    }
}

/// Builds the canonical collection of the grammar.
pub fn build_automaton(grammar: &Grammar) -> Automaton {
    Automaton::build(grammar)
}
