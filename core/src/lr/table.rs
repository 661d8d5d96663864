use prettytable::Table as PtTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{error::TableError, Grammar, Production, ProductionId, Symbol};

use super::{Action, AnalysisType, Automaton, StateId};

/// Two actions computed for the same cell.
///
/// The table keeps the existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub state: StateId,
    pub symbol: Symbol,
    pub existing: Action,
    pub attempted: Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
    Other,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ShiftReduce => write!(f, "shift/reduce"),
            Self::ReduceReduce => write!(f, "reduce/reduce"),
            Self::Other => write!(f, "action"),
        }
    }
}

impl Conflict {
    pub fn kind(&self) -> ConflictKind {
        use Action::*;

        match (self.existing, self.attempted) {
            (Shift(_), Reduce(_)) | (Reduce(_), Shift(_)) => ConflictKind::ShiftReduce,
            (Reduce(_), Reduce(_)) => ConflictKind::ReduceReduce,
            _ => ConflictKind::Other,
        }
    }
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} conflict in state {} on {}: kept {}, dropped {}",
            self.kind(),
            self.state,
            self.symbol,
            self.existing,
            self.attempted
        )
    }
}

/// Action per (state, terminal). Absent cells are errors.
///
/// The table carries the productions it reduces by and the terminal
/// alphabet, so it is all a parser needs besides the goto table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTable {
    states: usize,
    terminals: Vec<Symbol>,
    productions: Vec<Production>,
    #[serde(with = "crate::serde_cells")]
    cells: BTreeMap<(StateId, Symbol), Action>,
}

impl ActionTable {
    pub fn new(states: usize, terminals: Vec<Symbol>, productions: Vec<Production>) -> Self {
        Self {
            states,
            terminals,
            productions,
            cells: BTreeMap::default(),
        }
    }

    /// Sets a cell, unless it already holds another action.
    ///
    /// Assigning an error is a no-op.
    pub fn assign(&mut self, state: StateId, symbol: Symbol, action: Action) -> Result<(), Conflict> {
        if action.is_error() {
            return Ok(());
        }

        match self.cells.get(&(state, symbol.clone())) {
            Some(existing) if *existing != action => Err(Conflict {
                state,
                symbol,
                existing: *existing,
                attempted: action,
            }),
            _ => {
                self.cells.insert((state, symbol), action);
                Ok(())
            }
        }
    }

    pub fn action(&self, state: StateId, symbol: &Symbol) -> Action {
        self.cells
            .get(&(state, symbol.clone()))
            .copied()
            .unwrap_or_default()
    }

    /// Every non-error cell.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &Symbol, Action)> {
        self.cells
            .iter()
            .map(|((state, symbol), action)| (*state, symbol, *action))
    }

    pub fn production(&self, id: ProductionId) -> Option<&Production> {
        self.productions.get(id)
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// The input alphabet, the end marker excluded.
    pub fn terminals(&self) -> &[Symbol] {
        &self.terminals
    }

    /// The number of rows in the table.
    pub fn len(&self) -> usize {
        self.states
    }

    pub fn is_empty(&self) -> bool {
        self.states == 0
    }
}

/// Successor state per (state, non-terminal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GotoTable {
    states: usize,
    non_terminals: Vec<Symbol>,
    #[serde(with = "crate::serde_cells")]
    cells: BTreeMap<(StateId, Symbol), StateId>,
}

impl GotoTable {
    pub fn new(states: usize, non_terminals: Vec<Symbol>) -> Self {
        Self {
            states,
            non_terminals,
            cells: BTreeMap::default(),
        }
    }

    pub fn insert(&mut self, state: StateId, symbol: Symbol, to: StateId) {
        self.cells.insert((state, symbol), to);
    }

    pub fn goto(&self, state: StateId, symbol: &Symbol) -> Option<StateId> {
        self.cells.get(&(state, symbol.clone())).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, &Symbol, StateId)> {
        self.cells
            .iter()
            .map(|((state, symbol), to)| (*state, symbol, *to))
    }

    pub fn non_terminals(&self) -> &[Symbol] {
        &self.non_terminals
    }

    /// The number of rows in the table.
    pub fn len(&self) -> usize {
        self.states
    }

    pub fn is_empty(&self) -> bool {
        self.states == 0
    }
}

/// The tables derived from a grammar, with the conflicts met on the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsingTable {
    pub analysis: AnalysisType,
    pub action: ActionTable,
    pub goto: GotoTable,
    pub conflicts: Vec<Conflict>,
}

impl ParsingTable {
    pub fn is_conflict_free(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Build the parsing tables from the grammar's automaton.
    ///
    /// Per state, shifts are assigned first, then the accept action, then
    /// the reductions; a later assignment never overwrites an earlier one.
    pub fn build(
        grammar: &Grammar,
        automaton: &Automaton,
        analysis: AnalysisType,
    ) -> Result<Self, TableError> {
        if !grammar.has_productions() {
            return Err(TableError::EmptyGrammar);
        }

        let policy = analysis.policy(grammar);

        let mut action = ActionTable::new(
            automaton.len(),
            grammar.terminals().to_vec(),
            grammar.productions().to_vec(),
        );
        let mut goto = GotoTable::new(automaton.len(), grammar.non_terminals().to_vec());
        let mut conflicts = Vec::<Conflict>::default();

        for transition in automaton.transitions() {
            let state = transition.from.id;

            for (symbol, to) in transition.edges {
                if symbol.is_terminal() {
                    conflicts.extend(action.assign(state, symbol.clone(), Action::Shift(to)).err());
                } else {
                    goto.insert(state, symbol.clone(), to);
                }
            }

            let (accepting, reducing): (Vec<&Production>, Vec<&Production>) = transition
                .from
                .iter_exhausted_items(grammar)
                .filter_map(|item| grammar.production(item.production))
                .partition(|production| grammar.is_augmented(&production.head));

            if !accepting.is_empty() {
                conflicts.extend(action.assign(state, Symbol::EndMarker, Action::Accept).err());
            }

            for production in reducing {
                for lookahead in policy.lookaheads(&production.head) {
                    conflicts.extend(
                        action
                            .assign(state, lookahead, Action::Reduce(production.id))
                            .err(),
                    );
                }
            }
        }

        for conflict in &conflicts {
            log::debug!("{}", conflict);
        }

        log::debug!(
            "{} table: {} states, {} conflicts",
            analysis,
            action.len(),
            conflicts.len()
        );

        Ok(Self {
            analysis,
            action,
            goto,
            conflicts,
        })
    }

    fn conflict_at(&self, state: StateId, symbol: &Symbol) -> Option<&Conflict> {
        self.conflicts
            .iter()
            .find(|c| c.state == state && &c.symbol == symbol)
    }
}

/// Derives the action and goto tables of an automaton.
pub fn build_tables(
    grammar: &Grammar,
    automaton: &Automaton,
    analysis: AnalysisType,
) -> Result<ParsingTable, TableError> {
    ParsingTable::build(grammar, automaton, analysis)
}

impl std::fmt::Display for ParsingTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let terminals: Vec<Symbol> = self
            .action
            .terminals()
            .iter()
            .cloned()
            .chain([Symbol::EndMarker])
            .collect();

        let mut table = PtTable::new();

        table.add_row(
            ["#".to_string()]
                .into_iter()
                .chain(terminals.iter().map(ToString::to_string))
                .chain(self.goto.non_terminals().iter().map(ToString::to_string))
                .collect(),
        );

        for state in 0..self.action.len() {
            table.add_row(
                [state.to_string()]
                    .into_iter()
                    .chain(terminals.iter().map(|sym| {
                        match (self.action.action(state, sym), self.conflict_at(state, sym)) {
                            (Action::Error, _) => String::default(),
                            (action, Some(conflict)) => format!("{}/{}", action, conflict.attempted),
                            (action, None) => action.to_string(),
                        }
                    }))
                    .chain(self.goto.non_terminals().iter().map(|sym| {
                        self.goto
                            .goto(state, sym)
                            .map(|to| to.to_string())
                            .unwrap_or_default()
                    }))
                    .collect(),
            );
        }

        write!(f, "{}", table)
    }
}
