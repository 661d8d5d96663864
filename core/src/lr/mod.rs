use crate::{error::ParseError, symbol::END_MARKER, ItemSetId, Symbol};

mod action;
mod analysis;
mod automaton;
mod table;
mod trace;
mod transition;

pub use action::*;
pub use analysis::AnalysisType;
pub use automaton::*;
pub use table::*;
pub use trace::*;
pub use transition::*;

pub type StateId = ItemSetId;

/// A shift-reduce parser driven by an action and a goto table.
///
/// Every step is recorded in a [`ParseTrace`].
pub struct Simulator<'table> {
    action: &'table ActionTable,
    goto: &'table GotoTable,
    step_limit: Option<usize>,
}

impl<'table> Simulator<'table> {
    pub fn new(action: &'table ActionTable, goto: &'table GotoTable) -> Self {
        Self {
            action,
            goto,
            step_limit: None,
        }
    }

    /// Overrides the default step limit.
    ///
    /// By default a parse may take 2 × tokens × productions × (1 + longest body)
    /// steps, so that every shift can be followed by a run of reductions,
    /// empty ones included.
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Splits the input into terminals, the end marker appended.
    ///
    /// Whitespace is skipped, the longest terminal of the table matching
    /// at the cursor wins, any other character is a token on its own.
    pub fn tokenize(&self, input: &str) -> Vec<Symbol> {
        let mut terminals: Vec<&str> = self.action.terminals().iter().map(Symbol::name).collect();
        terminals.sort_by_key(|t| std::cmp::Reverse(t.len()));

        let input = input.trim_end();
        let mut rest = input.strip_suffix(END_MARKER).unwrap_or(input);
        let mut tokens = Vec::default();

        while let Some(c) = rest.chars().next() {
            if c.is_whitespace() {
                rest = &rest[c.len_utf8()..];
                continue;
            }

            let lexeme = terminals
                .iter()
                .find(|t| !t.is_empty() && rest.starts_with(**t))
                .copied()
                .unwrap_or(&rest[..c.len_utf8()]);

            tokens.push(Symbol::term(lexeme));
            rest = &rest[lexeme.len()..];
        }

        tokens.push(Symbol::EndMarker);
        tokens
    }

    /// Parses the input, recording the configuration of each step.
    pub fn run(&self, input: &str) -> Result<ParseTrace, ParseError> {
        let tokens = self.tokenize(input);
        let limit = self.step_limit.unwrap_or_else(|| self.default_step_limit(tokens.len()));

        let mut stack = vec![StackEntry::State(0)];
        let mut cursor = 0;
        let mut trace = ParseTrace::default();

        loop {
            if trace.len() >= limit {
                return Err(ParseError::NonTermination { limit });
            }

            let state = top(&stack);
            let token = tokens.get(cursor).cloned().unwrap_or(Symbol::EndMarker);
            let action = self.action.action(state, &token);

            log::trace!("#{} {} :: {}", state, token, action);
            trace.push(ParserConfiguration {
                stack: stack.clone(),
                remaining_input: tokens.get(cursor..).unwrap_or_default().to_vec(),
                action,
            });

            match action {
                // Push the terminal then the target state.
                Action::Shift(to) => {
                    stack.push(StackEntry::Symbol(token));
                    stack.push(StackEntry::State(to));
                    cursor += 1;
                }

                // Pop a (symbol, state) pair per body symbol, then goto on the head.
                Action::Reduce(id) => {
                    let production = self
                        .action
                        .production(id)
                        .ok_or(ParseError::UnknownProduction(id))?;

                    let Some(len) = stack
                        .len()
                        .checked_sub(2 * production.len())
                        .filter(|len| *len >= 1)
                    else {
                        return Err(ParseError::StackUnderflow {
                            state,
                            production: id,
                            depth: stack.len(),
                        });
                    };
                    stack.truncate(len);

                    let exposed = top(&stack);
                    let to = self.goto.goto(exposed, &production.head).ok_or_else(|| {
                        ParseError::MissingGoto {
                            state: exposed,
                            symbol: production.head.clone(),
                        }
                    })?;

                    stack.push(StackEntry::Symbol(production.head.clone()));
                    stack.push(StackEntry::State(to));
                }

                Action::Accept => return Ok(trace),

                Action::Error => {
                    return Err(ParseError::UnexpectedToken {
                        state,
                        token,
                        position: cursor,
                        trace,
                    })
                }
            }
        }
    }

    fn default_step_limit(&self, tokens: usize) -> usize {
        let productions = self.action.productions();
        let longest = productions.iter().map(|p| p.len()).max().unwrap_or_default();

        2 * tokens * productions.len().max(1) * (1 + longest)
    }
}

fn top(stack: &[StackEntry]) -> StateId {
    stack.iter().rev().find_map(StackEntry::state).unwrap_or_default()
}

/// Runs a shift-reduce parse of the input over the tables.
pub fn simulate(
    action: &ActionTable,
    goto: &GotoTable,
    input: &str,
) -> Result<ParseTrace, ParseError> {
    Simulator::new(action, goto).run(input)
}
