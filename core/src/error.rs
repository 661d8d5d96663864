use thiserror::Error;

use crate::{lr::ParseTrace, lr::StateId, ProductionId, Symbol};

/// Errors raised while reading a grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("the grammar has no production, hence no start symbol")]
    UndefinedStartSymbol,

    #[error("production #{position} is malformed: {text:?}")]
    MalformedProduction { position: usize, text: String },

    #[error("production #{position} uses the reserved end marker $")]
    ReservedSymbolUsed { position: usize },

    #[error("production #{position} references the undefined symbol {symbol}")]
    UndefinedSymbolReference { position: usize, symbol: String },
}

/// Errors raised while deriving the parsing tables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("the grammar has no production besides the augmented one")]
    EmptyGrammar,

    #[error("the analysis {0:?} is not supported")]
    UnsupportedAnalysis(String),
}

/// Errors raised while simulating a parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No action for the lookahead; the trace ends with the failing configuration.
    #[error("unexpected symbol {token} at position {position}, state={state}")]
    UnexpectedToken {
        state: StateId,
        token: Symbol,
        position: usize,
        trace: ParseTrace,
    },

    #[error("the parse did not terminate within {limit} steps")]
    NonTermination { limit: usize },

    #[error("no goto entry for state {state} on {symbol}")]
    MissingGoto { state: StateId, symbol: Symbol },

    #[error("reducing by production {production} in state {state} needs more than the {depth} stack entries")]
    StackUnderflow {
        state: StateId,
        production: ProductionId,
        depth: usize,
    },

    #[error("unknown production {0}")]
    UnknownProduction(ProductionId),
}

impl ParseError {
    /// The configurations recorded before the failure, if any were kept.
    pub fn partial_trace(&self) -> Option<&ParseTrace> {
        match self {
            Self::UnexpectedToken { trace, .. } => Some(trace),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SascError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
