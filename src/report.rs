//! The response handed back to a caller: grammar listing, tables, trace
//! and a failure with a stable kind.

use serde::{Deserialize, Serialize};

use crate::{
    build_automaton, parse_grammar, simulate, AnalysisType, GrammarError, ParseError, ParseTrace,
    ParsingTable, SascError, TableError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportError {
    pub kind: String,
    pub details: String,
}

impl ReportError {
    /// Stable identifier of the failure.
    pub fn kind_of(error: &SascError) -> &'static str {
        match error {
            SascError::Grammar(error) => match error {
                GrammarError::UndefinedStartSymbol => "undefined_start_symbol",
                GrammarError::MalformedProduction { .. } => "malformed_production",
                GrammarError::ReservedSymbolUsed { .. } => "reserved_symbol",
                GrammarError::UndefinedSymbolReference { .. } => "undefined_symbol",
            },
            SascError::Table(error) => match error {
                TableError::EmptyGrammar => "empty_grammar",
                TableError::UnsupportedAnalysis(_) => "unsupported_analysis",
            },
            SascError::Parse(error) => match error {
                ParseError::UnexpectedToken { .. } => "unexpected_token",
                ParseError::NonTermination { .. } => "non_termination",
                ParseError::MissingGoto { .. } => "missing_goto",
                ParseError::UnknownProduction(_) => "unknown_production",
                ParseError::StackUnderflow { .. } => "stack_underflow",
            },
        }
    }
}

impl From<&SascError> for ReportError {
    fn from(error: &SascError) -> Self {
        Self {
            kind: Self::kind_of(error).to_string(),
            details: error.to_string(),
        }
    }
}

/// Outcome of building the tables of a grammar and parsing an input with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// 0 when the input is accepted, 1 otherwise.
    pub error_code: u8,
    /// Numbered productions, the augmented one first.
    pub grammar: Vec<String>,
    pub parsing_table: Option<ParsingTable>,
    pub steps: ParseTrace,
    pub error: Option<ReportError>,
}

impl Report {
    /// Runs the whole pipeline, every failure is folded into the report.
    pub fn analyze(grammar_text: &str, analysis_type: &str, input: &str) -> Self {
        let mut report = Self {
            error_code: 0,
            grammar: Vec::default(),
            parsing_table: None,
            steps: ParseTrace::default(),
            error: None,
        };

        let grammar = match parse_grammar(grammar_text) {
            Ok(grammar) => grammar,
            Err(error) => return report.failed(error.into()),
        };

        report.grammar = grammar.productions().iter().map(ToString::to_string).collect();

        let table = analysis_type
            .parse::<AnalysisType>()
            .and_then(|analysis| {
                ParsingTable::build(&grammar, &build_automaton(&grammar), analysis)
            });

        let table = match table {
            Ok(table) => report.parsing_table.insert(table),
            Err(error) => return report.failed(error.into()),
        };

        match simulate(&table.action, &table.goto, input) {
            Ok(trace) => {
                report.steps = trace;
                report
            }
            Err(error) => {
                report.steps = error.partial_trace().cloned().unwrap_or_default();
                report.failed(error.into())
            }
        }
    }

    fn failed(mut self, error: SascError) -> Self {
        log::debug!("analysis failed: {}", error);
        self.error_code = 1;
        self.error = Some(ReportError::from(&error));
        self
    }

    pub fn is_accepted(&self) -> bool {
        self.error.is_none() && self.steps.is_accepted()
    }

    pub fn has_conflicts(&self) -> bool {
        self.parsing_table
            .as_ref()
            .is_some_and(|table| !table.is_conflict_free())
    }
}
