pub mod error;
pub mod grammar;
pub mod item;
pub mod lookahead;
pub mod lr;
pub mod rule;
pub mod symbol;

mod serde_cells;


pub use error::{GrammarError, ParseError, SascError, TableError};
pub use grammar::{parse_grammar, Grammar};
pub use item::{Item, ItemSet, ItemSetId};
pub use lookahead::{FirstSets, FollowSets};
pub use lr::{
    build_automaton, simulate, Action, ActionTable, AnalysisType, Automaton, Conflict,
    ConflictKind, GotoTable, ParseTrace, ParserConfiguration, ParsingTable, Simulator,
    StackEntry, StateId,
};
pub use rule::{Production, ProductionId};
pub use symbol::Symbol;

pub type SascResult<T> = Result<T, SascError>;

/// Reads the grammar and derives its parsing tables for the named analysis.
///
/// The selector is one of `lr0`, `LR(0)`, `slr`, `slr1`, `SLR(1)`.
///
/// # Example
/// ```
/// let table = sasc_core::build_tables("S->(L)|x. L->S|L,S.", "lr0").unwrap();
/// assert!(table.is_conflict_free());
/// ```
pub fn build_tables(grammar_text: &str, analysis_type: &str) -> SascResult<ParsingTable> {
    let analysis: AnalysisType = analysis_type.parse()?;
    let grammar = parse_grammar(grammar_text)?;
    let automaton = build_automaton(&grammar);

    Ok(lr::build_tables(&grammar, &automaton, analysis)?)
}


#[cfg(test)]
mod api_tests {
    use crate::{build_tables, fixtures::EXPRESSION_GRAMMAR, GrammarError, SascError, TableError};

    #[test]
    fn test_001_build_tables_from_text() {
        let slr = build_tables(EXPRESSION_GRAMMAR, "slr").unwrap();
        let lr0 = build_tables(EXPRESSION_GRAMMAR, "LR(0)").unwrap();

        assert!(slr.is_conflict_free());
        assert!(!lr0.is_conflict_free());
        assert_eq!(slr.action.len(), lr0.action.len());
    }

    #[test]
    fn test_002_errors_are_wrapped() {
        assert_eq!(
            build_tables(EXPRESSION_GRAMMAR, "lalr"),
            Err(SascError::Table(TableError::UnsupportedAnalysis(
                "lalr".to_string()
            )))
        );
        assert_eq!(
            build_tables("", "slr"),
            Err(SascError::Grammar(GrammarError::UndefinedStartSymbol))
        );
    }
}
