use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    error::GrammarError,
    rule::{Production, ProductionId},
    symbol::{Symbol, END_MARKER, EPSILON},
};

/// Ends every production.
pub const TERMINATOR: char = '.';
/// Separates the head from the body.
pub const SEPARATOR: &str = "->";
/// Separates the alternatives of a body.
pub const ALTERNATIVE: char = '|';
/// Alternative spelling of ε.
pub const EMPTY_MARKER: &str = "&";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// An augmented context-free grammar
///
/// Production #0 is always the synthetic `S' -> S` over the start symbol.
///
/// # Example
///
/// ```grammar
/// (0) E' -> E
/// (1) E -> E + T
/// (2) E -> T
/// (3) T -> id
/// ```
pub struct Grammar {
    start: Symbol,
    augmented_start: Symbol,
    productions: Vec<Production>,
    terminals: Vec<Symbol>,
    non_terminals: Vec<Symbol>,
}

impl Grammar {
    /// Builds the grammar from already classified productions.
    ///
    /// Terminals and non-terminals are collected in order of appearance,
    /// the augmented production is prepended.
    pub fn from_productions<H, I>(start: &str, rules: I) -> Self
    where
        H: Into<String>,
        I: IntoIterator<Item = (H, Vec<Symbol>)>,
    {
        let rules: Vec<(Symbol, Vec<Symbol>)> = rules
            .into_iter()
            .map(|(head, body)| (Symbol::nterm(head), body))
            .collect();

        let start = Symbol::nterm(start);

        let non_terminals: Vec<Symbol> = std::iter::once(&start)
            .chain(rules.iter().map(|(head, _)| head))
            .chain(
                rules
                    .iter()
                    .flat_map(|(_, body)| body.iter())
                    .filter(|s| s.is_non_terminal()),
            )
            .unique()
            .cloned()
            .collect();

        let terminals: Vec<Symbol> = rules
            .iter()
            .flat_map(|(_, body)| body.iter())
            .filter(|s| matches!(s, Symbol::Terminal(_)))
            .unique()
            .cloned()
            .collect();

        let mut augmented_name = format!("{}'", start.name());
        while non_terminals.iter().any(|nt| nt.name() == augmented_name) {
            augmented_name.push('\'');
        }
        let augmented_start = Symbol::nterm(augmented_name);

        let productions = std::iter::once((augmented_start.clone(), vec![start.clone()]))
            .chain(rules)
            .enumerate()
            .map(|(id, (head, body))| Production::new(id, head, body))
            .collect();

        Self {
            start,
            augmented_start,
            productions,
            terminals,
            non_terminals,
        }
    }

    /// The start symbol declared by the grammar (head of its first production).
    pub fn start(&self) -> &Symbol {
        &self.start
    }

    /// Head of production #0.
    pub fn augmented_start(&self) -> &Symbol {
        &self.augmented_start
    }

    #[inline(always)]
    pub fn is_augmented(&self, symbol: &Symbol) -> bool {
        *symbol == self.augmented_start
    }

    /// Iterate over all productions, the augmented one included.
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, id: ProductionId) -> Option<&Production> {
        self.productions.get(id)
    }

    /// Iterate the productions behind a specific non-terminal symbol.
    pub fn productions_of<'a>(&'a self, head: &'a Symbol) -> impl Iterator<Item = &'a Production> {
        self.productions.iter().filter(move |p| &p.head == head)
    }

    /// Terminals in order of appearance, the end marker excluded.
    pub fn terminals(&self) -> &[Symbol] {
        &self.terminals
    }

    /// Non-terminals in order of appearance, the augmented start excluded.
    pub fn non_terminals(&self) -> &[Symbol] {
        &self.non_terminals
    }

    /// True when the grammar declares at least one production of its own.
    pub fn has_productions(&self) -> bool {
        self.productions.len() > 1
    }
}

impl std::fmt::Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for production in &self.productions {
            writeln!(f, "{}", production)?;
        }
        Ok(())
    }
}

impl FromStr for Grammar {
    type Err = GrammarError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_grammar(text)
    }
}

/// Reads a grammar written as `Head -> Body.` productions.
///
/// Every head is a non-terminal, every other body symbol is a terminal.
/// Alternatives may be written `A -> x | y.`, and an empty body, `ε` or `&`
/// stands for the empty production.
pub fn parse_grammar(text: &str) -> Result<Grammar, GrammarError> {
    let mut statements: Vec<&str> = text.split(TERMINATOR).collect();

    // Whatever follows the last terminator is a production missing its own.
    if let Some(tail) = statements.pop() {
        if !tail.trim().is_empty() {
            return Err(GrammarError::MalformedProduction {
                position: statements.iter().filter(|s| !s.trim().is_empty()).count(),
                text: tail.trim().to_string(),
            });
        }
    }

    let statements: Vec<(&str, &str)> = statements
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(position, statement)| split_production(position, statement))
        .collect::<Result<_, _>>()?;

    let Some((start, _)) = statements.first() else {
        return Err(GrammarError::UndefinedStartSymbol);
    };

    let heads: Vec<&str> = statements.iter().map(|(head, _)| *head).unique().collect();

    let mut rules = Vec::default();
    for (position, (head, body)) in statements.iter().enumerate() {
        if body.contains(END_MARKER) {
            return Err(GrammarError::ReservedSymbolUsed { position });
        }

        for alternative in body.split(ALTERNATIVE) {
            rules.push((*head, read_body(position, alternative, &heads)?));
        }
    }

    let grammar = Grammar::from_productions(start, rules);
    log::debug!(
        "read {} productions, {} terminals, {} non-terminals",
        grammar.productions().len(),
        grammar.terminals().len(),
        grammar.non_terminals().len()
    );

    Ok(grammar)
}

fn split_production(position: usize, statement: &str) -> Result<(&str, &str), GrammarError> {
    let malformed = || GrammarError::MalformedProduction {
        position,
        text: statement.to_string(),
    };

    let (head, body) = statement.split_once(SEPARATOR).ok_or_else(malformed)?;
    let head = head.trim();

    if body.contains(SEPARATOR) {
        return Err(malformed());
    }

    if head.contains(END_MARKER) {
        return Err(GrammarError::ReservedSymbolUsed { position });
    }

    if head.is_empty()
        || head.contains(char::is_whitespace)
        || head.contains(ALTERNATIVE)
        || is_empty_marker(head)
    {
        return Err(malformed());
    }

    Ok((head, body))
}

fn is_empty_marker(word: &str) -> bool {
    word == EPSILON || word == EMPTY_MARKER
}

/// A primed name (`E'`) is a non-terminal by convention.
fn is_primed(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && word.len() > 1
        && chars.all(|c| c == '\'')
}

fn read_body(position: usize, body: &str, heads: &[&str]) -> Result<Vec<Symbol>, GrammarError> {
    let body = body.trim();

    let classify = |word: &str| -> Result<Option<Symbol>, GrammarError> {
        if heads.contains(&word) {
            Ok(Some(Symbol::nterm(word)))
        } else if is_primed(word) {
            Err(GrammarError::UndefinedSymbolReference {
                position,
                symbol: word.to_string(),
            })
        } else if is_empty_marker(word) {
            Ok(None)
        } else {
            Ok(Some(Symbol::term(word)))
        }
    };

    if body.contains(char::is_whitespace) {
        return body
            .split_whitespace()
            .filter_map(|word| classify(word).transpose())
            .collect();
    }

    let mut symbols = Vec::default();
    let mut rest = body;

    while let Some(c) = rest.chars().next() {
        let primes = rest[c.len_utf8()..]
            .find(|p: char| p != '\'')
            .unwrap_or(rest.len() - c.len_utf8());

        let word = if c.is_ascii_uppercase() && primes > 0 {
            &rest[..c.len_utf8() + primes]
        } else if let Some(head) = heads
            .iter()
            .filter(|head| rest.starts_with(**head))
            .max_by_key(|head| head.len())
        {
            head
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            let end = rest
                .find(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
                .unwrap_or(rest.len());
            &rest[..end]
        } else {
            &rest[..c.len_utf8()]
        };

        symbols.extend(classify(word)?);
        rest = &rest[word.len()..];
    }

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::{parse_grammar, Grammar};
    use crate::{
        error::GrammarError,
        fixtures::{DANGLING_ELSE_GRAMMAR, EXPRESSION_GRAMMAR, LL_EXPRESSION_GRAMMAR},
        Symbol,
    };

    #[test]
    fn test_001_expression_grammar() {
        let grammar = parse_grammar(EXPRESSION_GRAMMAR).expect("cannot read grammar");

        assert_eq!(grammar.productions().len(), 7);
        assert_eq!(grammar.start(), &Symbol::nterm("E"));
        assert_eq!(grammar.augmented_start(), &Symbol::nterm("E'"));
        assert_eq!(
            grammar.terminals(),
            &[
                Symbol::term("+"),
                Symbol::term("*"),
                Symbol::term("("),
                Symbol::term(")"),
                Symbol::term("id"),
            ]
        );
        assert_eq!(
            grammar.non_terminals(),
            &[Symbol::nterm("E"), Symbol::nterm("T"), Symbol::nterm("F")]
        );

        let listing = grammar.to_string();
        assert!(listing.starts_with("(0) E' -> E\n(1) E -> E + T\n"));
        assert!(listing.ends_with("(6) F -> id\n"));
    }

    #[test]
    fn test_002_whitespace_separated_body() {
        let grammar = parse_grammar(DANGLING_ELSE_GRAMMAR).expect("cannot read grammar");

        assert_eq!(
            grammar.production(1).unwrap().body,
            vec![
                Symbol::term("if"),
                Symbol::term("E"),
                Symbol::term("then"),
                Symbol::nterm("S"),
            ]
        );
        assert_eq!(grammar.non_terminals(), &[Symbol::nterm("S")]);
    }

    #[test]
    fn test_003_alternatives_and_empty_bodies() {
        let grammar = parse_grammar(LL_EXPRESSION_GRAMMAR).expect("cannot read grammar");

        // E' is taken, so the augmented start gets another prime.
        assert_eq!(grammar.augmented_start(), &Symbol::nterm("E''"));
        assert_eq!(grammar.productions().len(), 9);
        assert_eq!(
            grammar.production(2).unwrap().body,
            vec![Symbol::term("+"), Symbol::nterm("T"), Symbol::nterm("E'")]
        );
        assert!(grammar.production(3).unwrap().is_empty());
        assert!(grammar.production(6).unwrap().is_empty());
    }

    #[test]
    fn test_004_missing_terminator() {
        assert_eq!(
            parse_grammar("E->E+T. E->T"),
            Err(GrammarError::MalformedProduction {
                position: 1,
                text: "E->T".to_string()
            })
        );

        assert!(matches!(
            parse_grammar("E->E+T E->T."),
            Err(GrammarError::MalformedProduction { position: 0, .. })
        ));
    }

    #[test]
    fn test_005_missing_separator() {
        assert!(matches!(
            parse_grammar("S->a. S b."),
            Err(GrammarError::MalformedProduction { position: 1, .. })
        ));
        assert!(matches!(
            parse_grammar("->a."),
            Err(GrammarError::MalformedProduction { position: 0, .. })
        ));
    }

    #[test]
    fn test_006_no_production() {
        assert_eq!(parse_grammar(""), Err(GrammarError::UndefinedStartSymbol));
        assert_eq!(parse_grammar("  . "), Err(GrammarError::UndefinedStartSymbol));
    }

    #[test]
    fn test_007_reserved_end_marker() {
        assert_eq!(
            parse_grammar("S->a. S->b$."),
            Err(GrammarError::ReservedSymbolUsed { position: 1 })
        );
    }

    #[test]
    fn test_008_undefined_primed_symbol() {
        assert_eq!(
            parse_grammar("E->TE'. T->id."),
            Err(GrammarError::UndefinedSymbolReference {
                position: 0,
                symbol: "E'".to_string()
            })
        );
    }

    #[test]
    fn test_009_from_productions() {
        let grammar = Grammar::from_productions(
            "S",
            [("S", vec![Symbol::term("a"), Symbol::nterm("S")]), ("S", vec![])],
        );

        assert!(grammar.has_productions());
        assert_eq!(grammar.terminals(), &[Symbol::term("a")]);
        assert_eq!(grammar.productions_of(&Symbol::nterm("S")).count(), 2);

        let empty = Grammar::from_productions::<&str, _>("S", []);
        assert!(!empty.has_productions());
    }
}
