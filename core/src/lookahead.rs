use std::collections::{BTreeMap, BTreeSet};

use crate::{Grammar, Symbol};

/// First sets of every non-terminal of a grammar.
///
/// ε belongs to the first set of a nullable non-terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets(BTreeMap<Symbol, BTreeSet<Symbol>>);

impl FirstSets {
    /// Iterates the productions until no first set grows anymore.
    pub fn compute(grammar: &Grammar) -> Self {
        let mut sets = Self(
            std::iter::once(grammar.augmented_start())
                .chain(grammar.non_terminals())
                .map(|nt| (nt.clone(), BTreeSet::new()))
                .collect(),
        );

        let mut changed = true;
        while changed {
            changed = false;

            for production in grammar.productions() {
                let first = sets.first_of_sequence(&production.body);
                let entry = sets.0.entry(production.head.clone()).or_default();
                let len = entry.len();
                entry.extend(first);
                changed |= len != entry.len();
            }
        }

        sets
    }

    /// First(X): a terminal is its own first set.
    pub fn get(&self, symbol: &Symbol) -> BTreeSet<Symbol> {
        match symbol {
            Symbol::NonTerminal(_) => self.0.get(symbol).cloned().unwrap_or_default(),
            other => BTreeSet::from([other.clone()]),
        }
    }

    /// First(X1 X2 .. Xn), contains ε if every symbol is nullable.
    pub fn first_of_sequence<'a, I>(&self, symbols: I) -> BTreeSet<Symbol>
    where
        I: IntoIterator<Item = &'a Symbol>,
    {
        let mut set = BTreeSet::new();

        for symbol in symbols {
            if symbol.is_epsilon() {
                continue;
            }

            let first = self.get(symbol);
            let nullable = first.contains(&Symbol::Epsilon);
            set.extend(first.into_iter().filter(|s| !s.is_epsilon()));

            if !nullable {
                return set;
            }
        }

        set.insert(Symbol::Epsilon);
        set
    }

    pub fn is_nullable(&self, symbol: &Symbol) -> bool {
        self.get(symbol).contains(&Symbol::Epsilon)
    }
}

/// Follow sets of every non-terminal of a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets(BTreeMap<Symbol, BTreeSet<Symbol>>);

impl FollowSets {
    pub fn compute(grammar: &Grammar, first: &FirstSets) -> Self {
        let mut sets: BTreeMap<Symbol, BTreeSet<Symbol>> = std::iter::once(grammar.augmented_start())
            .chain(grammar.non_terminals())
            .map(|nt| (nt.clone(), BTreeSet::new()))
            .collect();

        for start in [grammar.augmented_start(), grammar.start()] {
            sets.entry(start.clone()).or_default().insert(Symbol::EndMarker);
        }

        let mut changed = true;
        while changed {
            changed = false;

            for production in grammar.productions() {
                for (position, symbol) in production.body.iter().enumerate() {
                    if !symbol.is_non_terminal() {
                        continue;
                    }

                    // A -> α B β : Follow(B) ⊇ First(β) \ {ε}
                    let rest = first.first_of_sequence(&production.body[position + 1..]);
                    let mut follow: BTreeSet<Symbol> =
                        rest.iter().filter(|s| !s.is_epsilon()).cloned().collect();

                    // β =>* ε : Follow(B) ⊇ Follow(A)
                    if rest.contains(&Symbol::Epsilon) {
                        follow.extend(sets.get(&production.head).cloned().unwrap_or_default());
                    }

                    let entry = sets.entry(symbol.clone()).or_default();
                    let len = entry.len();
                    entry.extend(follow);
                    changed |= len != entry.len();
                }
            }
        }

        Self(sets)
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&BTreeSet<Symbol>> {
        self.0.get(symbol)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{FirstSets, FollowSets};
    use crate::{
        fixtures::{EXPRESSION_GRAMMAR, LL_EXPRESSION_GRAMMAR},
        parse_grammar, Symbol,
    };

    fn set<const N: usize>(symbols: [Symbol; N]) -> BTreeSet<Symbol> {
        BTreeSet::from(symbols)
    }

    #[test]
    fn test_001_first_set() {
        let grammar = parse_grammar(EXPRESSION_GRAMMAR).unwrap();
        let first = FirstSets::compute(&grammar);

        let expected = set([Symbol::term("("), Symbol::term("id")]);
        assert_eq!(first.get(&Symbol::nterm("E")), expected);
        assert_eq!(first.get(&Symbol::nterm("T")), expected);
        assert_eq!(first.get(&Symbol::nterm("F")), expected);
        assert_eq!(first.get(&Symbol::term("+")), set([Symbol::term("+")]));
    }

    #[test]
    fn test_002_first_set_with_nullable() {
        let grammar = parse_grammar(LL_EXPRESSION_GRAMMAR).unwrap();
        let first = FirstSets::compute(&grammar);

        assert_eq!(
            first.get(&Symbol::nterm("E'")),
            set([Symbol::term("+"), Symbol::Epsilon])
        );
        assert_eq!(
            first.get(&Symbol::nterm("T'")),
            set([Symbol::term("*"), Symbol::Epsilon])
        );
        assert!(!first.is_nullable(&Symbol::nterm("E")));
        assert_eq!(
            first.first_of_sequence(&[Symbol::nterm("T'"), Symbol::nterm("E'")]),
            set([Symbol::term("*"), Symbol::term("+"), Symbol::Epsilon])
        );
    }

    #[test]
    /// Follow(A)
    fn test_003_follow_set() {
        let grammar = parse_grammar(EXPRESSION_GRAMMAR).unwrap();
        let first = FirstSets::compute(&grammar);
        let follow = FollowSets::compute(&grammar, &first);

        assert_eq!(
            follow.get(&Symbol::nterm("E")),
            Some(&set([Symbol::EndMarker, Symbol::term("+"), Symbol::term(")")]))
        );

        let expected = set([
            Symbol::EndMarker,
            Symbol::term("+"),
            Symbol::term("*"),
            Symbol::term(")"),
        ]);
        assert_eq!(follow.get(&Symbol::nterm("T")), Some(&expected));
        assert_eq!(follow.get(&Symbol::nterm("F")), Some(&expected));
    }

    #[test]
    fn test_004_follow_set_through_nullable_suffix() {
        let grammar = parse_grammar(LL_EXPRESSION_GRAMMAR).unwrap();
        let first = FirstSets::compute(&grammar);
        let follow = FollowSets::compute(&grammar, &first);

        assert_eq!(
            follow.get(&Symbol::nterm("E'")),
            Some(&set([Symbol::EndMarker, Symbol::term(")")]))
        );
        assert_eq!(
            follow.get(&Symbol::nterm("T")),
            Some(&set([Symbol::EndMarker, Symbol::term("+"), Symbol::term(")")]))
        );
        assert_eq!(
            follow.get(&Symbol::nterm("F")),
            Some(&set([
                Symbol::EndMarker,
                Symbol::term("+"),
                Symbol::term("*"),
                Symbol::term(")")
            ]))
        );
    }
}
