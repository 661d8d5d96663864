use std::collections::BTreeSet;

use itertools::Itertools;

use crate::{Grammar, Production, ProductionId, Symbol};

/// Identifier of an item set, which is also the parser state.
pub type ItemSetId = usize;

/// A production item.
///
/// # Example
/// E -> E • + T
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub production: ProductionId,
    pub dot: usize,
}

impl Item {
    pub const fn new(production: ProductionId, dot: usize) -> Self {
        Self { production, dot }
    }

    /// S' -> • S
    pub const fn start() -> Self {
        Self::new(0, 0)
    }

    /// Returns the symbol right after the dot.
    ///
    /// If A -> w •, then returns None.
    pub fn symbol<'g>(&self, grammar: &'g Grammar) -> Option<&'g Symbol> {
        grammar
            .production(self.production)
            .and_then(|production| production.symbol_at(self.dot))
    }

    /// Check if we reached the end of the production.
    ///
    /// # Example
    /// A -> w •
    pub fn is_exhausted(&self, grammar: &Grammar) -> bool {
        grammar
            .production(self.production)
            .map(|production| self.dot >= production.len())
            .unwrap_or(true)
    }

    /// Returns the item with the dot moved past the next symbol.
    ///
    /// # Example
    /// (A -> • w).next() -> (A -> w •)
    pub fn next(&self) -> Self {
        Self::new(self.production, self.dot + 1)
    }

    pub fn display<'g>(&self, grammar: &'g Grammar) -> ItemDisplay<'g> {
        ItemDisplay {
            item: *self,
            production: grammar.production(self.production),
        }
    }
}

/// Renders an item against its grammar.
pub struct ItemDisplay<'g> {
    item: Item,
    production: Option<&'g Production>,
}

impl std::fmt::Display for ItemDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(production) = self.production else {
            return write!(f, "[({}) ?]", self.item.production);
        };

        let body = production
            .body
            .iter()
            .map(ToString::to_string)
            .enumerate()
            .map(|(pos, mut s)| {
                if pos == self.item.dot {
                    s.insert_str(0, "• ");
                }
                s
            })
            .join(" ");

        let body = if self.item.dot >= production.len() {
            format!("{} •", body).trim_start().to_string()
        } else {
            body
        };

        write!(f, "[({}) {} -> {}]", production.id, production.head, body)
    }
}

/// A set of items, one state of the automaton.
///
/// The kernel is the original set of items before closure.
/// Two sets are equal when they hold the same items.
#[derive(Debug, Clone, Default)]
pub struct ItemSet {
    /// Identifier of the item set.
    pub id: ItemSetId,
    kernel: BTreeSet<Item>,
    items: BTreeSet<Item>,
}

impl PartialEq for ItemSet {
    fn eq(&self, other: &Self) -> bool {
        self.items.eq(&other.items)
    }
}

impl Eq for ItemSet {}

impl ItemSet {
    /// Closes the kernel.
    ///
    /// For every item A -> α • B β, adds B -> • γ for each production of B,
    /// until no item is added anymore.
    pub fn close<I>(kernel: I, grammar: &Grammar) -> Self
    where
        I: IntoIterator<Item = Item>,
    {
        let kernel: BTreeSet<Item> = kernel.into_iter().collect();
        let mut items = kernel.clone();
        let mut stack: Vec<Item> = kernel.iter().copied().collect();

        while let Some(item) = stack.pop() {
            let Some(symbol) = item.symbol(grammar).filter(|s| s.is_non_terminal()) else {
                continue;
            };

            for production in grammar.productions_of(symbol) {
                let item = Item::new(production.id, 0);
                if items.insert(item) {
                    stack.push(item);
                }
            }
        }

        Self {
            id: 0,
            kernel,
            items,
        }
    }

    /// Goto(I, X)
    ///
    /// Closes the items of the set whose dot is moved past X. The result is
    /// empty when no item expects X.
    pub fn goto(&self, symbol: &Symbol, grammar: &Grammar) -> Self {
        Self::close(
            self.iter()
                .filter(|item| item.symbol(grammar) == Some(symbol))
                .map(Item::next),
            grammar,
        )
    }

    /// Symbols found right after a dot, in the order the items are stored.
    pub fn symbols_after_dot<'g>(&self, grammar: &'g Grammar) -> Vec<&'g Symbol> {
        self.iter()
            .filter_map(|item| item.symbol(grammar))
            .unique()
            .collect()
    }

    /// Iterate over all exhausted items (A -> w •)
    pub fn iter_exhausted_items<'a>(
        &'a self,
        grammar: &'a Grammar,
    ) -> impl Iterator<Item = &'a Item> + 'a {
        self.iter().filter(|item| item.is_exhausted(grammar))
    }

    /// Iterate over all items within the set, kernel included.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn kernel(&self) -> impl Iterator<Item = &Item> {
        self.kernel.iter()
    }

    pub fn items(&self) -> &BTreeSet<Item> {
        &self.items
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn display<'a>(&'a self, grammar: &'a Grammar) -> ItemSetDisplay<'a> {
        ItemSetDisplay { set: self, grammar }
    }
}

/// Renders an item set against its grammar.
pub struct ItemSetDisplay<'a> {
    set: &'a ItemSet,
    grammar: &'a Grammar,
}

/// The kernel comes first, the items added by the closure after a `|`.
impl std::fmt::Display for ItemSetDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let grammar = self.grammar;
        write!(f, "#{}{{{}", self.set.id, render_items(self.set.kernel(), grammar))?;

        let mut closure = self
            .set
            .iter()
            .filter(|item| !self.set.kernel.contains(*item))
            .peekable();

        if closure.peek().is_some() {
            write!(f, " | {}", render_items(closure, grammar))?;
        }

        write!(f, "}}")
    }
}

fn render_items<'a>(items: impl Iterator<Item = &'a Item>, grammar: &Grammar) -> String {
    items.map(|item| item.display(grammar).to_string()).join(", ")
}

#[cfg(test)]
mod tests {
    use super::{Item, ItemSet};
    use crate::{fixtures::EXPRESSION_GRAMMAR, parse_grammar, Symbol};

    #[test]
    fn test_001_item_set_closure() {
        let grammar = parse_grammar(EXPRESSION_GRAMMAR).unwrap();
        let set = ItemSet::close([Item::start()], &grammar);

        // E' → • E, then every production of E, T and F with the dot at 0.
        let expected: Vec<Item> = (0..7).map(|id| Item::new(id, 0)).collect();
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), expected);
        assert_eq!(set.kernel().copied().collect::<Vec<_>>(), vec![Item::start()]);
    }

    #[test]
    fn test_002_closure_is_idempotent() {
        let grammar = parse_grammar(EXPRESSION_GRAMMAR).unwrap();
        let set = ItemSet::close([Item::start()], &grammar);
        let again = ItemSet::close(set.iter().copied(), &grammar);

        assert_eq!(set, again);
    }

    #[test]
    fn test_003_goto() {
        let grammar = parse_grammar(EXPRESSION_GRAMMAR).unwrap();
        let i0 = ItemSet::close([Item::start()], &grammar);

        // Goto(I0, E) = { E' -> E •, E -> E • + T }
        let set = i0.goto(&Symbol::nterm("E"), &grammar);
        assert_eq!(
            set.iter().copied().collect::<Vec<_>>(),
            vec![Item::new(0, 1), Item::new(1, 1)]
        );

        // Goto(I0, ( ) = { F -> ( • E ) } closed
        let set = i0.goto(&Symbol::term("("), &grammar);
        assert_eq!(set.len(), 7);
        assert!(set.contains(&Item::new(5, 1)));

        assert!(i0.goto(&Symbol::term(")"), &grammar).is_empty());
    }

    #[test]
    fn test_004_symbols_after_dot() {
        let grammar = parse_grammar(EXPRESSION_GRAMMAR).unwrap();
        let i0 = ItemSet::close([Item::start()], &grammar);

        assert_eq!(
            i0.symbols_after_dot(&grammar),
            vec![
                &Symbol::nterm("E"),
                &Symbol::nterm("T"),
                &Symbol::nterm("F"),
                &Symbol::term("("),
                &Symbol::term("id"),
            ]
        );
    }

    #[test]
    fn test_005_display() {
        let grammar = parse_grammar(EXPRESSION_GRAMMAR).unwrap();

        assert_eq!(
            Item::new(1, 1).display(&grammar).to_string(),
            "[(1) E -> E • + T]"
        );
        assert_eq!(
            Item::new(6, 1).display(&grammar).to_string(),
            "[(6) F -> id •]"
        );
    }

    #[test]
    fn test_006_display_kernel_first() {
        let grammar = parse_grammar(EXPRESSION_GRAMMAR).unwrap();
        let i0 = ItemSet::close([Item::start()], &grammar);
        let rendered = i0.display(&grammar).to_string();

        assert!(rendered.starts_with("#0{[(0) E' -> • E] | [(1) E -> • E + T], "));
        assert!(rendered.ends_with("[(6) F -> • id]}"));

        let i1 = i0.goto(&Symbol::nterm("E"), &grammar);
        assert_eq!(
            i1.display(&grammar).to_string(),
            "#0{[(0) E' -> E •], [(1) E -> E • + T]}"
        );
    }
}
