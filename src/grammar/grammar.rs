use std::collections::HashMap;

use super::{GrammarError, END_MARK, EPSILON};

/// Returns true for names of the form `A` or `A'`.
pub fn is_non_terminal_name(name: &str) -> bool {
    let mut chars = name.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(c), None, _) | (Some(c), Some('\''), None) => c.is_ascii_uppercase(),
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    NonTerminal(String),
    Terminal(String),
}

impl Symbol {
    pub fn classify(name: &str) -> Self {
        if is_non_terminal_name(name) {
            Symbol::NonTerminal(name.to_string())
        } else {
            Symbol::Terminal(name.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Symbol::NonTerminal(name) | Symbol::Terminal(name) => name.as_str(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

/// `head -> body`. An empty body is an ε-production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub head: usize,
    pub body: Vec<usize>,
}

impl Production {
    pub fn is_epsilon(&self) -> bool {
        self.body.is_empty()
    }
}

/// An ordered production list over an interned symbol table.
///
/// Production 0 is treated as the augmented start production `S' -> S` and
/// the head of production 1 as the real start symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    pub symbols: Vec<Symbol>,
    pub symbol_table: HashMap<String, usize>,
    pub productions: Vec<Production>,
    end_mark: usize,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::from_productions(Vec::<(&str, Vec<&str>)>::new())
    }
}

impl Grammar {
    /// Builds a grammar from `(head, body)` pairs.
    ///
    /// Symbols are interned in order of first appearance and `$` is added to
    /// the terminal alphabet last. `ε` never becomes a symbol: a body made only
    /// of `ε` is an empty body.
    pub fn from_productions<I, S, B>(rules: I) -> Self
    where
        I: IntoIterator<Item = (S, B)>,
        S: AsRef<str>,
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        let mut g = Self {
            symbols: Vec::new(),
            symbol_table: HashMap::new(),
            productions: Vec::new(),
            end_mark: 0,
        };

        for (head, body) in rules {
            let head = g.intern(head.as_ref());
            let body = body
                .into_iter()
                .map(|s| s.as_ref().to_string())
                .filter(|s| s.as_str() != EPSILON)
                .map(|s| g.intern(&s))
                .collect();
            g.productions.push(Production { head, body });
        }

        g.end_mark = g.intern(END_MARK);
        g
    }

    fn intern(&mut self, name: &str) -> usize {
        if let Some(idx) = self.get_symbol_index(name) {
            return idx;
        }
        let idx = self.symbols.len();
        self.symbols.push(Symbol::classify(name));
        self.symbol_table.insert(name.to_string(), idx);
        idx
    }

    pub fn get_symbol_index(&self, name: &str) -> Option<usize> {
        self.symbol_table.get(name).cloned()
    }

    pub fn get_symbol_name(&self, index: usize) -> &str {
        self.symbols[index].name()
    }

    pub fn is_terminal(&self, index: usize) -> bool {
        self.symbols[index].is_terminal()
    }

    pub fn is_non_terminal(&self, index: usize) -> bool {
        !self.is_terminal(index)
    }

    pub fn end_mark(&self) -> usize {
        self.end_mark
    }

    pub fn terminal_iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.symbols.len()).filter(|&i| self.is_terminal(i))
    }

    pub fn non_terminal_iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.symbols.len()).filter(|&i| self.is_non_terminal(i))
    }

    /// Productions headed by `head`, with their indices.
    pub fn productions_of(&self, head: usize) -> impl Iterator<Item = (usize, &Production)> + '_ {
        self.productions
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.head == head)
    }

    /// Head of the augmented production.
    pub fn augmented_symbol(&self) -> Option<usize> {
        self.productions.first().map(|p| p.head)
    }

    /// Head of production 1.
    pub fn start_symbol(&self) -> Option<usize> {
        self.productions.get(1).map(|p| p.head)
    }

    pub fn production_to_vec_str(&self, production: &Production) -> Vec<&str> {
        if production.is_epsilon() {
            vec![EPSILON]
        } else {
            production
                .body
                .iter()
                .map(|&s| self.get_symbol_name(s))
                .collect()
        }
    }

    /// `HEAD → s1 s2`.
    pub fn production_to_string(&self, index: usize) -> String {
        let production = &self.productions[index];
        format!(
            "{} → {}",
            self.get_symbol_name(production.head),
            self.production_to_vec_str(production).join(" ")
        )
    }

    /// Checks the shape table generation relies on: at least two productions,
    /// the first being `S' -> S` with a head of its own.
    pub fn check_augmented(&self) -> Result<(), GrammarError> {
        let augmented = match self.productions.first() {
            Some(p) => p,
            None => return Err(GrammarError::EmptyGrammar),
        };

        let well_formed = match (augmented.body.as_slice(), self.productions.get(1)) {
            ([s], Some(start)) => self.is_non_terminal(*s) && start.head != augmented.head,
            _ => false,
        };

        if well_formed {
            Ok(())
        } else {
            Err(GrammarError::MissingAugmentedProduction {
                found: self.production_to_string(0),
            })
        }
    }
}
