use std::collections::BTreeSet;

use log::debug;

use super::Grammar;

/// Terminals a sequence can start with, and whether it can derive ε.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirstSet {
    pub terminals: BTreeSet<usize>,
    pub nullable: bool,
}

impl FirstSet {
    fn union_with(&mut self, other: &FirstSet) -> bool {
        let before = (self.terminals.len(), self.nullable);
        self.terminals.extend(other.terminals.iter().cloned());
        self.nullable |= other.nullable;
        before != (self.terminals.len(), self.nullable)
    }
}

/// FIRST and FOLLOW for every symbol, indexed by symbol id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstFollow {
    pub first: Vec<FirstSet>,
    pub follow: Vec<BTreeSet<usize>>,
}

impl FirstFollow {
    pub fn first(&self, symbol: usize) -> &FirstSet {
        &self.first[symbol]
    }

    pub fn follow(&self, symbol: usize) -> &BTreeSet<usize> {
        &self.follow[symbol]
    }

    /// FIRST of a symbol string. The empty string yields `{ε}`.
    pub fn first_of_sequence(&self, symbols: &[usize]) -> FirstSet {
        first_of_sequence(&self.first, symbols)
    }
}

fn first_of_sequence(first: &[FirstSet], symbols: &[usize]) -> FirstSet {
    let mut result = FirstSet::default();
    for &symbol in symbols {
        result.terminals.extend(first[symbol].terminals.iter().cloned());
        if !first[symbol].nullable {
            return result;
        }
    }
    result.nullable = true;
    result
}

impl Grammar {
    pub fn calculate_first_follow(&self) -> FirstFollow {
        let first = self.calculate_first();
        let follow = self.calculate_follow(&first);
        FirstFollow { first, follow }
    }

    fn calculate_first(&self) -> Vec<FirstSet> {
        let mut first = vec![FirstSet::default(); self.symbols.len()];
        for t in self.terminal_iter() {
            first[t].terminals.insert(t);
        }

        let mut passes = 0;
        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;
            for production in &self.productions {
                let body_first = first_of_sequence(&first, &production.body);
                changed |= first[production.head].union_with(&body_first);
            }
        }
        debug!("FIRST sets stable after {} passes", passes);

        first
    }

    fn calculate_follow(&self, first: &[FirstSet]) -> Vec<BTreeSet<usize>> {
        let mut follow = vec![BTreeSet::new(); self.symbols.len()];
        if let Some(start) = self.augmented_symbol() {
            follow[start].insert(self.end_mark());
        }

        let mut passes = 0;
        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;
            for production in &self.productions {
                for (i, &symbol) in production.body.iter().enumerate() {
                    if self.is_terminal(symbol) {
                        continue;
                    }

                    let beta = first_of_sequence(first, &production.body[i + 1..]);
                    let mut addition = beta.terminals;
                    if beta.nullable {
                        addition.extend(follow[production.head].iter().cloned());
                    }

                    let before = follow[symbol].len();
                    follow[symbol].extend(addition);
                    changed |= follow[symbol].len() != before;
                }
            }
        }
        debug!("FOLLOW sets stable after {} passes", passes);

        follow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(g: &Grammar, set: &BTreeSet<usize>) -> Vec<String> {
        let mut v: Vec<String> = set.iter().map(|&i| g.get_symbol_name(i).to_string()).collect();
        v.sort();
        v
    }

    #[test]
    fn terminal_first_is_itself() {
        let g = Grammar::arithmetic();
        let ff = g.calculate_first_follow();
        for t in g.terminal_iter() {
            assert_eq!(ff.first(t).terminals, BTreeSet::from([t]));
            assert!(!ff.first(t).nullable);
        }
    }

    #[test]
    fn arithmetic_first_follow() {
        let g = Grammar::arithmetic();
        let ff = g.calculate_first_follow();
        let idx = |name: &str| g.get_symbol_index(name).unwrap();

        for nt in ["E'", "E", "T", "F"] {
            assert_eq!(names(&g, &ff.first(idx(nt)).terminals), vec!["(", "id"]);
            assert!(!ff.first(idx(nt)).nullable);
        }
        assert_eq!(names(&g, ff.follow(idx("E'"))), vec!["$"]);
        assert_eq!(names(&g, ff.follow(idx("E"))), vec!["$", ")", "+"]);
        assert_eq!(names(&g, ff.follow(idx("T"))), vec!["$", ")", "*", "+"]);
        assert_eq!(names(&g, ff.follow(idx("F"))), vec!["$", ")", "*", "+"]);
    }

    #[test]
    fn nullable_first_follow() {
        // Z -> d | X Y Z, Y -> ε | c, X -> Y | a
        let g = Grammar::parse(
            "Z' -> Z\nZ -> d\nZ -> X Y Z\nY -> ε\nY -> c\nX -> Y\nX -> a",
        );
        let ff = g.calculate_first_follow();
        let idx = |name: &str| g.get_symbol_index(name).unwrap();

        assert!(ff.first(idx("X")).nullable);
        assert!(ff.first(idx("Y")).nullable);
        assert!(!ff.first(idx("Z")).nullable);
        assert_eq!(names(&g, &ff.first(idx("X")).terminals), vec!["a", "c"]);
        assert_eq!(names(&g, &ff.first(idx("Z")).terminals), vec!["a", "c", "d"]);
        assert_eq!(names(&g, ff.follow(idx("X"))), vec!["a", "c", "d"]);
        assert_eq!(names(&g, ff.follow(idx("Y"))), vec!["a", "c", "d"]);
        assert_eq!(names(&g, ff.follow(idx("Z"))), vec!["$"]);
    }

    #[test]
    fn follow_through_nullable_suffix() {
        let g = Grammar::parse("S' -> S\nS -> A B\nA -> a\nB -> ε\nB -> b");
        let ff = g.calculate_first_follow();
        let idx = |name: &str| g.get_symbol_index(name).unwrap();

        assert_eq!(names(&g, ff.follow(idx("A"))), vec!["$", "b"]);
        assert_eq!(names(&g, ff.follow(idx("B"))), vec!["$"]);
        assert!(ff.first_of_sequence(&[]).nullable);
        assert!(ff.first_of_sequence(&[idx("B")]).nullable);
        assert!(!ff.first_of_sequence(&[idx("B"), idx("A")]).nullable);
    }
}
