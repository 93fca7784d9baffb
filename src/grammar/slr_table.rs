use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use super::{first_follow::FirstFollow, lr0_collection::CanonicalCollection, Grammar};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
    /// Only in nonterminal columns.
    Goto(usize),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(s) => write!(f, "s{}", s),
            Action::Reduce(r) => write!(f, "r{}", r),
            Action::Accept => write!(f, "acc"),
            Action::Goto(s) => write!(f, "{}", s),
        }
    }
}

/// state -> (symbol -> action).
///
/// Conflicting entries are not reported: whichever item writes a cell last
/// keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlrTable {
    pub rows: Vec<BTreeMap<usize, Action>>,
}

impl SlrTable {
    pub fn action(&self, state: usize, symbol: usize) -> Option<Action> {
        self.rows
            .get(state)
            .and_then(|row| row.get(&symbol).cloned())
    }

    pub fn row(&self, state: usize) -> Option<&BTreeMap<usize, Action>> {
        self.rows.get(state)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn set_action(row: &mut BTreeMap<usize, Action>, state: usize, symbol: usize, action: Action) {
    if let Some(previous) = row.insert(symbol, action) {
        if previous != action {
            debug!(
                "state {}: {} overwrites {} on symbol #{}",
                state, action, previous, symbol
            );
        }
    }
}

impl Grammar {
    pub fn to_slr_table(&self, collection: &CanonicalCollection, sets: &FirstFollow) -> SlrTable {
        let start = self.start_symbol();
        let end_mark = self.end_mark();

        let rows = collection
            .iter()
            .map(|state| {
                let mut row: BTreeMap<usize, Action> = BTreeMap::new();

                for item in &state.closure {
                    let production = &self.productions[item.production];
                    match item.symbol_at_dot(self) {
                        Some(symbol) if self.is_terminal(symbol) => {
                            if let Some(&target) = state.edges.get(&symbol) {
                                set_action(&mut row, state.id, symbol, Action::Shift(target));
                            }
                        }
                        Some(_) => {}
                        None => {
                            if item.production == 0
                                && production.body.len() == 1
                                && Some(production.body[0]) == start
                            {
                                set_action(&mut row, state.id, end_mark, Action::Accept);
                            } else {
                                for &t in sets.follow(production.head) {
                                    set_action(
                                        &mut row,
                                        state.id,
                                        t,
                                        Action::Reduce(item.production),
                                    );
                                }
                            }
                        }
                    }
                }

                for (&symbol, &target) in &state.edges {
                    if self.is_non_terminal(symbol) {
                        row.insert(symbol, Action::Goto(target));
                    }
                }

                row
            })
            .collect();

        SlrTable { rows }
    }
}
