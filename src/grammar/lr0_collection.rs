use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use log::{debug, trace};

use crate::Grammar;

/// An LR(0) item: production index and dot position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub production: usize,
    pub dot: usize,
}

impl Item {
    pub fn new(production: usize, dot: usize) -> Self {
        Self { production, dot }
    }

    /// Symbol right after the dot, if any.
    pub fn symbol_at_dot(&self, g: &Grammar) -> Option<usize> {
        g.productions[self.production].body.get(self.dot).cloned()
    }

    pub fn is_complete(&self, g: &Grammar) -> bool {
        self.dot >= g.productions[self.production].body.len()
    }

    pub fn advance(&self) -> Self {
        Self::new(self.production, self.dot + 1)
    }

    /// `E → E • + T`
    pub fn to_plaintext(&self, g: &Grammar) -> String {
        let production = &g.productions[self.production];
        let mut right: Vec<&str> = production
            .body
            .iter()
            .map(|&s| g.get_symbol_name(s))
            .collect();
        right.insert(self.dot.min(right.len()), "•");
        format!("{} → {}", g.get_symbol_name(production.head), right.join(" "))
    }
}

/// Order-independent identity of an item set.
pub type ItemSetKey = BTreeSet<Item>;

pub fn item_set_key(items: &[Item]) -> ItemSetKey {
    items.iter().cloned().collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub id: usize,
    /// Items the state was reached with, before closure.
    pub kernel: Vec<Item>,
    /// Kernel plus every item closure added, in insertion order.
    pub closure: Vec<Item>,
    /// GOTO: symbol -> target state.
    pub edges: BTreeMap<usize, usize>,
}

impl State {
    /// Distinct symbols right after a dot, in closure order.
    pub fn dotted_symbols(&self, g: &Grammar) -> Vec<usize> {
        let mut seen = HashSet::new();
        self.closure
            .iter()
            .filter_map(|item| item.symbol_at_dot(g))
            .filter(|s| seen.insert(*s))
            .collect()
    }
}

/// The LR(0) canonical collection. State 0 is the closure of `S' → • S`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCollection {
    pub states: Vec<State>,
}

impl CanonicalCollection {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&State> {
        self.states.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    pub fn goto(&self, state: usize, symbol: usize) -> Option<usize> {
        self.states
            .get(state)
            .and_then(|s| s.edges.get(&symbol).cloned())
    }

    /// First edge, scanning states in id order, that leads into `id`.
    pub fn predecessor(&self, id: usize) -> Option<(usize, usize)> {
        if id == 0 {
            return None;
        }
        self.states.iter().find_map(|state| {
            state
                .edges
                .iter()
                .find(|(_, target)| **target == id)
                .map(|(&symbol, _)| (state.id, symbol))
        })
    }
}

impl Grammar {
    /// Adds `N → • γ` for every nonterminal `N` right after a dot, until
    /// nothing new appears.
    pub fn closure(&self, items: &[Item]) -> Vec<Item> {
        let mut closure: Vec<Item> = Vec::new();
        let mut seen: HashSet<Item> = HashSet::new();
        let mut q: VecDeque<Item> = VecDeque::new();

        for &item in items {
            if seen.insert(item) {
                closure.push(item);
                q.push_back(item);
            }
        }

        while let Some(item) = q.pop_front() {
            let symbol = match item.symbol_at_dot(self) {
                Some(s) if self.is_non_terminal(s) => s,
                _ => continue,
            };
            for (idx, _) in self.productions_of(symbol) {
                let extend = Item::new(idx, 0);
                if seen.insert(extend) {
                    closure.push(extend);
                    q.push_back(extend);
                }
            }
        }

        closure
    }

    /// Moves the dot over `symbol` in every item where it sits before it.
    pub fn goto(&self, items: &[Item], symbol: usize) -> Vec<Item> {
        items
            .iter()
            .filter(|item| item.symbol_at_dot(self) == Some(symbol))
            .map(|item| item.advance())
            .collect()
    }

    /// Builds the canonical collection breadth-first from state 0. Targets are
    /// matched against existing states by closure set, so no state is
    /// duplicated and none is processed twice.
    pub fn to_canonical_collection(&self) -> CanonicalCollection {
        let start_kernel = vec![Item::new(0, 0)];
        let start_closure = self.closure(&start_kernel);

        let mut index: HashMap<ItemSetKey, usize> = HashMap::new();
        index.insert(item_set_key(&start_closure), 0);

        let mut states = vec![State {
            id: 0,
            kernel: start_kernel,
            closure: start_closure,
            edges: BTreeMap::new(),
        }];
        let mut q: VecDeque<usize> = VecDeque::new();
        q.push_back(0);

        while let Some(u) = q.pop_front() {
            for symbol in states[u].dotted_symbols(self) {
                let kernel = self.goto(&states[u].closure, symbol);
                let closure = self.closure(&kernel);
                let key = item_set_key(&closure);

                let v = match index.get(&key) {
                    Some(&v) => v,
                    None => {
                        let v = states.len();
                        trace!(
                            "I{} = goto(I{}, {})",
                            v,
                            u,
                            self.get_symbol_name(symbol)
                        );
                        index.insert(key, v);
                        states.push(State {
                            id: v,
                            kernel,
                            closure,
                            edges: BTreeMap::new(),
                        });
                        q.push_back(v);
                        v
                    }
                };
                states[u].edges.insert(symbol, v);
            }
        }

        debug!("canonical collection has {} states", states.len());
        CanonicalCollection { states }
    }
}
