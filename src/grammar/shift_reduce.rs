use std::collections::VecDeque;
use std::fmt;

use log::trace;

use super::{analysis::Analysis, slr_table::Action, END_MARK};

pub const DEFAULT_MAX_STEPS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    /// Trace records after which the driver gives up.
    pub max_steps: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// What a trace record reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    Shift(usize),
    Reduce(usize),
    Accept,
    /// Extra record appended after `Accept`.
    Accepted,
    NoAction { state: usize, symbol: String },
    NoGoto { state: usize, symbol: String },
    StepLimit,
}

impl StepAction {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            StepAction::NoAction { .. } | StepAction::NoGoto { .. } | StepAction::StepLimit
        )
    }
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepAction::Shift(s) => write!(f, "s{}", s),
            StepAction::Reduce(r) => write!(f, "r{}", r),
            StepAction::Accept => write!(f, "acc"),
            StepAction::Accepted => write!(f, "Accept - Input successfully parsed"),
            StepAction::NoAction { state, symbol } => write!(
                f,
                "Error: No action for state {} and input {}",
                state, symbol
            ),
            StepAction::NoGoto { state, symbol } => {
                write!(f, "Error: No goto for state {} and symbol {}", state, symbol)
            }
            StepAction::StepLimit => write!(f, "Parsing terminated - Maximum steps reached"),
        }
    }
}

/// One row of the trace: configuration before the transition, and the
/// transition taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStep {
    pub step: usize,
    pub stack: Vec<String>,
    /// Remaining input, `$` included.
    pub input: Vec<String>,
    pub action: StepAction,
}

impl ParseStep {
    pub fn input_string(&self) -> String {
        self.input.join(" ")
    }

    pub fn stack_string(&self) -> String {
        self.stack.join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseTrace {
    pub steps: Vec<ParseStep>,
}

impl ParseTrace {
    pub fn is_accepted(&self) -> bool {
        matches!(self.last().map(|s| &s.action), Some(StepAction::Accepted))
    }

    pub fn last(&self) -> Option<&ParseStep> {
        self.steps.last()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackEntry {
    State(usize),
    Symbol(usize),
}

/// Table-driven shift-reduce driver. Never fails: every stop, successful or
/// not, is the last record of the returned trace.
pub struct ShiftReduceParser<'a> {
    analysis: &'a Analysis,
    config: ParseConfig,
}

impl<'a> ShiftReduceParser<'a> {
    pub fn new(analysis: &'a Analysis) -> Self {
        Self {
            analysis,
            config: ParseConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ParseConfig) -> Self {
        self.config = config;
        self
    }

    fn lookup(&self, state: usize, lookahead: &str) -> Option<Action> {
        let g = &self.analysis.grammar;
        g.get_symbol_index(lookahead)
            .and_then(|symbol| self.analysis.table.action(state, symbol))
    }

    fn snapshot(&self, stack: &[StackEntry]) -> Vec<String> {
        stack
            .iter()
            .map(|entry| match entry {
                StackEntry::State(s) => s.to_string(),
                StackEntry::Symbol(s) => self.analysis.grammar.get_symbol_name(*s).to_string(),
            })
            .collect()
    }

    fn record(
        &self,
        steps: &mut Vec<ParseStep>,
        stack: &[StackEntry],
        buffer: &VecDeque<String>,
        action: StepAction,
    ) {
        steps.push(ParseStep {
            step: steps.len() + 1,
            stack: self.snapshot(stack),
            input: buffer.iter().cloned().collect(),
            action,
        });
    }

    pub fn parse(&self, input: &str) -> ParseTrace {
        let g = &self.analysis.grammar;
        let mut stack: Vec<StackEntry> = vec![StackEntry::State(0)];
        let mut buffer: VecDeque<String> = input
            .split_whitespace()
            .map(|s| s.to_string())
            .chain(std::iter::once(END_MARK.to_string()))
            .collect();
        let mut steps: Vec<ParseStep> = Vec::new();

        loop {
            let state = top_state(&stack);
            let lookahead = buffer
                .front()
                .cloned()
                .unwrap_or_else(|| END_MARK.to_string());

            let action = self.lookup(state, &lookahead);
            trace!("state {} on {:?}: {:?}", state, lookahead, action);

            match action {
                Some(Action::Accept) => {
                    self.record(&mut steps, &stack, &buffer, StepAction::Accept);
                    self.record(&mut steps, &stack, &buffer, StepAction::Accepted);
                    break;
                }
                Some(Action::Shift(next)) => {
                    self.record(&mut steps, &stack, &buffer, StepAction::Shift(next));
                    buffer.pop_front();
                    if let Some(symbol) = g.get_symbol_index(&lookahead) {
                        stack.push(StackEntry::Symbol(symbol));
                    }
                    stack.push(StackEntry::State(next));
                }
                Some(Action::Reduce(p)) => {
                    self.record(&mut steps, &stack, &buffer, StepAction::Reduce(p));
                    let production = &g.productions[p];
                    let keep = stack.len().saturating_sub(2 * production.body.len()).max(1);
                    stack.truncate(keep);

                    let exposed = top_state(&stack);
                    stack.push(StackEntry::Symbol(production.head));
                    match self.analysis.collection.goto(exposed, production.head) {
                        Some(next) => stack.push(StackEntry::State(next)),
                        None => {
                            self.record(
                                &mut steps,
                                &stack,
                                &buffer,
                                StepAction::NoGoto {
                                    state: exposed,
                                    symbol: g.get_symbol_name(production.head).to_string(),
                                },
                            );
                            break;
                        }
                    }
                }
                // Goto cells belong to nonterminal columns, never to an input token.
                Some(Action::Goto(_)) | None => {
                    self.record(
                        &mut steps,
                        &stack,
                        &buffer,
                        StepAction::NoAction {
                            state,
                            symbol: lookahead,
                        },
                    );
                    break;
                }
            }

            if steps.len() >= self.config.max_steps {
                self.record(&mut steps, &stack, &buffer, StepAction::StepLimit);
                break;
            }
        }

        ParseTrace { steps }
    }
}

fn top_state(stack: &[StackEntry]) -> usize {
    stack
        .iter()
        .rev()
        .find_map(|entry| match entry {
            StackEntry::State(s) => Some(*s),
            StackEntry::Symbol(_) => None,
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{analyze, Grammar};
    use pretty_assertions::assert_eq;

    fn arithmetic() -> Analysis {
        analyze(&Grammar::arithmetic()).unwrap()
    }

    #[test]
    fn accepts_id_times_id_plus_id() {
        let _ = env_logger::builder().is_test(true).try_init();
        let trace = arithmetic().parse("id * id + id");

        let labels: Vec<String> = trace.steps.iter().map(|s| s.action.to_string()).collect();
        assert_eq!(
            labels,
            vec![
                "s5", "r6", "r4", "s7", "s5", "r6", "r3", "r2", "s6", "s5", "r6", "r4", "r1",
                "acc", "Accept - Input successfully parsed",
            ]
        );
        assert!(trace.is_accepted());
        assert_eq!(trace.steps[0].stack, vec!["0"]);
        assert_eq!(trace.steps[0].input_string(), "id * id + id $");
        assert_eq!(trace.steps[1].stack_string(), "0 id 5");
        assert_eq!(trace.steps[1].input_string(), "* id + id $");
        assert_eq!(trace.steps[2].stack_string(), "0 F 3");
        assert_eq!(trace.steps[7].stack_string(), "0 T 2");
        assert_eq!(trace.steps[7].input_string(), "+ id $");
        assert_eq!(trace.steps[13].stack_string(), "0 E 1");
        assert_eq!(trace.steps[13].input_string(), "$");
        assert_eq!(trace.steps[14].step, 15);
    }

    #[test]
    fn unknown_token_halts_with_diagnostic() {
        let trace = arithmetic().parse("id % id");
        let last = trace.last().unwrap();
        assert!(!trace.is_accepted());
        assert!(last.action.is_error());
        assert_eq!(last.action.to_string(), "Error: No action for state 5 and input %");
        assert_eq!(last.input_string(), "% id $");
    }

    #[test]
    fn premature_end_halts_with_diagnostic() {
        let trace = arithmetic().parse("id +");
        assert_eq!(
            trace.last().unwrap().action,
            StepAction::NoAction {
                state: 6,
                symbol: "$".to_string()
            }
        );
    }

    #[test]
    fn nonterminal_in_input_is_not_a_goto() {
        let trace = arithmetic().parse("E");
        assert_eq!(
            trace.last().unwrap().action.to_string(),
            "Error: No action for state 0 and input E"
        );
    }

    #[test]
    fn step_limit_stops_long_parses() {
        let config = ParseConfig { max_steps: 5 };
        let trace = arithmetic().parse_with("id * id + id", config);
        assert_eq!(trace.len(), 6);
        assert_eq!(trace.last().unwrap().action, StepAction::StepLimit);
        assert_eq!(
            trace.last().unwrap().action.to_string(),
            "Parsing terminated - Maximum steps reached"
        );
    }

    #[test]
    fn cyclic_grammar_hits_default_step_limit() {
        let analysis = analyze(&Grammar::parse("S' -> S\nS -> S\nS -> a")).unwrap();
        let trace = analysis.parse_with("a", ParseConfig::default());

        assert_eq!(trace.len(), DEFAULT_MAX_STEPS + 1);
        assert!(!trace.is_accepted());
        let labels: Vec<String> = trace.steps.iter().map(|s| s.action.to_string()).collect();
        assert_eq!(labels[..3].to_vec(), vec!["s2", "r2", "r1"]);
        assert!(labels[2..DEFAULT_MAX_STEPS].iter().all(|l| l == "r1"));
        assert_eq!(
            labels[DEFAULT_MAX_STEPS],
            "Parsing terminated - Maximum steps reached"
        );
        assert_eq!(trace.last().unwrap().step, 51);
    }

    #[test]
    fn epsilon_reduce_pops_nothing() {
        let analysis = analyze(&Grammar::parse("S' -> S\nS -> a S b\nS -> ε")).unwrap();
        let trace = analysis.parse("a a b b");
        assert!(trace.is_accepted());

        let trace = analysis.parse("");
        let labels: Vec<String> = trace.steps.iter().map(|s| s.action.to_string()).collect();
        assert_eq!(labels, vec!["r2", "acc", "Accept - Input successfully parsed"]);
        assert_eq!(trace.steps[1].stack_string(), "0 S 1");
    }
}
