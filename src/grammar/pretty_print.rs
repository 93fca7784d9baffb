use crowbook_text_processing::escape;
use serde::Serialize;

use super::{
    analysis::Analysis,
    shift_reduce::{ParseStep, ParseTrace},
    Grammar, EPSILON,
};

fn tex_symbol(s: &str) -> String {
    if s == EPSILON {
        "\\epsilon".to_string()
    } else {
        escape::tex(s).to_string()
    }
}

fn align_rows(output: &[Vec<String>]) -> String {
    let columns = output.iter().map(|row| row.len()).max().unwrap_or(0);
    let width: Vec<usize> = (0..columns)
        .map(|j| {
            output
                .iter()
                .filter_map(|row| row.get(j))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    output
        .iter()
        .map(|line| {
            line.iter()
                .enumerate()
                .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub index: usize,
    pub left: &'a str,
    pub right: Vec<&'a str>,
    pub display: String,
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize) -> String {
        format!(
            "({}) {:>width$} -> {}",
            self.index,
            self.left,
            self.right.join(" "),
            width = left_width
        )
    }

    pub fn to_latex(&self) -> String {
        format!(
            "({}) & {} & \\rightarrow & {}",
            self.index,
            escape::tex(self.left),
            self.right
                .iter()
                .map(|s| tex_symbol(s))
                .collect::<Vec<_>>()
                .join(" \\ ")
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.chars().count())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|s| s.to_plaintext(left_max_len))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{rcll}".to_string())
            .chain(self.productions.iter().map(|s| s.to_latex()))
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec<'_> {
        let productions = self
            .productions
            .iter()
            .enumerate()
            .map(|(index, production)| ProductionOutput {
                index,
                left: self.get_symbol_name(production.head),
                right: self.production_to_vec_str(production),
                display: self.production_to_string(index),
            })
            .collect();
        ProductionOutputVec { productions }
    }
}

#[derive(Debug, Clone, Serialize)]
struct NonTerminalOutput<'a> {
    name: &'a str,
    first: Vec<&'a str>,
    follow: Vec<&'a str>,
}

impl NonTerminalOutput<'_> {
    fn to_plaintext(&self) -> String {
        format!(
            "{} | {} | {}",
            self.name,
            self.first.join(", "),
            self.follow.join(", ")
        )
    }

    fn to_latex(&self) -> String {
        fn f(a: &[&str]) -> String {
            a.iter()
                .map(|s| {
                    if *s == EPSILON {
                        "$\\epsilon$".to_string()
                    } else {
                        escape::tex(*s).to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(r"\ ")
        }

        format!(
            "{} & {} & {}",
            escape::tex(self.name),
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NonTerminalOutputVec<'a> {
    data: Vec<NonTerminalOutput<'a>>,
}

impl NonTerminalOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|s| s.to_plaintext())
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c}\n".to_string()
            + "Symbol & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl<'a> NonTerminalOutputVec<'a> {
    /// `(name, FIRST, FOLLOW)` rows, ε included in FIRST when nullable.
    pub fn rows(&self) -> Vec<(&'a str, Vec<&'a str>, Vec<&'a str>)> {
        self.data
            .iter()
            .map(|d| (d.name, d.first.clone(), d.follow.clone()))
            .collect()
    }
}

impl Analysis {
    /// FIRST/FOLLOW per nonterminal, sorted by name, each set sorted.
    pub fn to_non_terminal_output_vec(&self) -> NonTerminalOutputVec<'_> {
        let g = &self.grammar;
        let mut data: Vec<NonTerminalOutput> = g
            .non_terminal_iter()
            .map(|nt| {
                let first_set = self.first_follow.first(nt);
                let mut first: Vec<&str> = first_set
                    .terminals
                    .iter()
                    .map(|&t| g.get_symbol_name(t))
                    .collect();
                if first_set.nullable {
                    first.push(EPSILON);
                }
                let mut follow: Vec<&str> = self
                    .first_follow
                    .follow(nt)
                    .iter()
                    .map(|&t| g.get_symbol_name(t))
                    .collect();
                first.sort();
                follow.sort();

                NonTerminalOutput {
                    name: g.get_symbol_name(nt),
                    first,
                    follow,
                }
            })
            .collect();
        data.sort_by(|a, b| a.name.cmp(b.name));
        NonTerminalOutputVec { data }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeOutput<'a> {
    pub symbol: &'a str,
    pub target: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateOutput<'a> {
    pub id: usize,
    /// `goto(i, X)` for the first edge into this state.
    pub from: Option<String>,
    pub kernel: Vec<String>,
    pub closure: Vec<String>,
    pub edges: Vec<EdgeOutput<'a>>,
}

impl StateOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let header = match &self.from {
            Some(from) => format!("I{} = {}", self.id, from),
            None => format!("I{}", self.id),
        };

        let kernel = self.kernel.join("\n");

        let extend = self
            .closure
            .iter()
            .filter(|c| !self.kernel.contains(*c))
            .cloned()
            .collect::<Vec<_>>();
        let extend = if !extend.is_empty() {
            format!("\n---\n{}", extend.join("\n"))
        } else {
            String::new()
        };

        let edges = if !self.edges.is_empty() {
            format!(
                "\n===\n{}",
                self.edges
                    .iter()
                    .map(|e| format!("- {} -> {}", e.symbol, e.target))
                    .collect::<Vec<_>>()
                    .join("\n")
            )
        } else {
            String::new()
        };

        format!("{}\n{}{}{}", header, kernel, extend, edges)
    }

    pub fn node_to_latex(&self) -> String {
        let content = self
            .closure
            .iter()
            .map(|e| format!("${}$", escape::tex(e.as_str()).replace('•', "\\bullet ")))
            .collect::<Vec<_>>()
            .join(" \\\\ \n");
        let id = self.id;
        format!(
            "\\node [block] (I_{}){}\n{{\n$I_{}$\\\\\n{}\n}};",
            id,
            if id > 0 {
                if id % 2 == 0 {
                    format!(" [below of = I_{}] ", id - 2)
                } else {
                    format!(" [right of = I_{}] ", id - 1)
                }
            } else {
                String::new()
            },
            id,
            content
        )
    }

    pub fn edge_to_latex(&self) -> String {
        self.edges
            .iter()
            .map(|e| {
                format!(
                    "\\path [->] (I_{}) edge {} node [above]{{{}}} (I_{});",
                    self.id,
                    if self.id == e.target {
                        "[loop left]"
                    } else {
                        "[right]"
                    },
                    escape::tex(e.symbol),
                    e.target
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StateOutputVec<'a> {
    states: Vec<StateOutput<'a>>,
}

impl StateOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        self.states
            .iter()
            .map(|s| s.to_plaintext())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn to_latex(&self) -> String {
        format!(
            "\\begin{{tikzpicture}}[node distance=5cm,block/.style={{state, rectangle, text width=8em}}]\n{}\n\\end{{tikzpicture}}",
            self.states
                .iter()
                .map(|s| s.node_to_latex())
                .chain(self.states.iter().map(|s| s.edge_to_latex()))
                .collect::<Vec<_>>()
                .join("\n")
        )
    }
}

impl Analysis {
    pub fn to_state_output_vec(&self) -> StateOutputVec<'_> {
        let g = &self.grammar;
        let states = self
            .collection
            .iter()
            .map(|state| StateOutput {
                id: state.id,
                from: self
                    .collection
                    .predecessor(state.id)
                    .map(|(from, symbol)| format!("goto({}, {})", from, g.get_symbol_name(symbol))),
                kernel: state.kernel.iter().map(|i| i.to_plaintext(g)).collect(),
                closure: state.closure.iter().map(|i| i.to_plaintext(g)).collect(),
                edges: state
                    .edges
                    .iter()
                    .map(|(&symbol, &target)| EdgeOutput {
                        symbol: g.get_symbol_name(symbol),
                        target,
                    })
                    .collect(),
            })
            .collect();
        StateOutputVec { states }
    }
}

/// The SLR table laid out as action columns (terminals) then goto columns
/// (nonterminals). Empty cells are empty strings.
#[derive(Debug, Clone, Serialize)]
pub struct SlrTableOutput<'a> {
    pub terminals: Vec<&'a str>,
    pub non_terminals: Vec<&'a str>,
    pub action: Vec<Vec<String>>,
    pub goto: Vec<Vec<String>>,
}

impl SlrTableOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut output: Vec<Vec<String>> = Vec::new();

        output.push(vec![String::new()]);
        for s in self.terminals.iter().chain(self.non_terminals.iter()) {
            output[0].push(s.to_string());
        }

        for (i, (r1, r2)) in self.action.iter().zip(self.goto.iter()).enumerate() {
            let row: Vec<String> = std::iter::once(i.to_string())
                .chain(r1.iter().cloned())
                .chain(r2.iter().cloned())
                .collect();
            output.push(row);
        }

        align_rows(&output)
    }

    pub fn to_latex(&self) -> String {
        let header: String = format!(
            "\\begin{{tabular}}{{c{}}}\n & \\multicolumn{{{}}}{{c}}{{action}} & \\multicolumn{{{}}}{{|c}}{{goto}}\\\\",
            "|l".repeat(self.terminals.len() + self.non_terminals.len()),
            self.terminals.len(),
            self.non_terminals.len(),
        );

        let first_row = std::iter::once(String::new())
            .chain(
                self.terminals
                    .iter()
                    .chain(self.non_terminals.iter())
                    .map(|s| escape::tex(*s).to_string()),
            )
            .collect::<Vec<_>>()
            .join(" & ");

        let content = self
            .action
            .iter()
            .zip(self.goto.iter())
            .enumerate()
            .map(|(i, (r1, r2))| {
                std::iter::once(i.to_string())
                    .chain(r1.iter().cloned())
                    .chain(r2.iter().cloned())
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join(" \\\\\n");

        format!(
            "{}\n{} \\\\\\hline\n{}\n\\end{{tabular}}",
            header, first_row, content
        )
    }
}

impl Analysis {
    pub fn to_slr_table_output(&self) -> SlrTableOutput<'_> {
        let g = &self.grammar;
        let terminals: Vec<usize> = g.terminal_iter().collect();
        let non_terminals: Vec<usize> = g.non_terminal_iter().collect();

        let cells = |state: usize, columns: &[usize]| -> Vec<String> {
            columns
                .iter()
                .map(|&symbol| {
                    self.table
                        .action(state, symbol)
                        .map(|a| a.to_string())
                        .unwrap_or_default()
                })
                .collect()
        };

        SlrTableOutput {
            terminals: terminals.iter().map(|&t| g.get_symbol_name(t)).collect(),
            non_terminals: non_terminals.iter().map(|&n| g.get_symbol_name(n)).collect(),
            action: (0..self.table.len()).map(|s| cells(s, &terminals)).collect(),
            goto: (0..self.table.len())
                .map(|s| cells(s, &non_terminals))
                .collect(),
        }
    }

    pub fn to_output(&self) -> AnalysisOutput<'_> {
        AnalysisOutput {
            productions: self.grammar.to_production_output_vec(),
            first_follow: self.to_non_terminal_output_vec(),
            states: self.to_state_output_vec(),
            table: self.to_slr_table_output(),
        }
    }
}

/// Everything a front end renders after generating tables.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput<'a> {
    pub productions: ProductionOutputVec<'a>,
    pub first_follow: NonTerminalOutputVec<'a>,
    pub states: StateOutputVec<'a>,
    pub table: SlrTableOutput<'a>,
}

impl AnalysisOutput<'_> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseStepOutput {
    pub step: usize,
    pub stack: Vec<String>,
    pub input: String,
    pub action: String,
}

impl From<&ParseStep> for ParseStepOutput {
    fn from(step: &ParseStep) -> Self {
        Self {
            step: step.step,
            stack: step.stack.clone(),
            input: step.input_string(),
            action: step.action.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseTraceOutput {
    pub accepted: bool,
    pub steps: Vec<ParseStepOutput>,
}

impl ParseTraceOutput {
    pub fn to_plaintext(&self) -> String {
        let mut output: Vec<Vec<String>> = vec![vec![
            "Step".to_string(),
            "Stack".to_string(),
            "Input".to_string(),
            "Action".to_string(),
        ]];
        output.extend(self.steps.iter().map(|s| {
            vec![
                s.step.to_string(),
                s.stack.join(" "),
                s.input.clone(),
                s.action.clone(),
            ]
        }));
        align_rows(&output)
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .steps
            .iter()
            .map(|s| {
                format!(
                    "{} & {} & {} & {}",
                    s.step,
                    escape::tex(s.stack.join(" ")),
                    escape::tex(s.input.as_str()),
                    escape::tex(s.action.as_str())
                )
            })
            .collect::<Vec<_>>()
            .join(" \\\\\n");

        "\\begin{tabular}{r|l|r|l}\n".to_string()
            + "Step & Stack & Input & Action\\\\\\hline\n"
            + &content
            + "\n\\end{tabular}"
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl ParseTrace {
    pub fn to_output(&self) -> ParseTraceOutput {
        ParseTraceOutput {
            accepted: self.is_accepted(),
            steps: self.steps.iter().map(ParseStepOutput::from).collect(),
        }
    }
}
