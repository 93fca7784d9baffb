extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::{analyze, Analysis, Grammar, GrammarError, ParseConfig, SlrSession};

fn error_json<E: std::fmt::Display>(e: E) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

/// Productions, FIRST/FOLLOW, states and the SLR table of `grammar`, as JSON.
#[wasm_bindgen]
pub fn slr_tables_to_json(grammar: &str) -> String {
    let g = crate::Grammar::parse(grammar);
    match analyze(&g) {
        Ok(analysis) => analysis.to_output().to_json().unwrap_or_else(error_json),
        Err(e) => error_json(e),
    }
}

/// The shift-reduce trace of `input` under `grammar`, as JSON.
#[wasm_bindgen]
pub fn slr_parse_to_json(grammar: &str, input: &str) -> String {
    let g = crate::Grammar::parse(grammar);
    match analyze(&g) {
        Ok(analysis) => analysis
            .parse(input)
            .to_output()
            .to_json()
            .unwrap_or_else(error_json),
        Err(e) => error_json(e),
    }
}

#[cfg(test)]
mod slr_tests {
    use crate::grammar::{Action, StepAction, ARITHMETIC_GRAMMAR};
    use pretty_assertions::assert_eq;

    #[test]
    fn textbook_expression_grammar() {
        let g = crate::Grammar::parse(ARITHMETIC_GRAMMAR);
        let analysis = crate::analyze(&g).unwrap();

        assert_eq!(analysis.collection.len(), 12);

        let id = g.get_symbol_index("id").unwrap();
        let e = g.get_symbol_index("E").unwrap();
        let end = g.get_symbol_index("$").unwrap();
        assert!(matches!(analysis.table.action(0, id), Some(Action::Shift(_))));

        let after_e = analysis.collection.goto(0, e).unwrap();
        assert_eq!(analysis.table.action(after_e, end), Some(Action::Accept));
    }

    #[test]
    fn reduce_sequence_for_id_times_id_plus_id() {
        let analysis = crate::analyze(&crate::Grammar::arithmetic()).unwrap();
        let trace = analysis.parse("id * id + id");
        let g = &analysis.grammar;

        let moves: Vec<String> = trace
            .steps
            .iter()
            .filter_map(|s| match &s.action {
                StepAction::Shift(_) => Some(format!("shift {}", s.input[0])),
                StepAction::Reduce(p) => Some(format!("reduce {}", g.production_to_string(*p))),
                StepAction::Accept => Some("accept".to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(
            moves,
            vec![
                "shift id",
                "reduce F → id",
                "reduce T → F",
                "shift *",
                "shift id",
                "reduce F → id",
                "reduce T → T * F",
                "reduce E → T",
                "shift +",
                "shift id",
                "reduce F → id",
                "reduce T → F",
                "reduce E → E + T",
                "accept",
            ]
        );
        assert_eq!(
            trace.last().unwrap().action.to_string(),
            "Accept - Input successfully parsed"
        );
    }

    #[test]
    fn tables_json() {
        let json = crate::slr_tables_to_json(ARITHMETIC_GRAMMAR);
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["states"]["states"].as_array().unwrap().len(), 12);
        assert_eq!(v["table"]["action"][1][5], "acc");
        assert_eq!(v["productions"]["productions"][1]["display"], "E → E + T");
    }

    #[test]
    fn tables_json_error() {
        let json = crate::slr_tables_to_json("no arrows here");
        assert_eq!(json, "{\"error\":\"grammar has no productions\"}");
    }

    #[test]
    fn parse_json() {
        let json = crate::slr_parse_to_json(ARITHMETIC_GRAMMAR, "id % id");
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["accepted"], false);
        let steps = v["steps"].as_array().unwrap();
        assert_eq!(
            steps.last().unwrap()["action"],
            "Error: No action for state 5 and input %"
        );
    }
}
