use log::trace;

use super::{Grammar, ARITHMETIC_GRAMMAR};

impl Grammar {
    /// Reads one production per line, `HEAD -> S1 S2 ...` or `HEAD -> ε`.
    ///
    /// Lines without exactly one `->` are skipped, not reported.
    pub fn parse(grammar: &str) -> Self {
        let mut rules: Vec<(&str, Vec<&str>)> = Vec::new();

        for (i, line) in grammar.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split("->").map(|part| part.trim()).collect();
            if parts.len() != 2 {
                trace!("Line {}: no single \"->\", skipped", i + 1);
                continue;
            }
            rules.push((parts[0], parts[1].split_whitespace().collect()));
        }

        Self::from_productions(rules)
    }

    /// `E' -> E`, `E -> E + T | T`, `T -> T * F | F`, `F -> ( E ) | id`.
    pub fn arithmetic() -> Self {
        Self::parse(ARITHMETIC_GRAMMAR)
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::{Grammar, EPSILON};
    use pretty_assertions::assert_eq;

    #[test]
    fn simple_parse() {
        let g = Grammar::parse("S' -> S\nS -> a S b");

        let s = g.get_symbol_index("S").unwrap();
        let a = g.get_symbol_index("a").unwrap();
        let b = g.get_symbol_index("b").unwrap();

        assert_eq!(g.productions.len(), 2);
        assert_eq!(g.productions[1].head, s);
        assert_eq!(g.productions[1].body, vec![a, s, b]);
        assert!(g.is_terminal(a));
        assert!(g.is_non_terminal(s));
    }

    #[test]
    fn parse_with_space_and_blank_lines() {
        let g = Grammar::parse("\n   S' ->  S  \n\n  S ->   a  \n  ");
        assert_eq!(g.production_to_string(0), "S' → S");
        assert_eq!(g.production_to_string(1), "S → a");
    }

    #[test]
    fn malformed_lines_are_dropped() {
        let g = Grammar::parse("S' -> S\nS a b\nS -> a -> b\nS -> a");
        assert_eq!(g.productions.len(), 2);
        assert_eq!(g.production_to_string(1), "S → a");
    }

    #[test]
    fn epsilon_parse() {
        let g = Grammar::parse("S' -> S\nS -> ε\nS -> a ε S");
        assert!(g.productions[1].is_epsilon());
        assert_eq!(g.production_to_string(2), "S → a S");
        assert_eq!(g.get_symbol_index(EPSILON), None);
    }

    #[test]
    fn empty_parse() {
        let g = Grammar::parse("  \n  ");
        assert!(g.productions.is_empty());
        assert_eq!(g.symbols.len(), 1);
    }

    #[test]
    fn arithmetic_display() {
        let g = Grammar::arithmetic();
        let display: Vec<String> = (0..g.productions.len())
            .map(|i| g.production_to_string(i))
            .collect();
        assert_eq!(
            display,
            vec![
                "E' → E",
                "E → E + T",
                "E → T",
                "T → T * F",
                "T → F",
                "F → ( E )",
                "F → id",
            ]
        );
    }
}
