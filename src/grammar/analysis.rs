use log::debug;

use super::{
    first_follow::FirstFollow,
    lr0_collection::CanonicalCollection,
    shift_reduce::{ParseConfig, ParseTrace, ShiftReduceParser},
    slr_table::SlrTable,
    Grammar, GrammarError,
};

/// Everything derived from one grammar. Rebuilt from scratch, never patched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub grammar: Grammar,
    pub first_follow: FirstFollow,
    pub collection: CanonicalCollection,
    pub table: SlrTable,
}

/// Runs the whole pipeline: FIRST/FOLLOW, canonical collection, SLR table.
pub fn analyze(grammar: &Grammar) -> Result<Analysis, GrammarError> {
    grammar.check_augmented()?;

    let first_follow = grammar.calculate_first_follow();
    let collection = grammar.to_canonical_collection();
    let table = grammar.to_slr_table(&collection, &first_follow);
    debug!(
        "analyzed {} productions into {} states",
        grammar.productions.len(),
        collection.len()
    );

    Ok(Analysis {
        grammar: grammar.clone(),
        first_follow,
        collection,
        table,
    })
}

impl Analysis {
    pub fn parse(&self, input: &str) -> ParseTrace {
        self.parse_with(input, ParseConfig::default())
    }

    pub fn parse_with(&self, input: &str, config: ParseConfig) -> ParseTrace {
        ShiftReduceParser::new(self).with_config(config).parse(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_empty_grammar() {
        assert_eq!(analyze(&Grammar::parse("")), Err(GrammarError::EmptyGrammar));
    }

    #[test]
    fn rejects_unaugmented_grammar() {
        let err = analyze(&Grammar::parse("E -> E + T\nE -> T\nT -> id")).unwrap_err();
        assert!(matches!(err, GrammarError::MissingAugmentedProduction { .. }));
    }

    #[test]
    fn analysis_is_idempotent() {
        let g = Grammar::arithmetic();
        let a = analyze(&g).unwrap();
        let b = analyze(&g).unwrap();
        assert_eq!(a, b);
    }
}
