use log::debug;

use super::{
    analysis::{analyze, Analysis},
    shift_reduce::{ParseConfig, ParseTrace},
    Grammar, GrammarError,
};

/// Holds the current grammar and the latest analysis of it.
///
/// Changing the grammar drops the analysis; `generate` replaces it whole.
#[derive(Debug, Clone)]
pub struct SlrSession {
    grammar: Grammar,
    analysis: Option<Analysis>,
    config: ParseConfig,
}

impl Default for SlrSession {
    fn default() -> Self {
        Self::new(Grammar::arithmetic())
    }
}

impl SlrSession {
    pub fn new(grammar: Grammar) -> Self {
        Self {
            grammar,
            analysis: None,
            config: ParseConfig::default(),
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn set_grammar(&mut self, grammar: Grammar) {
        self.grammar = grammar;
        self.analysis = None;
    }

    pub fn set_grammar_text(&mut self, text: &str) {
        self.set_grammar(Grammar::parse(text));
    }

    pub fn set_config(&mut self, config: ParseConfig) {
        self.config = config;
    }

    pub fn generate(&mut self) -> Result<&Analysis, GrammarError> {
        self.analysis = None;
        let analysis = analyze(&self.grammar)?;
        debug!("session tables regenerated");
        Ok(&*self.analysis.insert(analysis))
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    pub fn parse(&self, input: &str) -> Result<ParseTrace, GrammarError> {
        self.analysis
            .as_ref()
            .map(|analysis| analysis.parse_with(input, self.config))
            .ok_or(GrammarError::NotGenerated)
    }
}
