use thiserror::Error;

/// Grammar-author mistakes detected when tables are generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("grammar has no productions")]
    EmptyGrammar,

    /// Production 0 must look like `S' -> S`, where `S` heads production 1.
    #[error("production 0 must be an augmented start production like `S' -> S`, found `{found}`")]
    MissingAugmentedProduction { found: String },

    #[error("parsing tables have not been generated")]
    NotGenerated,
}
