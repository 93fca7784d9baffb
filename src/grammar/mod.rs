pub mod analysis;
pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod lr0_collection;
pub mod parse;
pub mod pretty_print;
pub mod session;
pub mod shift_reduce;
pub mod slr_table;

pub use analysis::{analyze, Analysis};
pub use error::GrammarError;
pub use grammar::Grammar;
pub use session::SlrSession;
pub use shift_reduce::{ParseConfig, ParseStep, ParseTrace, StepAction};
pub use slr_table::{Action, SlrTable};

pub const EPSILON: &str = "ε";
pub const END_MARK: &str = "$";

pub const ARITHMETIC_GRAMMAR: &str = "E' -> E
E -> E + T
E -> T
T -> T * F
T -> F
F -> ( E )
F -> id";
