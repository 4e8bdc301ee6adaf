pub mod clauses;
pub mod compiler;

pub use clauses::ClauseGroup;
pub use compiler::{compile, Clause, PromptText};
