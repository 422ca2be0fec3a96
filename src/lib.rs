pub mod derivation;
pub mod error_handling;
pub mod generator;
pub mod grammar;
pub mod parser;

pub use derivation::{derive_leftmost, format_step, tokenize, Derivation, DerivationEngine, DerivationStep, NoDerivation};
pub use grammar::{format_rule, Grammar, Rule, Symbol};
pub use parser::{parse_file, parse_grammar, CompileError};
