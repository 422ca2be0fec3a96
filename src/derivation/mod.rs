/*
    This module finds leftmost derivations of sentences
*/

mod search;

use std::fmt::Display;

use thiserror::Error as ThisError;

use crate::grammar::*;
pub use search::DerivationEngine;

pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

// The default depth ceiling is this many steps per grammar symbol per target
// token
const DEPTH_PER_SYMBOL_AND_TOKEN: usize = 4;
const MIN_DEPTH_LIMIT: usize = 64;

/// Bounds on a single search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeriveConfig {
    /// Longest derivation tried. `None` scales the ceiling with the size of
    /// the grammar and the target.
    pub max_depth: Option<usize>,
    /// Total rule applications allowed before the search gives up.
    pub max_steps: usize,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        DeriveConfig {
            max_depth: None,
            max_steps: DEFAULT_MAX_STEPS
        }
    }
}

impl DeriveConfig {
    pub fn depth_limit(&self, grammar: &Grammar, target_len: usize) -> usize {
        self.max_depth.unwrap_or_else(|| {
            (DEPTH_PER_SYMBOL_AND_TOKEN * grammar.size() * (target_len + 1)).max(MIN_DEPTH_LIMIT)
        })
    }
}

/// One rule application: `rule` rewrote the nonterminal at `position`,
/// leaving `form`.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivationStep {
    pub rule: Rule,
    pub position: usize,
    pub form: Vec<Symbol>,
}

impl Display for DerivationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rule)
    }
}

// Formats the rule applied by a step as `<lhs> -> sym1 sym2 ...`
pub fn format_step(step: &DerivationStep) -> String {
    step.to_string()
}

#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum ReplayError {
    #[error("step {step}: rule `{rule}` is not in the grammar")]
    UnknownRule { step: usize, rule: String },
    #[error("step {step}: position {position} is past the end of the form")]
    OutOfRange { step: usize, position: usize },
    #[error("step {step}: `{rule}` does not rewrite the leftmost nonterminal")]
    NotLeftmost { step: usize, rule: String },
    #[error("step {step}: recorded form does not match the rewrite")]
    FormMismatch { step: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    pub start: Symbol,
    pub steps: Vec<DerivationStep>,
}

impl Derivation {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.steps.iter().map(|step| &step.rule)
    }

    /// The form the derivation ends at.
    pub fn final_form(&self) -> &[Symbol] {
        self.steps.last().map_or(std::slice::from_ref(&self.start), |step| step.form.as_slice())
    }

    /// Re-applies every step from the start symbol, checking that each uses a
    /// rule of `grammar` on the leftmost nonterminal and leaves the recorded
    /// form. Returns the final form.
    pub fn replay(&self, grammar: &Grammar) -> Result<Vec<Symbol>, ReplayError> {
        let mut form = vec![self.start.clone()];

        for (number, step) in self.steps.iter().enumerate().map(|(i, s)| (i + 1, s)) {
            if !grammar.rules().contains(&step.rule) {
                return Err(ReplayError::UnknownRule { step: number, rule: step.rule.to_string() });
            }

            let leftmost = form.iter().position(Symbol::is_nonterminal);
            match form.get(step.position) {
                None => return Err(ReplayError::OutOfRange { step: number, position: step.position }),
                Some(Symbol::Nonterminal(name)) if *name == step.rule.lhs && leftmost == Some(step.position) => {}
                Some(_) => return Err(ReplayError::NotLeftmost { step: number, rule: step.rule.to_string() }),
            }

            form.splice(step.position..=step.position, step.rule.rhs.iter().cloned());
            if form != step.form {
                return Err(ReplayError::FormMismatch { step: number });
            }
        }

        Ok(form)
    }
}

#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum Reason {
    #[error("`{0}` is not a terminal of the grammar")]
    UnknownToken(String),
    #[error("start symbol <{0}> has no rules")]
    UndefinedNonterminal(String),
    #[error("the sentence is not in the language of the grammar")]
    NotInLanguage,
    #[error("search exhausted at depth limit {0}")]
    DepthLimit(usize),
    #[error("search exhausted after {0} rule applications")]
    StepLimit(usize),
}

/// The sentence has no leftmost derivation (or none was found within the
/// configured limits). `closest` is the form that matched the longest prefix
/// of the target, when a search ran at all.
#[derive(ThisError, Debug, Clone, PartialEq)]
#[error("no derivation: {reason}")]
pub struct NoDerivation {
    pub reason: Reason,
    pub closest: Option<Vec<Symbol>>,
}

/// Splits a sentence into its terminal tokens.
pub fn tokenize(sentence: &str) -> Vec<&str> {
    sentence.split_whitespace().collect()
}

/// Finds a leftmost derivation of `target` with the default limits.
pub fn derive_leftmost<S: AsRef<str>>(grammar: &Grammar, target: &[S]) -> Result<Derivation, NoDerivation> {
    derive_leftmost_with(grammar, target, DeriveConfig::default())
}

pub fn derive_leftmost_with<S: AsRef<str>>(
    grammar: &Grammar,
    target: &[S],
    config: DeriveConfig
) -> Result<Derivation, NoDerivation> {
    let target: Vec<&str> = target.iter().map(AsRef::as_ref).collect();
    DerivationEngine::with_config(grammar, config).derive(&target)
}
