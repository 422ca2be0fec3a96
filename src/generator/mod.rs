/*
    This module generates random sentences of a grammar
*/

use rand::prelude::*;
use thiserror::Error as ThisError;

use crate::error_handling::*;
use crate::grammar::*;

// Fresh expansions tried by `sample` before it gives up
pub const SAMPLE_ATTEMPTS: usize = 100;

#[derive(ThisError, Debug, PartialEq)]
pub enum GenerateErrorType {
    // An undefined nonterminal was used
    #[error("No definition for nonterminal `<{0}>`")]
    UndefinedNonterminal(String),
    // Every attempt nested deeper than allowed
    #[error("Expansion nested deeper than {0} rules")]
    TooDeep(usize),
}

impl ErrorType for GenerateErrorType {}

pub type GenerateError = Error<GenerateErrorType>;
pub type GenResult = Result<Vec<String>, GenerateErrorType>;

/// Expands the start symbol by picking rules at random, returning the tokens
/// of the sentence produced. Expansions nesting deeper than `max_depth` are
/// abandoned and retried.
pub fn sample<R: Rng + ?Sized>(grammar: &Grammar, rng: &mut R, max_depth: usize) -> GenResult {
    sample_from(grammar, grammar.start_symbol(), rng, max_depth)
}

// Generates a sentence in the given grammar starting with the given symbol
pub fn sample_from<R: Rng + ?Sized>(grammar: &Grammar, start: &str, rng: &mut R, max_depth: usize) -> GenResult {
    for _ in 0..SAMPLE_ATTEMPTS {
        let mut tokens = Vec::new();
        match generate_nonterminal(start, grammar, rng, max_depth, &mut tokens) {
            Ok(()) => return Ok(tokens),
            Err(GenerateErrorType::TooDeep(_)) => continue,
            Err(error) => return Err(error),
        }
    }

    Err(GenerateErrorType::TooDeep(max_depth))
}

fn generate_nonterminal<R: Rng + ?Sized>(
    nonterminal: &str,
    grammar: &Grammar,
    rng: &mut R,
    depth: usize,
    tokens: &mut Vec<String>
) -> Result<(), GenerateErrorType> {
    let rule = grammar.rules_for(nonterminal)
        .choose(rng)
        .ok_or_else(|| GenerateErrorType::UndefinedNonterminal(nonterminal.to_string()))?;

    if depth == 0 {
        return Err(GenerateErrorType::TooDeep(depth));
    }

    for symbol in &rule.rhs {
        generate_symbol(symbol, grammar, rng, depth - 1, tokens)?;
    }

    Ok(())
}

fn generate_symbol<R: Rng + ?Sized>(
    symbol: &Symbol,
    grammar: &Grammar,
    rng: &mut R,
    depth: usize,
    tokens: &mut Vec<String>
) -> Result<(), GenerateErrorType> {
    match symbol {
        Symbol::Nonterminal(name) => generate_nonterminal(name, grammar, rng, depth, tokens),
        Symbol::Terminal(text) => {
            tokens.push(text.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;

    use super::*;
    use crate::derivation::derive_leftmost;
    use crate::parser::{parse_file, parse_grammar};

    #[test]
    fn sample_single_choice() {
        let grammar = parse_grammar("<S> -> a <T> c\n<T> -> b").unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(sample(&grammar, &mut rng, 10).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn sample_epsilon() {
        let grammar = parse_grammar("<S> ->").unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        assert!(sample(&grammar, &mut rng, 10).unwrap().is_empty());
    }

    #[test]
    fn sample_undefined_nonterminal() {
        let grammar = parse_grammar("<S> -> a <T>").unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(
            sample(&grammar, &mut rng, 10),
            Err(GenerateErrorType::UndefinedNonterminal("T".to_string()))
        );
        assert_eq!(
            sample_from(&grammar, "Q", &mut rng, 10),
            Err(GenerateErrorType::UndefinedNonterminal("Q".to_string()))
        );
    }

    #[test]
    fn sample_never_terminates() {
        let grammar = parse_grammar("<S> -> a <S>").unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(sample(&grammar, &mut rng, 20), Err(GenerateErrorType::TooDeep(20)));
    }

    #[test]
    fn samples_are_derivable() {
        let grammars = vec![
            ("example_data/balanced.txt", 6),
            ("example_data/example_3.1.txt", 6),
            ("example_data/arithmetic.txt", 8)
        ];
        let mut rng = StdRng::seed_from_u64(3415);

        for (path, depth) in grammars {
            let grammar = parse_file(std::path::Path::new(path)).unwrap();

            for _ in 0..20 {
                let sentence = sample(&grammar, &mut rng, depth).unwrap();
                let derivation = derive_leftmost(&grammar, &sentence)
                    .unwrap_or_else(|e| panic!("{}: `{}`: {}", path, sentence.join(" "), e));
                let replayed = derivation.replay(&grammar).unwrap();

                assert_eq!(format_form(&replayed), sentence.join(" "));
            }
        }
    }
}
