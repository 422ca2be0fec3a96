/*
    This module parses line-oriented BNF grammars
*/

mod lexer;
mod verifier;

use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error as ThisError;

use crate::error_handling::*;
use crate::grammar::*;
use lexer::*;
pub use verifier::undefined_nonterminals;

// Why a single line could not be read as a rule
#[derive(ThisError, Debug, PartialEq, Clone, Copy)]
pub enum Malformed {
    #[error("a rule needs a left-hand side, `->` and a right-hand side")]
    LoneToken,
    #[error("expected `->` after the nonterminal")]
    MissingArrow,
    #[error("a rule must start with a nonterminal or `|`")]
    MissingNonterminal,
    #[error("`|` alternative with no rule to continue")]
    OrphanAlternative,
    #[error("unexpected `->` in a right-hand side")]
    UnexpectedArrow,
}

#[derive(ThisError, Debug)]
pub enum CompileErrorType {
    // A line does not have either of the two legal rule shapes
    #[error("malformed rule `{text}`: {problem}")]
    MalformedRule { text: String, problem: Malformed },
    // The text held nothing but blank lines
    #[error("grammar contains no rules")]
    EmptyGrammar,
    // There was an issue with reading a file
    #[error("file error: {0}")]
    FileError(std::io::Error),
}

impl ErrorType for CompileErrorType {}

impl PartialEq for CompileErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CompileErrorType::FileError(a), CompileErrorType::FileError(b)) => a.kind() == b.kind(),
            (
                CompileErrorType::MalformedRule { text: a, problem: p },
                CompileErrorType::MalformedRule { text: b, problem: q }
            ) => a == b && p == q,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other)
        }
    }
}

pub type CompileError = Error<CompileErrorType>;

impl CompileError {
    /// The 1-based line the error was found on, or 0 for whole-input errors.
    pub fn line_number(&self) -> usize {
        self.location.line
    }
}

pub type Result<T> = std::result::Result<T, Malformed>;
pub type ParseResult<T> = std::result::Result<T, CompileError>;

// The symbols in a single alternative
type Alternative = Vec<Symbol>;

// What one line contributes: the left-hand side it applies to and its
// alternatives
#[derive(PartialEq, Debug)]
struct Line {
    symbol: String,
    rewrite: Vec<Alternative>
}

fn parse_alternative(tokens: &[Token]) -> Result<Alternative> {
    tokens.iter().map(|t| match t {
        Token::Arrow => Err(Malformed::UnexpectedArrow),
        Token::Or => unreachable!("alternatives are split on `|` before parsing"),
        Token::Nonterminal(s) => Ok(Symbol::Nonterminal(s.clone())),
        Token::Terminal(s) => Ok(Symbol::Terminal(s.clone()))
    }).collect()
}

fn parse_rewrite(tokens: &[Token]) -> Result<Vec<Alternative>> {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

// Parses one non-blank line. `current` is the left-hand side that a leading
// `|` continues, if any has been declared yet.
fn parse_line(tokens: &[Token], current: Option<&str>) -> Result<Line> {
    let (symbol, rest) = match tokens {
        [] | [_] => return Err(Malformed::LoneToken),
        [Token::Or, rest @ ..] => {
            let symbol = current.ok_or(Malformed::OrphanAlternative)?;
            (symbol.to_string(), rest)
        }
        [Token::Nonterminal(s), Token::Arrow, rest @ ..] => (s.clone(), rest),
        [Token::Nonterminal(_), ..] => return Err(Malformed::MissingArrow),
        _ => return Err(Malformed::MissingNonterminal)
    };

    Ok(Line {
        symbol,
        rewrite: parse_rewrite(rest)?
    })
}

fn parse_lines<'a>(lines: impl Iterator<Item = &'a str>, file: Option<&Path>) -> ParseResult<Grammar> {
    let location = |line: usize| Location {
        file: file.map(Path::to_path_buf),
        line
    };

    let mut current: Option<String> = None;
    let mut rules = Vec::new();

    for (num, text) in lines.enumerate() {
        let tokens = lex_line(text);
        if tokens.is_empty() {
            continue;
        }

        let line = parse_line(&tokens, current.as_deref()).map_err(|problem| CompileError {
            location: location(num + 1),
            error: CompileErrorType::MalformedRule {
                text: text.to_string(),
                problem
            }
        })?;

        debug!("line {}: {} alternative(s) for <{}>", num + 1, line.rewrite.len(), line.symbol);
        rules.extend(line.rewrite.into_iter().map(|rhs| Rule::new(line.symbol.clone(), rhs)));
        current = Some(line.symbol);
    }

    Grammar::from_rules(rules).ok_or_else(|| CompileError {
        location: location(0),
        error: CompileErrorType::EmptyGrammar
    })
}

/// Parses grammar text. The start symbol is the left-hand side of the first
/// rule; parsing stops at the first malformed line.
pub fn parse_grammar(text: &str) -> ParseResult<Grammar> {
    parse_lines(text.lines(), None)
}

/// Reads and parses a grammar file, locating errors by file and line.
pub fn parse_file(path: &Path) -> ParseResult<Grammar> {
    let text = std::fs::read_to_string(path).map_err(|e| CompileError {
        location: Location::in_file(PathBuf::from(path), 0),
        error: CompileErrorType::FileError(e)
    })?;

    parse_lines(text.lines(), Some(path))
}
