mod cli;

use std::io::BufRead;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use rand::thread_rng;

use cli::Cli;
use leftmost::derivation::{derive_leftmost_with, tokenize};
use leftmost::error_handling::Location;
use leftmost::generator::{sample, GenerateError};
use leftmost::grammar::format_form;
use leftmost::parser::{parse_file, undefined_nonterminals};

// Nesting allowed when sampling sentences for --sample
const SAMPLE_DEPTH: usize = 32;

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    if !cli.quiet {
        println!("Reading grammar from {}", cli.file.display());
    }

    let mut grammar = parse_file(&cli.file)?;
    if let Some(start) = &cli.start {
        grammar = grammar.with_start(start.as_str());
    }
    info!("{} rule(s), start symbol <{}>", grammar.rules().len(), grammar.start_symbol());

    for name in undefined_nonterminals(&grammar) {
        warn!("nonterminal <{}> is used but has no rules", name);
    }

    if !cli.quiet {
        print!("{}", grammar);
    }

    if let Some(amount) = cli.sample {
        let mut rng = thread_rng();
        for _ in 0..amount {
            let sentence = sample(&grammar, &mut rng, SAMPLE_DEPTH).map_err(|error| GenerateError {
                location: Location::in_file(cli.file.clone(), 0),
                error
            })?;
            println!("{}", sentence.join(" "));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let sentence = match &cli.sentence {
        Some(sentence) => sentence.clone(),
        None => read_sentence()?,
    };
    let tokens = tokenize(&sentence);

    println!("Sentence:\n{}\nDerivation:", tokens.join(" "));

    match derive_leftmost_with(&grammar, &tokens, cli.derive_config()) {
        Ok(derivation) => {
            let width = derivation.len().to_string().len();
            for (i, step) in derivation.steps.iter().enumerate() {
                println!("{:>w$}: {}  =>  {}", i + 1, step, format_form(&step.form), w = width);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            println!("No derivation: {}", failure.reason);
            if let Some(closest) = &failure.closest {
                println!("Closest form: {}", format_form(closest));
            }
            Ok(ExitCode::from(1))
        }
    }
}

fn read_sentence() -> Result<String> {
    eprintln!("Please input the sentence you wish to derive:");

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read the sentence from stdin")?;
    Ok(line)
}
