use std::path::PathBuf;

use clap::{ArgAction, Parser};

use leftmost::derivation::{DeriveConfig, DEFAULT_MAX_STEPS};

#[derive(Parser)]
#[command(version, about = "Finds leftmost derivations of sentences in a BNF grammar")]
pub struct Cli {
    /// File containing the grammar
    pub file: PathBuf,

    /// Sentence to derive (default: read one line from stdin)
    #[arg(short = 'e', long, value_name = "TEXT")]
    pub sentence: Option<String>,

    /// Start symbol, without brackets (default: first in the file)
    #[arg(short, long, value_name = "SYMBOL")]
    pub start: Option<String>,

    /// Longest derivation to try (default: scaled to grammar and sentence)
    #[arg(long, value_name = "STEPS")]
    pub max_depth: Option<usize>,

    /// Rule applications allowed before giving up
    #[arg(long, value_name = "COUNT", default_value_t = DEFAULT_MAX_STEPS)]
    pub max_steps: usize,

    /// Print this many random sentences of the grammar instead of deriving
    #[arg(short = 'n', long, value_name = "AMOUNT")]
    pub sample: Option<u32>,

    /// Do not print the grammar before deriving
    #[arg(short, long)]
    pub quiet: bool,

    /// More logging (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn derive_config(&self) -> DeriveConfig {
        DeriveConfig {
            max_depth: self.max_depth,
            max_steps: self.max_steps
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["leftmost", "grammar.txt"]);

        assert_eq!(cli.file, PathBuf::from("grammar.txt"));
        assert_eq!(cli.sentence, None);
        assert_eq!(cli.derive_config(), DeriveConfig::default());
        assert_eq!(cli.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn flags() {
        let cli = Cli::parse_from([
            "leftmost", "grammar.txt", "-e", "a c b", "--max-depth", "9", "--max-steps", "50", "-vv"
        ]);

        assert_eq!(cli.sentence.as_deref(), Some("a c b"));
        assert_eq!(cli.derive_config(), DeriveConfig { max_depth: Some(9), max_steps: 50 });
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);
    }
}
