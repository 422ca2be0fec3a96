use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use super::{Derivation, DerivationStep, DeriveConfig, NoDerivation, Reason};
use crate::grammar::{format_form, Grammar, Symbol};

/// Leftmost-derivation search over one grammar.
///
/// The search is depth first with an explicit stack: each frame remembers
/// which nonterminal it is rewriting and which of that nonterminal's rules to
/// try next. Rules are tried in declaration order and the first derivation
/// found is returned.
pub struct DerivationEngine<'g> {
    grammar: &'g Grammar,
    config: DeriveConfig,
    yields: HashMap<&'g str, usize>,
}

impl<'g> DerivationEngine<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self::with_config(grammar, DeriveConfig::default())
    }

    pub fn with_config(grammar: &'g Grammar, config: DeriveConfig) -> Self {
        DerivationEngine {
            grammar,
            config,
            yields: grammar.min_yields()
        }
    }

    pub fn derive(&self, target: &[&str]) -> Result<Derivation, NoDerivation> {
        let terminals: HashSet<&str> = self.grammar.terminals().into_iter().collect();
        if let Some(token) = target.iter().find(|token| !terminals.contains(*token)) {
            return Err(NoDerivation {
                reason: Reason::UnknownToken(token.to_string()),
                closest: None
            });
        }

        let start = self.grammar.start_symbol();
        if !self.grammar.is_defined(start) {
            return Err(NoDerivation {
                reason: Reason::UndefinedNonterminal(start.to_string()),
                closest: None
            });
        }

        let depth_limit = self.config.depth_limit(self.grammar, target.len());
        debug!(
            "deriving {} token(s) from <{}> (depth limit {}, step limit {})",
            target.len(), start, depth_limit, self.config.max_steps
        );

        let search = Search::new(self.grammar, target, &self.yields, depth_limit, self.config.max_steps);
        let result = search.run();

        match &result {
            Ok(derivation) => debug!("found a derivation of {} step(s)", derivation.len()),
            Err(failure) => debug!("{}", failure),
        }
        result
    }
}

struct Frame<'g> {
    // The nonterminal being rewritten and where it sits in the form
    nonterminal: Symbol,
    position: usize,
    candidates: &'g [usize],
    next: usize,
    // Length of the right-hand side currently spliced in at `position`
    applied: Option<usize>,
    // Something below this frame was abandoned because of the depth limit or
    // a cycle, so its failure says nothing about the form on its own
    cut: bool,
}

enum Verdict {
    Complete,
    Dead,
    Cut,
    Expand(usize),
}

struct Search<'g, 't> {
    grammar: &'g Grammar,
    target: &'t [&'t str],
    yields: &'t HashMap<&'g str, usize>,
    depth_limit: usize,
    max_steps: usize,

    form: Vec<Symbol>,
    frames: Vec<Frame<'g>>,
    // Forms on the current path, and forms known to derive nothing
    on_path: HashSet<Vec<Symbol>>,
    dead: HashSet<Vec<Symbol>>,

    applications: usize,
    hit_depth_limit: bool,
    closest: Vec<Symbol>,
    closest_matched: usize,
}

fn is_token(symbol: &Symbol, token: &str) -> bool {
    matches!(symbol, Symbol::Terminal(text) if text == token)
}

// How many leading symbols of `form` are the leading tokens of `target`
fn matched_prefix(form: &[Symbol], target: &[&str]) -> usize {
    form.iter()
        .zip(target)
        .take_while(|(symbol, token)| is_token(symbol, token))
        .count()
}

// Whether every terminal of `form` can land on a token of `target`, in order,
// leaving room before each for the least the nonterminals ahead of it derive.
// Placing each terminal as early as possible is never worse than the real
// placement, so a form that fails here derives nothing.
fn fits(form: &[Symbol], target: &[&str], yields: &HashMap<&str, usize>) -> bool {
    let mut cursor = 0;

    for symbol in form {
        let found = match symbol {
            Symbol::Terminal(_) => target.get(cursor..)
                .and_then(|rest| rest.iter().position(|token| is_token(symbol, token)))
                .map(|offset| offset + 1),
            Symbol::Nonterminal(name) => yields.get(name.as_str()).copied(),
        };

        match found {
            Some(advance) => cursor += advance,
            None => return false,
        }
    }

    cursor <= target.len()
}

impl<'g, 't> Search<'g, 't> {
    fn new(
        grammar: &'g Grammar,
        target: &'t [&'t str],
        yields: &'t HashMap<&'g str, usize>,
        depth_limit: usize,
        max_steps: usize
    ) -> Self {
        let form = vec![grammar.start()];

        Search {
            grammar,
            target,
            yields,
            depth_limit,
            max_steps,
            closest: form.clone(),
            form,
            frames: Vec::new(),
            on_path: HashSet::new(),
            dead: HashSet::new(),
            applications: 0,
            hit_depth_limit: false,
            closest_matched: 0,
        }
    }

    fn run(mut self) -> Result<Derivation, NoDerivation> {
        loop {
            match self.inspect() {
                Verdict::Complete => return Ok(self.derivation()),
                Verdict::Dead => {}
                Verdict::Cut => {
                    if let Some(top) = self.frames.last_mut() {
                        top.cut = true;
                    }
                }
                Verdict::Expand(position) => self.push(position),
            }

            self.advance()?;
        }
    }

    // Decides what to do with the current form
    fn inspect(&mut self) -> Verdict {
        let matched = matched_prefix(&self.form, self.target);
        if matched > self.closest_matched {
            self.closest_matched = matched;
            self.closest = self.form.clone();
        }

        let Some(first) = self.form.iter().position(Symbol::is_nonterminal) else {
            return if self.form.len() == self.target.len() && matched == self.target.len() {
                Verdict::Complete
            } else {
                Verdict::Dead
            };
        };

        // Terminals are never rewritten, so those outside the outermost
        // nonterminals are already in their final positions
        if matched < first {
            return Verdict::Dead;
        }

        let last = self.form.iter().rposition(Symbol::is_nonterminal).unwrap_or(first);
        let suffix_matches = self.form[last + 1..].iter().rev()
            .zip(self.target.iter().rev())
            .all(|(symbol, token)| is_token(symbol, token));
        if !suffix_matches || !fits(&self.form, self.target, self.yields) {
            return Verdict::Dead;
        }

        if self.dead.contains(&self.form) {
            return Verdict::Dead;
        }

        if self.on_path.contains(&self.form) {
            trace!("cycle back to {}", format_form(&self.form));
            return Verdict::Cut;
        }

        if self.frames.len() >= self.depth_limit {
            self.hit_depth_limit = true;
            return Verdict::Cut;
        }

        Verdict::Expand(first)
    }

    // Opens a frame for the nonterminal at `position`
    fn push(&mut self, position: usize) {
        let grammar = self.grammar;
        let nonterminal = self.form[position].clone();
        let candidates: &'g [usize] = match &nonterminal {
            Symbol::Nonterminal(name) => grammar.rule_indices(name),
            Symbol::Terminal(_) => &[],
        };

        if candidates.is_empty() {
            trace!("no rules for {}", nonterminal);
            return;
        }

        self.on_path.insert(self.form.clone());
        self.frames.push(Frame {
            nonterminal,
            position,
            candidates,
            next: 0,
            applied: None,
            cut: false,
        });
    }

    // Undoes the latest rewrite and applies the next untried rule, popping
    // frames whose rules have all been tried
    fn advance(&mut self) -> Result<(), NoDerivation> {
        while let Some(frame) = self.frames.last_mut() {
            if let Some(len) = frame.applied.take() {
                self.form.splice(frame.position..frame.position + len, [frame.nonterminal.clone()]);
            }

            if let Some(&index) = frame.candidates.get(frame.next) {
                let rule = &self.grammar.rules()[index];
                frame.next += 1;
                frame.applied = Some(rule.rhs.len());
                self.form.splice(frame.position..=frame.position, rule.rhs.iter().cloned());

                self.applications += 1;
                trace!("apply {} => {}", rule, format_form(&self.form));
                if self.applications > self.max_steps {
                    return Err(self.failure(Reason::StepLimit(self.max_steps)));
                }
                return Ok(());
            }

            self.backtrack();
        }

        let reason = if self.hit_depth_limit {
            Reason::DepthLimit(self.depth_limit)
        } else {
            Reason::NotInLanguage
        };
        Err(self.failure(reason))
    }

    // Pops an exhausted frame. The form is back to what it was when the frame
    // was opened.
    fn backtrack(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        trace!("backtrack over {}", format_form(&self.form));

        let seen = self.on_path.take(&self.form);
        if frame.cut {
            if let Some(parent) = self.frames.last_mut() {
                parent.cut = true;
            }
        } else if let Some(form) = seen {
            self.dead.insert(form);
        }
    }

    // Replays the rules chosen on the stack into derivation steps
    fn derivation(&self) -> Derivation {
        let start = self.grammar.start();
        let mut form = vec![start.clone()];

        let steps = self.frames.iter()
            .map(|frame| {
                let rule = self.grammar.rules()[frame.candidates[frame.next - 1]].clone();
                form.splice(frame.position..=frame.position, rule.rhs.iter().cloned());
                DerivationStep {
                    rule,
                    position: frame.position,
                    form: form.clone()
                }
            })
            .collect();

        Derivation { start, steps }
    }

    fn failure(&self, reason: Reason) -> NoDerivation {
        NoDerivation {
            reason,
            closest: Some(self.closest.clone())
        }
    }
}
