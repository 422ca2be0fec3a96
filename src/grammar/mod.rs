/*
    This module is for storing and looking up grammars
*/

use std::collections::HashMap;
use std::fmt::Display;

use itertools::Itertools;

// The base unit in a grammar rule. Nonterminals are written `<name>` in
// grammar text but only the name is kept here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(String),
    Nonterminal(String),
}

impl Symbol {
    pub fn terminal(text: impl Into<String>) -> Self {
        Symbol::Terminal(text.into())
    }

    pub fn nonterminal(name: impl Into<String>) -> Self {
        Symbol::Nonterminal(name.into())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::Nonterminal(_))
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Terminal(text) => write!(f, "{}", text),
            Symbol::Nonterminal(name) => write!(f, "<{}>", name),
        }
    }
}

// A single production. An empty `rhs` is an epsilon production.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub lhs: String,
    pub rhs: Vec<Symbol>,
}

impl Rule {
    pub fn new(lhs: impl Into<String>, rhs: Vec<Symbol>) -> Self {
        Rule { lhs: lhs.into(), rhs }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.rhs.is_empty() {
            write!(f, "<{}> ->", self.lhs)
        } else {
            write!(f, "<{}> -> {}", self.lhs, self.rhs.iter().join(" "))
        }
    }
}

// Formats a rule as `<lhs> -> sym1 sym2 ...`
pub fn format_rule(rule: &Rule) -> String {
    rule.to_string()
}

/// Formats a sentential form as its space-joined symbols.
pub fn format_form(form: &[Symbol]) -> String {
    form.iter().join(" ")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
    start_symbol: String,
    rules: Vec<Rule>,
    // Indices into `rules`, per left-hand side, in declaration order
    by_lhs: HashMap<String, Vec<usize>>,
}

impl Grammar {
    /// Builds a grammar whose start symbol is the left-hand side of the first
    /// rule. Returns `None` when there are no rules.
    pub fn from_rules(rules: Vec<Rule>) -> Option<Grammar> {
        let start_symbol = rules.first()?.lhs.clone();

        let mut by_lhs: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, rule) in rules.iter().enumerate() {
            by_lhs.entry(rule.lhs.clone()).or_default().push(index);
        }

        Some(Grammar {
            start_symbol,
            rules,
            by_lhs
        })
    }

    /// Replaces the start symbol. The new start need not have any rules; an
    /// undefined start simply derives nothing.
    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start_symbol = start.into();
        self
    }

    pub fn start_symbol(&self) -> &str {
        &self.start_symbol
    }

    pub fn start(&self) -> Symbol {
        Symbol::Nonterminal(self.start_symbol.clone())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    // Rules plus all right-hand-side symbols
    pub fn size(&self) -> usize {
        self.rules.len() + self.rules.iter().map(|rule| rule.rhs.len()).sum::<usize>()
    }

    /// Indices of the rules for `nonterminal`, in declaration order. Empty for
    /// an undefined nonterminal.
    pub fn rule_indices(&self, nonterminal: &str) -> &[usize] {
        self.by_lhs.get(nonterminal).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rules_for<'a>(&'a self, nonterminal: &str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rule_indices(nonterminal).iter().map(move |&i| &self.rules[i])
    }

    pub fn is_defined(&self, nonterminal: &str) -> bool {
        self.by_lhs.contains_key(nonterminal)
    }

    /// Every distinct terminal text, in order of first appearance.
    pub fn terminals(&self) -> Vec<&str> {
        self.rules.iter()
            .flat_map(|rule| rule.rhs.iter())
            .filter_map(|symbol| match symbol {
                Symbol::Terminal(text) => Some(text.as_str()),
                _ => None
            })
            .unique()
            .collect()
    }

    /// The fewest terminals each nonterminal can derive. A nonterminal that
    /// derives no terminal string at all (undefined, or unable to get rid of
    /// itself) is missing from the map.
    pub fn min_yields(&self) -> HashMap<&str, usize> {
        let mut yields: HashMap<&str, usize> = HashMap::new();

        // Keep relaxing every rule until no yield gets any smaller
        loop {
            let mut changed = false;

            for rule in &self.rules {
                let Some(length) = form_yield(&rule.rhs, &yields) else {
                    continue;
                };
                if yields.get(rule.lhs.as_str()).map_or(true, |&best| length < best) {
                    yields.insert(rule.lhs.as_str(), length);
                    changed = true;
                }
            }

            if !changed {
                return yields;
            }
        }
    }
}

// Fewest terminals `form` derives, given the yields known so far
fn form_yield(form: &[Symbol], yields: &HashMap<&str, usize>) -> Option<usize> {
    form.iter()
        .map(|symbol| match symbol {
            Symbol::Terminal(_) => Some(1),
            Symbol::Nonterminal(name) => yields.get(name.as_str()).copied(),
        })
        .sum()
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    fn t(text: &str) -> Symbol {
        Symbol::terminal(text)
    }

    fn nt(name: &str) -> Symbol {
        Symbol::nonterminal(name)
    }

    fn example() -> Grammar {
        Grammar::from_rules(vec![
            Rule::new("S", vec![t("a"), nt("S"), t("b")]),
            Rule::new("T", vec![t("x")]),
            Rule::new("S", vec![t("c")]),
            Rule::new("T", vec![]),
        ]).unwrap()
    }

    #[test]
    fn format_rules() {
        let rules = vec![
            Rule::new("S", vec![t("a"), nt("S"), t("b")]),
            Rule::new("stmt_list", vec![nt("stmt"), t(";"), nt("stmt_list")]),
            Rule::new("empty", vec![])
        ];
        let answers = vec![
            "<S> -> a <S> b",
            "<stmt_list> -> <stmt> ; <stmt_list>",
            "<empty> ->"
        ];

        for (rule, answer) in zip(rules, answers) {
            assert_eq!(format_rule(&rule), answer);
        }
    }

    #[test]
    fn start_is_first_lhs() {
        let grammar = example();
        assert_eq!(grammar.start_symbol(), "S");
        assert_eq!(grammar.start(), nt("S"));
        assert_eq!(grammar.with_start("T").start_symbol(), "T");
    }

    #[test]
    fn empty_rules_make_no_grammar() {
        assert_eq!(Grammar::from_rules(Vec::new()), None);
    }

    #[test]
    fn lookup_keeps_declaration_order() {
        let grammar = example();

        assert_eq!(grammar.rule_indices("S"), &[0, 2]);
        assert_eq!(grammar.rule_indices("T"), &[1, 3]);
        assert!(grammar.rule_indices("U").is_empty());
        assert!(!grammar.is_defined("U"));

        let rhs: Vec<_> = grammar.rules_for("T").map(|r| r.rhs.len()).collect();
        assert_eq!(rhs, vec![1, 0]);
    }

    #[test]
    fn terminals_are_unique() {
        assert_eq!(example().terminals(), vec!["a", "b", "x", "c"]);
    }

    #[test]
    fn size_counts_rules_and_symbols() {
        assert_eq!(example().size(), 4 + 5);
    }

    #[test]
    fn min_yields() {
        let grammar = example();
        let yields = grammar.min_yields();
        assert_eq!(yields.get("S"), Some(&1));
        assert_eq!(yields.get("T"), Some(&0));

        let grammar = Grammar::from_rules(vec![
            Rule::new("E", vec![nt("E"), t("+"), nt("F")]),
            Rule::new("E", vec![nt("F")]),
            Rule::new("F", vec![t("("), nt("E"), t(")")]),
            Rule::new("F", vec![t("x")]),
            Rule::new("L", vec![t("a"), nt("L")]),
            Rule::new("U", vec![nt("missing")]),
        ]).unwrap();
        let yields = grammar.min_yields();

        let names = vec!["E", "F", "L", "U", "missing"];
        let answers = vec![Some(&1), Some(&1), None, None, None];
        for (name, answer) in zip(names, answers) {
            assert_eq!(yields.get(name), answer, "<{}>", name);
        }
    }

    #[test]
    fn display_grammar() {
        assert_eq!(
            example().to_string(),
            "<S> -> a <S> b\n<T> -> x\n<S> -> c\n<T> ->\n"
        );
    }
}
