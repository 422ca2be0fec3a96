use itertools::Itertools;

use crate::grammar::{Grammar, Rule, Symbol};

fn get_rule_undefined_symbols<'a>(rule: &'a Rule, grammar: &'a Grammar) -> impl Iterator<Item = &'a str> + 'a {
    // Filter out everything but nonterminals and unwrap the name from the
    // nonterminals. Then filter out all the defined nonterminals.
    rule.rhs.iter()
        .filter_map(|symbol| match symbol {
            Symbol::Nonterminal(name) => Some(name.as_str()),
            _ => None
        })
        .filter(move |name| !grammar.is_defined(name))
}

/// Nonterminals that are used on some right-hand side (or as the start
/// symbol) but have no rule, in order of first use. The grammar is still
/// usable; branches through these symbols simply never derive anything.
pub fn undefined_nonterminals(grammar: &Grammar) -> Vec<&str> {
    let start = Some(grammar.start_symbol()).filter(|start| !grammar.is_defined(start));

    start.into_iter()
        .chain(grammar.rules().iter().flat_map(|rule| get_rule_undefined_symbols(rule, grammar)))
        .unique()
        .collect()
}
