use itertools::Itertools;

#[derive(PartialEq, Debug, Clone)]
pub enum Token {
    Arrow,
    Or,
    Nonterminal(String),
    Terminal(String)
}

pub fn is_nonterminal(word: &str) -> bool {
    word.len() > 2 && word.starts_with('<') && word.ends_with('>')
}

pub fn lex_word(word: &str) -> Token {
    match word {
        "->" => Token::Arrow,
        "|" => Token::Or,
        _ if is_nonterminal(word) => Token::Nonterminal(word[1..word.len() - 1].to_string()),
        _ => Token::Terminal(word.to_string())
    }
}

pub fn lex_line(line: &str) -> Vec<Token> {
    line.split_whitespace().map(lex_word).collect_vec()
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    #[test]
    fn lex_words() {
        let words = vec!["->", "|", "<expr>", "begin", "<>", "<", "a->b", "<a b"];
        let answers = vec![
            Token::Arrow,
            Token::Or,
            Token::Nonterminal("expr".to_string()),
            Token::Terminal("begin".to_string()),
            Token::Terminal("<>".to_string()),
            Token::Terminal("<".to_string()),
            Token::Terminal("a->b".to_string()),
            Token::Terminal("<a".to_string())
        ];

        for (word, answer) in zip(words, answers) {
            assert_eq!(lex_word(word), answer);
        }
    }

    #[test]
    fn lex_normal_line() {
        let lines = vec![
            "<stmt> -> <var> = <expression>",
            "  | A\t| B  "
        ];
        let answers = vec![
            vec![
                Token::Nonterminal("stmt".to_string()),
                Token::Arrow,
                Token::Nonterminal("var".to_string()),
                Token::Terminal("=".to_string()),
                Token::Nonterminal("expression".to_string())
            ],
            vec![
                Token::Or,
                Token::Terminal("A".to_string()),
                Token::Or,
                Token::Terminal("B".to_string())
            ]
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(lex_line(line), answer)
        }
    }

    #[test]
    fn lex_blank_line() {
        assert!(lex_line("").is_empty());
        assert!(lex_line(" \t ").is_empty());
    }
}
