use std::fmt;
use std::str::SplitWhitespace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Semi,    // ;
    Amp,     // &
    Pipe,    // |
    Less,    // <
    Greater, // >
}

impl Operator {
    fn from_word(word: &str) -> Option<Self> {
        match word {
            ";" => Some(Operator::Semi),
            "&" => Some(Operator::Amp),
            "|" => Some(Operator::Pipe),
            "<" => Some(Operator::Less),
            ">" => Some(Operator::Greater),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Semi => ";",
            Operator::Amp => "&",
            Operator::Pipe => "|",
            Operator::Less => "<",
            Operator::Greater => ">",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Word(String),
    Operator(Operator),
    EOF,
}

/// Whitespace-delimited tokenizer. Operators are only recognized as whole
/// tokens, so `ls;` is a single word.
pub struct Lexer<'a> {
    words: SplitWhitespace<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            words: input.split_whitespace(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        match self.words.next() {
            None => Token::EOF,
            Some(word) => match Operator::from_word(word) {
                Some(op) => Token::Operator(op),
                None => Token::Word(word.to_string()),
            },
        }
    }
}

pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        match lexer.next_token() {
            Token::EOF => break,
            token => tokens.push(token),
        }
    }
    tokens
}
