use std::error::Error;
use std::fmt;

use super::ast::{Command, Connector, Direction, JobList, Redirect};
use super::lexer::{Lexer, Operator, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    TooManyWords { limit: usize },
    MissingRedirectTarget(Direction),
    DuplicateRedirect,
    EmptyPipeStage,
    ChainedPipe,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::TooManyWords { limit } => {
                write!(f, "too many words in command (limit is {})", limit)
            }
            ParseError::MissingRedirectTarget(direction) => {
                write!(f, "expected a file name after '{}'", direction)
            }
            ParseError::DuplicateRedirect => {
                write!(f, "only one redirection per command is supported")
            }
            ParseError::EmptyPipeStage => write!(f, "missing command on one side of '|'"),
            ParseError::ChainedPipe => write!(f, "only a single '|' per pipeline is supported"),
        }
    }
}

impl Error for ParseError {}

/// Groups tokens into commands joined by connectors.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
    max_words: Option<usize>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, max_words: Option<usize>) -> Self {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token();
        Parser {
            lexer,
            current_token,
            max_words,
        }
    }

    fn next_token(&mut self) {
        self.current_token = self.lexer.next_token();
    }

    pub fn parse(&mut self) -> Result<JobList, ParseError> {
        let mut jobs = JobList::new();
        let mut command = Command::default();
        // true while the current command has consumed tokens not yet closed by a connector
        let mut pending = false;

        loop {
            match &self.current_token {
                Token::EOF => break,
                Token::Word(word) => {
                    let word = word.clone();
                    self.push_word(&mut command, word)?;
                    pending = true;
                    self.next_token();
                }
                Token::Operator(op) => match *op {
                    Operator::Less => {
                        self.parse_redirect(&mut command, Direction::Input)?;
                        pending = true;
                    }
                    Operator::Greater => {
                        self.parse_redirect(&mut command, Direction::Output)?;
                        pending = true;
                    }
                    op => {
                        let connector = match op {
                            Operator::Semi => Connector::Sequential,
                            Operator::Amp => Connector::Background,
                            _ => Connector::Pipe,
                        };
                        jobs.push(std::mem::take(&mut command), connector);
                        pending = false;
                        self.next_token();
                    }
                },
            }
        }

        if pending {
            jobs.push(command, Connector::None);
        }

        validate_pipes(&jobs)?;
        Ok(jobs)
    }

    fn push_word(&self, command: &mut Command, word: String) -> Result<(), ParseError> {
        if let Some(limit) = self.max_words {
            if command.argv.len() >= limit {
                return Err(ParseError::TooManyWords { limit });
            }
        }
        command.argv.push(word);
        Ok(())
    }

    fn parse_redirect(
        &mut self,
        command: &mut Command,
        direction: Direction,
    ) -> Result<(), ParseError> {
        self.next_token(); // skip the operator

        let path = match &self.current_token {
            Token::Word(path) => path.clone(),
            _ => return Err(ParseError::MissingRedirectTarget(direction)),
        };
        if command.redirect.is_some() {
            return Err(ParseError::DuplicateRedirect);
        }
        command.redirect = Some(Redirect { direction, path });
        self.next_token();
        Ok(())
    }
}

/// A pipe with an empty left side is left alone: the sequencer skips empty
/// commands like any other, so `| wc` runs `wc` on its own.
fn validate_pipes(jobs: &JobList) -> Result<(), ParseError> {
    for (index, job) in jobs.iter().enumerate() {
        if job.connector != Connector::Pipe || job.command.is_empty() {
            continue;
        }
        let right = match jobs.get(index + 1) {
            Some(right) if !right.command.is_empty() => right,
            _ => return Err(ParseError::EmptyPipeStage),
        };
        if right.connector == Connector::Pipe {
            return Err(ParseError::ChainedPipe);
        }
    }
    Ok(())
}
