pub mod ast;
pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;

pub use ast::{Command, Connector, Direction, Job, JobList, Redirect};
pub use lexer::{tokenize, Lexer, Operator, Token};
pub use parser::{ParseError, Parser};
