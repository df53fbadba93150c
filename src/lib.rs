pub mod shell;
pub mod utils;
