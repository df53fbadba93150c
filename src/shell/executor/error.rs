use std::error::Error;
use std::fmt;

use nix::errno::Errno;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// fork(2) failed; the command never ran.
    Spawn(Errno),
    /// execvp(2) failed inside the child.
    Exec { program: String, errno: Errno },
    Wait(Errno),
    /// The redirect target could not be opened inside the child.
    RedirectOpen { path: String, errno: Errno },
    /// dup2(2) onto a standard stream failed inside the child.
    Redirect(Errno),
    PipeCreation(Errno),
    /// A word contains an interior NUL byte and cannot become a C string.
    InvalidArgument(String),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::Spawn(errno) => write!(f, "fork failed: {}", errno.desc()),
            ExecError::Exec { program, errno } => write!(f, "{}: {}", program, errno.desc()),
            ExecError::Wait(errno) => write!(f, "wait failed: {}", errno.desc()),
            ExecError::RedirectOpen { path, errno } => write!(f, "{}: {}", path, errno.desc()),
            ExecError::Redirect(errno) => write!(f, "redirection failed: {}", errno.desc()),
            ExecError::PipeCreation(errno) => write!(f, "pipe failed: {}", errno.desc()),
            ExecError::InvalidArgument(word) => {
                write!(f, "argument contains a NUL byte: {:?}", word)
            }
        }
    }
}

impl Error for ExecError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ExecError::Exec {
            program: "nope".to_string(),
            errno: Errno::ENOENT,
        };
        assert_eq!(err.to_string(), "nope: No such file or directory");

        let err = ExecError::RedirectOpen {
            path: "/missing/in.txt".to_string(),
            errno: Errno::ENOENT,
        };
        assert_eq!(err.to_string(), "/missing/in.txt: No such file or directory");

        assert_eq!(
            ExecError::PipeCreation(Errno::EMFILE).to_string(),
            "pipe failed: Too many open files"
        );
    }
}
