use std::io::{self, Write};

pub const BANNER: &str = r#"  |\_/|        ****************************     (\_/)
 / @ @ \       *   "Purrrfectly pleasant"   *    (='.'=)
( > º < )      *            osh             *    (")_(")
 `>>x<<´       *    one line at a time      *
 /  O  \       ****************************
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Banner,
}

impl Builtin {
    /// Matches a command's program name exactly.
    pub fn lookup(program: &str) -> Option<Self> {
        match program {
            "exit" => Some(Builtin::Exit),
            "ascii" => Some(Builtin::Banner),
            _ => None,
        }
    }
}

pub fn print_banner(out: &mut impl Write) -> io::Result<()> {
    out.write_all(BANNER.as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(Builtin::lookup("exit"), Some(Builtin::Exit));
        assert_eq!(Builtin::lookup("ascii"), Some(Builtin::Banner));
        assert_eq!(Builtin::lookup("Exit"), None);
        assert_eq!(Builtin::lookup("exit;"), None);
        assert_eq!(Builtin::lookup("ls"), None);
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_banner() {
        let mut out = Vec::new();
        print_banner(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("Purrrfectly pleasant"));
    }
}
