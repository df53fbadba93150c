use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,  // <
    Output, // >
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => write!(f, "<"),
            Direction::Output => write!(f, ">"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub direction: Direction,
    pub path: String,
}

/// How the command after this one relates to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    Sequential, // ;
    Background, // &
    Pipe,       // |
    None,       // end of line
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub argv: Vec<String>,
    pub redirect: Option<Redirect>,
}

impl Command {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            redirect: None,
        }
    }

    pub fn with_redirect(mut self, direction: Direction, path: impl Into<String>) -> Self {
        self.redirect = Some(Redirect {
            direction,
            path: path.into(),
        });
        self
    }

    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.join(" "))?;
        if let Some(redirect) = &self.redirect {
            write!(f, " {} {}", redirect.direction, redirect.path)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub command: Command,
    pub connector: Connector,
}

/// Everything parsed from one input line, in textual order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobList {
    jobs: Vec<Job>,
}

impl JobList {
    pub fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    pub fn push(&mut self, command: Command, connector: Connector) {
        self.jobs.push(Job { command, connector });
    }

    pub fn get(&self, index: usize) -> Option<&Job> {
        self.jobs.get(index)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Job> {
        self.jobs.iter()
    }
}

impl FromIterator<(Command, Connector)> for JobList {
    fn from_iter<T: IntoIterator<Item = (Command, Connector)>>(iter: T) -> Self {
        let mut list = JobList::new();
        for (command, connector) in iter {
            list.push(command, connector);
        }
        list
    }
}
