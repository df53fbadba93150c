use log::{debug, error, warn};
use std::error::Error;
use std::io::Write;

use crate::shell::executor::{Executor, Launcher};
use crate::shell::parser::Parser;
use crate::shell::readline::{ReadlineError, ReadlineManager};
use crate::shell::sequencer::{Flow, JobSequencer};
use crate::utils::config::Config;
use crate::utils::theme::Theme;

pub struct Shell<'a> {
    config: &'a Config,
    theme: Theme,
    readline: ReadlineManager<'a>,
    sequencer: JobSequencer<Executor>,
}

impl<'a> Shell<'a> {
    pub fn new(config: &'a Config) -> Result<Self, ReadlineError> {
        Ok(Self {
            config,
            theme: Theme::load(&config.theme),
            readline: ReadlineManager::new(config)?,
            sequencer: JobSequencer::new(Executor::new()),
        })
    }

    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        debug!("starting osh...");
        self.readline.load_history()?;

        println!(
            "{}",
            (self.theme.success_style)(self.theme.get_message("welcome"))
        );

        self.run_loop()?;
        self.readline.save_history()?;

        debug!("leaving osh...");
        Ok(())
    }

    fn run_loop(&mut self) -> Result<(), Box<dyn Error>> {
        loop {
            std::io::stdout().flush()?;
            let prompt = (self.theme.prompt_style)(self.theme.get_message("prompt"));

            match self.readline.readline(&prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    self.readline.add_history(line.clone())?;
                    if handle_line(&line, self.config, &self.theme, &mut self.sequencer)
                        == Flow::Exit
                    {
                        println!(
                            "{}",
                            (self.theme.success_style)(self.theme.get_message("exit"))
                        );
                        break;
                    }
                }
                Err(err) => match err {
                    ReadlineError::Eof => {
                        warn!("EOF received, leaving osh...");
                        println!(
                            "\n{}",
                            (self.theme.warning_style)(self.theme.get_message("eof_signal"))
                        );
                        break;
                    }
                    ReadlineError::Interrupted => {
                        println!(
                            "{}",
                            (self.theme.warning_style)(self.theme.get_message("interrupt_signal"))
                        );
                    }
                    err => {
                        error!("readline error: {}", err);
                        eprintln!(
                            "{}: {}",
                            (self.theme.error_style)(self.theme.get_message("error")),
                            err
                        );
                    }
                },
            }
        }
        Ok(())
    }
}

/// Parses and runs one line. Parse errors reject the whole line.
pub fn handle_line<L: Launcher>(
    line: &str,
    config: &Config,
    theme: &Theme,
    sequencer: &mut JobSequencer<L>,
) -> Flow {
    debug!("line: {}", line);
    match Parser::new(line, config.max_words).parse() {
        Ok(jobs) => sequencer.run_line(&jobs),
        Err(e) => {
            warn!("rejected line {:?}: {}", line, e);
            eprintln!(
                "{} {}",
                (theme.error_style)(theme.get_message("error_symbol")),
                (theme.error_style)(format!("osh: {}", e)),
            );
            Flow::Continue
        }
    }
}
