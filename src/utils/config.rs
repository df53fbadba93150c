use dotenv::dotenv;
use log::warn;
use rustyline::EditMode;
use std::env;
use std::path::PathBuf;

/// Word limit per command when `OSH_MAX_WORDS` is not set.
pub const DEFAULT_MAX_WORDS: usize = 9;

pub struct Config {
    pub name: String,
    pub config_dir: PathBuf,
    pub theme: String,
    pub history_file: PathBuf,
    pub editor_mode: String,
    pub logger_level: String,
    pub logger_dir: PathBuf,
    /// `None` means commands may have any number of words.
    pub max_words: Option<usize>,
}

impl Config {
    fn get_config_dir(home: Option<String>) -> PathBuf {
        match home {
            Some(home) => PathBuf::from(home).join(".config/osh"),
            None => PathBuf::from("tmp"),
        }
    }

    fn default_with_home(home: Option<String>) -> Self {
        let config_dir = Self::get_config_dir(home);
        Config {
            name: String::from("osh"),
            theme: String::from("default"),
            history_file: config_dir.join(".osh_history"),
            editor_mode: String::from("emacs"),
            logger_level: String::from("warn"),
            logger_dir: config_dir.join("logs"),
            max_words: Some(DEFAULT_MAX_WORDS),
            config_dir,
        }
    }

    pub fn new() -> Self {
        // .env files first, real environment variables still win
        if cfg!(debug_assertions) {
            dotenv::from_filename(".env.development").ok();
        } else {
            dotenv().ok();
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an environment-like lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default_with_home(lookup("HOME"));

        if let Some(theme) = lookup("OSH_THEME") {
            config.theme = theme;
        }

        if let Some(editor) = lookup("OSH_EDITOR") {
            config.editor_mode = editor;
        }

        if let Some(history) = lookup("OSH_HISTORY") {
            config.history_file = expand_path(&history);
        }

        if let Some(level) = lookup("OSH_LOG_LEVEL") {
            config.logger_level = level;
        }

        if let Some(dir) = lookup("OSH_LOG_DIR") {
            config.logger_dir = expand_path(&dir);
        }

        if let Some(limit) = lookup("OSH_MAX_WORDS") {
            match parse_max_words(&limit) {
                Some(max_words) => config.max_words = max_words,
                None => warn!(
                    "ignoring OSH_MAX_WORDS={:?}, keeping limit {}",
                    limit, DEFAULT_MAX_WORDS
                ),
            }
        }

        config
    }

    pub fn get_edit_mode(&self) -> EditMode {
        match self.editor_mode.to_lowercase().as_str() {
            "vi" => EditMode::Vi,
            _ => EditMode::Emacs,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// `0` and `unlimited` lift the limit; any other positive integer sets it.
fn parse_max_words(value: &str) -> Option<Option<usize>> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("unlimited") {
        return Some(None);
    }
    match value.parse::<usize>() {
        Ok(0) => Some(None),
        Ok(limit) => Some(Some(limit)),
        Err(_) => None,
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
