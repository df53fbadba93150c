use colored::Colorize;
use std::collections::HashMap;

type Style = Box<dyn Fn(String) -> String>;

pub struct Theme {
    messages: HashMap<&'static str, String>,
    pub prompt_style: Style,
    pub success_style: Style,
    pub warning_style: Style,
    pub error_style: Style,
}

fn default_messages() -> HashMap<&'static str, String> {
    [
        ("prompt", "osh> "),
        ("welcome", "Enter a command or type exit to terminate"),
        ("exit", "Shell terminated, have a good day!"),
        ("eof_signal", "EOF received, leaving osh"),
        ("interrupt_signal", "Interrupted, line discarded"),
        ("error", "Error"),
        ("error_symbol", "✗"),
    ]
    .into_iter()
    .map(|(key, message)| (key, message.to_string()))
    .collect()
}

impl Theme {
    pub fn new() -> Self {
        Self::load("default")
    }

    pub fn load(theme_name: &str) -> Self {
        match theme_name {
            "plain" => Theme {
                messages: default_messages(),
                prompt_style: Box::new(|s| s),
                success_style: Box::new(|s| s),
                warning_style: Box::new(|s| s),
                error_style: Box::new(|s| s),
            },
            _ => Theme {
                messages: default_messages(),
                prompt_style: Box::new(|s| s.bright_cyan().to_string()),
                success_style: Box::new(|s| s.bright_magenta().to_string()),
                warning_style: Box::new(|s| s.yellow().to_string()),
                error_style: Box::new(|s| s.bright_red().to_string()),
            },
        }
    }

    pub fn get_message(&self, key: &str) -> String {
        self.messages.get(key).cloned().unwrap_or_default()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}
