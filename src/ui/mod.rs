//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Console reporter and interactive prompts

use std::io::{self, Write};

use anyhow::Result;
use console::Term;

use crate::reporter::{Level, Reporter};

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_analysis, display_error, display_report, display_status, display_success,
    display_verbose, display_version_change, display_warning, format_confirmation_prompt,
};

/// Reporter that renders core messages on the terminal.
///
/// Verbose messages are hidden unless enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        ConsoleReporter { verbose }
    }
}

impl Reporter for ConsoleReporter {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Verbose if self.verbose => display_verbose(message),
            Level::Verbose => {}
            Level::Info => display_status(message),
            Level::Warn => display_warning(message),
            Level::Error => display_error(message),
        }
    }
}

/// Whether prompts can be shown (stdout and stderr attached to a terminal)
pub fn is_interactive() -> bool {
    Term::stdout().is_term() && Term::stderr().is_term()
}

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Accepts "y" or "yes" (case-insensitive) as confirmation; default is "no".
///
/// # Returns
/// * `Ok(true)` - If user entered "y" or "yes"
/// * `Ok(false)` - Otherwise (including Enter, or "n"/"no")
/// * `Err` - If input error occurs
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(parse_confirmation(&input))
}

fn parse_confirmation(input: &str) -> bool {
    let response = input.trim().to_lowercase();
    response == "y" || response == "yes"
}
