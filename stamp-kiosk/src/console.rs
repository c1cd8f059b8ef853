//! Terminal dialogs

use stamp_card::UserInteraction;
use std::io::{self, BufRead, Write};

/// Notifications go to stdout, confirmations read a y/N answer from stdin
#[derive(Debug, Default)]
pub struct ConsoleInteraction {
    assume_yes: bool,
}

impl ConsoleInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every confirmation with yes without prompting
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }
}

impl UserInteraction for ConsoleInteraction {
    fn notify(&self, message: &str) {
        println!("{}", message);
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            println!("{} [y/N] y", message);
            return true;
        }

        print!("{} [y/N] ", message);
        if let Err(e) = io::stdout().flush() {
            tracing::warn!(error = %e, "Failed to flush prompt");
        }

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => is_yes(&line),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read confirmation, treating as no");
                false
            }
        }
    }
}

/// `y` / `yes` in any case; anything else (including EOF) is a no
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        let console = ConsoleInteraction::new().assume_yes(true);
        assert!(console.confirm("Reset?"));
    }
}
