//! Terminal confirmation prompts backed by dialoguer.

use crate::error::{ArborError, Result};
use crate::provider::Confirmation;
use dialoguer::{Confirm, MultiSelect};
use std::io::IsTerminal;

/// Prompts on the controlling terminal. Fails instead of blocking when stdin
/// is not a terminal.
pub struct TerminalPrompt {
    is_tty: bool,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            is_tty: std::io::stdin().is_terminal(),
        }
    }

    fn require_tty(&self) -> Result<()> {
        if !self.is_tty {
            return Err(ArborError::Interaction(
                "no terminal to prompt on; pass --yes to proceed without confirmation".to_string(),
            ));
        }
        Ok(())
    }

    fn convert_dialoguer_error(err: dialoguer::Error) -> ArborError {
        ArborError::Interaction(err.to_string())
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Confirmation for TerminalPrompt {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        self.require_tty()?;

        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(Self::convert_dialoguer_error)
    }

    fn select_many(&self, prompt: &str, choices: &[String]) -> Result<Vec<usize>> {
        self.require_tty()?;

        if choices.is_empty() {
            return Ok(Vec::new());
        }

        let defaults = vec![true; choices.len()];
        MultiSelect::new()
            .with_prompt(prompt)
            .items(choices)
            .defaults(&defaults)
            .interact()
            .map_err(Self::convert_dialoguer_error)
    }
}

/// Answers yes to everything and selects every choice (`--yes`).
pub struct AutoConfirm;

impl Confirmation for AutoConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        tracing::debug!(prompt, "auto-confirmed");
        Ok(true)
    }

    fn select_many(&self, _prompt: &str, choices: &[String]) -> Result<Vec<usize>> {
        Ok((0..choices.len()).collect())
    }
}
