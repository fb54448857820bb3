//! Interactive prompts
//!
//! The init wizard talks to the user only through [`Prompter`], so the
//! question sequence can be driven by a script in tests.

use anyhow::{Result, anyhow};
use dialoguer::{Confirm, Error as DialoguerError, Input, MultiSelect, Select};
use std::io::ErrorKind;

/// Source of answers for interactive questions
pub trait Prompter {
    /// Yes/no question
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Free text; an empty answer yields `default` (or an empty string)
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Pick one item, returning its index
    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize>;

    /// Pick any number of items, returning their indices
    fn multi_select(&self, prompt: &str, items: &[&str]) -> Result<Vec<usize>>;
}

/// [`Prompter`] backed by `dialoguer` on the controlling terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

fn prompt_error(prompt: &str, err: DialoguerError) -> anyhow::Error {
    match err {
        DialoguerError::IO(io) if io.kind() == ErrorKind::Interrupted => {
            anyhow!("Cancelled by user")
        }
        other => anyhow!("Failed to read answer to '{prompt}': {other}"),
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| prompt_error(prompt, e))
    }

    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(prompt);
        input = match default {
            Some(value) => input.default(value.to_owned()),
            None => input.allow_empty(true),
        };
        input
            .interact_text()
            .map(|answer| answer.trim().to_owned())
            .map_err(|e| prompt_error(prompt, e))
    }

    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()
            .map_err(|e| prompt_error(prompt, e))
    }

    fn multi_select(&self, prompt: &str, items: &[&str]) -> Result<Vec<usize>> {
        MultiSelect::new()
            .with_prompt(prompt)
            .items(items)
            .interact()
            .map_err(|e| prompt_error(prompt, e))
    }
}
