//! Interactive prompts behind a trait, with the `inquire` implementation.

use anyhow::Result;
use thiserror::Error;

/// The user aborted a prompt (Ctrl-C, Ctrl-D or ESC). Ends the program normally.
#[derive(Debug, Error)]
#[error("cancelled by user")]
pub struct UserCancelled;

/// Interactive questions asked while assembling a run.
///
/// Selections return indexes into `options`, so callers keep ownership of
/// whatever the options describe. Production code uses [`InquirePrompter`];
/// tests answer from a script.
pub trait Prompter {
    /// # Errors
    /// Returns [`UserCancelled`] if the user aborts the prompt.
    fn multi_select(&self, message: &str, options: Vec<String>) -> Result<Vec<usize>>;

    /// # Errors
    /// Returns [`UserCancelled`] if the user aborts the prompt.
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// # Errors
    /// Returns [`UserCancelled`] if the user aborts the prompt.
    fn text(&self, message: &str, help: &str) -> Result<String>;

    /// # Errors
    /// Returns [`UserCancelled`] if the user aborts the prompt.
    fn select(&self, message: &str, options: Vec<String>) -> Result<usize>;
}

fn handle_inquire_result<T>(result: Result<T, inquire::InquireError>) -> Result<T> {
    match result {
        Ok(v) => Ok(v),
        Err(
            inquire::InquireError::OperationCanceled | inquire::InquireError::OperationInterrupted,
        ) => Err(UserCancelled.into()),
        Err(e) => Err(e.into()),
    }
}

/// Terminal prompts backed by `inquire`.
#[derive(Default)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn multi_select(&self, message: &str, options: Vec<String>) -> Result<Vec<usize>> {
        let mut selector = inquire::MultiSelect::new(message, options);
        selector.page_size = 15;
        let chosen = handle_inquire_result(selector.raw_prompt())?;
        Ok(chosen.into_iter().map(|option| option.index).collect())
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        handle_inquire_result(inquire::Confirm::new(message).with_default(default).prompt())
    }

    fn text(&self, message: &str, help: &str) -> Result<String> {
        handle_inquire_result(inquire::Text::new(message).with_help_message(help).prompt())
    }

    fn select(&self, message: &str, options: Vec<String>) -> Result<usize> {
        let chosen = handle_inquire_result(inquire::Select::new(message, options).raw_prompt())?;
        Ok(chosen.index)
    }
}
