use anyhow::Result;
use inquire::{InquireError, Password, PasswordDisplayMode, Text};

/// Line-oriented user input.
///
/// `Ok(None)` means the user closed the prompt (Esc, Ctrl-C, Ctrl-D).
pub trait Prompter {
    fn text(&mut self, message: &str) -> Result<Option<String>>;

    /// Like [`Prompter::text`], but the answer is not echoed.
    fn secret(&mut self, message: &str) -> Result<Option<String>>;
}

/// Terminal prompts backed by `inquire`.
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl InquirePrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for InquirePrompter {
    fn text(&mut self, message: &str) -> Result<Option<String>> {
        closed_as_none(Text::new(message).prompt())
    }

    fn secret(&mut self, message: &str) -> Result<Option<String>> {
        closed_as_none(
            Password::new(message)
                .without_confirmation()
                .with_display_mode(PasswordDisplayMode::Masked)
                .prompt(),
        )
    }
}

fn closed_as_none(answer: Result<String, InquireError>) -> Result<Option<String>> {
    match answer {
        Ok(line) => Ok(Some(line)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
