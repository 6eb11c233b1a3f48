//! Line-based user input

use std::io::Write;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};

use crate::selection::{parse_selection, SelectionError};
use crate::view::AppView;
use super::AppController;

/// Consecutive failed reads after which input is considered broken
const MAX_READ_ERRORS: usize = 3;

/// A source of user-typed lines
#[async_trait]
pub trait Prompt: Send {
    /// Shows `prompt` and reads one line. `None` means input has ended.
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

pub struct StdinPrompt {
    reader: BufReader<Stdin>,
}

impl StdinPrompt {
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
        }
    }
}

impl Default for StdinPrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prompt for StdinPrompt {
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;

        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(None);
        }
        // invalid UTF-8 is replaced rather than rejected
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

impl<C, D, P> AppController<C, D, P>
where
    P: Prompt,
{
    /// Prompts until a non-blank line is entered.
    ///
    /// A failed read is reported and the prompt repeated; only repeated failures are returned.
    pub(crate) async fn read_non_empty(&mut self, prompt: &str) -> Result<Option<String>> {
        let mut errors = 0;
        loop {
            match self.prompt.read_line(prompt).await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => return Ok(Some(line.trim().to_string())),
                Ok(None) => return Ok(None),
                Err(e) if errors + 1 < MAX_READ_ERRORS => {
                    errors += 1;
                    tracing::warn!(error = %e, errors, "Failed to read input");
                    AppView::error(&format!("Could not read input: {e}"));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Prompts for ordinals until `choose` accepts them.
    ///
    /// Parse and range errors are shown and the user is asked again.
    pub(crate) async fn read_selection<T, F>(&mut self, mut choose: F) -> Result<Option<T>>
    where
        F: FnMut(&[usize]) -> Result<T, SelectionError>,
    {
        loop {
            let Some(text) = self.read_non_empty("SELECT ITEM(S) BY S.NO: ").await? else {
                return Ok(None);
            };

            match parse_selection(&text).and_then(|ordinals| choose(&ordinals)) {
                Ok(chosen) => return Ok(Some(chosen)),
                Err(e) => {
                    tracing::debug!(selection = %text, error = %e, "Rejected selection");
                    AppView::error(&e.to_string());
                }
            }
        }
    }
}
