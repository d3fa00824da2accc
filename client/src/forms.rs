//! Form input and output.
//!
//! Views talk to the terminal only through [`Prompt`], so they can be driven
//! by a script in tests.

use std::io::{self, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Input failures that end the session.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// The user pressed Ctrl-C or closed input.
    #[error("input closed")]
    Interrupted,
    /// Terminal I/O failed.
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    /// The line editor failed.
    #[error("line editor error: {message}")]
    Editor {
        /// Editor error text.
        message: String,
    },
}

impl From<ReadlineError> for PromptError {
    fn from(err: ReadlineError) -> Self {
        match err {
            ReadlineError::Interrupted | ReadlineError::Eof => Self::Interrupted,
            ReadlineError::Io(io) => Self::Io(io),
            other => Self::Editor {
                message: other.to_string(),
            },
        }
    }
}

/// Interactive form primitives.
pub trait Prompt {
    /// Show a line of output.
    fn say(&mut self, message: &str) -> Result<(), PromptError>;

    /// Read a line, pre-filled with `initial`.
    fn text(&mut self, label: &str, initial: &str) -> Result<String, PromptError>;

    /// Read a line without echoing it.
    fn secret(&mut self, label: &str) -> Result<String, PromptError>;

    /// Pick one of `options`; returns its index. `default` is chosen on an
    /// empty answer.
    fn choose(
        &mut self,
        label: &str,
        options: &[&str],
        default: usize,
    ) -> Result<usize, PromptError>;
}

/// [`Prompt`] over the controlling terminal.
pub struct TerminalPrompt {
    editor: DefaultEditor,
}

impl TerminalPrompt {
    /// Attach to the terminal.
    ///
    /// # Errors
    ///
    /// Fails when the line editor cannot be initialised.
    pub fn new() -> Result<Self, PromptError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

/// Parse a 1-based menu answer; blank selects `default`.
fn parse_choice(answer: &str, len: usize, default: usize) -> Option<usize> {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return Some(default);
    }
    trimmed
        .parse::<usize>()
        .ok()
        .filter(|choice| (1..=len).contains(choice))
        .map(|choice| choice - 1)
}

fn read_masked(out: &mut impl Write) -> Result<String, PromptError> {
    let mut secret = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => return Ok(secret),
            KeyCode::Char('c') if ctrl => return Err(PromptError::Interrupted),
            KeyCode::Char('d') if ctrl && secret.is_empty() => {
                return Err(PromptError::Interrupted);
            }
            KeyCode::Backspace => {
                if secret.pop().is_some() {
                    write!(out, "\u{8} \u{8}")?;
                }
            }
            KeyCode::Char(c) if !ctrl => {
                secret.push(c);
                write!(out, "*")?;
            }
            _ => {}
        }
        out.flush()?;
    }
}

impl Prompt for TerminalPrompt {
    fn say(&mut self, message: &str) -> Result<(), PromptError> {
        writeln!(io::stdout().lock(), "{message}")?;
        Ok(())
    }

    fn text(&mut self, label: &str, initial: &str) -> Result<String, PromptError> {
        let line = self
            .editor
            .readline_with_initial(&format!("{label}: "), (initial, ""))?;
        Ok(line)
    }

    fn secret(&mut self, label: &str) -> Result<String, PromptError> {
        let mut out = io::stdout().lock();
        write!(out, "{label}: ")?;
        out.flush()?;

        terminal::enable_raw_mode()?;
        let secret = read_masked(&mut out);
        terminal::disable_raw_mode()?;
        write!(out, "\r\n")?;
        secret
    }

    fn choose(
        &mut self,
        label: &str,
        options: &[&str],
        default: usize,
    ) -> Result<usize, PromptError> {
        self.say(label)?;
        for (index, option) in options.iter().enumerate() {
            let marker = if index == default { '*' } else { ' ' };
            let shown = if option.is_empty() { "(none)" } else { option };
            self.say(&format!(" {marker}{}) {shown}", index + 1))?;
        }
        loop {
            let answer = self.editor.readline(&format!("Select [{}]: ", default + 1))?;
            if let Some(choice) = parse_choice(&answer, options.len(), default) {
                return Ok(choice);
            }
            self.say(&format!("Enter a number from 1 to {}.", options.len()))?;
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", Some(2))]
    #[case("  ", Some(2))]
    #[case("1", Some(0))]
    #[case(" 4 ", Some(3))]
    #[case("0", None)]
    #[case("5", None)]
    #[case("two", None)]
    fn menu_answers_are_one_based(#[case] answer: &str, #[case] expected: Option<usize>) {
        assert_eq!(parse_choice(answer, 4, 2), expected);
    }

    #[rstest]
    fn interrupts_end_the_session() {
        assert!(matches!(
            PromptError::from(ReadlineError::Interrupted),
            PromptError::Interrupted
        ));
        assert!(matches!(
            PromptError::from(ReadlineError::Eof),
            PromptError::Interrupted
        ));
    }
}
