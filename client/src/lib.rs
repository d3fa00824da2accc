//! Terminal client for the account service.
//!
//! A small form-driven shell: register, sign in, then view and edit the
//! signed-in profile. Session state lives only for the life of the process.

pub mod api;
pub mod forms;
pub mod session;
pub mod settings;
pub mod shell;
pub mod views;

pub use api::{AccountApi, ClientError, HttpAccountApi};
pub use forms::{Prompt, PromptError, TerminalPrompt};
pub use session::{ClientSession, Mode};
pub use settings::ClientSettings;
