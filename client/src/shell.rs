//! Navigation loop tying the views together.

use tracing::debug;

use crate::api::AccountApi;
use crate::forms::{Prompt, PromptError};
use crate::session::{ClientSession, Mode};
use crate::views::{login_view, profile_view, register_view};

const QUIT: &str = "Quit";

/// Render the selected view once.
///
/// # Errors
///
/// Propagates prompt failures.
pub async fn render<A, P>(
    api: &A,
    session: &mut ClientSession,
    prompt: &mut P,
) -> Result<(), PromptError>
where
    A: AccountApi + ?Sized,
    P: Prompt + ?Sized,
{
    match session.mode() {
        Mode::Login => login_view(api, session, prompt).await,
        Mode::Register => register_view(api, session, prompt).await,
        Mode::Profile => profile_view(api, session, prompt).await,
    }
}

/// Ask which view to show next. `None` means quit.
fn navigate<P>(session: &ClientSession, prompt: &mut P) -> Result<Option<Mode>, PromptError>
where
    P: Prompt + ?Sized,
{
    let mut options: Vec<&str> = Mode::ALL.iter().map(|mode| mode.label()).collect();
    options.push(QUIT);
    let current = Mode::ALL
        .iter()
        .position(|mode| *mode == session.mode())
        .unwrap_or(0);

    let picked = prompt.choose("Go to", &options, current)?;
    Ok(Mode::ALL.get(picked).copied())
}

/// Run until the user quits or input closes.
///
/// # Errors
///
/// Propagates prompt failures other than an interrupt.
pub async fn run<A, P>(api: &A, prompt: &mut P) -> Result<(), PromptError>
where
    A: AccountApi + ?Sized,
    P: Prompt + ?Sized,
{
    let mut session = ClientSession::new();
    prompt.say("Account Service")?;
    loop {
        let step = match navigate(&session, prompt) {
            Ok(Some(mode)) => {
                session.set_mode(mode);
                render(api, &mut session, prompt).await
            }
            Ok(None) => return Ok(()),
            Err(err) => Err(err),
        };
        match step {
            Ok(()) => {}
            Err(PromptError::Interrupted) => {
                debug!("input closed, leaving");
                return Ok(());
            }
            Err(err) => return Err(err),
        }
    }
}
