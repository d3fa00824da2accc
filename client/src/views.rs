//! The login, register and profile views.
//!
//! Each view reads its form through a [`Prompt`], calls the remote
//! operation and updates the [`ClientSession`]. Remote failures are shown
//! inline and leave the session as it was.

use tracing::info;

use crate::api::{AccountApi, ProfileChanges, Registration};
use crate::forms::{Prompt, PromptError};
use crate::session::{ClientSession, Mode};

/// Age bracket choices, blank meaning "not set".
pub const AGE_GROUPS: &[&str] = &["", "Under 18", "18-24", "25-34", "35-44", "45-54", "55+"];
/// Gender choices, blank meaning "not set".
pub const GENDERS: &[&str] = &["", "Male", "Female", "Other", "Prefer not to say"];
/// Language choices, blank meaning "not set".
pub const LANGUAGES: &[&str] = &[
    "", "English", "Spanish", "French", "German", "Chinese", "Hindi", "Other",
];

/// Shown after a successful registration.
pub const REGISTERED_MESSAGE: &str = "Registered successfully. Please login.";
/// Shown when the profile view is opened without signing in.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please login to view your profile.";
/// Shown after a successful save.
pub const PROFILE_UPDATED_MESSAGE: &str = "Profile updated";

const PROFILE_ACTIONS: &[&str] = &["Save changes", "Log out", "Back"];

/// Collect credentials and sign in.
///
/// # Errors
///
/// Only prompt failures are returned; remote errors are shown inline.
pub async fn login_view<A, P>(
    api: &A,
    session: &mut ClientSession,
    prompt: &mut P,
) -> Result<(), PromptError>
where
    A: AccountApi + ?Sized,
    P: Prompt + ?Sized,
{
    prompt.say("== Login ==")?;
    let email = prompt.text("Email", "")?;
    let password = prompt.secret("Password")?;

    match api.login(&email, &password).await {
        Ok(token) => {
            info!("signed in");
            session.sign_in(token);
        }
        Err(err) => prompt.say(&err.to_string())?,
    }
    Ok(())
}

/// Collect account details and register.
///
/// # Errors
///
/// Only prompt failures are returned; remote errors are shown inline.
pub async fn register_view<A, P>(
    api: &A,
    session: &mut ClientSession,
    prompt: &mut P,
) -> Result<(), PromptError>
where
    A: AccountApi + ?Sized,
    P: Prompt + ?Sized,
{
    prompt.say("== Register ==")?;
    let registration = Registration {
        name: prompt.text("Name", "")?,
        email: prompt.text("Email", "")?,
        password: prompt.secret("Password")?,
        confirm_password: prompt.secret("Confirm Password")?,
    };

    match api.register(&registration).await {
        Ok(profile) => {
            info!(user_id = profile.id, "registered");
            prompt.say(REGISTERED_MESSAGE)?;
            session.set_mode(Mode::Login);
        }
        Err(err) => prompt.say(&err.to_string())?,
    }
    Ok(())
}

/// Index of `current` in `options`, or the blank entry.
fn preselect(options: &[&str], current: Option<&str>) -> usize {
    current
        .and_then(|value| options.iter().position(|option| *option == value))
        .unwrap_or(0)
}

/// Blank answers mean "leave unchanged".
fn meaningful(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn chosen(options: &[&str], index: usize) -> Option<String> {
    options.get(index).copied().and_then(meaningful)
}

/// Show and edit the signed-in user's profile.
///
/// The profile is fetched once per session and cached; saving replaces the
/// cache with the service's answer.
///
/// # Errors
///
/// Only prompt failures are returned; remote errors are shown inline.
pub async fn profile_view<A, P>(
    api: &A,
    session: &mut ClientSession,
    prompt: &mut P,
) -> Result<(), PromptError>
where
    A: AccountApi + ?Sized,
    P: Prompt + ?Sized,
{
    let Some(token) = session.token().map(str::to_owned) else {
        prompt.say(LOGIN_REQUIRED_MESSAGE)?;
        return Ok(());
    };

    if session.profile().is_none() {
        match api.me(&token).await {
            Ok(profile) => session.cache_profile(profile),
            Err(err) => prompt.say(&err.to_string())?,
        }
    }
    let cached = session.profile().cloned();
    let current = cached.as_ref();

    prompt.say("== Your Profile ==")?;
    if let Some(profile) = current {
        prompt.say(&format!("Email: {}", profile.email))?;
    }
    let name = prompt.text("Name", current.map_or("", |p| p.name.as_str()))?;
    let age_group = prompt.choose(
        "Age Group",
        AGE_GROUPS,
        preselect(AGE_GROUPS, current.and_then(|p| p.age_group.as_deref())),
    )?;
    let gender = prompt.choose(
        "Gender",
        GENDERS,
        preselect(GENDERS, current.and_then(|p| p.gender.as_deref())),
    )?;
    let language = prompt.choose(
        "Preferred Language",
        LANGUAGES,
        preselect(LANGUAGES, current.and_then(|p| p.language.as_deref())),
    )?;
    let new_password = prompt.secret("New Password (optional)")?;

    match prompt.choose("Action", PROFILE_ACTIONS, 0)? {
        0 => {
            let changes = ProfileChanges {
                name: meaningful(&name),
                new_password: (!new_password.is_empty()).then_some(new_password),
                age_group: chosen(AGE_GROUPS, age_group),
                gender: chosen(GENDERS, gender),
                language: chosen(LANGUAGES, language),
            };
            match api.update_me(&token, &changes).await {
                Ok(profile) => {
                    info!(user_id = profile.id, "profile updated");
                    session.cache_profile(profile);
                    prompt.say(PROFILE_UPDATED_MESSAGE)?;
                }
                Err(err) => prompt.say(&err.to_string())?,
            }
        }
        1 => {
            session.log_out();
            prompt.say("Logged out.")?;
        }
        _ => {}
    }
    Ok(())
}
