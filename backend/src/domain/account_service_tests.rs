//! Tests for the account service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockPasswordHasher, MockTokenService, MockUserRepository};
use crate::domain::{
    AgeGroup, Demographics, DisplayName, EmailAddress, ErrorCode, Gender, Language, PasswordDigest,
    ProfileUpdateParts, UserId,
};

const TOKEN: &str = "signed.token.value";

fn email(raw: &str) -> EmailAddress {
    EmailAddress::parse(raw).expect("valid email")
}

fn stored_user() -> User {
    User::new(
        UserId::new(1),
        DisplayName::new("Ann").expect("valid name"),
        email("ann@x.com"),
        PasswordDigest::new("stored-digest"),
        Demographics {
            age_group: Some(AgeGroup::From18To24),
            gender: Some(Gender::Female),
            language: None,
        },
    )
}

fn registration() -> Registration {
    Registration::try_from_parts("Ann", "Ann@x.com", "secret1", "secret1")
        .expect("valid registration")
}

struct Mocks {
    users: MockUserRepository,
    hasher: MockPasswordHasher,
    tokens: MockTokenService,
}

impl Mocks {
    fn into_service(self) -> AccountService {
        AccountService::new(
            Arc::new(self.users),
            Arc::new(self.hasher),
            Arc::new(self.tokens),
        )
    }

    /// Tokens resolve to `ann@x.com`, which resolves to [`stored_user`].
    fn with_authenticated_user(mut self) -> Self {
        self.tokens
            .expect_verify()
            .withf(|token| token == TOKEN)
            .returning(|_| Ok(email("ann@x.com")));
        self.users
            .expect_find_by_email()
            .returning(|_| Ok(Some(stored_user())));
        self
    }
}

#[fixture]
fn mocks() -> Mocks {
    Mocks {
        users: MockUserRepository::new(),
        hasher: MockPasswordHasher::new(),
        tokens: MockTokenService::new(),
    }
}

#[rstest]
#[tokio::test]
async fn register_hashes_and_stores_normalised_user(mut mocks: Mocks) {
    mocks
        .users
        .expect_find_by_email()
        .withf(|email| email.as_ref() == "ann@x.com")
        .times(1)
        .returning(|_| Ok(None));
    mocks
        .hasher
        .expect_hash()
        .withf(|password| password.expose() == "secret1")
        .times(1)
        .returning(|_| Ok(PasswordDigest::new("fresh-digest")));
    mocks
        .users
        .expect_insert()
        .withf(|user| {
            user.email.as_ref() == "ann@x.com" && user.password_digest.as_str() == "fresh-digest"
        })
        .times(1)
        .returning(|user| Ok(user.into_user(UserId::new(1))));

    let profile = mocks
        .into_service()
        .register(registration())
        .await
        .expect("registration succeeds");

    assert_eq!(profile.id, UserId::new(1));
    assert_eq!(profile.email, "ann@x.com");
    assert!(profile.age_group.is_none());
}

#[rstest]
#[tokio::test]
async fn register_rejects_existing_email_without_hashing(mut mocks: Mocks) {
    mocks
        .users
        .expect_find_by_email()
        .returning(|_| Ok(Some(stored_user())));
    mocks.hasher.expect_hash().never();
    mocks.users.expect_insert().never();

    let err = mocks
        .into_service()
        .register(registration())
        .await
        .expect_err("duplicate email");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "Email already registered");
}

#[rstest]
#[tokio::test]
async fn register_maps_insert_race_to_conflict(mut mocks: Mocks) {
    mocks.users.expect_find_by_email().returning(|_| Ok(None));
    mocks
        .hasher
        .expect_hash()
        .returning(|_| Ok(PasswordDigest::new("digest")));
    mocks
        .users
        .expect_insert()
        .returning(|_| Err(UserPersistenceError::duplicate_email("ann@x.com")));

    let err = mocks
        .into_service()
        .register(registration())
        .await
        .expect_err("race lost");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "Email already registered");
}

#[rstest]
#[case(
    UserPersistenceError::connection("connection refused at 10.0.0.5:5432"),
    ErrorCode::ServiceUnavailable,
    "Service unavailable"
)]
#[case(
    UserPersistenceError::query("relation \"users\" does not exist"),
    ErrorCode::InternalError,
    "Internal server error"
)]
#[tokio::test]
async fn register_maps_repository_failures_without_leaking_details(
    mut mocks: Mocks,
    #[case] failure: UserPersistenceError,
    #[case] expected: ErrorCode,
    #[case] detail: &str,
) {
    mocks
        .users
        .expect_find_by_email()
        .return_once(move |_| Err(failure));

    let err = mocks
        .into_service()
        .register(registration())
        .await
        .expect_err("repository failure");

    assert_eq!(err.code(), expected);
    assert_eq!(err.message(), detail);
    assert!(err.details().is_none());
}

#[rstest]
#[tokio::test]
async fn unreachable_store_during_login_is_redacted(mut mocks: Mocks) {
    mocks
        .users
        .expect_find_by_email()
        .return_once(|_| Err(UserPersistenceError::connection("pool timed out after 5s")));
    mocks.hasher.expect_verify().never();

    let credentials = LoginCredentials::try_from_parts("ann@x.com", "secret1").expect("valid");
    let err = mocks
        .into_service()
        .login(&credentials)
        .await
        .expect_err("store down");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(err.message(), SERVICE_UNAVAILABLE_MESSAGE);
    assert!(!err.message().contains("pool"));
}

#[rstest]
#[tokio::test]
async fn login_issues_token_for_valid_password(mut mocks: Mocks) {
    mocks
        .users
        .expect_find_by_email()
        .returning(|_| Ok(Some(stored_user())));
    mocks
        .hasher
        .expect_verify()
        .withf(|password, digest| password == "secret1" && digest.as_str() == "stored-digest")
        .returning(|_, _| Ok(true));
    mocks
        .tokens
        .expect_issue()
        .withf(|subject| subject.as_ref() == "ann@x.com")
        .returning(|_| Ok(AccessToken::new(TOKEN)));

    let credentials = LoginCredentials::try_from_parts("ANN@x.com", "secret1").expect("valid");
    let token = mocks
        .into_service()
        .login(&credentials)
        .await
        .expect("login succeeds");

    assert_eq!(token.as_str(), TOKEN);
}

#[rstest]
#[tokio::test]
async fn login_failures_share_one_message(mut mocks: Mocks) {
    let known = email("ann@x.com");
    mocks
        .users
        .expect_find_by_email()
        .returning(move |email| Ok((email == &known).then(stored_user)));
    mocks.hasher.expect_verify().returning(|_, _| Ok(false));
    mocks
        .hasher
        .expect_verify_dummy()
        .times(1)
        .returning(|_| ());
    mocks.tokens.expect_issue().never();
    let service = mocks.into_service();

    let wrong_password = LoginCredentials::try_from_parts("ann@x.com", "wrong!").expect("valid");
    let unknown_email = LoginCredentials::try_from_parts("bob@x.com", "secret1").expect("valid");

    let first = service.login(&wrong_password).await.expect_err("rejected");
    let second = service.login(&unknown_email).await.expect_err("rejected");

    for err in [&first, &second] {
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "Invalid email or password");
    }
}

#[rstest]
#[tokio::test]
async fn fetch_profile_resolves_token_subject(mocks: Mocks) {
    let profile = mocks
        .with_authenticated_user()
        .into_service()
        .fetch_profile(TOKEN)
        .await
        .expect("profile");

    assert_eq!(profile, Profile::from(&stored_user()));
}

#[rstest]
#[case(TokenError::Expired)]
#[case(TokenError::invalid("bad signature"))]
#[tokio::test]
async fn fetch_profile_rejects_untrusted_tokens(mut mocks: Mocks, #[case] failure: TokenError) {
    mocks
        .tokens
        .expect_verify()
        .return_once(move |_| Err(failure));
    mocks.users.expect_find_by_email().never();

    let err = mocks
        .into_service()
        .fetch_profile("whatever")
        .await
        .expect_err("untrusted token");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "Could not validate credentials");
}

#[rstest]
#[tokio::test]
async fn fetch_profile_rejects_vanished_subject(mut mocks: Mocks) {
    mocks
        .tokens
        .expect_verify()
        .returning(|_| Ok(email("gone@x.com")));
    mocks.users.expect_find_by_email().returning(|_| Ok(None));

    let err = mocks
        .into_service()
        .fetch_profile(TOKEN)
        .await
        .expect_err("unknown subject");

    assert_eq!(err.message(), "Could not validate credentials");
}

#[rstest]
#[tokio::test]
async fn empty_update_performs_no_write(mocks: Mocks) {
    let mut authenticated = mocks.with_authenticated_user();
    authenticated.users.expect_update().never();
    authenticated.hasher.expect_hash().never();

    let profile = authenticated
        .into_service()
        .update_profile(TOKEN, ProfileUpdate::default())
        .await
        .expect("no-op update");

    assert_eq!(profile, Profile::from(&stored_user()));
}

#[rstest]
#[tokio::test]
async fn language_only_update_keeps_other_fields(mocks: Mocks) {
    let mut authenticated = mocks.with_authenticated_user();
    authenticated
        .users
        .expect_update()
        .withf(|user| user.demographics().language == Some(Language::Hindi))
        .times(1)
        .returning(|_| Ok(()));

    let update = ProfileUpdate::try_from_parts(ProfileUpdateParts {
        language: Some("Hindi"),
        ..ProfileUpdateParts::default()
    })
    .expect("valid update");
    let profile = authenticated
        .into_service()
        .update_profile(TOKEN, update)
        .await
        .expect("update succeeds");

    assert_eq!(profile.language, Some(Language::Hindi));
    assert_eq!(profile.name, "Ann");
    assert_eq!(profile.age_group, Some(AgeGroup::From18To24));
    assert_eq!(profile.gender, Some(Gender::Female));
}

#[rstest]
#[tokio::test]
async fn password_update_stores_new_digest(mocks: Mocks) {
    let mut authenticated = mocks.with_authenticated_user();
    authenticated
        .hasher
        .expect_hash()
        .withf(|password| password.expose() == "new-secret")
        .returning(|_| Ok(PasswordDigest::new("new-digest")));
    authenticated
        .users
        .expect_update()
        .withf(|user| user.password_digest().as_str() == "new-digest")
        .times(1)
        .returning(|_| Ok(()));

    let update = ProfileUpdate::try_from_parts(ProfileUpdateParts {
        new_password: Some("new-secret"),
        ..ProfileUpdateParts::default()
    })
    .expect("valid update");

    authenticated
        .into_service()
        .update_profile(TOKEN, update)
        .await
        .expect("update succeeds");
}
