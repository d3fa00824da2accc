//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.
//!
//! Each test runs against its own database cloned from a migrated template
//! on a shared embedded cluster (see `support::embedded_postgres`). Tests are
//! synchronous and drive the repository through the runtime owned by the
//! test database, because cluster provisioning blocks.

use account_service::domain::ports::{UserPersistenceError, UserRepository};
use account_service::domain::{
    AgeGroup, DisplayName, EmailAddress, Gender, Language, NewUser, PasswordDigest,
};
use account_service::outbound::persistence::DieselUserRepository;
use diesel_async::RunQueryDsl;
use rstest::{fixture, rstest};

mod support;

use support::{TestDatabase, provision_test_database};

const DIGEST: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA";

#[fixture]
fn database() -> TestDatabase {
    provision_test_database()
}

fn repository(database: &TestDatabase) -> DieselUserRepository {
    DieselUserRepository::new(database.pool.clone())
}

fn email(raw: &str) -> EmailAddress {
    EmailAddress::parse(raw).expect("valid email")
}

fn new_user(name: &str, address: &str) -> NewUser {
    NewUser {
        name: DisplayName::new(name).expect("valid name"),
        email: email(address),
        password_digest: PasswordDigest::new(DIGEST),
    }
}

#[rstest]
fn inserted_users_round_trip(database: TestDatabase) {
    let repo = repository(&database);

    database.runtime.block_on(async {
        let inserted = repo
            .insert(new_user("Ann", "ann@x.com"))
            .await
            .expect("insert");
        let found = repo
            .find_by_email(&email("ann@x.com"))
            .await
            .expect("lookup")
            .expect("user present");

        assert_eq!(found, inserted);
        assert!(found.id().get() > 0);
        assert_eq!(found.password_digest().as_str(), DIGEST);
        assert_eq!(found.demographics().language, None);
    });
}

#[rstest]
fn identifiers_are_assigned_in_order(database: TestDatabase) {
    let repo = repository(&database);

    database.runtime.block_on(async {
        let first = repo
            .insert(new_user("Ann", "ann@x.com"))
            .await
            .expect("first insert");
        let second = repo
            .insert(new_user("Bob", "bob@x.com"))
            .await
            .expect("second insert");

        assert!(second.id().get() > first.id().get());
    });
}

#[rstest]
#[case("ann@x.com")]
#[case("ANN@X.COM")]
#[case("  Ann@x.com ")]
fn duplicate_email_is_reported(database: TestDatabase, #[case] second: &str) {
    let repo = repository(&database);

    database.runtime.block_on(async {
        repo.insert(new_user("Ann", "ann@x.com"))
            .await
            .expect("first insert");

        let err = repo
            .insert(new_user("Other", second))
            .await
            .expect_err("duplicate rejected");

        assert_eq!(err, UserPersistenceError::duplicate_email("ann@x.com"));
        let stored = repo
            .find_by_email(&email("ann@x.com"))
            .await
            .expect("lookup")
            .expect("original kept");
        assert_eq!(stored.name().as_ref(), "Ann");
    });
}

#[rstest]
fn concurrent_inserts_of_one_email_store_one_user(database: TestDatabase) {
    let repo = repository(&database);

    database.runtime.block_on(async {
        let (left, right) = tokio::join!(
            repo.insert(new_user("Ann", "ann@x.com")),
            repo.insert(new_user("Annie", "Ann@X.com")),
        );

        let outcomes = [left, right];
        let stored = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
        let duplicates = outcomes
            .iter()
            .filter(|outcome| {
                matches!(outcome, Err(UserPersistenceError::DuplicateEmail { .. }))
            })
            .count();
        assert_eq!((stored, duplicates), (1, 1));
    });
}

#[rstest]
fn unknown_email_is_absent(database: TestDatabase) {
    let repo = repository(&database);

    let found = database
        .runtime
        .block_on(repo.find_by_email(&email("nobody@x.com")))
        .expect("lookup");

    assert!(found.is_none());
}

#[rstest]
fn update_persists_demographics_and_name(database: TestDatabase) {
    let repo = repository(&database);

    database.runtime.block_on(async {
        let mut user = repo
            .insert(new_user("Ann", "ann@x.com"))
            .await
            .expect("insert");
        user.set_name(DisplayName::new("Renamed").expect("valid name"));
        user.demographics_mut().age_group = Some(AgeGroup::From25To34);
        user.demographics_mut().gender = Some(Gender::PreferNotToSay);
        user.demographics_mut().language = Some(Language::Hindi);

        repo.update(&user).await.expect("update");
        let stored = repo
            .find_by_email(&email("ann@x.com"))
            .await
            .expect("lookup")
            .expect("user present");

        assert_eq!(stored, user);
    });
}

#[rstest]
fn updating_a_missing_user_is_a_query_error(database: TestDatabase) {
    let repo = repository(&database);

    database.runtime.block_on(async {
        let user = repo
            .insert(new_user("Ann", "ann@x.com"))
            .await
            .expect("insert");
        let mut conn = database.pool.get().await.expect("connection");
        diesel::sql_query("DELETE FROM users")
            .execute(&mut conn)
            .await
            .expect("delete");
        drop(conn);

        let err = repo.update(&user).await.expect_err("row is gone");

        assert!(matches!(err, UserPersistenceError::Query { .. }));
    });
}

#[rstest]
fn missing_schema_surfaces_as_query_error(database: TestDatabase) {
    let repo = repository(&database);

    database.runtime.block_on(async {
        let mut conn = database.pool.get().await.expect("connection");
        diesel::sql_query("DROP TABLE users")
            .execute(&mut conn)
            .await
            .expect("drop");
        drop(conn);

        let err = repo
            .insert(new_user("Ann", "ann@x.com"))
            .await
            .expect_err("table is gone");

        assert!(matches!(err, UserPersistenceError::Query { .. }));
    });
}
