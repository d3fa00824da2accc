//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Email uniqueness is enforced by the `users_email_key` unique index; a
//! violation on insert surfaces as `UserPersistenceError::DuplicateEmail`.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Demographics, DisplayName, EmailAddress, NewUser, PasswordDigest, User, UserId,
};

use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: &diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        _ => UserPersistenceError::query("database error"),
    }
}

/// Like [`map_diesel_error`], but reports a unique violation as a duplicate.
fn map_insert_error(error: &diesel::result::Error, email: &EmailAddress) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    ) {
        return UserPersistenceError::duplicate_email(email.as_ref());
    }
    map_diesel_error(error)
}

/// Parse an optional enumeration column, dropping values the domain no
/// longer recognises.
fn parse_choice<T>(column: &'static str, id: i64, raw: Option<&str>) -> Option<T>
where
    T: std::str::FromStr,
{
    let value = raw?;
    value.parse().map_or_else(
        |_| {
            warn!(column, user_id = id, value, "unrecognised column value, ignoring");
            None
        },
        Some,
    )
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let name = DisplayName::new(&row.name)
        .map_err(|err| UserPersistenceError::query(format!("stored name invalid: {err}")))?;
    let email = EmailAddress::parse(&row.email)
        .map_err(|err| UserPersistenceError::query(format!("stored email invalid: {err}")))?;
    let demographics = Demographics {
        age_group: parse_choice("age_group", row.id, row.age_group.as_deref()),
        gender: parse_choice("gender", row.id, row.gender.as_deref()),
        language: parse_choice("language", row.id, row.language.as_deref()),
    };

    Ok(User::new(
        UserId::new(row.id),
        name,
        email,
        PasswordDigest::new(row.password_digest),
        demographics,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            name: user.name.as_ref(),
            email: user.email.as_ref(),
            password_digest: user.password_digest.as_str(),
        };

        let id: i64 = diesel::insert_into(users::table)
            .values(&row)
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| map_insert_error(&err, &user.email))?;

        Ok(user.into_user(UserId::new(id)))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?;

        row.map(row_to_user).transpose()
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let demographics = user.demographics();
        let changes = UserChangeset {
            name: user.name().as_ref(),
            password_digest: user.password_digest().as_str(),
            age_group: demographics.age_group.map(|choice| choice.label()),
            gender: demographics.gender.map(|choice| choice.label()),
            language: demographics.language.map(|choice| choice.label()),
            updated_at: Utc::now(),
        };

        let affected = diesel::update(users::table.find(user.id().get()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;

        if affected == 0 {
            return Err(UserPersistenceError::query(format!(
                "user {} not found",
                user.id()
            )));
        }
        Ok(())
    }
}
