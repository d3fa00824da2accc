//! Diesel row types for the `users` table. Internal to the adapter.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::users;

/// Row as read from the database. Timestamps stay in the database.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub age_group: Option<String>,
    pub gender: Option<String>,
    pub language: Option<String>,
}

/// Columns supplied on registration; the rest take database defaults.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_digest: &'a str,
}

/// Mutable columns written on profile update. The domain has already merged
/// unchanged values, so `None` is written as `NULL`.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserChangeset<'a> {
    pub name: &'a str,
    pub password_digest: &'a str,
    pub age_group: Option<&'a str>,
    pub gender: Option<&'a str>,
    pub language: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}
