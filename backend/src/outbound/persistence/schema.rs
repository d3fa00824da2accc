//! Diesel table definitions. Keep in sync with `backend/migrations`.

diesel::table! {
    users (id) {
        id -> Int8,
        name -> Varchar,
        email -> Varchar,
        password_digest -> Varchar,
        age_group -> Nullable<Varchar>,
        gender -> Nullable<Varchar>,
        language -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
