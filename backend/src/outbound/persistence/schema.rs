//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. When migrations change the schema, regenerate this file with
//! `diesel print-schema` or update it by hand to match.

diesel::table! {
    /// User records table.
    ///
    /// The `id` column is a `BIGSERIAL` primary key; `email` carries a
    /// unique index.
    users (id) {
        /// Primary key, store-assigned and strictly increasing.
        id -> Int8,
        /// Display name (2 to 64 characters, enforced by the validator).
        #[max_length = 64]
        name -> Varchar,
        /// Contact email, unique.
        #[max_length = 120]
        email -> Varchar,
        /// Age in years, optional.
        age -> Nullable<Int4>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}
