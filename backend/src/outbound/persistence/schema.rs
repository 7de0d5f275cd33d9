//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// User accounts and their cached ledger totals.
    users (id) {
        /// Primary key.
        id -> Int8,
        /// Display name (max 255 characters).
        name -> Varchar,
        /// Unique, lower-cased login email.
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// Sum of the user's ledger records.
        total_points -> Int8,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last profile or ledger change.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ledger records.
    points (id) {
        /// Primary key.
        id -> Int8,
        /// Owning user; deleting the user cascades.
        user_id -> Int8,
        /// Positive award amount.
        #[sql_name = "points"]
        amount -> Int4,
        /// Reason for the award.
        action_type -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last revision timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(points -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(points, users);
