//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered donors and seekers.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        /// Unique (`users_email_key`).
        email -> Varchar,
        phone -> Nullable<Varchar>,
        /// Compared exactly, case included.
        blood_group -> Varchar,
        location -> Varchar,
        age -> Int2,
        weight -> Nullable<Float8>,
        /// `donor` or `seeker`.
        role -> Varchar,
        is_available -> Bool,
        last_donation -> Nullable<Timestamptz>,
        medical_conditions -> Nullable<Text>,
        emergency_contact -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Donation requests. Party references are cleared when a user is
    /// deleted.
    donations (id) {
        id -> Uuid,
        donor_id -> Nullable<Uuid>,
        seeker_id -> Nullable<Uuid>,
        blood_group -> Varchar,
        amount_ml -> Nullable<Int4>,
        donation_type -> Varchar,
        location -> Varchar,
        status -> Varchar,
        urgency -> Varchar,
        scheduled_at -> Nullable<Timestamptz>,
        completed_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Donor/seeker matches.
    matches (id) {
        id -> Uuid,
        donor_id -> Nullable<Uuid>,
        seeker_id -> Nullable<Uuid>,
        blood_group -> Varchar,
        distance -> Float8,
        /// Checked to `0..=100` by `matches_score_range`.
        compatibility_score -> Int2,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, donations, matches);
