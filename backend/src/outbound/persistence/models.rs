//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; repositories convert them
//! to and from domain aggregates.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{donations, matches, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row read from the `users` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub blood_group: String,
    pub location: String,
    pub age: i16,
    pub weight: Option<f64>,
    pub role: String,
    pub is_available: bool,
    pub last_donation: Option<DateTime<Utc>>,
    pub medical_conditions: Option<String>,
    pub emergency_contact: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full user record for inserts and updates.
///
/// `None` clears the column on update.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserRecord<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub blood_group: &'a str,
    pub location: &'a str,
    pub age: i16,
    pub weight: Option<f64>,
    pub role: &'a str,
    pub is_available: bool,
    pub last_donation: Option<DateTime<Utc>>,
    pub medical_conditions: Option<&'a str>,
    pub emergency_contact: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Donations
// ---------------------------------------------------------------------------

/// Row read from the `donations` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = donations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DonationRow {
    pub id: Uuid,
    pub donor_id: Option<Uuid>,
    pub seeker_id: Option<Uuid>,
    pub blood_group: String,
    pub amount_ml: Option<i32>,
    pub donation_type: String,
    pub location: String,
    pub status: String,
    pub urgency: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable donation record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = donations)]
pub(crate) struct NewDonationRow<'a> {
    pub id: Uuid,
    pub donor_id: Option<Uuid>,
    pub seeker_id: Option<Uuid>,
    pub blood_group: &'a str,
    pub amount_ml: Option<i32>,
    pub donation_type: &'a str,
    pub location: &'a str,
    pub status: &'a str,
    pub urgency: &'a str,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for donation updates. Party references are never rewritten.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = donations)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct DonationUpdate<'a> {
    pub blood_group: &'a str,
    pub amount_ml: Option<i32>,
    pub donation_type: &'a str,
    pub location: &'a str,
    pub status: &'a str,
    pub urgency: &'a str,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

/// Row read from the `matches` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = matches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MatchRow {
    pub id: Uuid,
    pub donor_id: Option<Uuid>,
    pub seeker_id: Option<Uuid>,
    pub blood_group: String,
    pub distance: f64,
    pub compatibility_score: i16,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable match record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = matches)]
pub(crate) struct NewMatchRow<'a> {
    pub id: Uuid,
    pub donor_id: Option<Uuid>,
    pub seeker_id: Option<Uuid>,
    pub blood_group: &'a str,
    pub distance: f64,
    pub compatibility_score: i16,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for match updates. Party references are never rewritten.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = matches)]
pub(crate) struct MatchUpdate<'a> {
    pub blood_group: &'a str,
    pub distance: f64,
    pub compatibility_score: i16,
    pub status: &'a str,
    pub updated_at: DateTime<Utc>,
}
