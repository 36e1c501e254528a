use crate::schema::*;
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Queryable, Identifiable)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub verified: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(belongs_to(User))]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: i32,
    pub user_id: i32,
    pub full_name: String,
    pub designation: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(belongs_to(User))]
#[serde(rename_all = "camelCase")]
pub struct AlumniProfile {
    pub id: i32,
    pub user_id: i32,
    pub full_name: String,
    pub department: String,
    pub degree: String,
    pub graduation_year: i32,
    pub phone: String,
    pub current_employer: Option<String>,
    pub designation: Option<String>,
    pub address: Option<String>,
    pub status: String,
    pub requested_tier_id: i32,
    pub membership_number: Option<String>,
    pub review_note: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = membership_tiers)]
#[serde(rename_all = "camelCase")]
pub struct MembershipTier {
    pub id: i32,
    pub tier_name: String,
    pub fee_cents: i32,
    pub duration_months: Option<i32>,
    pub benefits: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(belongs_to(AlumniProfile))]
#[diesel(belongs_to(MembershipTier, foreign_key = tier_id))]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: i32,
    pub alumni_profile_id: i32,
    pub tier_id: i32,
    pub payment_reference: Option<String>,
    pub amount_paid_cents: i32,
    pub started_on: NaiveDate,
    pub expires_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoAlbum {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(belongs_to(PhotoAlbum, foreign_key = album_id))]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: i32,
    pub album_id: i32,
    pub url: String,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(belongs_to(Event))]
#[diesel(belongs_to(PhotoAlbum, foreign_key = album_id))]
pub struct EventPhotoAlbum {
    pub id: i32,
    pub event_id: i32,
    pub album_id: i32,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub recorded_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conference {
    pub id: i32,
    pub title: String,
    pub theme: Option<String>,
    pub venue: Option<String>,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
    pub brochure_url: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementBrochure {
    pub id: i32,
    pub title: String,
    pub file_url: String,
    pub academic_year: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: i32,
    pub title: String,
    pub file_url: String,
    pub published_on: NaiveDate,
    pub kind: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyMember {
    pub id: i32,
    pub full_name: String,
    pub designation: String,
    pub department: String,
    pub photo_url: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = notable_alumni)]
#[serde(rename_all = "camelCase")]
pub struct NotableAlumnus {
    pub id: i32,
    pub full_name: String,
    pub graduation_year: Option<i32>,
    pub achievements: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub id: i32,
    pub full_name: String,
    pub affiliation: Option<String>,
    pub purpose: Option<String>,
    pub visited_on: NaiveDate,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewspaperClipping {
    pub id: i32,
    pub title: String,
    pub image_url: String,
    pub published_on: Option<NaiveDate>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustrialTour {
    pub id: i32,
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    pub tour_date: NaiveDate,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(belongs_to(IndustrialTour, foreign_key = tour_id))]
#[serde(rename_all = "camelCase")]
pub struct IndustrialTourPhoto {
    pub id: i32,
    pub tour_id: i32,
    pub url: String,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(belongs_to(IndustrialTour, foreign_key = tour_id))]
#[diesel(belongs_to(PhotoAlbum, foreign_key = album_id))]
pub struct IndustrialTourAlbum {
    pub id: i32,
    pub tour_id: i32,
    pub album_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // page components consume these records as-is, so the wire shape matters
    #[test]
    fn tiers_serialize_camel_case() {
        let tier = MembershipTier {
            id: 1,
            tier_name: "Lifetime".to_string(),
            fee_cents: 500_000,
            duration_months: None,
            benefits: "All events, newsletter".to_string(),
        };
        let value = serde_json::to_value(&tier).unwrap();
        assert_eq!(value["tierName"], "Lifetime");
        assert_eq!(value["feeCents"], 500_000);
        assert!(value["durationMonths"].is_null());
    }

    #[test]
    fn dates_serialize_as_iso_strings() {
        let visitor = Visitor {
            id: 3,
            full_name: "Dr. R. Rao".to_string(),
            affiliation: Some("IIT Madras".to_string()),
            purpose: None,
            visited_on: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            photo_url: None,
        };
        let value = serde_json::to_value(&visitor).unwrap();
        assert_eq!(value["visitedOn"], "2025-01-15");
        assert_eq!(value["fullName"], "Dr. R. Rao");
    }
}
