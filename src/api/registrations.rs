use crate::{
    auth::AdminOnly,
    error::{AppError, AppResult},
    models::{AlumniProfile, Membership, MembershipTier, User},
    schema::*,
    DbPool,
};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{Datelike, Months, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use nanoid::nanoid;
use serde::{Deserialize, Serialize};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

// no 0/O or 1/I, membership numbers get read out over the phone
const MEMBERSHIP_NUMBER_ALPHABET: [char; 32] = [
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

fn new_membership_number(issued_on: NaiveDate) -> String {
    format!(
        "AA-{}-{}",
        issued_on.year(),
        nanoid!(6, &MEMBERSHIP_NUMBER_ALPHABET)
    )
}

fn membership_expiry(
    started_on: NaiveDate,
    duration_months: Option<i32>,
) -> anyhow::Result<Option<NaiveDate>> {
    let Some(months) = duration_months else {
        // lifetime tier
        return Ok(None);
    };
    let months =
        u32::try_from(months).map_err(|_| anyhow::anyhow!("tier duration must be positive"))?;
    started_on
        .checked_add_months(Months::new(months))
        .map(Some)
        .ok_or_else(|| anyhow::anyhow!("membership expiry date out of range"))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationResponse {
    id: i32,
    email: String,
    full_name: String,
    department: String,
    degree: String,
    graduation_year: i32,
    phone: String,
    current_employer: Option<String>,
    designation: Option<String>,
    address: Option<String>,
    status: String,
    tier_name: String,
    membership_number: Option<String>,
    review_note: Option<String>,
}

impl RegistrationResponse {
    fn from_row((profile, user, tier): (AlumniProfile, User, MembershipTier)) -> Self {
        Self {
            id: profile.id,
            email: user.email,
            full_name: profile.full_name,
            department: profile.department,
            degree: profile.degree,
            graduation_year: profile.graduation_year,
            phone: profile.phone,
            current_employer: profile.current_employer,
            designation: profile.designation,
            address: profile.address,
            status: profile.status,
            tier_name: tier.tier_name,
            membership_number: profile.membership_number,
            review_note: profile.review_note,
        }
    }
}

async fn list_pending(
    Extension(pool): Extension<DbPool>,
    AdminOnly: AdminOnly,
) -> AppResult<Json<Vec<RegistrationResponse>>> {
    let conn = &mut pool.get().await?;

    let rows = alumni_profiles::table
        .inner_join(users::table)
        .inner_join(membership_tiers::table)
        .filter(alumni_profiles::status.eq(STATUS_PENDING))
        .order(alumni_profiles::created_at.asc())
        .load::<(AlumniProfile, User, MembershipTier)>(conn)
        .await?;

    Ok(Json(
        rows.into_iter().map(RegistrationResponse::from_row).collect(),
    ))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationDetailResponse {
    #[serde(flatten)]
    registration: RegistrationResponse,
    memberships: Vec<Membership>,
}

async fn info(
    Extension(pool): Extension<DbPool>,
    Path(profile_id): Path<i32>,
    AdminOnly: AdminOnly,
) -> AppResult<Json<RegistrationDetailResponse>> {
    let conn = &mut pool.get().await?;

    let row = alumni_profiles::table
        .inner_join(users::table)
        .inner_join(membership_tiers::table)
        .filter(alumni_profiles::id.eq(profile_id))
        .first::<(AlumniProfile, User, MembershipTier)>(conn)
        .await
        .optional()?
        .ok_or_else(|| {
            AppError::from(StatusCode::NOT_FOUND, "the registration does not exist")
        })?;

    let memberships = memberships::table
        .filter(memberships::alumni_profile_id.eq(profile_id))
        .order(memberships::started_on.desc())
        .load::<Membership>(conn)
        .await?;

    Ok(Json(RegistrationDetailResponse {
        registration: RegistrationResponse::from_row(row),
        memberships,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApproveRequest {
    payment_reference: Option<String>,
    amount_paid_cents: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApproveResponse {
    membership_number: String,
    started_on: NaiveDate,
    expires_on: Option<NaiveDate>,
}

async fn approve(
    Extension(pool): Extension<DbPool>,
    Path(profile_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<ApproveRequest>,
) -> AppResult<Json<ApproveResponse>> {
    #[derive(Insertable)]
    #[diesel(table_name = memberships)]
    struct NewMembership {
        alumni_profile_id: i32,
        tier_id: i32,
        payment_reference: Option<String>,
        amount_paid_cents: i32,
        started_on: NaiveDate,
        expires_on: Option<NaiveDate>,
    }

    let conn = &mut pool.get().await?;

    let profile = alumni_profiles::table
        .find(profile_id)
        .first::<AlumniProfile>(conn)
        .await
        .optional()?
        .ok_or_else(|| {
            AppError::from(StatusCode::NOT_FOUND, "the registration does not exist")
        })?;

    if profile.status != STATUS_PENDING {
        return Err(AppError::from(
            StatusCode::CONFLICT,
            "the registration has already been reviewed",
        ));
    }

    let tier = membership_tiers::table
        .find(profile.requested_tier_id)
        .first::<MembershipTier>(conn)
        .await
        .optional()?
        .ok_or_else(|| {
            AppError::from(
                StatusCode::CONFLICT,
                "the requested membership tier no longer exists",
            )
        })?;

    let started_on = Utc::now().date_naive();
    let expires_on = membership_expiry(started_on, tier.duration_months)?;
    let membership_number = new_membership_number(started_on);

    diesel::insert_into(memberships::table)
        .values(NewMembership {
            alumni_profile_id: profile.id,
            tier_id: tier.id,
            payment_reference: req.payment_reference,
            amount_paid_cents: req.amount_paid_cents.unwrap_or(tier.fee_cents),
            started_on,
            expires_on,
        })
        .execute(conn)
        .await?;

    diesel::update(alumni_profiles::table.find(profile.id))
        .set((
            alumni_profiles::status.eq(STATUS_APPROVED),
            alumni_profiles::membership_number.eq(&membership_number),
        ))
        .execute(conn)
        .await?;

    diesel::update(users::table.find(profile.user_id))
        .set(users::verified.eq(true))
        .execute(conn)
        .await?;

    tracing::info!(profile_id, %membership_number, "registration approved");

    Ok(Json(ApproveResponse {
        membership_number,
        started_on,
        expires_on,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RejectRequest {
    reason: Option<String>,
}

async fn reject(
    Extension(pool): Extension<DbPool>,
    Path(profile_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<RejectRequest>,
) -> AppResult<Json<()>> {
    let conn = &mut pool.get().await?;

    let profile = alumni_profiles::table
        .find(profile_id)
        .first::<AlumniProfile>(conn)
        .await
        .optional()?
        .ok_or_else(|| {
            AppError::from(StatusCode::NOT_FOUND, "the registration does not exist")
        })?;

    if profile.status != STATUS_PENDING {
        return Err(AppError::from(
            StatusCode::CONFLICT,
            "the registration has already been reviewed",
        ));
    }

    diesel::update(alumni_profiles::table.find(profile.id))
        .set((
            alumni_profiles::status.eq(STATUS_REJECTED),
            alumni_profiles::review_note.eq(req.reason),
        ))
        .execute(conn)
        .await?;

    tracing::info!(profile_id, "registration rejected");

    Ok(Json(()))
}

pub fn app() -> Router {
    Router::new()
        .route("/pending", get(list_pending))
        .route("/:id", get(info))
        .route("/:id/approve", post(approve))
        .route("/:id/reject", post(reject))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_number_shape() {
        let issued = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let number = new_membership_number(issued);
        let mut parts = number.split('-');
        assert_eq!(parts.next(), Some("AA"));
        assert_eq!(parts.next(), Some("2025"));
        let suffix = parts.next().unwrap();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| MEMBERSHIP_NUMBER_ALPHABET.contains(&c)));
        assert_eq!(parts.next(), None);
    }

    #[test]
    fn expiry_adds_tier_duration() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(
            membership_expiry(start, Some(12)).unwrap(),
            Some(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
        );
    }

    #[test]
    fn expiry_clamps_to_end_of_month() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            membership_expiry(start, Some(12)).unwrap(),
            Some(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap())
        );
    }

    #[test]
    fn lifetime_tier_never_expires() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(membership_expiry(start, None).unwrap(), None);
    }

    #[test]
    fn non_positive_duration_is_an_error() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert!(membership_expiry(start, Some(-6)).is_err());
    }
}
