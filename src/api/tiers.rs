use crate::{
    auth::AdminOnly,
    error::{AppError, AppResult},
    models::MembershipTier,
    schema::*,
    DbPool,
};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use diesel::{prelude::*, result::DatabaseErrorKind, result::Error as DieselError};
use diesel_async::RunQueryDsl;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TierRequest {
    tier_name: String,
    fee_cents: i32,
    duration_months: Option<i32>,
    benefits: String,
}

/// Unique and foreign-key violations on this table both come from
/// foreseeable admin actions; neither should take the 500 path.
fn map_constraint_error(e: DieselError) -> AppError {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => AppError::from(
            StatusCode::CONFLICT,
            "a tier with this name already exists",
        ),
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => AppError::from(
            StatusCode::CONFLICT,
            "the tier is still referenced by memberships or registrations",
        ),
        e => e.into(),
    }
}

fn validate(req: &TierRequest) -> AppResult<()> {
    if req.tier_name.trim().is_empty() {
        return Err(AppError::from(
            StatusCode::BAD_REQUEST,
            "tier name is required",
        ));
    }
    if req.fee_cents < 0 {
        return Err(AppError::from(
            StatusCode::BAD_REQUEST,
            "fee cannot be negative",
        ));
    }
    if matches!(req.duration_months, Some(m) if m <= 0) {
        return Err(AppError::from(
            StatusCode::BAD_REQUEST,
            "duration must be a positive number of months",
        ));
    }
    Ok(())
}

async fn list(Extension(pool): Extension<DbPool>) -> AppResult<Json<Vec<MembershipTier>>> {
    let conn = &mut pool.get().await?;

    Ok(Json(
        membership_tiers::table
            .order(membership_tiers::fee_cents.asc())
            .load::<MembershipTier>(conn)
            .await?,
    ))
}

async fn create(
    Extension(pool): Extension<DbPool>,
    AdminOnly: AdminOnly,
    Json(req): Json<TierRequest>,
) -> AppResult<(StatusCode, Json<MembershipTier>)> {
    #[derive(Insertable)]
    #[diesel(table_name = membership_tiers)]
    struct NewTier {
        tier_name: String,
        fee_cents: i32,
        duration_months: Option<i32>,
        benefits: String,
    }

    validate(&req)?;

    let conn = &mut pool.get().await?;

    let tier = diesel::insert_into(membership_tiers::table)
        .values(NewTier {
            tier_name: req.tier_name,
            fee_cents: req.fee_cents,
            duration_months: req.duration_months,
            benefits: req.benefits,
        })
        .on_conflict(membership_tiers::tier_name)
        .do_nothing()
        .get_result::<MembershipTier>(conn)
        .await
        .optional()?;

    let Some(tier) = tier else {
        return Err(AppError::from(
            StatusCode::CONFLICT,
            "a tier with this name already exists",
        ));
    };

    Ok((StatusCode::CREATED, Json(tier)))
}

async fn edit(
    Extension(pool): Extension<DbPool>,
    Path(tier_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<TierRequest>,
) -> AppResult<Json<MembershipTier>> {
    #[derive(AsChangeset)]
    #[diesel(table_name = membership_tiers)]
    struct TierEdit {
        tier_name: String,
        fee_cents: i32,
        duration_months: Option<Option<i32>>,
        benefits: String,
    }

    validate(&req)?;

    let conn = &mut pool.get().await?;

    let updated = diesel::update(membership_tiers::table.find(tier_id))
        .set(TierEdit {
            tier_name: req.tier_name,
            fee_cents: req.fee_cents,
            duration_months: Some(req.duration_months),
            benefits: req.benefits,
        })
        .get_result::<MembershipTier>(conn)
        .await;

    match updated {
        Ok(tier) => Ok(Json(tier)),
        Err(DieselError::NotFound) => Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the tier does not exist",
        )),
        Err(e) => Err(map_constraint_error(e)),
    }
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path(tier_id): Path<i32>,
    AdminOnly: AdminOnly,
) -> AppResult<Json<()>> {
    let conn = &mut pool.get().await?;

    let deleted = diesel::delete(membership_tiers::table.find(tier_id))
        .execute(conn)
        .await;

    match deleted {
        Ok(0) => Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the tier does not exist",
        )),
        Ok(_) => Ok(Json(())),
        Err(e) => Err(map_constraint_error(e)),
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", put(edit).delete(remove))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        match err {
            AppError::ResponseStatusError(code, _) => code,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[test]
    fn duplicate_name_on_rename_is_a_conflict() {
        let unique = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_string()),
        );
        assert_eq!(status_of(map_constraint_error(unique)), StatusCode::CONFLICT);
    }

    #[test]
    fn referenced_tier_delete_is_a_conflict() {
        let fk = DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("violates foreign key constraint".to_string()),
        );
        assert_eq!(status_of(map_constraint_error(fk)), StatusCode::CONFLICT);
    }

    #[test]
    fn other_database_errors_stay_internal() {
        assert_eq!(
            status_of(map_constraint_error(DieselError::RollbackTransaction)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn rejects_bad_tier_fields() {
        let mut req = TierRequest {
            tier_name: "Annual".to_string(),
            fee_cents: 10_000,
            duration_months: Some(12),
            benefits: "newsletter".to_string(),
        };
        assert!(validate(&req).is_ok());

        req.tier_name = "  ".to_string();
        assert_eq!(
            status_of(validate(&req).unwrap_err()),
            StatusCode::BAD_REQUEST
        );

        req.tier_name = "Annual".to_string();
        req.fee_cents = -1;
        assert_eq!(
            status_of(validate(&req).unwrap_err()),
            StatusCode::BAD_REQUEST
        );

        req.fee_cents = 10_000;
        req.duration_months = Some(0);
        assert_eq!(
            status_of(validate(&req).unwrap_err()),
            StatusCode::BAD_REQUEST
        );
    }
}
