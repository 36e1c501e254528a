use super::registrations::STATUS_PENDING;
use crate::{
    auth::{self, ExtractAuth, Role},
    error::{AppError, AppResult},
    models::{AdminProfile, AlumniProfile, MembershipTier, User},
    schema::*,
    DbPool,
};
use axum::{
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub department: String,
    pub degree: String,
    pub graduation_year: i32,
    pub phone: String,
    pub current_employer: Option<String>,
    pub designation: Option<String>,
    pub address: Option<String>,
    pub tier_id: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterResponse {
    pub profile_id: i32,
    pub message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthorizedResponse {
    pub token: String,
    pub role: Role,
}

impl AuthorizedResponse {
    fn from_user(user: &User) -> AppResult<AuthorizedResponse> {
        let role = Role::parse(&user.role)
            .ok_or_else(|| anyhow::anyhow!("user {} has unknown role {}", user.id, user.role))?;
        // expires after one day
        Ok(AuthorizedResponse {
            token: auth::generate_jwt(user.id, role, Duration::from_secs(24 * 60 * 60))?,
            role,
        })
    }
}

/// Returns the selected tier id once the request passes the presence checks.
fn validate(req: &RegisterRequest) -> AppResult<i32> {
    if req.email.trim().is_empty() || req.full_name.trim().is_empty() {
        return Err(AppError::from(
            StatusCode::BAD_REQUEST,
            "email and full name are required",
        ));
    }
    if req.password.len() < 8 {
        return Err(AppError::from(
            StatusCode::BAD_REQUEST,
            "password must be at least 8 characters",
        ));
    }
    req.tier_id.ok_or_else(|| {
        AppError::from(
            StatusCode::BAD_REQUEST,
            "a membership tier must be selected",
        )
    })
}

async fn register(
    Extension(pool): Extension<DbPool>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    #[derive(Insertable)]
    #[diesel(table_name = users)]
    struct NewUser {
        email: String,
        password_hash: String,
        role: String,
        verified: bool,
    }

    #[derive(Insertable)]
    #[diesel(table_name = alumni_profiles)]
    struct NewAlumniProfile {
        user_id: i32,
        full_name: String,
        department: String,
        degree: String,
        graduation_year: i32,
        phone: String,
        current_employer: Option<String>,
        designation: Option<String>,
        address: Option<String>,
        status: String,
        requested_tier_id: i32,
    }

    let tier_id = validate(&req)?;

    let conn = &mut pool.get().await?;

    let tier = membership_tiers::table
        .find(tier_id)
        .first::<MembershipTier>(conn)
        .await
        .optional()?;
    if tier.is_none() {
        return Err(AppError::from(
            StatusCode::BAD_REQUEST,
            "the selected membership tier does not exist",
        ));
    }

    let new_user = diesel::insert_into(users::table)
        .values(NewUser {
            email: req.email,
            password_hash: auth::hash_password(req.password)?,
            role: Role::Alumni.as_str().to_string(),
            verified: false,
        })
        .on_conflict(users::email)
        .do_nothing()
        .get_result::<User>(conn)
        .await
        .optional()?;

    let Some(new_user) = new_user else {
        return Err(AppError::from(
            StatusCode::CONFLICT,
            "an account with this email already exists",
        ));
    };

    let profile_id = diesel::insert_into(alumni_profiles::table)
        .values(NewAlumniProfile {
            user_id: new_user.id,
            full_name: req.full_name,
            department: req.department,
            degree: req.degree,
            graduation_year: req.graduation_year,
            phone: req.phone,
            current_employer: req.current_employer,
            designation: req.designation,
            address: req.address,
            status: STATUS_PENDING.to_string(),
            requested_tier_id: tier_id,
        })
        .returning(alumni_profiles::id)
        .get_result::<i32>(conn)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            profile_id,
            message: "Registration submitted, awaiting admin approval.".to_string(),
        }),
    ))
}

async fn login(
    Extension(pool): Extension<DbPool>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthorizedResponse>> {
    use crate::schema::users::dsl::*;

    let conn = &mut pool.get().await?;

    if let Some(user) = users
        .filter(email.eq(req.email))
        .first::<User>(conn)
        .await
        .optional()?
    {
        if auth::verify_password(req.password, &user.password_hash)? {
            return Ok(Json(AuthorizedResponse::from_user(&user)?));
        }
    }
    Err(AppError::from(
        StatusCode::UNAUTHORIZED,
        "invalid email or password",
    ))
}

#[derive(Serialize)]
#[serde(untagged)]
enum MeProfile {
    Admin(AdminProfile),
    Alumni(AlumniProfile),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MeResponse {
    email: String,
    role: Role,
    verified: bool,
    profile: Option<MeProfile>,
}

async fn me(
    Extension(pool): Extension<DbPool>,
    ExtractAuth(claims): ExtractAuth,
) -> AppResult<Json<MeResponse>> {
    let conn = &mut pool.get().await?;

    let user = users::table
        .find(claims.user_id)
        .first::<User>(conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::from(StatusCode::UNAUTHORIZED, "the account no longer exists"))?;

    let profile = match claims.role {
        Role::Admin => admin_profiles::table
            .filter(admin_profiles::user_id.eq(user.id))
            .first::<AdminProfile>(conn)
            .await
            .optional()?
            .map(MeProfile::Admin),
        Role::Alumni => alumni_profiles::table
            .filter(alumni_profiles::user_id.eq(user.id))
            .first::<AlumniProfile>(conn)
            .await
            .optional()?
            .map(MeProfile::Alumni),
    };

    Ok(Json(MeResponse {
        email: user.email,
        role: claims.role,
        verified: user.verified,
        profile,
    }))
}

pub fn app() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            email: "a.sharma@example.org".to_string(),
            password: "correct horse".to_string(),
            full_name: "A. Sharma".to_string(),
            department: "Civil Engineering".to_string(),
            degree: "B.Tech".to_string(),
            graduation_year: 2019,
            phone: "9876543210".to_string(),
            current_employer: None,
            designation: None,
            address: None,
            tier_id: Some(2),
        }
    }

    fn status_of(err: AppError) -> StatusCode {
        match err {
            AppError::ResponseStatusError(code, _) => code,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[test]
    fn valid_registration_passes_with_its_tier() {
        assert_eq!(validate(&valid_request()).unwrap(), 2);
    }

    #[test]
    fn registration_without_a_tier_is_rejected() {
        let mut req = valid_request();
        req.tier_id = None;
        assert_eq!(
            status_of(validate(&req).unwrap_err()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn short_password_is_rejected() {
        let mut req = valid_request();
        req.password = "short".to_string();
        assert_eq!(
            status_of(validate(&req).unwrap_err()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn blank_email_or_name_is_rejected() {
        let mut req = valid_request();
        req.email = "   ".to_string();
        assert_eq!(
            status_of(validate(&req).unwrap_err()),
            StatusCode::BAD_REQUEST
        );

        let mut req = valid_request();
        req.full_name = String::new();
        assert_eq!(
            status_of(validate(&req).unwrap_err()),
            StatusCode::BAD_REQUEST
        );
    }
}
