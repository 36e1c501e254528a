use crate::error::AppError;
use axum::{
    extract::{FromRequest, RequestParts, TypedHeader},
    headers::{authorization::Bearer, Authorization},
    http::StatusCode,
};
use jsonwebtoken::{
    errors::Result as JwtResult, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use password_hash::{
    self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use serde::{Deserialize, Serialize};
use std::{ops::Deref, time::Duration};

use argon2::Argon2;

pub fn hash_password(password: impl AsRef<[u8]>) -> password_hash::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_ref(), &salt)
        .map(|h| h.to_string())
}

pub fn verify_password(
    password: impl AsRef<[u8]>,
    password_hash: impl AsRef<str>,
) -> password_hash::Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash.as_ref())?;
    Ok(Argon2::default()
        .verify_password(password.as_ref(), &parsed_hash)
        .is_ok())
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

lazy_static::lazy_static! {
    static ref KEYS: Keys = {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        Keys {
            encoding: EncodingKey::from_base64_secret(&secret).expect("JWT_SECRET is not valid base64"),
            decoding: DecodingKey::from_base64_secret(&secret).expect("JWT_SECRET is not valid base64"),
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Alumni,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Alumni => "alumni",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "alumni" => Some(Role::Alumni),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub role: Role,
    pub exp: u64,
}

#[allow(unused_must_use)]
pub fn ensure_jwt_secret_is_valid() {
    KEYS.deref();
}

pub fn generate_jwt(user_id: i32, role: Role, exp: Duration) -> JwtResult<String> {
    jsonwebtoken::encode(
        &Header::default(),
        &Claims {
            user_id,
            role,
            exp: jsonwebtoken::get_current_timestamp() + exp.as_secs(),
        },
        &KEYS.encoding,
    )
}

pub fn validate_jwt(token: &str) -> JwtResult<TokenData<Claims>> {
    jsonwebtoken::decode::<Claims>(token, &KEYS.decoding, &Validation::default())
}

/// Claims of the authenticated caller, taken from the bearer token.
pub struct ExtractAuth(pub Claims);

#[axum::async_trait]
impl<B: Send> FromRequest<B> for ExtractAuth {
    type Rejection = AppError;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request(req)
                .await
                .map_err(|_| {
                    AppError::from(StatusCode::UNAUTHORIZED, "missing authorization token")
                })?;

        let token = validate_jwt(bearer.token())
            .map_err(|_| AppError::from(StatusCode::UNAUTHORIZED, "invalid or expired token"))?;

        Ok(ExtractAuth(token.claims))
    }
}

/// Rejects the request unless the bearer token belongs to an admin.
pub struct AdminOnly;

#[axum::async_trait]
impl<B: Send> FromRequest<B> for AdminOnly {
    type Rejection = AppError;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let ExtractAuth(claims) = ExtractAuth::from_request(req).await?;
        if claims.role != Role::Admin {
            return Err(AppError::from(
                StatusCode::FORBIDDEN,
                "admin access required",
            ));
        }
        Ok(AdminOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_test_secret() {
        // fixed base64 secret shared by all jwt tests
        std::env::set_var(
            "JWT_SECRET",
            "c2VjcmV0LXNlY3JldC1zZWNyZXQtc2VjcmV0ISE=",
        );
    }

    #[test]
    fn password_roundtrip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn hash_is_salted() {
        let a = hash_password("hunter2").unwrap();
        let b = hash_password("hunter2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn jwt_roundtrip_keeps_claims() {
        set_test_secret();
        let token = generate_jwt(7, Role::Alumni, Duration::from_secs(60)).unwrap();
        let data = validate_jwt(&token).unwrap();
        assert_eq!(data.claims.user_id, 7);
        assert_eq!(data.claims.role, Role::Alumni);
    }

    #[test]
    fn tampered_jwt_is_rejected() {
        set_test_secret();
        let mut token = generate_jwt(7, Role::Admin, Duration::from_secs(60)).unwrap();
        token.push('x');
        assert!(validate_jwt(&token).is_err());
    }

    #[test]
    fn role_parse_roundtrip() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("alumni"), Some(Role::Alumni));
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(Role::Admin.as_str()), Some(Role::Admin));
    }
}
