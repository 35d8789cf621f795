//! Bearer-token authentication for organizer routes
//!
//! Tokens are verified statelessly against the JWT secret. Handlers opt in
//! by taking an [`AuthenticatedUser`] or [`Organizer`] argument.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts};
use tracing::debug;

use crate::domain::{DomainError, UserRole};
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};
use crate::interfaces::http::common::ApiError;

#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Caller identity taken from a valid bearer token.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    fn from_claims(claims: TokenClaims) -> Result<Self, DomainError> {
        let user_id = claims
            .sub
            .parse()
            .map_err(|_| DomainError::Unauthorized("Invalid authentication token".into()))?;
        Ok(Self {
            user_id,
            role: claims.role(),
            email: claims.email,
        })
    }

    pub fn is_organizer(&self) -> bool {
        self.role == UserRole::Organizer
    }
}

fn bearer(parts: &Parts) -> Result<&str, DomainError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| DomainError::Unauthorized("Missing authentication token".into()))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| DomainError::Unauthorized("Invalid authentication token".into()))
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);
        let token = bearer(parts)?;
        let claims = verify_token(token, &auth.jwt_config).map_err(|e| {
            debug!(error = %e, "Rejected bearer token");
            DomainError::Unauthorized("Invalid authentication token".into())
        })?;
        Ok(Self::from_claims(claims)?)
    }
}

/// An authenticated caller holding the organizer role.
#[derive(Clone, Debug)]
pub struct Organizer(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for Organizer
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        if !user.is_organizer() {
            return Err(DomainError::Forbidden("Organizer role required".into()).into());
        }
        Ok(Organizer(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use crate::infrastructure::crypto::jwt::create_token;

    fn state() -> AuthState {
        AuthState {
            jwt_config: JwtConfig::new("test-secret", 1),
        }
    }

    fn parts(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(v) = auth {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn missing_header_is_401() {
        let err = AuthenticatedUser::from_request_parts(&mut parts(None), &state())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn foreign_signature_is_401() {
        let other = JwtConfig::new("other-secret", 1);
        let token = create_token(1, "a@fest.io", UserRole::Organizer, &other).unwrap();
        let header = format!("Bearer {token}");
        let err = AuthenticatedUser::from_request_parts(&mut parts(Some(&header)), &state())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn public_user_is_not_an_organizer() {
        let s = state();
        let token = create_token(3, "fan@fest.io", UserRole::Public, &s.jwt_config).unwrap();
        let header = format!("Bearer {token}");

        let user = AuthenticatedUser::from_request_parts(&mut parts(Some(&header)), &s)
            .await
            .unwrap();
        assert_eq!(user.user_id, 3);
        assert!(!user.is_organizer());

        let err = Organizer::from_request_parts(&mut parts(Some(&header)), &s)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn organizer_token_passes() {
        let s = state();
        let token = create_token(1, "boss@fest.io", UserRole::Organizer, &s.jwt_config).unwrap();
        let header = format!("Bearer {token}");
        let Organizer(user) = Organizer::from_request_parts(&mut parts(Some(&header)), &s)
            .await
            .unwrap();
        assert_eq!(user.email, "boss@fest.io");
    }
}
