use crate::auth::models::JwtClaims;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use regdoc_core::AppError;
use std::sync::Arc;

pub struct AuthState {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthState {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Verify signature and expiry of a bearer token
    pub fn verify(&self, token: &str) -> Result<JwtClaims, AppError> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Unauthorized("Token expired".to_string()),
                ErrorKind::ImmatureSignature => {
                    AppError::Unauthorized("Token not yet valid".to_string())
                }
                _ => AppError::Unauthorized("Invalid token".to_string()),
            })
    }
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    };

    let claims = match auth_state.verify(token.trim()) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Token verification failed");
            return HttpAppError(e).into_response();
        }
    };

    let user = claims.user_context();
    tracing::debug!(
        identity = %user.identity,
        region = %user.region,
        role = %user.role,
        "Request authenticated"
    );

    request.extensions_mut().insert(user);
    next.run(request).await
}
