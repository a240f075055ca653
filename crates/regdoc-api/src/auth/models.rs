use crate::error::HttpAppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use regdoc_core::models::{UserContext, UserRole};
use regdoc_core::AppError;
use serde::{Deserialize, Serialize};

/// Region assumed when a token carries no `custom:region` claim
pub const UNKNOWN_REGION: &str = "UNKNOWN";

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "custom:region", default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(rename = "custom:role", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

impl JwtClaims {
    /// Missing region becomes `UNKNOWN`, missing or unknown role becomes a
    /// regional administrator, and the identity prefers the email.
    pub fn user_context(&self) -> UserContext {
        let region = self
            .region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(UNKNOWN_REGION);
        let role = self
            .role
            .as_deref()
            .map(UserRole::from_tag)
            .unwrap_or_default();
        let identity = self
            .email
            .clone()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| self.sub.clone());

        UserContext::new(region, role, Some(identity))
    }
}

/// Authenticated caller, inserted into request extensions by the auth
/// middleware. Extracted from parts so it composes with `Multipart`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserContext);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserContext>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(
                    "Missing user context".to_string(),
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(region: Option<&str>, role: Option<&str>, email: Option<&str>) -> JwtClaims {
        JwtClaims {
            sub: "user-123".to_string(),
            email: email.map(String::from),
            region: region.map(String::from),
            role: role.map(String::from),
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn claims_map_to_user_context() {
        let user = claims(Some("REGION-7"), Some("admin"), Some("ra7@treasury.gov.ph")).user_context();
        assert_eq!(user.region, "REGION-7");
        assert_eq!(user.role, UserRole::RegionalAdmin);
        assert_eq!(user.identity, "ra7@treasury.gov.ph");

        let admin = claims(Some("ALL"), Some("super-admin"), None).user_context();
        assert!(admin.role.is_super_admin());
        assert_eq!(admin.identity, "user-123");
    }

    #[test]
    fn missing_claims_fall_back() {
        let user = claims(None, None, None).user_context();
        assert_eq!(user.region, UNKNOWN_REGION);
        assert_eq!(user.role, UserRole::RegionalAdmin);
    }

    #[test]
    fn custom_claim_names_deserialize() {
        let json = serde_json::json!({
            "sub": "abc",
            "email": "sa@treasury.gov.ph",
            "custom:region": "ALL",
            "custom:role": "super-admin",
            "exp": 2_000_000_000i64,
            "iat": 1_700_000_000i64,
        });
        let claims: JwtClaims = serde_json::from_value(json).unwrap();
        assert_eq!(claims.region.as_deref(), Some("ALL"));
        assert_eq!(claims.role.as_deref(), Some("super-admin"));
    }
}
