use jsonwebtoken::{encode, EncodingKey, Header};
use regdoc_api::auth::JwtClaims;

/// Test signing secret (must match the config built by setup_test_app).
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

pub fn mint_token(region: &str, role: &str, email: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = JwtClaims {
        sub: format!("sub-{}", email),
        email: Some(email.to_string()),
        region: Some(region.to_string()),
        role: Some(role.to_string()),
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}

pub fn regional_admin(region: &str) -> String {
    mint_token(region, "admin", &format!("{}@treasury.gov.ph", region.to_lowercase()))
}

pub fn super_admin() -> String {
    mint_token("ALL", "super-admin", "central@treasury.gov.ph")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
