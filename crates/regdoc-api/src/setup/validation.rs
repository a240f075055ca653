//! Configuration validation
//!
//! Checks that only matter to the HTTP server; `Config::validate` covers the
//! rest and runs inside `Config::from_env`.

use anyhow::Result;
use regdoc_core::Config;

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;
    config.require_jwt_secret()?;

    if config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Set specific allowed origins via CORS_ORIGINS."
        ));
    }

    if config.anthropic_api_key().is_none() {
        tracing::warn!("ANTHROPIC_API_KEY not set - chat requests will fail with LLM_ERROR");
    }

    Ok(())
}
