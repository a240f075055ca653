//! Configuration module
//!
//! Configuration is read once from the environment (a `.env` file is honoured)
//! and shared read-only by the API, the CLI and the services.

use std::env;
use std::str::FromStr;

use crate::region::RegionSet;
use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 4000;
const MAX_UPLOAD_SIZE_MB: usize = 50;
const DEFAULT_ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
const DEFAULT_LLM_MODEL: &str = "claude-3-5-sonnet-20240620";
const DEFAULT_LLM_MAX_TOKENS: u32 = 1000;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;
const DEFAULT_GROUNDING_MAX_CHARS: usize = 20_000;

/// Where the text handed to the model for a selected document comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroundingMode {
    /// Read the object's bytes and use them when they are text.
    #[default]
    Content,
    /// Synthesised summary built from the document's listing entry.
    Placeholder,
}

impl GroundingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroundingMode::Content => "content",
            GroundingMode::Placeholder => "placeholder",
        }
    }
}

impl FromStr for GroundingMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "content" => Ok(GroundingMode::Content),
            "placeholder" => Ok(GroundingMode::Placeholder),
            _ => Err(anyhow::anyhow!(
                "GROUNDING_MODE must be 'content' or 'placeholder', got '{}'",
                s
            )),
        }
    }
}

/// Object storage settings
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    // Custom endpoint for S3-compatible providers (MinIO, LocalStack, ...)
    pub s3_endpoint: Option<String>,
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
}

impl StorageConfig {
    /// Region for the S3 client; `S3_REGION` wins over `AWS_REGION`.
    pub fn effective_s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref().or(self.aws_region.as_deref())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::S3,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: None,
        }
    }
}

/// Hosted language model settings
#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub anthropic_api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            api_base: DEFAULT_ANTHROPIC_API_BASE.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            max_tokens: DEFAULT_LLM_MAX_TOKENS,
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub jwt_secret: Option<String>,
    pub regions: RegionSet,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub max_upload_size_bytes: usize,
    pub grounding_mode: GroundingMode,
    pub grounding_max_chars: usize,
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server_port: DEFAULT_PORT,
            cors_origins: vec!["*".to_string()],
            jwt_secret: None,
            regions: RegionSet::default(),
            storage: StorageConfig::default(),
            llm: LlmConfig::default(),
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            grounding_mode: GroundingMode::Content,
            grounding_max_chars: DEFAULT_GROUNDING_MAX_CHARS,
            log_format: "compact".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());
        let is_production = is_production_env(&environment);

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let regions = match env::var("REGIONS") {
            Ok(list) => RegionSet::parse(&list)?,
            Err(_) => RegionSet::default(),
        };

        let backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::S3,
        };

        let storage = StorageConfig {
            backend,
            s3_bucket: non_empty_var("S3_BUCKET"),
            s3_region: non_empty_var("S3_REGION"),
            s3_endpoint: non_empty_var("S3_ENDPOINT"),
            aws_region: non_empty_var("AWS_REGION"),
            local_storage_path: non_empty_var("LOCAL_STORAGE_PATH"),
        };

        let llm = LlmConfig {
            anthropic_api_key: non_empty_var("ANTHROPIC_API_KEY"),
            api_base: env::var("ANTHROPIC_API_BASE")
                .unwrap_or_else(|_| DEFAULT_ANTHROPIC_API_BASE.to_string()),
            model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            max_tokens: env::var("LLM_MAX_TOKENS")
                .unwrap_or_else(|_| DEFAULT_LLM_MAX_TOKENS.to_string())
                .parse()
                .unwrap_or(DEFAULT_LLM_MAX_TOKENS),
            timeout_secs: env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_LLM_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_LLM_TIMEOUT_SECS),
        };

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let grounding_mode = match env::var("GROUNDING_MODE") {
            Ok(value) => value.parse::<GroundingMode>()?,
            Err(_) => GroundingMode::Content,
        };

        let config = Config {
            environment,
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            jwt_secret: non_empty_var("JWT_SECRET"),
            regions,
            storage,
            llm,
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            grounding_mode,
            grounding_max_chars: env::var("GROUNDING_MAX_CHARS")
                .unwrap_or_else(|_| DEFAULT_GROUNDING_MAX_CHARS.to_string())
                .parse()
                .unwrap_or(DEFAULT_GROUNDING_MAX_CHARS),
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "compact".to_string())
                .to_lowercase(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.llm.max_tokens == 0 {
            return Err(anyhow::anyhow!("LLM_MAX_TOKENS must be greater than 0"));
        }

        match self.storage.backend {
            StorageBackend::S3 => {
                if self.storage.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.storage.effective_s3_region().is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.storage.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    /// The API verifies identity tokens and cannot start without a secret; the
    /// CLI never calls this.
    pub fn require_jwt_secret(&self) -> Result<&str, anyhow::Error> {
        let secret = self
            .jwt_secret
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?;
        if secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }
        Ok(secret)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn regions(&self) -> &RegionSet {
        &self.regions
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage.backend
    }

    pub fn anthropic_api_key(&self) -> Option<&str> {
        self.llm.anthropic_api_key.as_deref()
    }

    pub fn llm_model(&self) -> &str {
        &self.llm.model
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_upload_size_bytes
    }

    pub fn grounding_mode(&self) -> GroundingMode {
        self.grounding_mode
    }

    pub fn grounding_max_chars(&self) -> usize {
        self.grounding_max_chars
    }

    pub fn log_format(&self) -> &str {
        &self.log_format
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}
