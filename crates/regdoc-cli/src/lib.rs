//! Regdoc CLI support: identity resolution, service wiring and output
//! formatting for the `regdoc` binary.

use anyhow::Context;
use regdoc_core::models::{
    ChatMessage, Document, DocumentStats, MessageOrigin, MessageStatus, UploadFile, UserContext,
    UserRole,
};
use regdoc_core::{Config, RegionSet, ALL_REGIONS};
use regdoc_services::{
    document_stats, filter_documents, DocumentContextLoader, DocumentLister, DocumentListing,
    DocumentUploader, LanguageModel, QueryResponder,
};
use regdoc_storage::ObjectStorage;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

/// Identity label used when neither `--identity` nor `REGDOC_IDENTITY` is set.
pub const DEFAULT_IDENTITY: &str = "cli-user";

const HEALTH_PROBE_KEY: &str = ".regdoc-health";

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Initialize tracing for the CLI binary.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Build the session identity from the global flags.
///
/// Super administrators default to `ALL`; regional administrators must name a
/// configured region.
pub fn resolve_user(
    region: Option<&str>,
    role: Option<&str>,
    identity: Option<String>,
    regions: &RegionSet,
) -> anyhow::Result<UserContext> {
    let role = role.map(UserRole::from_tag).unwrap_or_default();
    let region = region.map(str::trim).filter(|r| !r.is_empty());

    let region = match (role, region) {
        (UserRole::SuperAdmin, None) => ALL_REGIONS.to_string(),
        (UserRole::SuperAdmin, Some(region)) => region.to_string(),
        (UserRole::RegionalAdmin, Some(region)) if regions.contains(region) => region.to_string(),
        (UserRole::RegionalAdmin, Some(region)) => anyhow::bail!(
            "Unknown region '{}'. Known regions: {}",
            region,
            regions.as_slice().join(", ")
        ),
        (UserRole::RegionalAdmin, None) => anyhow::bail!(
            "Regional administrators need a region (--region or REGDOC_REGION)"
        ),
    };

    let identity = identity.unwrap_or_else(|| DEFAULT_IDENTITY.to_string());
    Ok(UserContext::new(region, role, Some(identity)))
}

/// Services the commands run against, wired onto one storage handle and one
/// language model.
pub struct Portal {
    pub lister: DocumentLister,
    pub uploader: DocumentUploader,
    pub context_loader: DocumentContextLoader,
    pub responder: QueryResponder,
    storage: Arc<dyn ObjectStorage>,
}

impl Portal {
    pub fn new(
        config: &Config,
        storage: Arc<dyn ObjectStorage>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        let regions = config.regions().clone();
        Self {
            lister: DocumentLister::new(storage.clone(), regions.clone()),
            uploader: DocumentUploader::new(
                storage.clone(),
                regions,
                config.max_upload_size_bytes(),
            ),
            context_loader: DocumentContextLoader::new(
                storage.clone(),
                config.grounding_mode(),
                config.grounding_max_chars(),
            ),
            responder: QueryResponder::new(model, config.llm.max_tokens),
            storage,
        }
    }

    /// Grounding text for a stored document the user may read.
    pub async fn document_context(
        &self,
        user: &UserContext,
        key: &str,
    ) -> anyhow::Result<(Document, String)> {
        let document = self.lister.find_document(user, key).await?;
        let text = self.context_loader.load(&document).await;
        Ok((document, text))
    }

    pub async fn status(&self) -> StatusReport {
        let storage = match self.storage.exists(HEALTH_PROBE_KEY).await {
            Ok(_) => "ok".to_string(),
            Err(e) => format!("error: {}", e),
        };

        let configured = self.responder.is_configured();
        let connected = configured && self.responder.test_connection().await;

        StatusReport {
            storage_backend: self.storage.backend_type().to_string(),
            storage,
            model: self.responder.model_id().to_string(),
            configured,
            connected,
            regions: self.lister.regions().len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub storage_backend: String,
    pub storage: String,
    pub model: String,
    pub configured: bool,
    pub connected: bool,
    pub regions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedRegion {
    pub region: String,
    pub error: String,
}

/// What `regdoc list` prints.
#[derive(Debug, Clone, Serialize)]
pub struct ListOutput {
    pub documents: Vec<Document>,
    pub failed_regions: Vec<FailedRegion>,
    pub stats: DocumentStats,
    pub complete: bool,
}

impl ListOutput {
    pub fn new(
        listing: &DocumentListing,
        user: &UserContext,
        region_filter: Option<&str>,
        search: Option<&str>,
    ) -> Self {
        let documents = filter_documents(&listing.documents(), user, region_filter, search);
        let stats = document_stats(&documents);
        let failed_regions = listing
            .failed_regions()
            .into_iter()
            .map(|(region, error)| FailedRegion {
                region: region.to_string(),
                error: error.to_string(),
            })
            .collect();

        Self {
            documents,
            failed_regions,
            stats,
            complete: listing.is_complete(),
        }
    }
}

pub fn format_document_table(output: &ListOutput) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== Documents ===\n");
    let _ = writeln!(
        out,
        "Total: {} documents across {} regions ({})",
        output.stats.total, output.stats.regions, output.stats.total_size_label
    );

    for failed in &output.failed_regions {
        let _ = writeln!(
            out,
            "Warning: listing failed for {}: {}",
            failed.region, failed.error
        );
    }

    if output.documents.is_empty() {
        let _ = writeln!(out, "\nNo documents found.");
        return out;
    }

    let _ = writeln!(
        out,
        "\n{:<10} {:<40} {:>12} {:<20} {}",
        "Region", "Name", "Size", "Last Modified", "Key"
    );
    let _ = writeln!(out, "{}", "-".repeat(120));

    for doc in &output.documents {
        let _ = writeln!(
            out,
            "{:<10} {:<40} {:>12} {:<20} {}",
            truncate_string(&doc.region, 10),
            truncate_string(&doc.name, 40),
            doc.size_label,
            doc.last_modified.format("%Y-%m-%d %H:%M:%S"),
            doc.key
        );
    }
    out
}

/// Content type from the file extension.
pub fn guess_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

pub async fn read_upload_file(path: &Path) -> anyhow::Result<UploadFile> {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("'{}' has no file name", path.display()))?;
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(UploadFile::new(filename, guess_content_type(path), data))
}

/// One transcript entry as printed in the interactive session.
pub fn render_message(message: &ChatMessage) -> String {
    let speaker = match message.origin {
        MessageOrigin::User => "you",
        MessageOrigin::Assistant => "assistant",
    };
    match message.status {
        MessageStatus::Normal => format!("{}> {}", speaker, message.text),
        MessageStatus::Warning => format!("{} [warning]> {}", speaker, message.text),
        MessageStatus::Error => format!("{} [error]> {}", speaker, message.text),
    }
}

/// The quick question picked by typing its number (1-based).
pub fn quick_question_for<'a>(input: &str, questions: &'a [String]) -> Option<&'a str> {
    let index = input.trim().parse::<usize>().ok()?;
    questions
        .get(index.checked_sub(1)?)
        .map(String::as_str)
}
