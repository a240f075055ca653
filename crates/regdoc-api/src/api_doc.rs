//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use regdoc_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Regdoc API",
        version = "0.1.0",
        description = "Regional document portal (v0): role-scoped document listing, uploads into region partitions, and questions answered by a language model grounded on a selected document. All endpoints are versioned under /api/v0/."
    ),
    paths(
        // Documents
        handlers::documents::list_documents,
        handlers::documents::upload_document,
        handlers::documents::get_document_context,
        // Chat
        handlers::chat::ask,
        handlers::chat::chat_status,
        handlers::chat::chat_welcome,
        // Regions
        handlers::regions::list_regions,
    ),
    components(
        schemas(
            models::Document,
            models::DocumentStats,
            models::UploadReceipt,
            handlers::documents::DocumentListResponse,
            handlers::documents::FailedRegion,
            handlers::documents::UploadResponse,
            handlers::documents::DocumentContextResponse,
            handlers::chat::ChatRequest,
            handlers::chat::ChatResponse,
            handlers::chat::ChatStatusResponse,
            handlers::chat::WelcomeResponse,
            handlers::regions::RegionsResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "documents", description = "Role-scoped listing, upload and grounding context"),
        (name = "chat", description = "Questions answered by the language model"),
        (name = "regions", description = "Configured region partitions")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_versioned_paths() {
        let spec = get_openapi_spec();
        for path in [
            "/api/v0/documents",
            "/api/v0/documents/context",
            "/api/v0/chat",
            "/api/v0/chat/status",
            "/api/v0/regions",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
        let components = spec.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
