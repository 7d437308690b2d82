//! OpenAPI documentation.
//!
//! # Responsibilities
//! - Describe the HTTP surface with `utoipa`
//! - Fill title, description and version from settings
//! - Mount Swagger UI and the JSON document when enabled
//!
//! # Design Decisions
//! - Documentation routes bypass the origin guard and request logging
//! - Bearer scheme is declared only; nothing enforces it

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::OpenApi as OpenApiDocument;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Settings;
use crate::observability::AppLogger;

/// Log context for documentation messages.
const CONTEXT: &str = "ApiDocs";

/// Name of the bearer security scheme.
pub const BEARER_SCHEME: &str = "bearer";

/// Adds the bearer JWT scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut OpenApiDocument) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Static part of the document; [`build_document`] adds the configured info.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(crate::http::handlers::health),
    components(schemas(
        crate::http::response::ErrorResponse,
        crate::health::HealthReport,
        crate::health::IndicatorDetail,
        crate::health::HealthStatus,
        crate::health::ReportStatus,
    )),
    tags((name = "health", description = "Dependency health"))
)]
pub struct ApiDoc;

/// The document with title, description and version from `settings`.
pub fn build_document(settings: &Settings) -> OpenApiDocument {
    let mut document = ApiDoc::openapi();
    document.info.title = settings.swagger.title.clone();
    document.info.description = Some(settings.swagger.description.clone());
    document.info.version = settings.app.version.clone();
    document
}

/// Merge documentation routes into `router` when enabled.
pub fn mount_docs(router: Router, settings: &Settings, logger: &AppLogger) -> Router {
    if !settings.swagger.enabled {
        logger.log("Swagger is disabled", Some(CONTEXT));
        return router;
    }

    let ui = SwaggerUi::new(settings.swagger.mount_path())
        .url(settings.swagger.document_path(), build_document(settings));

    logger.log(
        &format!(
            "Swagger is running on: http://localhost:{}/{}",
            settings.app.port,
            settings.swagger.path.trim_matches('/')
        ),
        Some(CONTEXT),
    );
    router.merge(ui)
}
