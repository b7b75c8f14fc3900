//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::handlers::{probe, settings, system};

/// OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "voice-hub",
        description = "Connection hub for remotely hosted voice-AI servers."
    ),
    paths(
        system::health_handler,
        system::chat_params_handler,
        settings::get_settings,
        settings::update_settings,
        probe::start_probe,
        probe::get_probe,
        probe::celebrate,
    ),
    tags(
        (name = "System", description = "Health and fixed configuration"),
        (name = "Settings", description = "Saved server address and embed toggle"),
        (name = "Probe", description = "WebSocket handshake probe"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_rest_path() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/config/chat-params",
            "/api/v1/settings",
            "/api/v1/probe",
            "/api/v1/celebrate",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
