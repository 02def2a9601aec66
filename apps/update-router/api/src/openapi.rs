use utoipa::OpenApi;

/// Root document; domain paths are nested under every API root.
#[derive(OpenApi)]
#[openapi(info(
    title = "module-update-router",
    description = "Routes insights-core clients to the testing or release update channel"
))]
pub struct ApiDoc;

pub fn document(roots: &[String]) -> utoipa::openapi::OpenApi {
    roots.iter().fold(ApiDoc::openapi(), |doc, root| {
        doc.nest(root.as_str(), domain_channels::ApiDoc::openapi())
            .nest(root.as_str(), domain_events::ApiDoc::openapi())
    })
}
