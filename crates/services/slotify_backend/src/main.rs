// File: services/slotify_backend/src/main.rs
use axum::{routing::get, Router};
use slotify_common::{config_error, logging, SlotifyError};
use slotify_config::load_config;
use slotify_gcal::{routes as gcal_routes, SlotEngine};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

mod service_factory;

#[tokio::main]
async fn main() -> Result<(), SlotifyError> {
    let config = Arc::new(load_config().map_err(config_error)?);
    // Dropping the guard stops the file writer, keep it for the process lifetime.
    let _log_guard = logging::init(&config.logging);

    let store = logging::log_result(
        service_factory::build_store(&config.calendar).await,
        "Calendar store ready",
        "Calendar store setup failed",
    )?;
    let engine = Arc::new(SlotEngine::from_config(store, &config.calendar)?);
    info!(
        zone = %engine.zone(),
        agendas = ?engine.list_agendas().agendas,
        "Slot engine ready"
    );

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to Slotify API!" }))
        .merge(gcal_routes::routes(engine));

    #[allow(unused_mut)] // only mutated with the openapi feature
    let mut app = Router::new().nest("/api", api_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use slotify_gcal::doc::GcalApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Slotify API",
                version = "0.1.0",
                description = "Bookable slots on top of Google Calendar",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Slotify", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(GcalApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    let app = app.layer(TraceLayer::new_for_http());

    // Bind and serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
