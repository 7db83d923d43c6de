pub mod auth;
pub mod booking;
pub mod db;
pub mod error;
pub mod handlers;
pub mod ical;
pub mod models;
pub mod openapi;
pub mod seed;
pub mod settings;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use handlers::{account, admin, classes, healthz_live, healthz_ready, root};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::booking::BookingService;
use crate::db::Database;
use crate::ical::ICalExporter;
use crate::openapi::ApiDoc;
use crate::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub db: Database,
    pub bookings: Arc<BookingService>,
    pub exporter: Arc<ICalExporter>,
}

impl AppState {
    pub fn new(settings: Settings, db: Database) -> Self {
        Self {
            bookings: Arc::new(BookingService::new(db.classes())),
            exporter: Arc::new(ICalExporter::new("My Gym Classes")),
            settings,
            db,
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let db = Database::connect(&settings.database_url).await?;
    seed::ensure_admin(&db, &settings).await?;
    if settings.seed_demo_data {
        seed::seed_demo_data(&db).await?;
    }

    let state = AppState::new(settings, db.clone());
    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!("Starting Gym Booking API on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        return;
    }
    info!("Shutdown signal received");
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .route("/api/auth/register", post(account::register))
        .route("/api/auth/login", post(account::login))
        .route("/api/auth/me", get(account::me))
        .route(
            "/api/classes",
            get(classes::list_classes).post(classes::create_class),
        )
        .route("/api/classes/mine", get(classes::my_classes))
        .route("/api/classes/myclasses", get(classes::my_classes))
        .route("/api/classes/mine.ical", get(classes::my_classes_ical))
        .route("/api/classes/{id}", delete(classes::delete_class))
        .route(
            "/api/classes/{id}/book",
            post(classes::book_class).delete(classes::cancel_booking),
        )
        .route("/api/plans", get(admin::list_plans))
        .route(
            "/api/admin/plans",
            get(admin::list_plans).post(admin::create_plan),
        )
        .route("/api/admin/plans/{id}", delete(admin::delete_plan))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/{id}/role", put(admin::update_user_role))
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(trace_layer)
}
