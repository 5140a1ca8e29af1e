use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core components, leaf-first.
pub mod auth;
pub mod config;
pub mod errors;
pub mod guards;
pub mod models;
pub mod repository;
pub mod store;
pub mod validation;
pub mod workflow;

// HTTP glue.
pub mod handlers;
pub mod routes;
use auth::{AuthUser, TokenService};
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use errors::{ApiError, StoreError};
pub use repository::{InMemoryRepository, Repository, RepositoryState};

/// ApiDoc
///
/// OpenAPI document assembled from the `#[utoipa::path]` handlers and
/// `#[derive(ToSchema)]` models. Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login, handlers::logout, handlers::list_users, handlers::reset_users,
        handlers::list_students, handlers::get_student, handlers::create_enrollment,
        handlers::delete_student, handlers::reset_enrollments
    ),
    components(
        schemas(
            models::Role, models::User, models::Student, models::Course, models::Enrollment,
            models::LoginRequest, models::SessionResponse, models::EnrollmentBody,
            models::StudentBody, models::StudentSummary, models::CourseRef,
        )
    ),
    tags(
        (name = "enrollment-registry", description = "Student enrollment registry API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, cheaply clonable container for the record store handle, the token service
/// and the configuration.
#[derive(Clone)]
pub struct AppState {
    pub repo: RepositoryState,
    pub tokens: TokenService,
    pub config: AppConfig,
}

impl AppState {
    /// Builds the state, deriving the token service from the configured secret.
    pub fn new(config: AppConfig, repo: RepositoryState) -> Self {
        Self {
            repo,
            tokens: TokenService::new(&config.jwt_secret),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for TokenService {
    fn from_ref(app_state: &AppState) -> TokenService {
        app_state.tokens.clone()
    }
}

/// auth_middleware
///
/// Rejects requests without a valid bearer token before any handler or body
/// extraction runs. The `AuthUser` extractor does the work and answers 401 on failure.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routes, the authentication layer, the observability stack and CORS.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS
    // The registry is called from browser front ends on other origins.
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Correlation header shared by the request-id layers and the trace span.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Protected Routes
    // `route_layer` runs the token check only for matched routes, so unknown paths
    // still answer 404 instead of 401. Role checks happen later, in the workflows.
    let protected = authenticated::authenticated_routes()
        .merge(admin::admin_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // 3. Base Router Assembly
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(protected)
        .with_state(state);

    // 4. Observability Layers
    base_router
        .layer(
            ServiceBuilder::new()
                // 4a. Tag every request with a fresh UUID.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 4b. One span per request, closed with status and latency.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 4c. Echo the id back so clients can quote it.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for every request, tagged with the `x-request-id` set by the layer above so all
/// log lines of one request correlate.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
