use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::auth::{IdentityVerifier, RegistryVerifier, SharedSecretCredentials};
use crate::config::AppConfig;
use crate::database::Store;
use crate::handlers::{protected, public};
use crate::middleware::method_not_allowed;
use crate::services::ChannelService;

/// Shared handles passed to every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub channels: ChannelService,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// State using the shared-secret verifier over the store's user registry
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        let credentials = SharedSecretCredentials::new(config.security.shared_secret.clone());
        let verifier = Arc::new(RegistryVerifier::new(credentials, store.clone()));
        Self::with_verifier(store, verifier, config)
    }

    pub fn with_verifier(
        store: Arc<dyn Store>,
        verifier: Arc<dyn IdentityVerifier>,
        config: AppConfig,
    ) -> Self {
        Self {
            channels: ChannelService::new(store.clone(), config.database.append_max_attempts),
            store,
            verifier,
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    with_reporting(routes(), state)
}

/// Every endpoint, before the reporting and authentication layers
pub fn routes() -> Router<AppState> {
    Router::new()
        // Public
        .route("/health", get(public::health).fallback(method_not_allowed))
        // Authenticated
        .merge(channel_routes())
}

/// Wrap `routes` in the error reporting, authentication and transport layers
/// and bind the state. Unknown paths and methods answer with the error envelope.
pub fn with_reporting(routes: Router<AppState>, state: AppState) -> Router {
    let config = state.config.clone();

    // Listed outermost first: the trace policy sees every error envelope,
    // including those from panics and from authentication.
    let reporting = ServiceBuilder::new()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::apply_trace_policy,
        ))
        .layer(CatchPanicLayer::custom(crate::middleware::handle_panic))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::authenticate,
        ));

    let mut router = routes
        .fallback(crate::middleware::route_not_found)
        .layer(reporting)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    if config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}

fn channel_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/channel",
            get(protected::channel_list)
                .post(protected::channel_create)
                .fallback(method_not_allowed),
        )
        .route(
            "/channel/:slug",
            get(protected::channel_get).fallback(method_not_allowed),
        )
        .route(
            "/channel/:slug/item",
            get(protected::item_list)
                .post(protected::item_create)
                .fallback(method_not_allowed),
        )
        .route(
            "/channel/:slug/item/:item_slug",
            get(protected::item_get).fallback(method_not_allowed),
        )
        .route(
            "/channel/:slug/item/:item_slug/data",
            get(protected::item_data).fallback(method_not_allowed),
        )
}
