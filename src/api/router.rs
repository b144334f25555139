//! API router

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::{auth_middleware, AuthState};
use super::handlers::{bookings, courts, health, AppState};
use crate::notifications::{create_notification_state, ws_notifications_handler, SharedEventBus};

/// Routes:
///
/// * `GET /health`
/// * `GET /api/courts`, `GET /api/courts/{court_id}`
/// * `GET /api/bookings/availability/{court_id}?date=`
/// * `POST /api/bookings`
/// * `GET|DELETE /api/bookings/{booking_id}`
/// * `GET /api/notifications/ws` (WebSocket, unauthenticated)
pub fn create_api_router(state: AppState, auth: AuthState, event_bus: SharedEventBus) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let court_routes = Router::new()
        .route("/", get(courts::list_courts))
        .route("/{court_id}", get(courts::get_court));

    let booking_routes = Router::new()
        .route("/", post(bookings::create_booking))
        .route("/availability/{court_id}", get(bookings::get_availability))
        .route(
            "/{booking_id}",
            get(bookings::get_booking).delete(bookings::cancel_booking),
        );

    let protected = Router::new()
        .nest("/courts", court_routes)
        .nest("/bookings", booking_routes)
        .layer(middleware::from_fn_with_state(auth, auth_middleware))
        .with_state(state.clone());

    let notification_routes = Router::new()
        .route("/ws", get(ws_notifications_handler))
        .with_state(create_notification_state(event_bus));

    let api = Router::new()
        .merge(protected)
        .nest("/notifications", notification_routes);

    Router::new()
        .route("/health", get(health::health_check))
        .with_state(state)
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
