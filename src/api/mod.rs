//! REST API: courts, availability and bookings

pub mod auth;
pub mod dto;
pub mod handlers;
pub mod router;
pub mod validated_json;

pub use auth::AuthState;
pub use dto::ApiResponse;
pub use handlers::AppState;
pub use router::create_api_router;
