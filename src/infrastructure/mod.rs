//! Infrastructure layer: storage and the HTTP client

pub mod http_client;
pub mod memory;

pub use http_client::HttpAvailabilityClient;
pub use memory::InMemoryStorage;
