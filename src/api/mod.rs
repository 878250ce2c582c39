//! REST API client module for the CourierSync services.
//!
//! This module provides the `ApiClient` for authenticated requests against
//! the inventory service, plus per-resource wrappers for packages and
//! shipment incidents.
//!
//! Requests carry a JWT bearer token from the session; on a 401 the client
//! refreshes the token through the auth service and replays the request
//! exactly once.

pub mod client;
pub mod error;
pub mod incidents;
pub mod packages;

pub use client::{http_client, ApiClient};
pub use error::ApiError;
pub use incidents::IncidentService;
pub use packages::PackageService;
