//! Authentication module for managing user sessions and credentials.
//!
//! This module provides:
//! - `AuthService`: login, logout, and token refresh against the
//!   authentication service; the only writer of session storage
//! - `SessionStore`: pluggable persistence for the four session values
//!   (file-backed in production, in-memory for tests)
//! - `CredentialStore`: OS keychain convenience storage for the password

pub mod credentials;
pub mod service;
pub mod session;

pub use credentials::CredentialStore;
pub use service::{AuthService, LoginCredentials, LoginResponse, RefreshOutcome};
pub use session::{keys, FileSessionStore, MemorySessionStore, SessionStore};
