//! Client library for the CourierSync logistics services.
//!
//! This crate talks to two HTTP backends: the authentication service
//! (login, token refresh, revocation) and the inventory service (packages,
//! location history, shipment incidents). It provides:
//! - `auth`: session persistence and the credential lifecycle
//! - `api`: the authenticated request client and per-resource services
//! - `models`: tolerant views of the backend's JSON payloads
//! - `tracking`: assembly of the tracking report shown to users

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod models;
pub mod tracking;
pub mod utils;
