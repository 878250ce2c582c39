//! Data models for the CourierSync services.
//!
//! This module contains the structures used to represent inventory data:
//!
//! - `Package`, `PackageStatus`: package records and status normalization
//! - `LocationEntry`, `NewLocation`, `Waypoint`: location history
//! - `StreetAddress`, `AddressUpdate`: delivery address corrections
//! - `Incident`, `NewIncident`: shipment incidents (novedades)
//! - `InventorySummary`: dashboard counters
//!
//! Wire structs deserialize tolerantly - the services have renamed fields
//! across deployments - and serialize bodies omit absent optional fields.

pub mod address;
pub mod incident;
pub mod inventory;
pub mod location;
pub mod package;

pub use address::{AddressUpdate, Orientation, RoadType, StreetAddress};
pub use incident::{Incident, NewIncident};
pub use inventory::InventorySummary;
pub use location::{sort_by_recorded_time, LocationEntry, NewLocation, Waypoint};
pub use package::{Package, PackageStatus};
