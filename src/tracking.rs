//! Tracking report assembly.
//!
//! Turns a package record plus its location history into the view shown
//! for a tracking query: the route ordered by registration time, each stop
//! marked completed or current, and display fallbacks for the fields older
//! records omit.

use crate::models::{sort_by_recorded_time, LocationEntry, Package, PackageStatus};
use crate::utils::{format_date, format_optional, format_value};

/// Progress marker for one stop on the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Completed,
    Current,
}

/// One row of the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStep {
    pub place: String,
    /// dd/mm/yyyy, empty when the entry carried no timestamp.
    pub date: String,
    pub state: StepState,
}

/// Everything the tracking view displays for one package.
#[derive(Debug, Clone)]
pub struct TrackingReport {
    pub guide_number: String,
    pub status: PackageStatus,
    pub destination: String,
    pub sender: String,
    pub recipient: String,
    pub weight: String,
    pub dimensions: String,
    pub remarks: String,
    pub current_location: String,
    pub last_update: String,
    pub route: Vec<RouteStep>,
}

impl TrackingReport {
    /// Assemble the report. `code` is what the user searched for, used when
    /// the record omits its own tracking code.
    pub fn build(code: &str, package: &Package, mut locations: Vec<LocationEntry>) -> Self {
        sort_by_recorded_time(&mut locations);

        let status = package.normalized_status();
        let last_index = locations.len().saturating_sub(1);

        let route: Vec<RouteStep> = locations
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let is_last = index == last_index;
                let state = if is_last && !status.is_delivered() {
                    StepState::Current
                } else {
                    StepState::Completed
                };
                RouteStep {
                    place: entry.place.clone(),
                    date: entry
                        .recorded_at
                        .as_deref()
                        .map(format_date)
                        .unwrap_or_default(),
                    state,
                }
            })
            .collect();

        let last = locations.last();

        Self {
            guide_number: package
                .tracking_code()
                .map(str::to_string)
                .unwrap_or_else(|| code.to_string()),
            status,
            destination: format_optional(
                package.destination.as_deref().or(package.recipient.as_deref()),
                "Destino no especificado",
            ),
            sender: format_optional(package.sender.as_deref(), "No especificado"),
            recipient: format_optional(package.recipient.as_deref(), "No especificado"),
            weight: format_value(package.weight.as_ref(), "No especificado"),
            dimensions: format_value(package.dimensions.as_ref(), "No especificado"),
            remarks: format_optional(
                package.remarks.as_deref(),
                "No se han registrado novedades",
            ),
            current_location: last
                .map(|entry| entry.place.clone())
                .unwrap_or_else(|| "Sin ubicación registrada".to_string()),
            last_update: last
                .and_then(|entry| entry.recorded_at.as_deref())
                .map(format_date)
                .unwrap_or_else(|| chrono::Local::now().format("%d/%m/%Y").to_string()),
            route,
        }
    }
}
