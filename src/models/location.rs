use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One stop in a package's location history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationEntry {
    #[serde(rename = "ubicacion")]
    pub place: String,
    /// RFC 3339 timestamp set by the service when the checkpoint was
    /// registered. Kept as the raw string; parse on demand.
    #[serde(rename = "fechaRegistro", default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<String>,
    #[serde(rename = "latitud", default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(rename = "longitud", default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl LocationEntry {
    /// Parsed registration time, when the timestamp is present and valid.
    pub fn recorded_time(&self) -> Option<DateTime<FixedOffset>> {
        self.recorded_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }
}

/// Order a history oldest first. Entries without a parseable timestamp
/// sort before everything else so the dated route stays in order.
pub fn sort_by_recorded_time(entries: &mut [LocationEntry]) {
    entries.sort_by_key(|entry| {
        entry
            .recorded_time()
            .map(|t| t.timestamp_millis())
            .unwrap_or(i64::MIN)
    });
}

/// Body for `POST /paquetes/{code}/ubicaciones`. The service stamps the
/// registration time itself; coordinates are optional.
#[derive(Debug, Clone, Serialize)]
pub struct NewLocation {
    #[serde(rename = "ubicacion")]
    pub place: String,
    #[serde(rename = "latitud", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(rename = "longitud", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl NewLocation {
    pub fn new(place: impl Into<String>) -> Self {
        Self {
            place: place.into(),
            latitude: None,
            longitude: None,
        }
    }
}

/// Checkpoint kinds staff can register along a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waypoint {
    DistributionCenter,
    RegionalCenter,
    CentralHub,
    FinalDelivery,
}

impl Waypoint {
    pub const ALL: [Waypoint; 4] = [
        Waypoint::DistributionCenter,
        Waypoint::RegionalCenter,
        Waypoint::CentralHub,
        Waypoint::FinalDelivery,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Waypoint::DistributionCenter => "Centro de Distribución",
            Waypoint::RegionalCenter => "Centro de Distribución Regional",
            Waypoint::CentralHub => "Hub Central",
            Waypoint::FinalDelivery => "Entrega Final",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Waypoint::DistributionCenter => "centro-distribucion",
            Waypoint::RegionalCenter => "centro-regional",
            Waypoint::CentralHub => "hub-central",
            Waypoint::FinalDelivery => "entrega-final",
        }
    }

    /// Parse user input: the slug, the label, or a 1-based index into
    /// [`Waypoint::ALL`] as listed by the checkpoint prompt.
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().to_lowercase();
        if let Ok(index) = normalized.parse::<usize>() {
            return Self::ALL.get(index.wrapping_sub(1)).copied();
        }
        Self::ALL
            .into_iter()
            .find(|w| w.slug() == normalized || w.label().to_lowercase() == normalized)
    }
}

impl std::fmt::Display for Waypoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_parses_service_fields() {
        let json = r#"{
            "ubicacion": "Centro de Distribución, Medellín",
            "fechaRegistro": "2025-09-02T10:15:00Z",
            "latitud": 6.2442,
            "longitud": -75.5812
        }"#;
        let entry: LocationEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.place, "Centro de Distribución, Medellín");
        assert!(entry.recorded_time().is_some());
        assert_eq!(entry.latitude, Some(6.2442));
    }

    #[test]
    fn bad_timestamps_read_as_none() {
        let entry = LocationEntry {
            place: "Bodega".to_string(),
            recorded_at: Some("ayer".to_string()),
            latitude: None,
            longitude: None,
        };
        assert!(entry.recorded_time().is_none());
    }

    #[test]
    fn new_location_omits_missing_coordinates() {
        let body = serde_json::to_value(NewLocation::new("Hub Central, Bogotá")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"ubicacion": "Hub Central, Bogotá"})
        );
    }

    #[test]
    fn waypoint_parsing() {
        assert_eq!(Waypoint::parse("hub-central"), Some(Waypoint::CentralHub));
        assert_eq!(
            Waypoint::parse("Centro de Distribución"),
            Some(Waypoint::DistributionCenter)
        );
        assert_eq!(
            Waypoint::parse("Centro de Distribución Regional"),
            Some(Waypoint::RegionalCenter)
        );
        assert_eq!(Waypoint::parse("4"), Some(Waypoint::FinalDelivery));
        assert_eq!(Waypoint::parse("0"), None);
        assert_eq!(Waypoint::parse("teleporte"), None);
    }

    #[test]
    fn regional_center_keeps_its_full_label() {
        assert_eq!(
            Waypoint::RegionalCenter.label(),
            "Centro de Distribución Regional"
        );
        assert_eq!(Waypoint::RegionalCenter.slug(), "centro-regional");
    }

    #[test]
    fn sorting_puts_undated_entries_first() {
        let mut entries = vec![
            LocationEntry {
                place: "b".to_string(),
                recorded_at: Some("2025-09-02T10:00:00Z".to_string()),
                latitude: None,
                longitude: None,
            },
            LocationEntry {
                place: "a".to_string(),
                recorded_at: Some("2025-09-01T10:00:00Z".to_string()),
                latitude: None,
                longitude: None,
            },
            LocationEntry {
                place: "sin fecha".to_string(),
                recorded_at: None,
                latitude: None,
                longitude: None,
            },
        ];
        sort_by_recorded_time(&mut entries);
        let places: Vec<&str> = entries.iter().map(|e| e.place.as_str()).collect();
        assert_eq!(places, vec!["sin fecha", "a", "b"]);
    }
}
