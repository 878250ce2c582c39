//! Colombian street address composition for delivery corrections.
//!
//! Addresses follow the national grid convention: a road designator plus
//! numbers ("KR 51 B 85A 36"), optionally suffixed with the neighborhood.
//! The composed line is what the inventory service stores verbatim.

use serde::Serialize;

/// Road designators, abbreviated the way the service prints them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadType {
    Calle,
    Carrera,
    Diagonal,
    Avenida,
    Transversal,
    Autopista,
}

impl RoadType {
    pub const ALL: [RoadType; 6] = [
        RoadType::Calle,
        RoadType::Carrera,
        RoadType::Diagonal,
        RoadType::Avenida,
        RoadType::Transversal,
        RoadType::Autopista,
    ];

    pub fn abbreviation(&self) -> &'static str {
        match self {
            RoadType::Calle => "CL",
            RoadType::Carrera => "KR",
            RoadType::Diagonal => "DG",
            RoadType::Avenida => "av.",
            RoadType::Transversal => "Tv.",
            RoadType::Autopista => "AUT",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RoadType::Calle => "Calle",
            RoadType::Carrera => "Carrera",
            RoadType::Diagonal => "Diagonal",
            RoadType::Avenida => "Avenida",
            RoadType::Transversal => "Transversal",
            RoadType::Autopista => "Autopista",
        }
    }

    /// Parse user input: abbreviation or full name, case-insensitive,
    /// trailing period optional.
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().trim_end_matches('.').to_lowercase();
        Self::ALL.into_iter().find(|r| {
            r.abbreviation().trim_end_matches('.').to_lowercase() == normalized
                || r.name().to_lowercase() == normalized
        })
    }
}

impl std::fmt::Display for RoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Cardinal suffix some numbered roads carry. North never appears in the
/// service's catalogs, so it is not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    South,
    East,
    West,
}

impl Orientation {
    pub const ALL: [Orientation; 3] = [Orientation::South, Orientation::East, Orientation::West];

    pub fn label(&self) -> &'static str {
        match self {
            Orientation::South => "Sur",
            Orientation::East => "Este",
            Orientation::West => "Oeste",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|o| o.label().to_lowercase() == normalized)
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parts of a street address, composed into a single line for the service.
#[derive(Debug, Clone)]
pub struct StreetAddress {
    pub road_type: RoadType,
    pub number: String,
    /// Letter or block qualifier after the road number ("B" in "KR 51 B").
    pub section: Option<String>,
    pub orientation: Option<Orientation>,
    /// Crossing road number ("85A" in "KR 51 B 85A 36").
    pub crossing: Option<String>,
    /// Distance in meters from the crossing to the door.
    pub meters: Option<String>,
    pub neighborhood: Option<String>,
}

impl StreetAddress {
    /// Compose the address line: the non-empty parts joined by single
    /// spaces, then `, NEIGHBORHOOD` when one is present.
    pub fn line(&self) -> String {
        let orientation = self.orientation.map(|o| o.label().to_string());
        let parts = [
            Some(self.road_type.abbreviation().to_string()),
            Some(self.number.clone()),
            self.section.clone(),
            orientation,
            self.crossing.clone(),
            self.meters.clone(),
        ];

        let line = parts
            .into_iter()
            .flatten()
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        match self.neighborhood.as_deref().map(str::trim) {
            Some(neighborhood) if !neighborhood.is_empty() => {
                format!("{line}, {neighborhood}")
            }
            _ => line,
        }
    }
}

impl std::fmt::Display for StreetAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.line())
    }
}

/// Body for `PUT /paquetes/en-ruta/{code}/direccion`. Both fields are
/// independent; omitted ones leave the stored value untouched.
#[derive(Debug, Clone, Serialize)]
pub struct AddressUpdate {
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "destinatario", skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_address() -> StreetAddress {
        StreetAddress {
            road_type: RoadType::Carrera,
            number: "51".to_string(),
            section: Some("B".to_string()),
            orientation: None,
            crossing: Some("85A".to_string()),
            meters: Some("36".to_string()),
            neighborhood: Some("PRADO".to_string()),
        }
    }

    #[test]
    fn composes_full_line() {
        assert_eq!(base_address().line(), "KR 51 B 85A 36, PRADO");
    }

    #[test]
    fn skips_empty_parts() {
        let mut address = base_address();
        address.section = Some("   ".to_string());
        address.meters = None;
        address.neighborhood = None;
        assert_eq!(address.line(), "KR 51 85A");
    }

    #[test]
    fn orientation_lands_between_section_and_crossing() {
        let mut address = base_address();
        address.orientation = Some(Orientation::South);
        assert_eq!(address.line(), "KR 51 B Sur 85A 36, PRADO");
    }

    #[test]
    fn road_type_parsing() {
        assert_eq!(RoadType::parse("kr"), Some(RoadType::Carrera));
        assert_eq!(RoadType::parse("AV."), Some(RoadType::Avenida));
        assert_eq!(RoadType::parse("av"), Some(RoadType::Avenida));
        assert_eq!(RoadType::parse("Transversal"), Some(RoadType::Transversal));
        assert_eq!(RoadType::parse("camino"), None);
    }

    #[test]
    fn update_body_omits_missing_fields() {
        let update = AddressUpdate {
            address: Some("KR 51 B 85A 36, PRADO".to_string()),
            recipient: None,
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"direccion": "KR 51 B 85A 36, PRADO"})
        );
    }
}
