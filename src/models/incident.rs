use serde::{Deserialize, Serialize};

/// A shipment incident (novedad) as recorded by the inventory service.
/// Read tolerantly; the service's incident shape has grown fields over time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "codigoPaquete", default, skip_serializing_if = "Option::is_none")]
    pub package_code: Option<String>,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "fechaRegistro", alias = "fecha", default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<String>,
}

/// Body for `POST /novedades`.
#[derive(Debug, Clone, Serialize)]
pub struct NewIncident {
    #[serde(rename = "codigoPaquete")]
    pub package_code: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "tipo", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}
