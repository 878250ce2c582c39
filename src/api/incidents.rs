//! Shipment incident (novedad) endpoints of the inventory service.

use crate::models::{Incident, NewIncident};

use super::{ApiClient, ApiError};

/// Method-fixed wrappers over `/novedades`.
/// Clone is cheap - shares the underlying client.
#[derive(Clone)]
pub struct IncidentService {
    client: ApiClient,
}

impl IncidentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Every recorded incident.
    pub async fn all(&self) -> Result<Vec<Incident>, ApiError> {
        Ok(self.client.get("/novedades").await?.unwrap_or_default())
    }

    /// Incidents recorded against one package.
    pub async fn for_package(&self, code: &str) -> Result<Vec<Incident>, ApiError> {
        Ok(self
            .client
            .get(&format!("/novedades?paquete={code}"))
            .await?
            .unwrap_or_default())
    }

    /// Record a new incident.
    pub async fn create(&self, incident: &NewIncident) -> Result<Option<Incident>, ApiError> {
        self.client.post("/novedades", Some(incident)).await
    }
}
