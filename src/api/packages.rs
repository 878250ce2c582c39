//! Package endpoints of the inventory service.

use crate::models::{AddressUpdate, LocationEntry, NewLocation, Package};

use super::{ApiClient, ApiError};

/// Method-fixed wrappers over `/paquetes`.
/// Clone is cheap - shares the underlying client.
#[derive(Clone)]
pub struct PackageService {
    client: ApiClient,
}

impl PackageService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Every package known to the inventory service.
    pub async fn all(&self) -> Result<Vec<Package>, ApiError> {
        Ok(self.client.get("/paquetes").await?.unwrap_or_default())
    }

    /// One package by tracking code. `None` when the service answered with
    /// no content; an unknown code usually surfaces as a 404 error instead.
    pub async fn by_code(&self, code: &str) -> Result<Option<Package>, ApiError> {
        self.client.get(&format!("/paquetes/{code}")).await
    }

    /// Packages currently on a delivery route.
    pub async fn in_route(&self) -> Result<Vec<Package>, ApiError> {
        Ok(self
            .client
            .get("/paquetes/en-ruta")
            .await?
            .unwrap_or_default())
    }

    /// One in-route package by tracking code.
    pub async fn in_route_by_code(&self, code: &str) -> Result<Option<Package>, ApiError> {
        self.client.get(&format!("/paquetes/en-ruta/{code}")).await
    }

    /// Correct the delivery address and/or recipient of an in-route package.
    pub async fn update_address(
        &self,
        code: &str,
        update: &AddressUpdate,
    ) -> Result<Option<Package>, ApiError> {
        self.client
            .put(&format!("/paquetes/en-ruta/{code}/direccion"), Some(update))
            .await
    }

    /// Append a checkpoint to the package's location history.
    pub async fn register_location(
        &self,
        code: &str,
        location: &NewLocation,
    ) -> Result<Option<LocationEntry>, ApiError> {
        self.client
            .post(&format!("/paquetes/{code}/ubicaciones"), Some(location))
            .await
    }

    /// Full location history for a package, in whatever order the service
    /// returns it.
    pub async fn locations(&self, code: &str) -> Result<Vec<LocationEntry>, ApiError> {
        Ok(self
            .client
            .get(&format!("/paquetes/{code}/ubicaciones"))
            .await?
            .unwrap_or_default())
    }

    /// Most recent location entry for a package.
    pub async fn last_location(&self, code: &str) -> Result<Option<LocationEntry>, ApiError> {
        self.client
            .get(&format!("/paquetes/{code}/ubicaciones/ultima"))
            .await
    }
}
