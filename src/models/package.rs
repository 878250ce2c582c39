use serde::{Deserialize, Serialize};

/// Normalized package status.
///
/// The service returns free-form strings; anything it has not shipped one
/// of the three known values for is `Unknown` and displays like a package
/// in transit, which is what the tracking view has always done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageStatus {
    InTransit,
    InWarehouse,
    Delivered,
    Unknown,
}

impl PackageStatus {
    /// Normalize a raw status string. Accepts both the spoken form the
    /// service returns ("en ruta") and the hyphenated form used in
    /// management tooling ("en-ruta").
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return PackageStatus::Unknown;
        };
        match raw.trim().to_lowercase().as_str() {
            "entregado" => PackageStatus::Delivered,
            "en bodega" | "en-bodega" => PackageStatus::InWarehouse,
            "en ruta" | "en-ruta" => PackageStatus::InTransit,
            _ => PackageStatus::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PackageStatus::Delivered => "Entregado",
            PackageStatus::InWarehouse => "En bodega",
            PackageStatus::InTransit | PackageStatus::Unknown => "En tránsito",
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, PackageStatus::Delivered)
    }
}

impl std::fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A package record as served by the inventory service.
///
/// Every field is optional: older records omit most of them, and the
/// service has renamed fields across deployments (hence the paired
/// `codigoPaquete`/`codigo` and `estadoActual`/`estado` fields, read with
/// the newer name taking precedence).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Package {
    #[serde(rename = "codigoPaquete", default, skip_serializing_if = "Option::is_none")]
    pub package_code: Option<String>,
    #[serde(rename = "codigo", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "estadoActual", default, skip_serializing_if = "Option::is_none")]
    pub current_status: Option<String>,
    #[serde(rename = "estado", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "remitente", default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(rename = "destinatario", default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(rename = "destino", default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    // The service has sent both strings and numbers for these two
    #[serde(rename = "peso", default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<serde_json::Value>,
    #[serde(rename = "dimensiones", default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<serde_json::Value>,
    #[serde(rename = "novedades", default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl Package {
    /// Tracking code, preferring the newer field name.
    pub fn tracking_code(&self) -> Option<&str> {
        self.package_code.as_deref().or(self.code.as_deref())
    }

    /// Raw status string, preferring the newer field name.
    pub fn raw_status(&self) -> Option<&str> {
        self.current_status.as_deref().or(self.status.as_deref())
    }

    pub fn normalized_status(&self) -> PackageStatus {
        PackageStatus::parse(self.raw_status())
    }
}
