use super::package::{Package, PackageStatus};

/// Counters for the inventory dashboard.
///
/// Warehoused and unrecognized statuses both count as pending: they are
/// the packages still waiting to move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventorySummary {
    pub total: usize,
    pub in_transit: usize,
    pub pending: usize,
    pub delivered: usize,
}

impl InventorySummary {
    pub fn from_packages(packages: &[Package]) -> Self {
        let mut summary = Self {
            total: packages.len(),
            ..Self::default()
        };
        for package in packages {
            match package.normalized_status() {
                PackageStatus::InTransit => summary.in_transit += 1,
                PackageStatus::Delivered => summary.delivered += 1,
                PackageStatus::InWarehouse | PackageStatus::Unknown => summary.pending += 1,
            }
        }
        summary
    }

    /// Share of packages delivered, as a percentage. Zero when the
    /// inventory is empty rather than a division by zero.
    pub fn delivery_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.delivered as f64 / self.total as f64 * 100.0
        }
    }

    /// The dashboard text block.
    pub fn report(&self) -> String {
        format!(
            "Resumen de Inventario:\n\n\
             Total de Paquetes: {}\n\
             En Tránsito: {}\n\
             Pendientes: {}\n\
             Entregados: {}\n\n\
             Tasa de entrega: {:.1}%",
            self.total,
            self.in_transit,
            self.pending,
            self.delivered,
            self.delivery_rate()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package_with_status(status: &str) -> Package {
        Package {
            current_status: Some(status.to_string()),
            ..Package::default()
        }
    }

    #[test]
    fn tallies_by_normalized_status() {
        let packages = vec![
            package_with_status("En ruta"),
            package_with_status("en ruta"),
            package_with_status("Entregado"),
            package_with_status("En bodega"),
            package_with_status("extraviado"),
        ];
        let summary = InventorySummary::from_packages(&packages);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.in_transit, 2);
        assert_eq!(summary.delivered, 1);
        // warehouse + unrecognized
        assert_eq!(summary.pending, 2);
    }

    #[test]
    fn delivery_rate_of_empty_inventory_is_zero() {
        let summary = InventorySummary::from_packages(&[]);
        assert_eq!(summary.delivery_rate(), 0.0);
    }

    #[test]
    fn delivery_rate_rounds_to_one_decimal_in_report() {
        let packages = vec![
            package_with_status("Entregado"),
            package_with_status("En ruta"),
            package_with_status("En ruta"),
        ];
        let summary = InventorySummary::from_packages(&packages);
        assert!(summary.report().contains("Tasa de entrega: 33.3%"));
    }
}
