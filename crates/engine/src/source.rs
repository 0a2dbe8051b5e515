//! Collaborator-facing data access.
//!
//! The engine owns no data. Point-of-sale history and the catalog/inventory
//! come from whoever embeds it, through these two traits.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use pharmacy_core::{AnalyticsError, AnalyticsResult, MedicineId, TimeWindow};
use pharmacy_inventory::InventorySnapshot;
use pharmacy_sales::{CategoryRef, MedicineRef, SaleRecord};

/// Completed sales, queried by time window.
pub trait SalesSource: Send + Sync {
    /// Every sale whose timestamp falls in `window`. Order is not significant.
    fn sales_in(&self, window: &TimeWindow) -> Vec<SaleRecord>;
}

/// Medicine catalog and current stock levels.
pub trait CatalogSource: Send + Sync {
    fn medicines(&self) -> Vec<MedicineRef>;

    fn inventory(&self) -> Vec<InventorySnapshot>;

    /// Medicines that already have an open (pending) reorder recommendation.
    fn pending_reorders(&self) -> BTreeSet<MedicineId> {
        BTreeSet::new()
    }
}

/// Plain in-memory dataset; also the JSON shape read by `pharmacy-report`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemorySource {
    pub sales: Vec<SaleRecord>,
    pub medicines: Vec<MedicineRef>,
    pub categories: Vec<CategoryRef>,
    pub inventory: Vec<InventorySnapshot>,
    pub pending_reorders: BTreeSet<MedicineId>,
}

impl InMemorySource {
    pub fn new(sales: Vec<SaleRecord>, medicines: Vec<MedicineRef>) -> Self {
        Self {
            sales,
            medicines,
            ..Self::default()
        }
    }

    pub fn with_inventory(mut self, inventory: Vec<InventorySnapshot>) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn with_categories(mut self, categories: Vec<CategoryRef>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_pending(mut self, medicine_id: MedicineId) -> Self {
        self.pending_reorders.insert(medicine_id);
        self
    }

    /// Reject records that break the invariants analytics relies on.
    pub fn validate(&self) -> AnalyticsResult<()> {
        for sale in &self.sales {
            sale.validate()?;
        }

        let mut seen = BTreeSet::new();
        for medicine in &self.medicines {
            if !seen.insert(medicine.id) {
                return Err(AnalyticsError::validation(format!(
                    "medicine {} appears more than once in the catalog",
                    medicine.id
                )));
            }
        }

        let mut stocked = BTreeSet::new();
        for snapshot in &self.inventory {
            if !stocked.insert(snapshot.medicine_id) {
                return Err(AnalyticsError::validation(format!(
                    "medicine {} has more than one inventory snapshot",
                    snapshot.medicine_id
                )));
            }
        }
        Ok(())
    }
}

impl SalesSource for InMemorySource {
    fn sales_in(&self, window: &TimeWindow) -> Vec<SaleRecord> {
        self.sales
            .iter()
            .filter(|s| window.contains(s.timestamp))
            .cloned()
            .collect()
    }
}

impl CatalogSource for InMemorySource {
    fn medicines(&self) -> Vec<MedicineRef> {
        self.medicines.clone()
    }

    fn inventory(&self) -> Vec<InventorySnapshot> {
        self.inventory.clone()
    }

    fn pending_reorders(&self) -> BTreeSet<MedicineId> {
        self.pending_reorders.clone()
    }
}
