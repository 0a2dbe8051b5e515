//! Read-only catalog lookups used to label and join sales facts.

use serde::{Deserialize, Serialize};

use pharmacy_core::{CategoryId, Entity, MedicineId};

/// A medicine as listed in the pharmacy catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineRef {
    pub id: MedicineId,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl MedicineRef {
    pub fn new(id: MedicineId, name: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sku: sku.into(),
            category_id: None,
        }
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

impl Entity for MedicineRef {
    type Id = MedicineId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A medicine category (e.g. "Antibiotics").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
}

impl Entity for CategoryRef {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
