use serde::{Deserialize, Serialize};

use pharmacy_core::{MedicineId, ValueObject};

/// Stock levels of one medicine at the moment of the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub medicine_id: MedicineId,
    pub current_stock: u64,
    pub min_stock: u64,
    pub max_stock: u64,
}

impl InventorySnapshot {
    pub fn new(medicine_id: MedicineId, current_stock: u64, min_stock: u64, max_stock: u64) -> Self {
        Self {
            medicine_id,
            current_stock,
            min_stock,
            max_stock,
        }
    }

    /// Stock has fallen below the minimum level.
    pub fn needs_reorder(&self) -> bool {
        self.current_stock < self.min_stock
    }

    /// Units needed to fill up to `max_stock`.
    pub fn fill_to_max_quantity(&self) -> u64 {
        self.max_stock.saturating_sub(self.current_stock)
    }

    /// Current stock as a percentage of `max_stock` (0 when no maximum is set).
    pub fn stock_percentage(&self) -> f64 {
        if self.max_stock == 0 {
            return 0.0;
        }
        self.current_stock as f64 / self.max_stock as f64 * 100.0
    }

    /// `current_stock / max(min_stock, 1)`.
    pub fn stock_ratio(&self) -> f64 {
        self.current_stock as f64 / self.min_stock.max(1) as f64
    }
}

impl ValueObject for InventorySnapshot {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_levels() {
        let s = InventorySnapshot::new(MedicineId::from_u128(1), 25, 50, 200);
        assert!(s.needs_reorder());
        assert_eq!(s.fill_to_max_quantity(), 175);
        assert_eq!(s.stock_percentage(), 12.5);
        assert_eq!(s.stock_ratio(), 0.5);
    }

    #[test]
    fn overstock_and_unset_levels() {
        let s = InventorySnapshot::new(MedicineId::from_u128(1), 300, 0, 0);
        assert!(!s.needs_reorder());
        assert_eq!(s.fill_to_max_quantity(), 0);
        assert_eq!(s.stock_percentage(), 0.0);
        assert_eq!(s.stock_ratio(), 300.0);
    }
}
