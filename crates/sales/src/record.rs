use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pharmacy_core::{AnalyticsError, AnalyticsResult, CategoryId, MedicineId, SaleId, TimeWindow, ValueObject};

/// One medicine line of a completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLineItem {
    pub sale_id: SaleId,
    pub medicine_id: MedicineId,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl SaleLineItem {
    /// `unit_price × quantity`.
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

impl ValueObject for SaleLineItem {}

/// A completed point-of-sale transaction.
///
/// `total_amount` is whatever the till recorded. It normally equals the sum of
/// line subtotals; [`SaleRecord::is_reconciled`] reports when it doesn't
/// (discounts, rounding at the till, etc).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: SaleId,
    pub timestamp: DateTime<Utc>,
    pub total_amount: Decimal,
    #[serde(default)]
    pub items: Vec<SaleLineItem>,
}

impl SaleRecord {
    /// Start an empty sale. Lines are added with [`SaleRecord::with_line`].
    pub fn new(id: SaleId, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            timestamp,
            total_amount: Decimal::ZERO,
            items: Vec::new(),
        }
    }

    /// Append a line and fold its subtotal into `total_amount`.
    pub fn with_line(
        mut self,
        medicine_id: MedicineId,
        category_id: Option<CategoryId>,
        quantity: u32,
        unit_price: Decimal,
    ) -> AnalyticsResult<Self> {
        if quantity == 0 {
            return Err(AnalyticsError::validation("line quantity must be positive"));
        }
        if unit_price.is_sign_negative() {
            return Err(AnalyticsError::validation("unit price cannot be negative"));
        }
        let line = SaleLineItem {
            sale_id: self.id,
            medicine_id,
            category_id,
            quantity,
            unit_price,
        };
        self.total_amount += line.subtotal();
        self.items.push(line);
        Ok(self)
    }

    /// Override the recorded total (e.g. a discounted till amount).
    pub fn with_total_amount(mut self, total_amount: Decimal) -> AnalyticsResult<Self> {
        if total_amount.is_sign_negative() {
            return Err(AnalyticsError::validation("sale total cannot be negative"));
        }
        self.total_amount = total_amount;
        Ok(self)
    }

    /// Sum of line subtotals.
    pub fn line_total(&self) -> Decimal {
        self.items.iter().map(SaleLineItem::subtotal).sum()
    }

    pub fn is_reconciled(&self) -> bool {
        self.line_total() == self.total_amount
    }

    /// Check the invariants a collaborator-supplied record must satisfy.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.total_amount.is_sign_negative() {
            return Err(AnalyticsError::validation(format!(
                "sale {}: total cannot be negative",
                self.id
            )));
        }
        for line in &self.items {
            if line.sale_id != self.id {
                return Err(AnalyticsError::validation(format!(
                    "sale {}: line belongs to sale {}",
                    self.id, line.sale_id
                )));
            }
            if line.quantity == 0 {
                return Err(AnalyticsError::validation(format!(
                    "sale {}: line for medicine {} has zero quantity",
                    self.id, line.medicine_id
                )));
            }
            if line.unit_price.is_sign_negative() {
                return Err(AnalyticsError::validation(format!(
                    "sale {}: line for medicine {} has a negative price",
                    self.id, line.medicine_id
                )));
            }
        }
        Ok(())
    }
}

impl ValueObject for SaleRecord {}

/// Every line item whose parent sale falls inside `window`, paired with its sale.
pub fn lines_within<'a>(
    sales: &'a [SaleRecord],
    window: &'a TimeWindow,
) -> impl Iterator<Item = (&'a SaleRecord, &'a SaleLineItem)> + 'a {
    sales
        .iter()
        .filter(move |sale| window.contains(sale.timestamp))
        .flat_map(|sale| sale.items.iter().map(move |line| (sale, line)))
}
