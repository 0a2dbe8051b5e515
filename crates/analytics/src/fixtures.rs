//! Shared test fixtures.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use pharmacy_core::{CategoryId, MedicineId, SaleId};
use pharmacy_sales::SaleRecord;

pub fn at(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, hour, 0, 0).unwrap()
}

pub fn med(n: u128) -> MedicineId {
    MedicineId::from_u128(n)
}

pub fn cat(n: u128) -> CategoryId {
    CategoryId::from_u128(n)
}

pub fn money(units: i64) -> Decimal {
    Decimal::from(units)
}

/// A sale with a single line; `total_amount == quantity × unit_price`.
pub fn sale(id: u128, ts: DateTime<Utc>, medicine: MedicineId, quantity: u32, unit_price: i64) -> SaleRecord {
    SaleRecord::new(SaleId::from_u128(id), ts)
        .with_line(medicine, None, quantity, money(unit_price))
        .unwrap()
}

/// A sale carrying only a total (no lines), for aggregator tests.
pub fn bare_sale(id: u128, ts: DateTime<Utc>, total: i64) -> SaleRecord {
    SaleRecord::new(SaleId::from_u128(id), ts)
        .with_total_amount(money(total))
        .unwrap()
}
