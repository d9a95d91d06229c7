//! Backend records shown in the dashboard.
//!
//! Only the fields the dashboard displays or edits are modelled; everything
//! else in a payload is ignored. Optional and defaulted fields are lenient
//! because list endpoints return trimmed records.

use pharmaec_core::{ShopId, WarehouseId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub shop_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub shop_type: String,
    #[serde(default)]
    pub license_number: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub warehouse_id: Option<WarehouseId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub generic_name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub medicine_type: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub mrp: f64,
    #[serde(default)]
    pub purchase_price: f64,
    #[serde(default)]
    pub total_stock: i64,
    #[serde(default = "active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub id: String,
    pub batch_number: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub mrp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: String,
    #[serde(default)]
    pub medicine_name: Option<String>,
    #[serde(default)]
    pub batch_number: Option<String>,
    pub movement_type: String,
    pub quantity: i64,
    #[serde(default)]
    pub reference_type: Option<String>,
    #[serde(default)]
    pub performed_by: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dispatch {
    pub id: String,
    pub dispatch_number: String,
    #[serde(default)]
    pub warehouse_name: String,
    #[serde(default)]
    pub shop_name: String,
    pub status: String,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub dispatch_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub shop_name: String,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub payment_status: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub employee_code: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub shop_name: Option<String>,
}

/// Body of `POST /medicines/{id}/batches`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBatch {
    pub batch_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturing_date: Option<String>,
    pub expiry_date: String,
    pub quantity: i64,
    #[serde(default)]
    pub purchase_price: f64,
    #[serde(default)]
    pub mrp: f64,
}

/// Body of `POST /stock/adjust`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAdjustment {
    /// `"warehouse"` or `"shop"`.
    pub location_type: String,
    pub location_id: String,
    pub medicine_id: String,
    pub batch_id: String,
    /// Positive to add stock, negative to remove it.
    pub adjustment_quantity: i64,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `POST /stock/entry`. The backend creates the batch if the
/// number is new.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEntry {
    pub warehouse_id: WarehouseId,
    pub medicine_id: String,
    pub batch_number: String,
    pub expiry_date: String,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rack_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rack_number: Option<String>,
}

/// One employee's attendance for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub employee_id: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `present`, `absent`, `half_day` or `leave`.
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out: Option<String>,
}

/// Body of `POST /employees/salary/process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRun {
    pub employee_id: String,
    pub month: u32,
    pub year: i32,
}

fn active() -> bool {
    true
}
