//! Descriptors of the list screens.
//!
//! Every collection page is the same component driven by a different
//! [`Screen`]: which endpoint to page through, which columns to show, which
//! filter to offer and which row actions exist and who may use them.
//! Screens that can create and edit records also carry a [`FormSpec`].

use chrono::NaiveDate;
use pharmaec_access::codes;
use pharmaec_api::Resource;
use serde_json::Value;

/// How a cell value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFormat {
    Text,
    /// Monospace identifier.
    Code,
    /// Rupee amount with two decimals.
    Currency,
    Count,
    /// `YYYY-MM-DD...` shown as `05 Jan 2024`.
    Date,
    /// Status string rendered as a badge.
    Status,
    /// Boolean rendered as an Active/Inactive badge.
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub label: &'static str,
    pub field: &'static str,
    pub format: CellFormat,
}

const fn col(label: &'static str, field: &'static str, format: CellFormat) -> Column {
    Column {
        label,
        field,
        format,
    }
}

/// A single-choice filter sent as `key=value`. The empty value means all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filter {
    pub key: &'static str,
    pub options: &'static [(&'static str, &'static str)],
}

/// Per-row actions, each behind its own permission gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Delete after confirmation; visible with any of the codes.
    Delete { any_of: &'static [&'static str] },
    /// Move a dispatch to another status; visible with any of the codes.
    DispatchStatus { any_of: &'static [&'static str] },
    /// Open the screen's form on this row.
    Edit { any_of: &'static [&'static str] },
    /// Open the batch panel of a medicine.
    Batches { any_of: &'static [&'static str] },
}

impl RowAction {
    #[must_use]
    pub fn codes(self) -> &'static [&'static str] {
        match self {
            Self::Delete { any_of }
            | Self::DispatchStatus { any_of }
            | Self::Edit { any_of }
            | Self::Batches { any_of } => any_of,
        }
    }
}

/// Input control of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Text sent lowercased, such as manufacturer codes.
    Code,
    Email,
    Phone,
    /// `YYYY-MM-DD`.
    Date,
    /// Sent as a JSON number.
    Number,
    /// One of fixed `(value, label)` pairs. The first is the default.
    Choice(&'static [(&'static str, &'static str)]),
}

impl FieldKind {
    /// `type` attribute of the `<input>`.
    #[must_use]
    pub fn input_type(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "tel",
            Self::Date => "date",
            Self::Number => "number",
            Self::Text | Self::Code | Self::Choice(_) => "text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Key in the request body.
    pub key: &'static str,
    /// Key in the fetched record, when it differs from `key`.
    pub source: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: &'static str,
    /// Sent on create only; the update endpoint does not accept it.
    pub create_only: bool,
}

const fn req(key: &'static str, label: &'static str, kind: FieldKind) -> Field {
    Field {
        key,
        source: key,
        label,
        kind,
        required: true,
        placeholder: "",
        create_only: false,
    }
}

const fn opt(key: &'static str, label: &'static str, kind: FieldKind) -> Field {
    Field {
        required: false,
        ..req(key, label, kind)
    }
}

/// Create/edit form of a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSpec {
    /// Singular name, as in "Add Manufacturer".
    pub noun: &'static str,
    pub create_any_of: &'static [&'static str],
    pub edit_any_of: &'static [&'static str],
    pub fields: &'static [Field],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub icon: &'static str,
    pub resource: Resource,
    /// Placeholder of the search box; `None` hides it.
    pub search: Option<&'static str>,
    pub filter: Option<Filter>,
    pub columns: &'static [Column],
    /// Field naming a row in confirmations and toasts.
    pub label_field: &'static str,
    pub actions: &'static [RowAction],
    pub form: Option<FormSpec>,
    pub empty_message: &'static str,
}

pub const DISPATCH_STATUSES: &[(&str, &str)] = &[
    ("pending", "Pending"),
    ("in_transit", "In Transit"),
    ("delivered", "Delivered"),
    ("cancelled", "Cancelled"),
];

const WAREHOUSE_STATUSES: &[(&str, &str)] = &[
    ("active", "Active"),
    ("inactive", "Inactive"),
    ("maintenance", "Maintenance"),
];

const SHOP_STATUSES: &[(&str, &str)] = &[
    ("active", "Active"),
    ("inactive", "Inactive"),
    ("suspended", "Suspended"),
];

const EMPLOYEE_STATUSES: &[(&str, &str)] = &[
    ("active", "Active"),
    ("inactive", "Inactive"),
    ("on_leave", "On Leave"),
];

const MEDICINE_TYPES: &[(&str, &str)] = &[
    ("tablet", "Tablet"),
    ("capsule", "Capsule"),
    ("syrup", "Syrup"),
    ("injection", "Injection"),
    ("cream", "Cream"),
    ("ointment", "Ointment"),
    ("drops", "Drops"),
    ("powder", "Powder"),
    ("other", "Other"),
];

pub static WAREHOUSES: Screen = Screen {
    title: "Warehouses",
    subtitle: "Manage your distribution centers",
    icon: "warehouse",
    resource: Resource::Warehouses,
    search: Some("Search warehouses..."),
    filter: Some(Filter {
        key: "status",
        options: WAREHOUSE_STATUSES,
    }),
    columns: &[
        col("Warehouse", "name", CellFormat::Text),
        col("Code", "code", CellFormat::Code),
        col("City", "city", CellFormat::Text),
        col("State", "state", CellFormat::Text),
        col("Shops", "shop_count", CellFormat::Count),
        col("Status", "status", CellFormat::Status),
    ],
    label_field: "name",
    actions: &[
        RowAction::Edit {
            any_of: &[codes::WAREHOUSES_EDIT],
        },
        RowAction::Delete {
            any_of: &[codes::WAREHOUSES_DELETE],
        },
    ],
    form: Some(FormSpec {
        noun: "Warehouse",
        create_any_of: &[codes::WAREHOUSES_CREATE],
        edit_any_of: &[codes::WAREHOUSES_EDIT],
        fields: &[
            req("name", "Warehouse Name", FieldKind::Text),
            Field {
                create_only: true,
                placeholder: "e.g., WH-01",
                ..req("code", "Code", FieldKind::Text)
            },
            req("address", "Address", FieldKind::Text),
            req("city", "City", FieldKind::Text),
            req("state", "State", FieldKind::Text),
            req("pincode", "Pincode", FieldKind::Text),
            opt("phone", "Phone", FieldKind::Phone),
            opt("email", "Email", FieldKind::Email),
            opt("capacity", "Capacity", FieldKind::Number),
            req("status", "Status", FieldKind::Choice(WAREHOUSE_STATUSES)),
        ],
    }),
    empty_message: "Create your first warehouse to get started",
};

pub static SHOPS: Screen = Screen {
    title: "Medical Shops",
    subtitle: "Retail outlets supplied by your warehouses",
    icon: "storefront",
    resource: Resource::Shops,
    search: Some("Search shops..."),
    filter: Some(Filter {
        key: "status",
        options: SHOP_STATUSES,
    }),
    columns: &[
        col("Shop", "name", CellFormat::Text),
        col("Code", "code", CellFormat::Code),
        col("Type", "shop_type", CellFormat::Text),
        col("City", "city", CellFormat::Text),
        col("License", "license_number", CellFormat::Code),
        col("Status", "status", CellFormat::Status),
    ],
    label_field: "name",
    actions: &[
        RowAction::Edit {
            any_of: &[codes::SHOPS_EDIT],
        },
        RowAction::Delete {
            any_of: &[codes::SHOPS_DELETE],
        },
    ],
    form: Some(FormSpec {
        noun: "Shop",
        create_any_of: &[codes::SHOPS_CREATE],
        edit_any_of: &[codes::SHOPS_EDIT],
        fields: &[
            req("name", "Shop Name", FieldKind::Text),
            Field {
                create_only: true,
                placeholder: "e.g., SH-01",
                ..req("code", "Code", FieldKind::Text)
            },
            req(
                "shop_type",
                "Type",
                FieldKind::Choice(&[
                    ("retail", "Retail"),
                    ("wholesale", "Wholesale"),
                    ("hospital", "Hospital"),
                ]),
            ),
            req("license_number", "License Number", FieldKind::Text),
            opt("gst_number", "GST Number", FieldKind::Text),
            req("address", "Address", FieldKind::Text),
            req("city", "City", FieldKind::Text),
            req("state", "State", FieldKind::Text),
            req("pincode", "Pincode", FieldKind::Text),
            req("phone", "Phone", FieldKind::Phone),
            opt("email", "Email", FieldKind::Email),
            req("status", "Status", FieldKind::Choice(SHOP_STATUSES)),
        ],
    }),
    empty_message: "No shops match the current filters",
};

pub static MEDICINES: Screen = Screen {
    title: "Medicines",
    subtitle: "Medicine master data",
    icon: "medication",
    resource: Resource::Medicines,
    search: Some("Search by name or generic name..."),
    filter: None,
    columns: &[
        col("Medicine", "name", CellFormat::Text),
        col("Generic Name", "generic_name", CellFormat::Text),
        col("Manufacturer", "manufacturer", CellFormat::Text),
        col("Type", "medicine_type", CellFormat::Text),
        col("MRP", "mrp", CellFormat::Currency),
        col("Stock", "total_stock", CellFormat::Count),
        col("Status", "is_active", CellFormat::Active),
    ],
    label_field: "name",
    actions: &[
        RowAction::Batches {
            any_of: &[codes::MEDICINES_VIEW],
        },
        RowAction::Edit {
            any_of: &[codes::MEDICINES_EDIT],
        },
        RowAction::Delete {
            any_of: &[codes::MEDICINES_DELETE],
        },
    ],
    form: Some(FormSpec {
        noun: "Medicine",
        create_any_of: &[codes::MEDICINES_CREATE],
        edit_any_of: &[codes::MEDICINES_EDIT],
        fields: &[
            req("name", "Medicine Name", FieldKind::Text),
            req("generic_name", "Generic Name", FieldKind::Text),
            opt("brand", "Brand", FieldKind::Text),
            req("manufacturer", "Manufacturer", FieldKind::Text),
            req("medicine_type", "Type", FieldKind::Choice(MEDICINE_TYPES)),
            opt("category", "Category", FieldKind::Text),
            Field {
                placeholder: "e.g., 500mg",
                ..opt("strength", "Strength", FieldKind::Text)
            },
            Field {
                placeholder: "e.g., strip",
                ..req("unit", "Unit", FieldKind::Text)
            },
            opt("pack_size", "Pack Size", FieldKind::Number),
            opt("hsn_code", "HSN Code", FieldKind::Text),
            opt("gst_rate", "GST Rate (%)", FieldKind::Number),
            req("mrp", "MRP", FieldKind::Number),
            req("purchase_price", "Purchase Price", FieldKind::Number),
            opt("reorder_level", "Reorder Level", FieldKind::Number),
        ],
    }),
    empty_message: "Add medicines to the master list to start tracking stock",
};

pub static STOCK: Screen = Screen {
    title: "Stock Overview",
    subtitle: "Current stock across all batches",
    icon: "inventory_2",
    resource: Resource::Medicines,
    search: Some("Search medicines..."),
    filter: None,
    columns: &[
        col("Medicine", "name", CellFormat::Text),
        col("Type", "medicine_type", CellFormat::Text),
        col("Stock", "total_stock", CellFormat::Count),
        col("MRP", "mrp", CellFormat::Currency),
        col("Purchase Price", "purchase_price", CellFormat::Currency),
    ],
    label_field: "name",
    actions: &[],
    form: None,
    empty_message: "No stock recorded yet",
};

pub static MANUFACTURERS: Screen = Screen {
    title: "Manufacturers",
    subtitle: "Pharmaceutical companies supplying your medicines",
    icon: "factory",
    resource: Resource::Manufacturers,
    search: Some("Search manufacturers..."),
    filter: None,
    columns: &[
        col("Code", "code", CellFormat::Code),
        col("Name", "name", CellFormat::Text),
        col("Description", "description", CellFormat::Text),
        col("Status", "is_active", CellFormat::Active),
    ],
    label_field: "name",
    actions: &[
        RowAction::Edit {
            any_of: &[codes::MANUFACTURERS_MANAGE],
        },
        RowAction::Delete {
            any_of: &[codes::MANUFACTURERS_MANAGE],
        },
    ],
    form: Some(FormSpec {
        noun: "Manufacturer",
        create_any_of: &[codes::MANUFACTURERS_MANAGE],
        edit_any_of: &[codes::MANUFACTURERS_MANAGE],
        fields: &[
            Field {
                placeholder: "e.g., sun_pharma",
                ..req("code", "Code", FieldKind::Code)
            },
            Field {
                placeholder: "e.g., Sun Pharmaceutical Industries",
                ..req("name", "Name", FieldKind::Text)
            },
            opt("description", "Description", FieldKind::Text),
        ],
    }),
    empty_message: "No manufacturers yet",
};

pub static MOVEMENTS: Screen = Screen {
    title: "Stock Movements",
    subtitle: "Every stock change with its source",
    icon: "swap_horiz",
    resource: Resource::StockMovements,
    search: None,
    filter: Some(Filter {
        key: "movement_type",
        options: &[
            ("in", "Stock In"),
            ("out", "Stock Out"),
            ("transfer", "Transfer"),
            ("adjustment", "Adjustment"),
        ],
    }),
    columns: &[
        col("Date", "created_at", CellFormat::Date),
        col("Medicine", "medicine_name", CellFormat::Text),
        col("Batch", "batch_number", CellFormat::Code),
        col("Type", "movement_type", CellFormat::Status),
        col("Qty", "quantity", CellFormat::Count),
        col("Reference", "reference_type", CellFormat::Text),
        col("By", "performed_by", CellFormat::Text),
    ],
    label_field: "id",
    actions: &[],
    form: None,
    empty_message: "No stock movements recorded",
};

pub static DISPATCHES: Screen = Screen {
    title: "Dispatches",
    subtitle: "Warehouse to shop deliveries",
    icon: "local_shipping",
    resource: Resource::Dispatches,
    search: None,
    filter: Some(Filter {
        key: "status",
        options: DISPATCH_STATUSES,
    }),
    columns: &[
        col("Dispatch #", "dispatch_number", CellFormat::Code),
        col("From", "warehouse_name", CellFormat::Text),
        col("To", "shop_name", CellFormat::Text),
        col("Items", "total_items", CellFormat::Count),
        col("Date", "dispatch_date", CellFormat::Date),
        col("Status", "status", CellFormat::Status),
    ],
    label_field: "dispatch_number",
    actions: &[RowAction::DispatchStatus {
        any_of: &[codes::DISPATCHES_CREATE_WAREHOUSE],
    }],
    form: None,
    empty_message: "No dispatches yet",
};

pub static INVOICES: Screen = Screen {
    title: "Invoices",
    subtitle: "View and manage sales invoices",
    icon: "receipt_long",
    resource: Resource::Invoices,
    search: Some("Search by invoice or customer..."),
    filter: Some(Filter {
        key: "status",
        options: &[
            ("paid", "Paid"),
            ("pending", "Pending"),
            ("cancelled", "Cancelled"),
        ],
    }),
    columns: &[
        col("Invoice #", "invoice_number", CellFormat::Code),
        col("Customer", "customer_name", CellFormat::Text),
        col("Shop", "shop_name", CellFormat::Text),
        col("Amount", "total_amount", CellFormat::Currency),
        col("Payment", "payment_method", CellFormat::Text),
        col("Status", "payment_status", CellFormat::Status),
        col("Date", "created_at", CellFormat::Date),
    ],
    label_field: "invoice_number",
    actions: &[],
    form: None,
    empty_message: "No invoices yet",
};

const EMPLOYEE_MANAGERS: &[&str] = &[codes::EMPLOYEES_MANAGE_WAREHOUSE, codes::EMPLOYEES_MANAGE_SHOP];

pub static EMPLOYEES: Screen = Screen {
    title: "Employees",
    subtitle: "Staff across warehouses and shops",
    icon: "badge",
    resource: Resource::Employees,
    search: Some("Search employees..."),
    filter: Some(Filter {
        key: "status",
        options: EMPLOYEE_STATUSES,
    }),
    columns: &[
        col("Code", "employee_code", CellFormat::Code),
        col("Employee", "name", CellFormat::Text),
        col("Department", "department", CellFormat::Text),
        col("Designation", "designation", CellFormat::Text),
        col("Salary", "salary", CellFormat::Currency),
        col("Status", "status", CellFormat::Status),
    ],
    label_field: "name",
    actions: &[
        RowAction::Edit {
            any_of: EMPLOYEE_MANAGERS,
        },
        RowAction::Delete {
            any_of: EMPLOYEE_MANAGERS,
        },
    ],
    form: Some(FormSpec {
        noun: "Employee",
        create_any_of: EMPLOYEE_MANAGERS,
        edit_any_of: EMPLOYEE_MANAGERS,
        fields: &[
            req("name", "Full Name", FieldKind::Text),
            req("phone", "Phone", FieldKind::Phone),
            opt("email", "Email", FieldKind::Email),
            Field {
                create_only: true,
                ..req("date_of_joining", "Date of Joining", FieldKind::Date)
            },
            req(
                "employment_type",
                "Employment Type",
                FieldKind::Choice(&[
                    ("full_time", "Full Time"),
                    ("part_time", "Part Time"),
                    ("contract", "Contract"),
                    ("intern", "Intern"),
                ]),
            ),
            req(
                "department",
                "Department",
                FieldKind::Choice(&[
                    ("operations", "Operations"),
                    ("pharmacy", "Pharmacy"),
                    ("sales", "Sales"),
                    ("warehouse", "Warehouse"),
                    ("accounts", "Accounts"),
                    ("hr", "HR"),
                    ("admin", "Admin"),
                ]),
            ),
            opt("designation", "Designation", FieldKind::Text),
            Field {
                source: "salary",
                ..req("basic_salary", "Monthly Salary", FieldKind::Number)
            },
            opt(
                "gender",
                "Gender",
                FieldKind::Choice(&[
                    ("", "Not specified"),
                    ("male", "Male"),
                    ("female", "Female"),
                    ("other", "Other"),
                ]),
            ),
            opt("address", "Address", FieldKind::Text),
            opt("emergency_contact", "Emergency Contact", FieldKind::Phone),
            req("status", "Status", FieldKind::Choice(EMPLOYEE_STATUSES)),
        ],
    }),
    empty_message: "No employees yet",
};

/// Every list screen, for route registration and tests.
pub static ALL: [&Screen; 9] = [
    &WAREHOUSES,
    &SHOPS,
    &MEDICINES,
    &STOCK,
    &MANUFACTURERS,
    &MOVEMENTS,
    &DISPATCHES,
    &INVOICES,
    &EMPLOYEES,
];

/// The row's `id`, whether the backend sends it as a string or a number.
#[must_use]
pub fn row_id(row: &Value) -> Option<String> {
    match row.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Raw string of a field, for badges. Missing and null fields are empty.
#[must_use]
pub fn raw_field(row: &Value, field: &str) -> String {
    match row.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "active".to_string(),
        Some(Value::Bool(false)) => "inactive".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Display text of one cell.
#[must_use]
pub fn format_cell(row: &Value, column: &Column) -> String {
    let value = match row.get(column.field) {
        None | Some(Value::Null) => return "-".to_string(),
        Some(Value::String(s)) if s.is_empty() => return "-".to_string(),
        Some(value) => value,
    };
    match column.format {
        CellFormat::Currency => value
            .as_f64()
            .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
            .map_or_else(|| "-".to_string(), format_rupees),
        CellFormat::Date => value
            .as_str()
            .map_or_else(|| value.to_string(), format_date),
        CellFormat::Active => {
            if value.as_bool().unwrap_or(false) {
                "Active".to_string()
            } else {
                "Inactive".to_string()
            }
        }
        CellFormat::Text | CellFormat::Code | CellFormat::Count | CellFormat::Status => {
            match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }
        }
    }
}

/// `1234567.5` as `₹12,34,567.50` (Indian digit grouping).
#[must_use]
pub fn format_rupees(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let grouped = if whole.len() <= 3 {
        whole.to_string()
    } else {
        let (head, last_three) = whole.split_at(whole.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (front, pair) = rest.split_at(rest.len() - 2);
            groups.push(pair);
            rest = front;
        }
        groups.push(rest);
        groups.reverse();
        format!("{},{last_three}", groups.join(","))
    };
    format!("{sign}₹{grouped}.{fraction}")
}

/// ISO date or timestamp as `05 Jan 2024`; anything else passes through.
#[must_use]
pub fn format_date(value: &str) -> String {
    value
        .get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .map_or_else(|| value.to_string(), |d| d.format("%d %b %Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn rupees_use_indian_grouping() {
        assert_eq!(format_rupees(0.0), "₹0.00");
        assert_eq!(format_rupees(999.5), "₹999.50");
        assert_eq!(format_rupees(1234.0), "₹1,234.00");
        assert_eq!(format_rupees(1_234_567.5), "₹12,34,567.50");
        assert_eq!(format_rupees(-45_000.0), "-₹45,000.00");
    }

    #[test]
    fn dates_are_shortened() {
        assert_eq!(format_date("2024-01-05T10:30:00"), "05 Jan 2024");
        assert_eq!(format_date("2024-12-31"), "31 Dec 2024");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn cells_fall_back_to_a_dash() {
        let row = json!({"name": "Central", "phone": null, "city": ""});
        let text = col("x", "phone", CellFormat::Text);
        assert_eq!(format_cell(&row, &text), "-");
        assert_eq!(format_cell(&row, &col("x", "city", CellFormat::Text)), "-");
        assert_eq!(format_cell(&row, &col("x", "missing", CellFormat::Currency)), "-");
        assert_eq!(format_cell(&row, &col("x", "name", CellFormat::Text)), "Central");
    }

    #[test]
    fn typed_cells_are_formatted() {
        let row = json!({"mrp": 125.5, "shop_count": 4, "is_active": false, "price": "80"});
        assert_eq!(format_cell(&row, &col("x", "mrp", CellFormat::Currency)), "₹125.50");
        assert_eq!(format_cell(&row, &col("x", "price", CellFormat::Currency)), "₹80.00");
        assert_eq!(format_cell(&row, &col("x", "shop_count", CellFormat::Count)), "4");
        assert_eq!(format_cell(&row, &col("x", "is_active", CellFormat::Active)), "Inactive");
    }

    #[test]
    fn row_ids_accept_strings_and_numbers() {
        assert_eq!(row_id(&json!({"id": "w-1"})).as_deref(), Some("w-1"));
        assert_eq!(row_id(&json!({"id": 42})).as_deref(), Some("42"));
        assert_eq!(row_id(&json!({"name": "x"})), None);
        assert_eq!(raw_field(&json!({"is_active": true}), "is_active"), "active");
    }

    #[test]
    fn screens_are_well_formed() {
        let titles: HashSet<&str> = ALL.iter().map(|s| s.title).collect();
        assert_eq!(titles.len(), ALL.len());

        for screen in ALL {
            assert!(!screen.columns.is_empty(), "{} has no columns", screen.title);
            if let Some(filter) = screen.filter {
                assert!(filter.options.iter().all(|(value, _)| !value.is_empty()));
            }
        }
    }

    #[test]
    fn destructive_actions_are_gated() {
        for screen in ALL {
            for action in screen.actions {
                assert!(!action.codes().is_empty(), "{} has an ungated action", screen.title);
            }
            if let Some(form) = screen.form {
                assert!(!form.create_any_of.is_empty(), "{} create is ungated", screen.title);
                assert!(!form.edit_any_of.is_empty(), "{} edit is ungated", screen.title);
            }
        }
    }

    #[test]
    fn edit_actions_need_a_form() {
        for screen in ALL {
            let edits = screen
                .actions
                .iter()
                .any(|action| matches!(action, RowAction::Edit { .. }));
            assert_eq!(edits, screen.form.is_some(), "{}", screen.title);
        }
    }

    #[test]
    fn form_fields_are_unique_and_choices_nonempty() {
        for screen in ALL {
            let Some(form) = screen.form else { continue };
            let keys: HashSet<&str> = form.fields.iter().map(|f| f.key).collect();
            assert_eq!(keys.len(), form.fields.len(), "{} repeats a field", screen.title);
            for field in form.fields {
                if let FieldKind::Choice(options) = field.kind {
                    assert!(!options.is_empty(), "{}.{}", screen.title, field.key);
                }
            }
        }
    }
}
