//! Batches of one medicine: listing with expiry state, adding a batch and
//! adjusting stock at the principal's own location.

use chrono::NaiveDate;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmaec_access::{GateRule, Principal, codes};
use pharmaec_api::models::{Batch, NewBatch, StockAdjustment};

use crate::components::{PermissionGate, use_toasts};
use crate::context::use_session;
use crate::pages::resource_list::Target;
use crate::pages::screens::format_date;
use crate::pages::toast_load_errors;

/// Batches expiring within this many days are flagged.
const EXPIRY_WARNING_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryState {
    Expired,
    ExpiringSoon,
    Active,
}

impl ExpiryState {
    /// State of a batch expiring on `expiry` (a date or timestamp).
    /// Unreadable dates count as active.
    #[must_use]
    pub fn of(expiry: &str, today: NaiveDate) -> Self {
        let Some(expiry) = expiry
            .get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        else {
            return Self::Active;
        };
        match (expiry - today).num_days() {
            days if days < 0 => Self::Expired,
            days if days <= EXPIRY_WARNING_DAYS => Self::ExpiringSoon,
            _ => Self::Active,
        }
    }

    #[must_use]
    pub fn badge(self) -> (&'static str, &'static str) {
        match self {
            Self::Expired => ("badge badge-danger", "Expired"),
            Self::ExpiringSoon => ("badge badge-warning", "Expiring Soon"),
            Self::Active => ("badge badge-success", "Active"),
        }
    }
}

/// New batch input, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchDraft {
    pub batch_number: String,
    pub manufacturing_date: String,
    pub expiry_date: String,
    pub quantity: String,
    pub purchase_price: String,
    pub mrp: String,
}

impl BatchDraft {
    pub fn validate(&self) -> Result<NewBatch, &'static str> {
        let batch_number = self.batch_number.trim();
        if batch_number.is_empty() || self.expiry_date.is_empty() || self.quantity.trim().is_empty() {
            return Err("Please fill all required fields");
        }
        let expiry = NaiveDate::parse_from_str(&self.expiry_date, "%Y-%m-%d")
            .map_err(|_| "Enter a valid expiry date")?;
        let manufacturing_date = match self.manufacturing_date.as_str() {
            "" => None,
            day => {
                let made = NaiveDate::parse_from_str(day, "%Y-%m-%d")
                    .map_err(|_| "Enter a valid manufacturing date")?;
                if made > expiry {
                    return Err("Manufacturing date must be before expiry");
                }
                Some(day.to_string())
            }
        };
        let quantity = match self.quantity.trim().parse::<i64>() {
            Ok(q) if q > 0 => q,
            _ => return Err("Quantity must be a positive number"),
        };
        Ok(NewBatch {
            batch_number: batch_number.to_string(),
            manufacturing_date,
            expiry_date: self.expiry_date.clone(),
            quantity,
            purchase_price: price(&self.purchase_price)?,
            mrp: price(&self.mrp)?,
        })
    }
}

fn price(raw: &str) -> Result<f64, &'static str> {
    match raw.trim() {
        "" => Ok(0.0),
        raw => match raw.parse::<f64>() {
            Ok(p) if p.is_finite() && p >= 0.0 => Ok(p),
            _ => Err("Prices must be zero or more"),
        },
    }
}

/// Stock adjustment input for one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjustDraft {
    pub batch_id: String,
    pub quantity: String,
    pub reason: String,
}

impl AdjustDraft {
    pub fn validate(
        &self,
        location: &(String, String),
        medicine_id: &str,
    ) -> Result<StockAdjustment, &'static str> {
        if self.batch_id.is_empty() {
            return Err("Select a batch");
        }
        let adjustment_quantity = match self.quantity.trim().parse::<i64>() {
            Ok(q) if q != 0 => q,
            _ => return Err("Enter a non-zero quantity"),
        };
        let reason = self.reason.trim();
        if reason.is_empty() {
            return Err("Enter a reason");
        }
        Ok(StockAdjustment {
            location_type: location.0.clone(),
            location_id: location.1.clone(),
            medicine_id: medicine_id.to_string(),
            batch_id: self.batch_id.clone(),
            adjustment_quantity,
            reason: reason.to_string(),
            notes: None,
        })
    }
}

/// Where the principal adjusts stock: `(location_type, location_id)`.
/// Warehouse assignment wins over shop assignment.
#[must_use]
pub fn adjust_location(principal: &Principal) -> Option<(String, String)> {
    if let Some(warehouse) = principal.warehouse_id() {
        return Some(("warehouse".to_string(), warehouse.to_string()));
    }
    principal
        .shop_id()
        .map(|shop| ("shop".to_string(), shop.to_string()))
}

/// Modal over the medicine list; closes by clearing `open`.
#[component]
pub fn BatchPanel(medicine: Target, open: RwSignal<Option<Target>>) -> impl IntoView {
    let session = use_session();
    let toasts = use_toasts();
    let Target {
        id: medicine_id,
        label: medicine_name,
    } = medicine;
    let medicine_id = StoredValue::new(medicine_id);

    let batches = LocalResource::new(move || {
        let api = session.api();
        let id = medicine_id.get_value();
        async move { api.medicine_batches(&id).await }
    });

    toast_load_errors(batches, "batches");

    let location = session
        .state()
        .with_untracked(|s| s.principal.as_ref().and_then(adjust_location));

    let draft = RwSignal::new(BatchDraft::default());
    let adding = RwSignal::new(false);
    let saving = RwSignal::new(false);

    let on_add = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let batch = match draft.with_untracked(BatchDraft::validate) {
            Ok(batch) => batch,
            Err(message) => {
                toasts.warning(message);
                return;
            }
        };
        saving.set(true);
        let api = session.api();
        spawn_local(async move {
            match api.create_batch(&medicine_id.get_value(), &batch).await {
                Ok(created) => {
                    tracing::info!(batch = %created.batch_number, "batch created");
                    toasts.success("Batch created successfully");
                    draft.set(BatchDraft::default());
                    adding.set(false);
                    batches.refetch();
                }
                Err(err) => toasts.error(err.user_message()),
            }
            saving.set(false);
        });
    };

    let adjust = RwSignal::new(AdjustDraft::default());
    let adjusting = RwSignal::new(false);
    let location = StoredValue::new(location);

    let on_adjust = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(location) = location.get_value() else {
            return;
        };
        let adjustment = match adjust.with_untracked(|a| a.validate(&location, &medicine_id.get_value())) {
            Ok(adjustment) => adjustment,
            Err(message) => {
                toasts.warning(message);
                return;
            }
        };
        adjusting.set(true);
        let api = session.api();
        spawn_local(async move {
            match api.adjust_stock(&adjustment).await {
                Ok(_) => {
                    tracing::info!(
                        batch_id = %adjustment.batch_id,
                        quantity = adjustment.adjustment_quantity,
                        "stock adjusted"
                    );
                    toasts.success("Stock adjusted");
                    adjust.set(AdjustDraft::default());
                    batches.refetch();
                }
                Err(err) => toasts.error(err.user_message()),
            }
            adjusting.set(false);
        });
    };

    let batch_rows = move |list: Vec<Batch>| {
        if list.is_empty() {
            return view! { <p class="muted">"No batches recorded for this medicine."</p> }.into_any();
        }
        let today = chrono::Local::now().date_naive();
        view! {
            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Batch"</th>
                        <th>"Expiry"</th>
                        <th class="numeric">"Qty"</th>
                        <th class="numeric">"MRP"</th>
                        <th>"Status"</th>
                    </tr>
                </thead>
                <tbody>
                    {list
                        .into_iter()
                        .map(|batch| {
                            let (class, label) = ExpiryState::of(&batch.expiry_date, today).badge();
                            view! {
                                <tr>
                                    <td><code>{batch.batch_number}</code></td>
                                    <td>{format_date(&batch.expiry_date)}</td>
                                    <td class="numeric">{batch.quantity}</td>
                                    <td class="numeric">{format!("₹{:.2}", batch.mrp)}</td>
                                    <td><span class=class>{label}</span></td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_any()
    };

    let batch_input = move |label: &'static str,
                            kind: &'static str,
                            get: fn(&BatchDraft) -> &str,
                            set: fn(&mut BatchDraft, String)| {
        view! {
            <label>
                {label}
                <input
                    type=kind
                    prop:value=move || draft.with(|d| get(d).to_string())
                    on:input=move |ev| draft.update(|d| set(d, event_target_value(&ev)))
                />
            </label>
        }
    };

    view! {
        <div class="modal-overlay">
            <div class="modal wide">
                <div class="page-header">
                    <h2>{format!("Batches: {medicine_name}")}</h2>
                    <button class="icon-btn" title="Close" on:click=move |_| open.set(None)>
                        <span class="material-symbols-outlined">"close"</span>
                    </button>
                </div>

                <Suspense fallback=move || view! { <p class="loading">"Loading..."</p> }>
                    {move || batches.get().map(|result| batch_rows(result.unwrap_or_default()))}
                </Suspense>

                <PermissionGate rule=GateRule::any_of(&[codes::MEDICINES_CREATE, codes::MEDICINES_EDIT])>
                    {move || if adding.get() {
                        view! {
                            <form class="form-grid" on:submit=on_add>
                                {batch_input("Batch Number *", "text", |d| d.batch_number.as_str(), |d, v| d.batch_number = v)}
                                {batch_input("Quantity *", "number", |d| d.quantity.as_str(), |d, v| d.quantity = v)}
                                {batch_input("Manufacturing Date", "date", |d| d.manufacturing_date.as_str(), |d, v| d.manufacturing_date = v)}
                                {batch_input("Expiry Date *", "date", |d| d.expiry_date.as_str(), |d, v| d.expiry_date = v)}
                                {batch_input("Purchase Price", "number", |d| d.purchase_price.as_str(), |d, v| d.purchase_price = v)}
                                {batch_input("MRP", "number", |d| d.mrp.as_str(), |d, v| d.mrp = v)}
                                <div class="modal-actions full-width">
                                    <button type="button" class="secondary-btn" on:click=move |_| adding.set(false)>
                                        "Cancel"
                                    </button>
                                    <button type="submit" class="primary-btn" disabled=move || saving.get()>
                                        {move || if saving.get() { "Saving..." } else { "Add Batch" }}
                                    </button>
                                </div>
                            </form>
                        }
                        .into_any()
                    } else {
                        view! {
                            <button class="secondary-btn" on:click=move |_| adding.set(true)>
                                <span class="material-symbols-outlined">"add"</span>
                                "Add Batch"
                            </button>
                        }
                        .into_any()
                    }}
                </PermissionGate>

                {location.get_value().map(|_| view! {
                    <PermissionGate rule=GateRule::any_of(&[
                        codes::INVENTORY_ADJUST_WAREHOUSE,
                        codes::INVENTORY_ADJUST_SHOP,
                    ])>
                        <h3>"Adjust Stock"</h3>
                        <form class="form-grid" on:submit=on_adjust>
                            <label>
                                "Batch *"
                                <select
                                    prop:value=move || adjust.with(|a| a.batch_id.clone())
                                    on:change=move |ev| adjust.update(|a| a.batch_id = event_target_value(&ev))
                                >
                                    <option value="">"Select batch"</option>
                                    {move || batches
                                        .get()
                                        .and_then(Result::ok)
                                        .unwrap_or_default()
                                        .into_iter()
                                        .map(|b| view! { <option value=b.id.clone()>{b.batch_number}</option> })
                                        .collect_view()}
                                </select>
                            </label>
                            <label>
                                "Quantity (+/-) *"
                                <input
                                    type="number"
                                    prop:value=move || adjust.with(|a| a.quantity.clone())
                                    on:input=move |ev| adjust.update(|a| a.quantity = event_target_value(&ev))
                                />
                            </label>
                            <label class="full-width">
                                "Reason *"
                                <input
                                    type="text"
                                    placeholder="e.g., damaged, count correction"
                                    prop:value=move || adjust.with(|a| a.reason.clone())
                                    on:input=move |ev| adjust.update(|a| a.reason = event_target_value(&ev))
                                />
                            </label>
                            <div class="modal-actions full-width">
                                <button type="submit" class="primary-btn" disabled=move || adjusting.get()>
                                    {move || if adjusting.get() { "Saving..." } else { "Adjust" }}
                                </button>
                            </div>
                        </form>
                    </PermissionGate>
                })}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn expiry_states() {
        let today = day(2025, 4, 1);
        assert_eq!(ExpiryState::of("2025-03-31", today), ExpiryState::Expired);
        assert_eq!(ExpiryState::of("2025-04-01T00:00:00", today), ExpiryState::ExpiringSoon);
        assert_eq!(ExpiryState::of("2025-05-01", today), ExpiryState::ExpiringSoon);
        assert_eq!(ExpiryState::of("2025-05-02", today), ExpiryState::Active);
        assert_eq!(ExpiryState::of("", today), ExpiryState::Active);
    }

    fn filled() -> BatchDraft {
        BatchDraft {
            batch_number: " B-7 ".to_string(),
            manufacturing_date: String::new(),
            expiry_date: "2027-01-31".to_string(),
            quantity: "120".to_string(),
            purchase_price: "18.5".to_string(),
            mrp: String::new(),
        }
    }

    #[test]
    fn batch_drafts_build_the_body() {
        let batch = filled().validate().unwrap();
        assert_eq!(batch.batch_number, "B-7");
        assert_eq!(batch.quantity, 120);
        assert_eq!(batch.manufacturing_date, None);
        assert!((batch.purchase_price - 18.5).abs() < f64::EPSILON);
        assert!(batch.mrp.abs() < f64::EPSILON);
    }

    #[test]
    fn batch_drafts_reject_bad_input() {
        let mut draft = filled();
        draft.batch_number = "  ".to_string();
        assert_eq!(draft.validate(), Err("Please fill all required fields"));

        let mut draft = filled();
        draft.manufacturing_date = "2027-06-01".to_string();
        assert_eq!(draft.validate(), Err("Manufacturing date must be before expiry"));

        let mut draft = filled();
        draft.quantity = "-3".to_string();
        assert_eq!(draft.validate(), Err("Quantity must be a positive number"));

        let mut draft = filled();
        draft.mrp = "-1".to_string();
        assert_eq!(draft.validate(), Err("Prices must be zero or more"));
    }

    #[test]
    fn adjustments_carry_the_location() {
        let location = ("shop".to_string(), "s4".to_string());
        let draft = AdjustDraft {
            batch_id: "b1".to_string(),
            quantity: "-2".to_string(),
            reason: " broken strip ".to_string(),
        };
        let adjustment = draft.validate(&location, "m1").unwrap();
        assert_eq!(adjustment.location_type, "shop");
        assert_eq!(adjustment.location_id, "s4");
        assert_eq!(adjustment.adjustment_quantity, -2);
        assert_eq!(adjustment.reason, "broken strip");

        let zero = AdjustDraft {
            quantity: "0".to_string(),
            ..draft
        };
        assert_eq!(zero.validate(&location, "m1"), Err("Enter a non-zero quantity"));
    }
}
