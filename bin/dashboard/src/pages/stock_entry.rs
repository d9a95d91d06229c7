//! Receiving stock into a warehouse.

use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmaec_access::{GateRule, codes};
use pharmaec_api::Resource;
use pharmaec_api::models::{Batch, Medicine, StockEntry, Warehouse};
use pharmaec_core::WarehouseId;

use crate::components::{PermissionGate, use_toasts};
use crate::context::use_session;
use crate::pages::{NoAccess, picker_query, toast_load_errors};

/// Raw form input, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub warehouse_id: String,
    pub medicine_id: String,
    pub batch_number: String,
    pub expiry_date: String,
    pub quantity: String,
    pub rack_name: String,
    pub rack_number: String,
}

impl EntryForm {
    /// Checks the input and builds the request body.
    pub fn validate(&self) -> Result<StockEntry, &'static str> {
        if self.warehouse_id.is_empty() {
            return Err("Select a warehouse");
        }
        if self.medicine_id.is_empty() {
            return Err("Select a medicine");
        }
        let batch_number = self.batch_number.trim();
        if batch_number.is_empty() {
            return Err("Enter a batch number");
        }
        if chrono::NaiveDate::parse_from_str(&self.expiry_date, "%Y-%m-%d").is_err() {
            return Err("Enter a valid expiry date");
        }
        let quantity = match self.quantity.trim().parse::<i64>() {
            Ok(q) if q > 0 => q,
            _ => return Err("Quantity must be a positive number"),
        };

        Ok(StockEntry {
            warehouse_id: WarehouseId::new(self.warehouse_id.clone()),
            medicine_id: self.medicine_id.clone(),
            batch_number: batch_number.to_string(),
            expiry_date: self.expiry_date.clone(),
            quantity,
            rack_name: optional(&self.rack_name),
            rack_number: optional(&self.rack_number),
        })
    }

    /// Copies batch details from an existing batch.
    pub fn reuse_batch(&mut self, batch: &Batch) {
        self.batch_number = batch.batch_number.clone();
        self.expiry_date = batch.expiry_date.get(..10).unwrap_or(&batch.expiry_date).to_string();
    }

    /// Clears the per-entry fields, keeping warehouse and medicine.
    pub fn reset_entry(&mut self) {
        *self = Self {
            warehouse_id: std::mem::take(&mut self.warehouse_id),
            medicine_id: std::mem::take(&mut self.medicine_id),
            ..Self::default()
        };
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[component]
pub fn StockEntryPage() -> impl IntoView {
    view! {
        <PermissionGate
            rule=GateRule::permission(codes::INVENTORY_ENTRY_WAREHOUSE)
            fallback=|| view! { <NoAccess/> }
        >
            <StockEntryForm/>
        </PermissionGate>
    }
}

#[component]
fn StockEntryForm() -> impl IntoView {
    let session = use_session();
    let toasts = use_toasts();

    let form = RwSignal::new(EntryForm::default());
    let submitting = RwSignal::new(false);

    // Preselect the principal's own warehouse.
    if let Some(own) = session
        .state()
        .with_untracked(|s| s.principal.as_ref().and_then(|p| p.warehouse_id().cloned()))
    {
        form.update(|f| f.warehouse_id = own.to_string());
    }

    let warehouses = LocalResource::new(move || {
        let api = session.api();
        async move {
            api.list::<Warehouse>(Resource::Warehouses, &picker_query())
                .await
                .map(|page| page.items)
        }
    });
    let medicines = LocalResource::new(move || {
        let api = session.api();
        async move {
            api.list::<Medicine>(Resource::Medicines, &picker_query())
                .await
                .map(|page| page.items)
        }
    });
    let medicine_id = Memo::new(move |_| form.with(|f| f.medicine_id.clone()));
    let batches = LocalResource::new(move || {
        let api = session.api();
        let medicine_id = medicine_id.get();
        async move {
            if medicine_id.is_empty() {
                return Ok(Vec::new());
            }
            api.medicine_batches(&medicine_id).await
        }
    });
    toast_load_errors(warehouses, "warehouses");
    toast_load_errors(medicines, "medicines");
    toast_load_errors(batches, "batches");

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let entry = match form.with_untracked(EntryForm::validate) {
            Ok(entry) => entry,
            Err(message) => {
                toasts.warning(message);
                return;
            }
        };
        submitting.set(true);
        let api = session.api();
        spawn_local(async move {
            match api.stock_entry(&entry).await {
                Ok(_) => {
                    tracing::info!(medicine_id = %entry.medicine_id, quantity = entry.quantity, "stock received");
                    toasts.success(format!("Added {} units of batch {}", entry.quantity, entry.batch_number));
                    form.update(EntryForm::reset_entry);
                    batches.refetch();
                }
                Err(err) => toasts.error(err.user_message()),
            }
            submitting.set(false);
        });
    };

    let text_input = move |label: &'static str,
                           kind: &'static str,
                           placeholder: &'static str,
                           get: fn(&EntryForm) -> &str,
                           set: fn(&mut EntryForm, String)| {
        view! {
            <label>
                {label}
                <input
                    type=kind
                    placeholder=placeholder
                    prop:value=move || form.with(|f| get(f).to_string())
                    on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
                />
            </label>
        }
    };

    view! {
        <div class="page">
            <div class="page-header">
                <div>
                    <h2>"Warehouse Stock Entry"</h2>
                    <p class="muted">"Record stock received from suppliers"</p>
                </div>
            </div>

            <form class="card form-grid" on:submit=on_submit>
                <label>
                    "Warehouse"
                    <select
                        prop:value=move || form.with(|f| f.warehouse_id.clone())
                        on:change=move |ev| form.update(|f| f.warehouse_id = event_target_value(&ev))
                    >
                        <option value="">"Select warehouse"</option>
                        {move || warehouses.get().and_then(Result::ok).unwrap_or_default().into_iter().map(|w| view! {
                            <option value=w.id.to_string()>{format!("{} ({})", w.name, w.code)}</option>
                        }).collect_view()}
                    </select>
                </label>
                <label>
                    "Medicine *"
                    <select
                        prop:value=move || form.with(|f| f.medicine_id.clone())
                        on:change=move |ev| form.update(|f| f.medicine_id = event_target_value(&ev))
                    >
                        <option value="">"Select medicine"</option>
                        {move || medicines.get().and_then(Result::ok).unwrap_or_default().into_iter().map(|m| view! {
                            <option value=m.id.clone()>{m.name}</option>
                        }).collect_view()}
                    </select>
                </label>

                {move || {
                    let existing = batches.get().and_then(Result::ok).unwrap_or_default();
                    (!existing.is_empty()).then(|| {
                        let options = existing.clone();
                        view! {
                            <label class="full-width hint">
                                "Or select an existing batch to reuse details"
                                <select on:change=move |ev| {
                                    let id = event_target_value(&ev);
                                    if let Some(batch) = options.iter().find(|b| b.id == id) {
                                        form.update(|f| f.reuse_batch(batch));
                                    }
                                }>
                                    <option value="">"New batch"</option>
                                    {existing.into_iter().map(|b| view! {
                                        <option value=b.id.clone()>
                                            {format!("{} (exp. {}, qty {})", b.batch_number, b.expiry_date, b.quantity)}
                                        </option>
                                    }).collect_view()}
                                </select>
                            </label>
                        }
                    })
                }}

                {text_input("Batch Number *", "text", "e.g., BATCH001", |f| f.batch_number.as_str(), |f, v| f.batch_number = v)}
                {text_input("Expiry Date *", "date", "", |f| f.expiry_date.as_str(), |f, v| f.expiry_date = v)}
                {text_input("Quantity *", "number", "Enter quantity to add", |f| f.quantity.as_str(), |f, v| f.quantity = v)}
                {text_input("Rack / Box Name", "text", "e.g., Shelf A", |f| f.rack_name.as_str(), |f, v| f.rack_name = v)}
                {text_input("Rack Number", "text", "e.g., A1", |f| f.rack_number.as_str(), |f, v| f.rack_number = v)}

                <div class="form-actions full-width">
                    <button type="submit" class="primary-btn" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Saving..." } else { "Add Stock" }}
                    </button>
                </div>
            </form>
        </div>
    }
}
