//! Sales returns against an existing invoice.

use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmaec_access::{GateRule, codes};
use pharmaec_api::Resource;
use pharmaec_api::models::Invoice;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::components::{EmptyState, PermissionGate, use_toasts};
use crate::context::use_session;
use crate::pages::screens::{format_date, format_rupees};
use crate::pages::{NoAccess, picker_query, toast_load_errors};

/// One line of an invoice, as returned by `GET /invoices/{id}/items`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InvoiceLine {
    pub id: String,
    #[serde(default)]
    pub medicine_name: String,
    #[serde(default)]
    pub batch_number: Option<String>,
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: f64,
}

/// Invoice lines from the items body: `{"items": [...]}` or a bare array.
#[must_use]
pub fn parse_lines(body: &Value) -> Vec<InvoiceLine> {
    let entries = match body {
        Value::Array(entries) => entries.as_slice(),
        other => other
            .get("items")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice),
    };
    entries
        .iter()
        .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnItem {
    pub invoice_item_id: String,
    pub quantity: i64,
}

/// Body of `POST /invoices/{id}/returns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnRequest {
    pub items: Vec<ReturnItem>,
    pub reason: String,
}

/// Quantities picked for return, keyed by invoice line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnDraft {
    quantities: BTreeMap<String, i64>,
}

impl ReturnDraft {
    /// Sets the quantity of one line, clamped to what was sold.
    pub fn set_quantity(&mut self, line: &InvoiceLine, quantity: i64) {
        let quantity = quantity.clamp(0, line.quantity);
        if quantity == 0 {
            self.quantities.remove(&line.id);
        } else {
            self.quantities.insert(line.id.clone(), quantity);
        }
    }

    #[must_use]
    pub fn quantity(&self, line_id: &str) -> i64 {
        self.quantities.get(line_id).copied().unwrap_or(0)
    }

    /// Refund owed for the picked quantities.
    #[must_use]
    pub fn refund(&self, lines: &[InvoiceLine]) -> f64 {
        lines
            .iter()
            .map(|line| self.quantity(&line.id) as f64 * line.unit_price)
            .sum()
    }

    pub fn request(&self, reason: &str) -> Result<ReturnRequest, &'static str> {
        if self.quantities.is_empty() {
            return Err("Pick at least one item to return");
        }
        let reason = reason.trim();
        if reason.is_empty() {
            return Err("Enter a reason for the return");
        }
        Ok(ReturnRequest {
            items: self
                .quantities
                .iter()
                .map(|(id, quantity)| ReturnItem {
                    invoice_item_id: id.clone(),
                    quantity: *quantity,
                })
                .collect(),
            reason: reason.to_string(),
        })
    }
}

#[component]
pub fn ReturnsPage() -> impl IntoView {
    let session = use_session();
    let toasts = use_toasts();

    let search = RwSignal::new(String::new());
    let selected = RwSignal::new(Option::<Invoice>::None);
    let draft = RwSignal::new(ReturnDraft::default());
    let reason = RwSignal::new(String::new());
    let submitting = RwSignal::new(false);

    let invoices = LocalResource::new(move || {
        let api = session.api();
        let query = picker_query().with_search(&search.get());
        async move {
            api.list::<Invoice>(Resource::Invoices, &query)
                .await
                .map(|page| page.items)
        }
    });

    let selected_id = Memo::new(move |_| selected.with(|s| s.as_ref().map(|i| i.id.clone())));
    let lines = LocalResource::new(move || {
        let api = session.api();
        let invoice_id = selected_id.get();
        async move {
            match invoice_id {
                Some(id) => api.invoice_items(&id).await.map(|body| parse_lines(&body)),
                None => Ok(Vec::new()),
            }
        }
    });

    toast_load_errors(invoices, "invoices");

    let choose = move |invoice: Invoice| {
        draft.set(ReturnDraft::default());
        reason.set(String::new());
        selected.set(Some(invoice));
    };

    let on_submit = move |_| {
        let Some(invoice_id) = selected_id.get_untracked() else {
            return;
        };
        let request = match draft.with_untracked(|d| d.request(&reason.get_untracked())) {
            Ok(request) => request,
            Err(message) => {
                toasts.warning(message);
                return;
            }
        };
        submitting.set(true);
        let api = session.api();
        spawn_local(async move {
            match api.process_return(&invoice_id, &request).await {
                Ok(_) => {
                    tracing::info!(%invoice_id, items = request.items.len(), "return processed");
                    toasts.success("Return processed");
                    draft.set(ReturnDraft::default());
                    reason.set(String::new());
                    lines.refetch();
                }
                Err(err) => toasts.error(err.user_message()),
            }
            submitting.set(false);
        });
    };

    let line_row = move |line: InvoiceLine| {
        let line_id = line.id.clone();
        let sold = line.quantity;
        let edit_line = line.clone();
        view! {
            <tr>
                <td>{line.medicine_name}</td>
                <td><code>{line.batch_number.unwrap_or_else(|| "-".to_string())}</code></td>
                <td class="numeric">{sold}</td>
                <td class="numeric">{format_rupees(line.unit_price)}</td>
                <td>
                    <input
                        type="number"
                        min="0"
                        max=sold.to_string()
                        prop:value=move || draft.with(|d| d.quantity(&line_id)).to_string()
                        on:input=move |ev| {
                            let quantity = event_target_value(&ev).parse().unwrap_or(0);
                            draft.update(|d| d.set_quantity(&edit_line, quantity));
                        }
                    />
                </td>
            </tr>
        }
    };

    let items_view = move || {
        selected.get().map(|invoice| {
            view! {
                <div class="card">
                    <div class="card-header">
                        <h3>{format!("Invoice {}", invoice.invoice_number)}</h3>
                        <span class="muted">
                            {invoice.customer_name.unwrap_or_else(|| "Walk-in customer".to_string())}
                            " · "
                            {format_date(&invoice.created_at)}
                        </span>
                    </div>
                    <Suspense fallback=move || view! { <p class="loading">"Loading items..."</p> }>
                        {move || lines.get().map(|result| match result {
                            Ok(list) if list.is_empty() => view! {
                                <EmptyState icon="receipt_long" title="No items on this invoice"/>
                            }
                            .into_any(),
                            Ok(list) => {
                                let for_refund = list.clone();
                                view! {
                                    <table class="data-table">
                                        <thead>
                                            <tr>
                                                <th>"Medicine"</th>
                                                <th>"Batch"</th>
                                                <th>"Sold"</th>
                                                <th>"Unit Price"</th>
                                                <th>"Return Qty"</th>
                                            </tr>
                                        </thead>
                                        <tbody>{list.into_iter().map(line_row).collect_view()}</tbody>
                                    </table>
                                    <label>
                                        "Reason"
                                        <input
                                            type="text"
                                            placeholder="e.g., Damaged strip"
                                            prop:value=move || reason.get()
                                            on:input=move |ev| reason.set(event_target_value(&ev))
                                        />
                                    </label>
                                    <div class="form-actions">
                                        <span class="stat-value">
                                            {move || format!("Refund {}", format_rupees(draft.with(|d| d.refund(&for_refund))))}
                                        </span>
                                        <PermissionGate rule=GateRule::permission(codes::RETURNS_CREATE_SHOP)>
                                            <button class="primary-btn" on:click=on_submit disabled=move || submitting.get()>
                                                {move || if submitting.get() { "Processing..." } else { "Process Return" }}
                                            </button>
                                        </PermissionGate>
                                    </div>
                                }
                                .into_any()
                            }
                            Err(err) => view! { <p class="error">{err.user_message()}</p> }.into_any(),
                        })}
                    </Suspense>
                </div>
            }
        })
    };

    view! {
        <PermissionGate
            rule=GateRule::any_of(&[codes::RETURNS_VIEW_SHOP, codes::RETURNS_CREATE_SHOP])
            fallback=|| view! { <NoAccess/> }
        >
            <div class="page">
                <div class="page-header">
                    <div>
                        <h2>"Returns"</h2>
                        <p class="muted">"Return items from a past invoice"</p>
                    </div>
                </div>

                <div class="two-column">
                    <div class="card">
                        <div class="search-box">
                            <span class="material-symbols-outlined">"search"</span>
                            <input
                                type="search"
                                placeholder="Search by invoice or customer..."
                                prop:value=move || search.get()
                                on:input=move |ev| search.set(event_target_value(&ev))
                            />
                        </div>
                        <ul class="pick-list">
                            {move || invoices.get().and_then(Result::ok).unwrap_or_default().into_iter().map(|invoice| {
                                let active = selected_id.get().as_deref() == Some(invoice.id.as_str());
                                let label = format!("{} · {}", invoice.invoice_number, format_rupees(invoice.total_amount));
                                view! {
                                    <li>
                                        <button
                                            class={if active { "pick-item active" } else { "pick-item" }}
                                            on:click=move |_| choose(invoice.clone())
                                        >
                                            {label}
                                        </button>
                                    </li>
                                }
                            }).collect_view()}
                        </ul>
                    </div>
                    {items_view}
                </div>
            </div>
        </PermissionGate>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lines() -> Vec<InvoiceLine> {
        parse_lines(&json!({"items": [
            {"id": "l1", "medicine_name": "Paracetamol", "quantity": 10, "unit_price": 2.5},
            {"id": "l2", "medicine_name": "ORS", "quantity": 2, "unit_price": 20.0}
        ]}))
    }

    #[test]
    fn quantities_are_clamped_to_what_was_sold() {
        let lines = lines();
        let mut draft = ReturnDraft::default();

        draft.set_quantity(&lines[0], 25);
        draft.set_quantity(&lines[1], -3);

        assert_eq!(draft.quantity("l1"), 10);
        assert_eq!(draft.quantity("l2"), 0);
        assert!((draft.refund(&lines) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn request_needs_items_and_a_reason() {
        let lines = lines();
        let mut draft = ReturnDraft::default();
        assert_eq!(draft.request("damaged"), Err("Pick at least one item to return"));

        draft.set_quantity(&lines[1], 1);
        assert_eq!(draft.request("  "), Err("Enter a reason for the return"));

        let request = draft.request(" damaged ").unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"items": [{"invoice_item_id": "l2", "quantity": 1}], "reason": "damaged"})
        );
    }

    #[test]
    fn bare_item_arrays_are_accepted() {
        let parsed = parse_lines(&json!([{"id": "l9", "quantity": 1}, {"quantity": 1}]));
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "l9");
    }
}
