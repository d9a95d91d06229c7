//! Dashboard home: headline counts and stock alerts.

use leptos::prelude::*;
use pharmaec_access::{GateRule, codes};
use pharmaec_api::{ListQuery, Resource};
use serde::Deserialize;
use serde_json::Value;

use crate::components::{EmptyState, PermissionGate};
use crate::context::use_session;

/// How many alerts the home page lists.
const HOME_ALERT_LIMIT: usize = 5;

/// One entry of `GET /stock/alerts`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StockAlert {
    #[serde(default)]
    pub id: Option<Value>,
    /// `low_stock`, `expired` or `expiring`.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub medicine_name: String,
    #[serde(default)]
    pub current_quantity: Option<i64>,
    #[serde(default)]
    pub batch_number: Option<String>,
    #[serde(default)]
    pub days_to_expiry: Option<i64>,
}

impl StockAlert {
    #[must_use]
    pub fn title(&self) -> String {
        let prefix = match self.kind.as_str() {
            "low_stock" => "Low Stock",
            "expired" => "Expired",
            _ => "Expiry Warning",
        };
        format!("{prefix} - {}", self.medicine_name)
    }

    #[must_use]
    pub fn description(&self) -> String {
        match self.kind.as_str() {
            "low_stock" => format!("Stock at {} units", self.current_quantity.unwrap_or(0)),
            "expired" => format!(
                "Expired batch: {}",
                self.batch_number.as_deref().unwrap_or("-")
            ),
            _ => format!("Expires in {} days", self.days_to_expiry.unwrap_or(0)),
        }
    }

    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.kind == "expired"
    }
}

/// Alerts from a `/stock/alerts` body: `{"alerts": [...]}` or a bare array.
/// Malformed entries are skipped.
#[must_use]
pub fn parse_alerts(body: &Value) -> Vec<StockAlert> {
    let entries = match body {
        Value::Array(entries) => entries.as_slice(),
        other => other
            .get("alerts")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice),
    };
    entries
        .iter()
        .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
        .collect()
}

#[component]
pub fn HomePage() -> impl IntoView {
    let session = use_session();

    let greeting = move || {
        session.state().with(|s| match &s.principal {
            Some(p) => format!("Welcome back, {}", p.first_name()),
            None => "Welcome back".to_string(),
        })
    };
    let role = move || {
        session.state().with(|s| {
            s.principal
                .as_ref()
                .map(|p| p.role().display_name().to_string())
                .unwrap_or_default()
        })
    };

    view! {
        <div class="page">
            <div class="page-header">
                <div>
                    <h2>{greeting}</h2>
                    <p class="muted">"Signed in as "{role}</p>
                </div>
            </div>

            <div class="stat-grid">
                <PermissionGate rule=GateRule::permission(codes::WAREHOUSES_VIEW)>
                    <StatCard title="Total Warehouses" icon="warehouse" resource=Resource::Warehouses/>
                </PermissionGate>
                <PermissionGate rule=GateRule::permission(codes::SHOPS_VIEW)>
                    <StatCard title="Total Medical Shops" icon="storefront" resource=Resource::Shops/>
                </PermissionGate>
                <PermissionGate rule=GateRule::any_of(codes::EMPLOYEES_VIEW_ANY)>
                    <StatCard title="Employees" icon="group" resource=Resource::Employees/>
                </PermissionGate>
            </div>

            <PermissionGate rule=GateRule::any_of(codes::INVENTORY_VIEW_ANY)>
                <AlertsCard/>
            </PermissionGate>
        </div>
    }
}

/// Count of one collection, read from the `total` of a one-row page.
#[component]
fn StatCard(title: &'static str, icon: &'static str, resource: Resource) -> impl IntoView {
    let session = use_session();
    let total = LocalResource::new(move || {
        let api = session.api();
        let query = ListQuery {
            size: 1,
            ..ListQuery::page(1)
        };
        async move {
            api.list::<Value>(resource, &query)
                .await
                .map(|page| page.total)
        }
    });

    view! {
        <div class="card stat-card">
            <span class="material-symbols-outlined stat-icon">{icon}</span>
            <div>
                <p class="muted">{title}</p>
                <p class="stat-value">
                    {move || match total.get() {
                        None => "…".to_string(),
                        Some(Ok(total)) => total.to_string(),
                        Some(Err(_)) => "-".to_string(),
                    }}
                </p>
            </div>
        </div>
    }
}

#[component]
fn AlertsCard() -> impl IntoView {
    let session = use_session();
    let alerts = LocalResource::new(move || {
        let api = session.api();
        async move { api.stock_alerts(None).await.map(|body| parse_alerts(&body)) }
    });

    view! {
        <div class="card">
            <div class="card-header">
                <h3>"Stock Alerts"</h3>
                {move || alerts.get().and_then(Result::ok).map(|list| view! {
                    <span class="badge badge-danger">{format!("{} Alerts", list.len())}</span>
                })}
            </div>
            <Suspense fallback=move || view! { <p class="loading">"Loading..."</p> }>
                {move || alerts.get().map(|result| match result {
                    Ok(list) => view! {
                        <AlertList alerts=list.into_iter().take(HOME_ALERT_LIMIT).collect()/>
                    }
                    .into_any(),
                    Err(err) => view! { <p class="error">{err.user_message()}</p> }.into_any(),
                })}
            </Suspense>
        </div>
    }
}

/// Alerts as a list, critical ones marked.
#[component]
pub fn AlertList(alerts: Vec<StockAlert>) -> impl IntoView {
    if alerts.is_empty() {
        return view! { <EmptyState icon="check_circle" title="No alerts"/> }.into_any();
    }

    view! {
        <ul class="alert-list">
            {alerts
                .into_iter()
                .map(|alert| {
                    let dot = if alert.is_critical() { "alert-dot critical" } else { "alert-dot warning" };
                    view! {
                        <li class="alert-item">
                            <span class=dot></span>
                            <div>
                                <p class="alert-title">{alert.title()}</p>
                                <p class="muted">{alert.description()}</p>
                            </div>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn alerts_are_read_from_the_envelope() {
        let body = json!({"alerts": [
            {"id": 1, "type": "low_stock", "medicine_name": "Paracetamol", "current_quantity": 8},
            {"id": 2, "type": "expired", "medicine_name": "Amoxicillin", "batch_number": "B-77"},
            "garbage"
        ]});

        let alerts = parse_alerts(&body);

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].title(), "Low Stock - Paracetamol");
        assert_eq!(alerts[0].description(), "Stock at 8 units");
        assert!(alerts[1].is_critical());
        assert_eq!(alerts[1].description(), "Expired batch: B-77");
    }

    #[test]
    fn bare_arrays_and_other_kinds() {
        let body = json!([{"type": "expiring", "medicine_name": "Cetirizine", "days_to_expiry": 12}]);

        let alerts = parse_alerts(&body);

        assert_eq!(alerts[0].title(), "Expiry Warning - Cetirizine");
        assert_eq!(alerts[0].description(), "Expires in 12 days");
        assert!(!alerts[0].is_critical());
        assert!(parse_alerts(&json!({"detail": "nope"})).is_empty());
    }
}
