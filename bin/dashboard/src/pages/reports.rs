//! Stock alert report.

use leptos::prelude::*;
use pharmaec_access::{GateRule, codes};

use crate::components::PermissionGate;
use crate::context::use_session;
use crate::pages::NoAccess;
use crate::pages::home::{AlertList, parse_alerts};

const ALERT_TYPES: &[(&str, &str)] = &[
    ("low_stock", "Low Stock"),
    ("expiring", "Expiring Soon"),
    ("expired", "Expired"),
];

#[component]
pub fn ReportsPage() -> impl IntoView {
    let session = use_session();
    let alert_type = RwSignal::new(String::new());

    let alerts = LocalResource::new(move || {
        let api = session.api();
        let alert_type = alert_type.get();
        async move {
            let filter = (!alert_type.is_empty()).then_some(alert_type.as_str());
            api.stock_alerts(filter).await.map(|body| parse_alerts(&body))
        }
    });

    view! {
        <PermissionGate rule=GateRule::any_of(codes::REPORTS_VIEW_ANY) fallback=|| view! { <NoAccess/> }>
            <div class="page">
                <div class="page-header">
                    <div>
                        <h2>"Reports"</h2>
                        <p class="muted">"Stock alerts across your locations"</p>
                    </div>
                    <select
                        prop:value=move || alert_type.get()
                        on:change=move |ev| alert_type.set(event_target_value(&ev))
                    >
                        <option value="">"All alerts"</option>
                        {ALERT_TYPES
                            .iter()
                            .map(|(value, label)| view! { <option value=*value>{*label}</option> })
                            .collect_view()}
                    </select>
                </div>
                <div class="card">
                    <Suspense fallback=move || view! { <p class="loading">"Loading..."</p> }>
                        {move || alerts.get().map(|result| match result {
                            Ok(list) => view! { <AlertList alerts=list/> }.into_any(),
                            Err(err) => view! { <p class="error">{err.user_message()}</p> }.into_any(),
                        })}
                    </Suspense>
                </div>
            </div>
        </PermissionGate>
    }
}
