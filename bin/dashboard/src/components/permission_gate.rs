//! Inline permission gate.

use leptos::prelude::*;
use pharmaec_access::GateRule;

use crate::context::use_permissions;

/// Renders `children` only if the signed-in principal passes `rule`,
/// otherwise `fallback` (nothing by default).
///
/// ```ignore
/// <PermissionGate rule=GateRule::permission(codes::WAREHOUSES_CREATE)>
///     <a href="/warehouses/new">"Add Warehouse"</a>
/// </PermissionGate>
/// ```
#[component]
pub fn PermissionGate(
    rule: GateRule,
    children: ChildrenFn,
    #[prop(optional, into)] fallback: ViewFn,
) -> impl IntoView {
    let checker = use_permissions();

    view! {
        <Show when=move || checker.with(|c| c.allows(&rule)) fallback=fallback>
            {children()}
        </Show>
    }
}
