//! Settings pages: layout preferences and profile, and the system view of
//! the signed-in principal's access.

use leptos::prelude::*;
use pharmaec_access::{GateRule, PermissionSet, codes};
use pharmaec_navigation::{LOGIN_PATH, SidebarState, Theme};
use std::collections::BTreeMap;

use crate::browser;
use crate::components::{PermissionGate, StatusBadge, use_toasts};
use crate::context::use_session;
use crate::pages::NoAccess;
use crate::pages::screens::format_date;

/// Permission codes grouped by module, both sorted.
#[must_use]
pub fn group_by_module(permissions: &PermissionSet) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for code in permissions.iter() {
        groups
            .entry(code.module().to_string())
            .or_default()
            .push(code.as_str().to_string());
    }
    for codes in groups.values_mut() {
        codes.sort();
    }
    groups
}

#[component]
pub fn ApplicationSettingsPage() -> impl IntoView {
    view! {
        <PermissionGate rule=GateRule::permission(codes::SETTINGS_VIEW) fallback=|| view! { <NoAccess/> }>
            <ApplicationSettings/>
        </PermissionGate>
    }
}

#[component]
fn ApplicationSettings() -> impl IntoView {
    let session = use_session();
    let store = session.api().store().clone();
    let theme = use_context::<RwSignal<Theme>>();
    let sidebar = use_context::<RwSignal<SidebarState>>();

    let theme_row = theme.map(|theme| {
        let store = store.clone();
        view! {
            <div class="setting-row">
                <div>
                    <p class="setting-title">"Dark mode"</p>
                    <p class="muted">"Use a dark colour scheme on this device"</p>
                </div>
                <input
                    type="checkbox"
                    prop:checked=move || theme.get().is_dark()
                    on:change=move |_| {
                        theme.update(|t| *t = t.toggled());
                        theme.with_untracked(|t| t.persist(&store));
                    }
                />
            </div>
        }
    });
    let sidebar_row = sidebar.map(|sidebar| {
        let store = store.clone();
        view! {
            <div class="setting-row">
                <div>
                    <p class="setting-title">"Compact sidebar"</p>
                    <p class="muted">"Show navigation icons only"</p>
                </div>
                <input
                    type="checkbox"
                    prop:checked=move || sidebar.with(SidebarState::is_collapsed)
                    on:change=move |_| sidebar.update(|s| s.toggle_collapsed(&store))
                />
            </div>
        }
    });

    let profile = move || {
        session.state().with(|s| {
            s.principal.as_ref().map(|p| {
                let last_login = p
                    .last_login()
                    .map_or_else(|| "-".to_string(), |t| format_date(&t.to_string()));
                view! {
                    <dl class="profile">
                        <dt>"Name"</dt>
                        <dd>{p.full_name().to_string()}</dd>
                        <dt>"Email"</dt>
                        <dd>{p.email().to_string()}</dd>
                        <dt>"Phone"</dt>
                        <dd>{p.phone().unwrap_or("-").to_string()}</dd>
                        <dt>"Role"</dt>
                        <dd>{p.role().display_name().to_string()}</dd>
                        <dt>"Status"</dt>
                        <dd><StatusBadge status={if p.is_active() { "active" } else { "inactive" }}/></dd>
                        <dt>"Last login"</dt>
                        <dd>{last_login}</dd>
                    </dl>
                }
            })
        })
    };

    view! {
        <div class="page">
            <div class="page-header">
                <div>
                    <h2>"Application Settings"</h2>
                    <p class="muted">"Preferences are stored in this browser"</p>
                </div>
            </div>
            <div class="card">
                <h3>"Appearance"</h3>
                {theme_row}
                {sidebar_row}
            </div>
            <div class="card">
                <h3>"Profile"</h3>
                {profile}
            </div>
        </div>
    }
}

#[component]
pub fn SystemSettingsPage() -> impl IntoView {
    view! {
        <PermissionGate rule=GateRule::permission(codes::SETTINGS_MANAGE) fallback=|| view! { <NoAccess/> }>
            <SystemSettings/>
        </PermissionGate>
    }
}

#[component]
fn SystemSettings() -> impl IntoView {
    let session = use_session();
    let toasts = use_toasts();

    let groups = move || {
        session.state().with(|s| {
            s.principal
                .as_ref()
                .map(|p| group_by_module(p.permissions()))
                .unwrap_or_default()
        })
    };

    let clear_local_data = move |_| {
        let api = session.api();
        api.store().inner().clear();
        toasts.info("Local data cleared");
        browser::hard_redirect(LOGIN_PATH);
    };

    view! {
        <div class="page">
            <div class="page-header">
                <div>
                    <h2>"System Settings"</h2>
                    <p class="muted">"Access granted to your account"</p>
                </div>
            </div>
            <div class="card">
                <h3>"Permissions"</h3>
                {move || {
                    let groups = groups();
                    if groups.is_empty() {
                        view! { <p class="muted">"No explicit permissions. Super admins pass every check."</p> }.into_any()
                    } else {
                        groups
                            .into_iter()
                            .map(|(module, codes)| view! {
                                <div class="permission-group">
                                    <h4>{module}</h4>
                                    <ul class="chip-list">
                                        {codes.into_iter().map(|code| view! { <li class="chip"><code>{code}</code></li> }).collect_view()}
                                    </ul>
                                </div>
                            })
                            .collect_view()
                            .into_any()
                    }
                }}
            </div>
            <div class="card danger-zone">
                <h3>"Local data"</h3>
                <p class="muted">"Removes stored credentials and preferences from this browser and signs you out."</p>
                <button class="danger-btn" on:click=clear_local_data>"Clear Local Data"</button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissions_group_by_module() {
        let set: PermissionSet = [
            codes::WAREHOUSES_VIEW,
            codes::BILLING_VIEW_SHOP,
            codes::BILLING_CREATE_SHOP,
        ]
        .into_iter()
        .collect();

        let groups = group_by_module(&set);

        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups["billing"],
            vec![codes::BILLING_CREATE_SHOP.to_string(), codes::BILLING_VIEW_SHOP.to_string()]
        );
        assert_eq!(groups["warehouses"], vec![codes::WAREHOUSES_VIEW.to_string()]);
    }
}
