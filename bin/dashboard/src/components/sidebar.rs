//! Permission-filtered sidebar.

use leptos::prelude::*;
use leptos_router::hooks::use_location;
use pharmaec_navigation::{
    EntryState, SIDEBAR, SidebarState, VisibleEntry, route_matches, visible_entries,
};

use crate::context::{use_permissions, use_session};

#[component]
pub fn Sidebar(state: RwSignal<SidebarState>) -> impl IntoView {
    let checker = use_permissions();
    let location = use_location();
    let store = use_session().api().store().clone();

    // Open the group holding the current page on every navigation.
    Effect::new(move || {
        let path = location.pathname.get();
        state.maybe_update(|s| s.reveal_route(SIDEBAR, &path));
    });

    let entries = move || {
        let checker = checker.get();
        let active = location.pathname.get();
        visible_entries(SIDEBAR, &checker)
            .into_iter()
            .map(|visible| {
                let entry_state = state.with(|s| s.entry_state(visible.entry, &checker));
                entry_view(visible, entry_state, &active, state)
            })
            .collect_view()
    };

    view! {
        <aside class=move || {
            if state.with(SidebarState::is_collapsed) { "sidebar collapsed" } else { "sidebar" }
        }>
            <div class="sidebar-brand">
                <span class="material-symbols-outlined brand-mark">"local_pharmacy"</span>
                <span class="brand-name">"PharmaEC"</span>
                <button
                    class="icon-btn collapse-btn"
                    title=move || { if state.with(SidebarState::is_collapsed) { "Expand sidebar" } else { "Collapse sidebar" } }
                    on:click=move |_| state.update(|s| s.toggle_collapsed(&store))
                >
                    <span class="material-symbols-outlined">
                        {move || if state.with(SidebarState::is_collapsed) { "chevron_right" } else { "chevron_left" }}
                    </span>
                </button>
            </div>
            <nav class="sidebar-nav">{entries}</nav>
        </aside>
    }
}

fn entry_view(
    visible: VisibleEntry,
    entry_state: EntryState,
    active: &str,
    state: RwSignal<SidebarState>,
) -> AnyView {
    let VisibleEntry { entry, children } = visible;
    match entry_state {
        EntryState::Hidden => ().into_any(),
        EntryState::LeafVisible => view! {
            <NavLink path=entry.path label=entry.label icon=entry.icon active=route_matches(active, entry.path)/>
        }
        .into_any(),
        EntryState::Collapsed | EntryState::Expanded => {
            let expanded = entry_state == EntryState::Expanded;
            let class = if entry.contains_route(active) { "nav-item nav-group-header active" } else { "nav-item nav-group-header" };
            let links = children
                .into_iter()
                .map(|leaf| {
                    view! {
                        <NavLink path=leaf.path label=leaf.label icon=leaf.icon active=route_matches(active, leaf.path)/>
                    }
                })
                .collect_view();
            view! {
                <div class="nav-group">
                    <button class=class title=entry.label on:click=move |_| state.update(|s| s.toggle_group(entry.path))>
                        <span class="material-symbols-outlined">{entry.icon}</span>
                        <span class="nav-label">{entry.label}</span>
                        <span class="material-symbols-outlined chevron">
                            {if expanded { "expand_less" } else { "expand_more" }}
                        </span>
                    </button>
                    {expanded.then(|| view! { <div class="nav-children">{links}</div> })}
                </div>
            }
            .into_any()
        }
    }
}

#[component]
fn NavLink(
    path: &'static str,
    label: &'static str,
    icon: &'static str,
    active: bool,
) -> impl IntoView {
    view! {
        <a href=path class={if active { "nav-item active" } else { "nav-item" }} title=label>
            <span class="material-symbols-outlined">{icon}</span>
            <span class="nav-label">{label}</span>
        </a>
    }
}
