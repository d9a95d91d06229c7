//! The paged, searchable table every collection screen uses.

use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmaec_access::GateRule;
use pharmaec_api::{ApiError, ListQuery, Page};
use serde_json::Value;

use crate::components::{EmptyState, Pagination, PermissionGate, StatusBadge, use_toasts};
use crate::context::use_session;
use crate::pages::batch_panel::BatchPanel;
use crate::pages::record_form::{FormTarget, RecordForm};
use crate::pages::screens::{
    CellFormat, Column, DISPATCH_STATUSES, RowAction, Screen, format_cell, raw_field, row_id,
};

/// Row picked for an action: id and display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: String,
    pub label: String,
}

impl Target {
    fn of(row: &Value, screen: &Screen) -> Option<Self> {
        let id = row_id(row)?;
        let label = match raw_field(row, screen.label_field) {
            label if label.is_empty() => id.clone(),
            label => label,
        };
        Some(Self { id, label })
    }
}

/// Page to show after deleting a row from a page of `rows_on_page` rows.
/// Removing the last row of a later page steps back one page.
fn page_after_delete(page: u32, rows_on_page: usize) -> u32 {
    if rows_on_page <= 1 && page > 1 { page - 1 } else { page }
}

/// Query for the current page, search text and filter choice.
fn build_query(screen: &Screen, page: u32, search: &str, filter: &str) -> ListQuery {
    let query = ListQuery::page(page).with_search(search);
    match screen.filter {
        Some(f) if f.key == "status" => query.with_status(filter),
        Some(f) if !filter.is_empty() => query.with_filter(f.key, filter),
        _ => query,
    }
}

#[component]
pub fn ResourceList(screen: &'static Screen) -> impl IntoView {
    let session = use_session();
    let toasts = use_toasts();

    let page = RwSignal::new(1_u32);
    let search = RwSignal::new(String::new());
    let filter = RwSignal::new(String::new());
    // Bumped after a save.
    let saved = RwSignal::new(0_u32);

    let rows = LocalResource::new(move || {
        let api = session.api();
        saved.track();
        let query = build_query(screen, page.get(), &search.get(), &filter.get());
        async move { api.list::<Value>(screen.resource, &query).await }
    });

    Effect::new(move || {
        if let Some(Err(err)) = rows.get() {
            tracing::warn!(error = %err, screen = screen.title, "list request failed");
            toasts.error(err.user_message());
        }
    });

    // Delete confirmation state
    let pending_delete = RwSignal::new(Option::<Target>::None);
    let deleting = RwSignal::new(false);

    let on_confirm_delete = move |_| {
        let Some(target) = pending_delete.get_untracked() else {
            return;
        };
        deleting.set(true);
        let api = session.api();
        spawn_local(async move {
            match api.remove(screen.resource, &target.id).await {
                Ok(()) => {
                    tracing::info!(screen = screen.title, id = %target.id, "deleted");
                    toasts.success(format!("\"{}\" deleted", target.label));
                    pending_delete.set(None);
                    let shown = rows
                        .get_untracked()
                        .and_then(Result::ok)
                        .map_or(0, |data| data.items.len());
                    let current = page.get_untracked();
                    match page_after_delete(current, shown) {
                        previous if previous != current => page.set(previous),
                        _ => rows.refetch(),
                    }
                }
                Err(err) => toasts.error(err.user_message()),
            }
            deleting.set(false);
        });
    };

    let change_dispatch_status = move |id: String, status: String| {
        let api = session.api();
        spawn_local(async move {
            match api.update_dispatch_status(&id, &status).await {
                Ok(_) => {
                    toasts.success("Dispatch status updated");
                    rows.refetch();
                }
                Err(err) => toasts.error(err.user_message()),
            }
        });
    };

    let form_target = RwSignal::new(Option::<FormTarget>::None);
    let batch_target = RwSignal::new(Option::<Target>::None);

    let has_actions = !screen.actions.is_empty();

    let row_view = move |row: Value| {
        let cells = screen
            .columns
            .iter()
            .map(|column| cell_view(&row, column))
            .collect_view();
        let actions = has_actions.then(|| {
            let actions = screen
                .actions
                .iter()
                .map(|action| match *action {
                    RowAction::Edit { any_of } => {
                        let id = row_id(&row);
                        view! {
                            <PermissionGate rule=GateRule::any_of(any_of)>
                                {
                                    let id = id.clone();
                                    view! {
                                        <button
                                            class="icon-btn"
                                            title="Edit"
                                            disabled=id.is_none()
                                            on:click=move |_| form_target.set(id.clone().map(FormTarget::Edit))
                                        >
                                            <span class="material-symbols-outlined">"edit"</span>
                                        </button>
                                    }
                                }
                            </PermissionGate>
                        }
                        .into_any()
                    }
                    RowAction::Batches { any_of } => {
                        let target = Target::of(&row, screen);
                        view! {
                            <PermissionGate rule=GateRule::any_of(any_of)>
                                {
                                    let target = target.clone();
                                    view! {
                                        <button
                                            class="icon-btn"
                                            title="Batches"
                                            disabled=target.is_none()
                                            on:click=move |_| batch_target.set(target.clone())
                                        >
                                            <span class="material-symbols-outlined">"inventory"</span>
                                        </button>
                                    }
                                }
                            </PermissionGate>
                        }
                        .into_any()
                    }
                    RowAction::Delete { any_of } => {
                        let target = Target::of(&row, screen);
                        view! {
                            <PermissionGate rule=GateRule::any_of(any_of)>
                                {
                                    let target = target.clone();
                                    view! {
                                        <button
                                            class="icon-btn danger"
                                            title="Delete"
                                            disabled=target.is_none()
                                            on:click=move |_| pending_delete.set(target.clone())
                                        >
                                            <span class="material-symbols-outlined">"delete"</span>
                                        </button>
                                    }
                                }
                            </PermissionGate>
                        }
                        .into_any()
                    }
                    RowAction::DispatchStatus { any_of } => {
                        let id = row_id(&row).unwrap_or_default();
                        let current = raw_field(&row, "status");
                        view! {
                            <PermissionGate rule=GateRule::any_of(any_of)>
                                {
                                    let id = id.clone();
                                    let current = current.clone();
                                    let options = DISPATCH_STATUSES
                                        .iter()
                                        .map(|(value, label)| {
                                            view! {
                                                <option value=*value selected=*value == current.as_str()>
                                                    {*label}
                                                </option>
                                            }
                                        })
                                        .collect_view();
                                    view! {
                                        <select
                                            class="inline-select"
                                            on:change=move |ev| {
                                                let status = event_target_value(&ev);
                                                if status != current {
                                                    change_dispatch_status(id.clone(), status);
                                                }
                                            }
                                        >
                                            {options}
                                        </select>
                                    }
                                }
                            </PermissionGate>
                        }
                        .into_any()
                    }
                })
                .collect_view();
            view! { <td class="row-actions">{actions}</td> }
        });
        view! { <tr>{cells}{actions}</tr> }
    };

    let table_view = move |result: Result<Page<Value>, ApiError>| match result {
        Ok(data) if data.items.is_empty() => view! {
            <EmptyState icon=screen.icon title="Nothing here yet" message=screen.empty_message/>
        }
        .into_any(),
        Ok(data) => {
            let Page {
                items,
                total,
                size,
                pages,
                ..
            } = data;
            view! {
                <div class="table-wrapper">
                    <table class="data-table">
                        <thead>
                            <tr>
                                {screen
                                    .columns
                                    .iter()
                                    .map(|column| view! { <th>{column.label}</th> })
                                    .collect_view()}
                                {has_actions.then(|| view! { <th class="row-actions">"Actions"</th> })}
                            </tr>
                        </thead>
                        <tbody>{items.into_iter().map(row_view).collect_view()}</tbody>
                    </table>
                </div>
                <Pagination page=page size=size total=total pages=pages/>
            }
            .into_any()
        }
        Err(err) => view! {
            <div class="error-state">
                <p class="error">{err.user_message()}</p>
                <button class="secondary-btn" on:click=move |_| rows.refetch()>"Retry"</button>
            </div>
        }
        .into_any(),
    };

    view! {
        <div class="page">
            <div class="page-header">
                <div>
                    <h2>{screen.title}</h2>
                    <p class="muted">{screen.subtitle}</p>
                </div>
                {screen.form.as_ref().map(|form| view! {
                    <PermissionGate rule=GateRule::any_of(form.create_any_of)>
                        <button class="primary-btn" on:click=move |_| form_target.set(Some(FormTarget::Create))>
                            <span class="material-symbols-outlined">"add"</span>
                            {format!("Add {}", form.noun)}
                        </button>
                    </PermissionGate>
                })}
            </div>

            {move || {
                let form = screen.form.as_ref()?;
                form_target.get().map(|_| view! {
                    <RecordForm form=form resource=screen.resource target=form_target saved=saved/>
                })
            }}

            {move || batch_target.get().map(|medicine| view! {
                <BatchPanel medicine=medicine open=batch_target/>
            })}

            // Delete Confirmation Modal
            {move || pending_delete.get().map(|target| view! {
                <div class="modal-overlay">
                    <div class="modal">
                        <h2>"Delete?"</h2>
                        <p>"Are you sure you want to delete \""{target.label}"\"?"</p>
                        <p class="warning">"This action cannot be undone."</p>
                        <div class="modal-actions">
                            <button class="secondary-btn" on:click=move |_| pending_delete.set(None)>
                                "Cancel"
                            </button>
                            <button class="danger-btn" on:click=on_confirm_delete disabled=move || deleting.get()>
                                {move || if deleting.get() { "Deleting..." } else { "Delete" }}
                            </button>
                        </div>
                    </div>
                </div>
            })}

            <div class="card">
                <div class="filters">
                    {screen.search.map(|placeholder| view! {
                        <div class="search-box">
                            <span class="material-symbols-outlined">"search"</span>
                            <input
                                type="search"
                                placeholder=placeholder
                                prop:value=move || search.get()
                                on:input=move |ev| {
                                    search.set(event_target_value(&ev));
                                    page.set(1);
                                }
                            />
                        </div>
                    })}
                    {screen.filter.map(|f| view! {
                        <select
                            prop:value=move || filter.get()
                            on:change=move |ev| {
                                filter.set(event_target_value(&ev));
                                page.set(1);
                            }
                        >
                            <option value="">"All"</option>
                            {f.options
                                .iter()
                                .map(|(value, label)| view! { <option value=*value>{*label}</option> })
                                .collect_view()}
                        </select>
                    })}
                </div>

                <Suspense fallback=move || view! { <p class="loading">"Loading..."</p> }>
                    {move || rows.get().map(table_view)}
                </Suspense>
            </div>
        </div>
    }
}

fn cell_view(row: &Value, column: &Column) -> AnyView {
    match column.format {
        CellFormat::Status | CellFormat::Active => {
            let status = raw_field(row, column.field);
            if status.is_empty() {
                view! { <td>"-"</td> }.into_any()
            } else {
                view! { <td><StatusBadge status=status/></td> }.into_any()
            }
        }
        CellFormat::Code => view! { <td><code>{format_cell(row, column)}</code></td> }.into_any(),
        CellFormat::Currency | CellFormat::Count => {
            view! { <td class="numeric">{format_cell(row, column)}</td> }.into_any()
        }
        CellFormat::Text | CellFormat::Date => view! { <td>{format_cell(row, column)}</td> }.into_any(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::screens::{DISPATCHES, INVOICES, MEDICINES, MOVEMENTS, WAREHOUSES};
    use serde_json::json;

    fn pairs(query: &ListQuery) -> Vec<(String, String)> {
        query.to_pairs()
    }

    #[test]
    fn status_filters_use_the_status_parameter() {
        let query = build_query(&WAREHOUSES, 2, "central", "active");
        let pairs = pairs(&query);
        assert!(pairs.contains(&("status".to_string(), "active".to_string())));
        assert!(pairs.contains(&("search".to_string(), "central".to_string())));
        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
    }

    #[test]
    fn other_filters_use_their_own_key() {
        let query = build_query(&MOVEMENTS, 1, "", "transfer");
        assert!(pairs(&query).contains(&("movement_type".to_string(), "transfer".to_string())));

        let all = build_query(&MOVEMENTS, 1, "", "");
        assert!(!pairs(&all).iter().any(|(k, _)| k == "movement_type"));
    }

    #[test]
    fn screens_without_a_filter_ignore_it() {
        let query = build_query(&MEDICINES, 1, "para", "active");
        assert!(!pairs(&query).iter().any(|(k, _)| k == "status"));
        assert_eq!(build_query(&DISPATCHES, 1, "", "").search, None);
    }

    #[test]
    fn deleting_the_last_row_steps_back_a_page() {
        assert_eq!(page_after_delete(3, 1), 2);
        assert_eq!(page_after_delete(3, 0), 2);
        assert_eq!(page_after_delete(3, 4), 3);
        assert_eq!(page_after_delete(1, 1), 1);
    }

    #[test]
    fn delete_targets_fall_back_to_the_id() {
        let row = json!({"id": "w1", "name": "Central"});
        assert_eq!(
            Target::of(&row, &WAREHOUSES),
            Some(Target {
                id: "w1".to_string(),
                label: "Central".to_string()
            })
        );

        let unnamed = json!({"id": 9});
        assert_eq!(Target::of(&unnamed, &INVOICES).map(|t| t.label), Some("9".to_string()));
        assert_eq!(Target::of(&json!({"name": "x"}), &WAREHOUSES), None);
    }
}
