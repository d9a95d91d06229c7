//! Monthly salary processing.

use chrono::Datelike;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmaec_access::{GateRule, codes};
use pharmaec_api::Resource;
use pharmaec_api::models::{Employee, SalaryRun};
use std::collections::BTreeSet;

use crate::components::{EmptyState, PermissionGate, use_toasts};
use crate::context::use_session;
use crate::pages::screens::format_rupees;
use crate::pages::{NoAccess, picker_query};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English name of a 1-based month; out-of-range months yield `""`.
#[must_use]
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTHS.get(i as usize))
        .copied()
        .unwrap_or("")
}

/// Years offered in the picker: the current one and the two before it.
#[must_use]
pub fn selectable_years(current: i32) -> Vec<i32> {
    (current - 2..=current).rev().collect()
}

#[component]
pub fn PayrollPage() -> impl IntoView {
    view! {
        <PermissionGate
            rule=GateRule::any_of(&[codes::SALARY_MANAGE_WAREHOUSE, codes::SALARY_MANAGE_SHOP])
            fallback=|| view! { <NoAccess/> }
        >
            <Payroll/>
        </PermissionGate>
    }
}

#[component]
fn Payroll() -> impl IntoView {
    let session = use_session();
    let toasts = use_toasts();

    let today = chrono::Local::now().date_naive();
    let month = RwSignal::new(today.month());
    let year = RwSignal::new(today.year());
    let processing = RwSignal::new(false);
    // Employees already processed for the selected period.
    let processed = RwSignal::new(BTreeSet::<String>::new());

    Effect::new(move || {
        let _period = (month.get(), year.get());
        processed.set(BTreeSet::new());
    });

    let employees = LocalResource::new(move || {
        let api = session.api();
        async move {
            api.list::<Employee>(Resource::Employees, &picker_query().with_status("active"))
                .await
                .map(|page| page.items)
        }
    });

    let process = move |employee_ids: Vec<String>| {
        if employee_ids.is_empty() {
            return;
        }
        let (month, year) = (month.get_untracked(), year.get_untracked());
        processing.set(true);
        let api = session.api();
        spawn_local(async move {
            let mut done = 0;
            for employee_id in employee_ids {
                let run = SalaryRun {
                    employee_id: employee_id.clone(),
                    month,
                    year,
                };
                match api.process_salary(&run).await {
                    Ok(_) => {
                        done += 1;
                        processed.update(|p| {
                            p.insert(employee_id);
                        });
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, %employee_id, "salary not processed");
                        toasts.error(err.user_message());
                    }
                }
            }
            if done > 0 {
                toasts.success(format!(
                    "Processed salary of {done} employees for {} {year}",
                    month_name(month)
                ));
            }
            processing.set(false);
        });
    };

    let employee_row = move |employee: Employee| {
        let id = employee.id.clone();
        let done_id = id.clone();
        let is_done = Memo::new(move |_| processed.with(|p| p.contains(&done_id)));
        view! {
            <tr>
                <td>{employee.employee_code.unwrap_or_default()}</td>
                <td>{employee.name}</td>
                <td>{employee.department}</td>
                <td class="numeric">{format_rupees(employee.salary)}</td>
                <td class="row-actions">
                    <button
                        class="secondary-btn"
                        disabled=move || processing.get() || is_done.get()
                        on:click=move |_| process(vec![id.clone()])
                    >
                        {move || if is_done.get() { "Processed" } else { "Process" }}
                    </button>
                </td>
            </tr>
        }
    };

    let process_all = move |_| {
        let list = match employees.get_untracked() {
            Some(Ok(list)) => list,
            Some(Err(err)) => {
                toasts.error(err.user_message());
                return;
            }
            None => return,
        };
        let ids = list
            .into_iter()
            .map(|e| e.id)
            .filter(|id| !processed.with_untracked(|p| p.contains(id)))
            .collect();
        process(ids);
    };

    view! {
        <div class="page">
            <div class="page-header">
                <div>
                    <h2>"Salary Management"</h2>
                    <p class="muted">"Process monthly salaries"</p>
                </div>
                <div class="filters">
                    <select
                        prop:value=move || month.get().to_string()
                        on:change=move |ev| {
                            if let Ok(m) = event_target_value(&ev).parse() {
                                month.set(m);
                            }
                        }
                    >
                        {(1..=12_u32)
                            .map(|m| view! { <option value=m.to_string()>{month_name(m)}</option> })
                            .collect_view()}
                    </select>
                    <select
                        prop:value=move || year.get().to_string()
                        on:change=move |ev| {
                            if let Ok(y) = event_target_value(&ev).parse() {
                                year.set(y);
                            }
                        }
                    >
                        {selectable_years(today.year())
                            .into_iter()
                            .map(|y| view! { <option value=y.to_string()>{y}</option> })
                            .collect_view()}
                    </select>
                    <button class="primary-btn" on:click=process_all disabled=move || processing.get()>
                        {move || if processing.get() { "Processing..." } else { "Process All" }}
                    </button>
                </div>
            </div>

            <div class="card">
                <Suspense fallback=move || view! { <p class="loading">"Loading employees..."</p> }>
                    {move || employees.get().map(|result| match result {
                        Ok(list) if list.is_empty() => view! {
                            <EmptyState icon="payments" title="No active employees"/>
                        }
                        .into_any(),
                        Ok(list) => view! {
                            <div class="table-wrapper">
                                <table class="data-table">
                                    <thead>
                                        <tr>
                                            <th>"Code"</th>
                                            <th>"Employee"</th>
                                            <th>"Department"</th>
                                            <th>"Base Salary"</th>
                                            <th class="row-actions">"Actions"</th>
                                        </tr>
                                    </thead>
                                    <tbody>{list.into_iter().map(employee_row).collect_view()}</tbody>
                                </table>
                            </div>
                        }
                        .into_any(),
                        Err(err) => view! { <p class="error">{err.user_message()}</p> }.into_any(),
                    })}
                </Suspense>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "");
        assert_eq!(month_name(13), "");
    }

    #[test]
    fn years_count_down_from_the_current_one() {
        assert_eq!(selectable_years(2025), vec![2025, 2024, 2023]);
    }
}
