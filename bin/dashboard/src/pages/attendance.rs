//! Daily attendance marking.

use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmaec_access::{GateRule, codes};
use pharmaec_api::Resource;
use pharmaec_api::models::{AttendanceRecord, Employee};
use std::collections::BTreeMap;

use crate::components::{EmptyState, PermissionGate, StatusBadge, use_toasts};
use crate::context::use_session;
use crate::pages::{NoAccess, picker_query};

pub const STATUSES: &[(&str, &str)] = &[
    ("present", "Present"),
    ("absent", "Absent"),
    ("half_day", "Half Day"),
    ("leave", "Leave"),
];

const DEFAULT_CHECK_IN: &str = "09:00";
const DEFAULT_CHECK_OUT: &str = "18:00";

/// One employee's unsaved attendance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub status: String,
    pub check_in: String,
    pub check_out: String,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            status: "present".to_string(),
            check_in: DEFAULT_CHECK_IN.to_string(),
            check_out: DEFAULT_CHECK_OUT.to_string(),
        }
    }
}

impl Draft {
    /// Absent and on-leave employees have no check-in times.
    #[must_use]
    pub fn has_times(&self) -> bool {
        !matches!(self.status.as_str(), "absent" | "leave")
    }
}

/// Attendance being marked for one day, keyed by employee id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceSheet {
    drafts: BTreeMap<String, Draft>,
}

impl AttendanceSheet {
    /// A sheet with every employee present at default hours.
    pub fn for_employees<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            drafts: ids
                .into_iter()
                .map(|id| (id.to_string(), Draft::default()))
                .collect(),
        }
    }

    #[must_use]
    pub fn draft(&self, employee_id: &str) -> Draft {
        self.drafts.get(employee_id).cloned().unwrap_or_default()
    }

    pub fn edit(&mut self, employee_id: &str, change: impl FnOnce(&mut Draft)) {
        change(self.drafts.entry(employee_id.to_string()).or_default());
    }

    /// Request bodies for `date`.
    #[must_use]
    pub fn records(&self, date: &str) -> Vec<AttendanceRecord> {
        self.drafts
            .iter()
            .map(|(employee_id, draft)| {
                let times = draft.has_times();
                AttendanceRecord {
                    employee_id: employee_id.clone(),
                    date: date.to_string(),
                    status: draft.status.clone(),
                    check_in: times.then(|| draft.check_in.clone()),
                    check_out: times.then(|| draft.check_out.clone()),
                }
            })
            .collect()
    }

    /// Number of employees in each status, in [`STATUSES`] order.
    #[must_use]
    pub fn summary(&self) -> Vec<(&'static str, usize)> {
        STATUSES
            .iter()
            .map(|(status, _)| {
                let count = self.drafts.values().filter(|d| d.status == *status).count();
                (*status, count)
            })
            .collect()
    }
}

#[component]
pub fn AttendancePage() -> impl IntoView {
    view! {
        <PermissionGate
            rule=GateRule::any_of(&[codes::ATTENDANCE_MANAGE_WAREHOUSE, codes::ATTENDANCE_MANAGE_SHOP])
            fallback=|| view! { <NoAccess/> }
        >
            <AttendanceSheetView/>
        </PermissionGate>
    }
}

#[component]
fn AttendanceSheetView() -> impl IntoView {
    let session = use_session();
    let toasts = use_toasts();

    let date = RwSignal::new(chrono::Local::now().format("%Y-%m-%d").to_string());
    let sheet = RwSignal::new(AttendanceSheet::default());
    let submitting = RwSignal::new(false);

    let employees = LocalResource::new(move || {
        let api = session.api();
        async move {
            api.list::<Employee>(Resource::Employees, &picker_query().with_status("active"))
                .await
                .map(|page| page.items)
        }
    });

    Effect::new(move || {
        if let Some(Ok(list)) = employees.get() {
            sheet.set(AttendanceSheet::for_employees(list.iter().map(|e| e.id.as_str())));
        }
    });

    let on_save = move |_| {
        let records = sheet.with_untracked(|s| s.records(&date.get_untracked()));
        if records.is_empty() {
            return;
        }
        submitting.set(true);
        let api = session.api();
        spawn_local(async move {
            let total = records.len();
            let mut failed = 0;
            for record in &records {
                if let Err(err) = api.mark_attendance(record).await {
                    tracing::warn!(error = %err, employee_id = %record.employee_id, "attendance not saved");
                    failed += 1;
                }
            }
            if failed == 0 {
                toasts.success(format!("Attendance saved for {total} employees"));
            } else {
                toasts.error(format!("{failed} of {total} attendance records failed to save"));
            }
            submitting.set(false);
        });
    };

    let employee_row = move |employee: Employee| {
        let id = employee.id.clone();
        let (status_id, in_id, out_id) = (id.clone(), id.clone(), id.clone());
        let draft = Memo::new(move |_| sheet.with(|s| s.draft(&id)));
        let disabled = move || !draft.with(Draft::has_times);
        view! {
            <tr>
                <td>{employee.employee_code.unwrap_or_default()}</td>
                <td>{employee.name}</td>
                <td>{employee.designation}</td>
                <td>
                    <select
                        prop:value=move || draft.with(|d| d.status.clone())
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            sheet.update(|s| s.edit(&status_id, |d| d.status = value));
                        }
                    >
                        {STATUSES
                            .iter()
                            .map(|(value, label)| view! { <option value=*value>{*label}</option> })
                            .collect_view()}
                    </select>
                </td>
                <td>
                    <input
                        type="time"
                        prop:value=move || draft.with(|d| d.check_in.clone())
                        disabled=disabled
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            sheet.update(|s| s.edit(&in_id, |d| d.check_in = value));
                        }
                    />
                </td>
                <td>
                    <input
                        type="time"
                        prop:value=move || draft.with(|d| d.check_out.clone())
                        disabled=disabled
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            sheet.update(|s| s.edit(&out_id, |d| d.check_out = value));
                        }
                    />
                </td>
            </tr>
        }
    };

    view! {
        <div class="page">
            <div class="page-header">
                <div>
                    <h2>"Attendance Management"</h2>
                    <p class="muted">"Mark daily attendance for your staff"</p>
                </div>
                <input
                    type="date"
                    prop:value=move || date.get()
                    on:change=move |ev| date.set(event_target_value(&ev))
                />
            </div>

            <div class="summary-row">
                {move || sheet.with(AttendanceSheet::summary).into_iter().map(|(status, count)| view! {
                    <div class="card summary-card">
                        <StatusBadge status=status/>
                        <span class="stat-value">{count}</span>
                    </div>
                }).collect_view()}
            </div>

            <div class="card">
                <Suspense fallback=move || view! { <p class="loading">"Loading employees..."</p> }>
                    {move || employees.get().map(|result| match result {
                        Ok(list) if list.is_empty() => view! {
                            <EmptyState icon="group" title="No active employees"/>
                        }
                        .into_any(),
                        Ok(list) => view! {
                            <div class="table-wrapper">
                                <table class="data-table">
                                    <thead>
                                        <tr>
                                            <th>"Code"</th>
                                            <th>"Employee"</th>
                                            <th>"Designation"</th>
                                            <th>"Status"</th>
                                            <th>"Check In"</th>
                                            <th>"Check Out"</th>
                                        </tr>
                                    </thead>
                                    <tbody>{list.into_iter().map(employee_row).collect_view()}</tbody>
                                </table>
                            </div>
                            <div class="form-actions">
                                <button class="primary-btn" on:click=on_save disabled=move || submitting.get()>
                                    {move || if submitting.get() { "Saving..." } else { "Save Attendance" }}
                                </button>
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
    fn everyone_starts_present_at_default_hours() {
        let sheet = AttendanceSheet::for_employees(["e1", "e2"]);
        let records = sheet.records("2024-06-03");

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.status == "present"));
        assert_eq!(records[0].check_in.as_deref(), Some("09:00"));
        assert_eq!(records[0].check_out.as_deref(), Some("18:00"));
        assert_eq!(records[0].date, "2024-06-03");
    }

    #[test]
    fn absence_drops_the_times() {
        let mut sheet = AttendanceSheet::for_employees(["e1", "e2", "e3"]);
        sheet.edit("e1", |d| d.status = "absent".to_string());
        sheet.edit("e2", |d| {
            d.status = "half_day".to_string();
            d.check_out = "13:00".to_string();
        });

        let records = sheet.records("2024-06-03");

        assert_eq!(records[0].check_in, None);
        assert_eq!(records[1].check_out.as_deref(), Some("13:00"));
        assert_eq!(
            sheet.summary(),
            vec![("present", 1), ("absent", 1), ("half_day", 1), ("leave", 0)]
        );
    }
}
