//! Page components for the application.
//!
//! Each page renders one route. Collection pages share [`ResourceList`],
//! driven by the descriptors in [`screens`]; their create/edit modal is
//! [`record_form::RecordForm`].

pub mod attendance;
pub mod batch_panel;
pub mod home;
pub mod login;
pub mod payroll;
pub mod record_form;
pub mod reports;
pub mod resource_list;
pub mod returns;
pub mod screens;
pub mod settings;
pub mod stock_entry;

use leptos::prelude::*;
use pharmaec_api::{ApiError, ListQuery};

use crate::components::use_toasts;

// Re-export all page components for convenient access
pub use attendance::AttendancePage;
pub use home::HomePage;
pub use login::LoginPage;
pub use payroll::PayrollPage;
pub use reports::ReportsPage;
pub use resource_list::ResourceList;
pub use returns::ReturnsPage;
pub use settings::{ApplicationSettingsPage, SystemSettingsPage};
pub use stock_entry::StockEntryPage;

/// Rows fetched for drop-downs and pick lists.
const PICKER_SIZE: u32 = 100;

/// First page of a collection, large enough to fill a picker.
pub(crate) fn picker_query() -> ListQuery {
    ListQuery {
        size: PICKER_SIZE,
        ..ListQuery::page(1)
    }
}

/// Toasts every failed load of `resource`. `what` names it in the log.
pub(crate) fn toast_load_errors<T>(resource: LocalResource<Result<T, ApiError>>, what: &'static str)
where
    T: Clone + Send + Sync + 'static,
{
    let toasts = use_toasts();
    Effect::new(move || {
        if let Some(Err(err)) = resource.get() {
            tracing::warn!(error = %err, what, "load failed");
            toasts.error(err.user_message());
        }
    });
}

/// Shown in place of a page the signed-in principal may not use.
#[component]
pub fn NoAccess() -> impl IntoView {
    view! {
        <div class="page">
            <div class="empty-state">
                <span class="material-symbols-outlined empty-icon">"lock"</span>
                <h3>"Access restricted"</h3>
                <p>"Your role does not include this section. Ask an administrator if you need it."</p>
                <a href="/" class="secondary-btn">"Back to Dashboard"</a>
            </div>
        </div>
    }
}
