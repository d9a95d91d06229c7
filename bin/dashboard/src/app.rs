//! Main Leptos application component and routing.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    components::{Outlet, ParentRoute, Redirect, Route, Router, Routes},
    hooks::use_location,
    path,
};
use pharmaec_access::SessionState;
use pharmaec_navigation::{GuardDecision, SidebarState, Theme, check_access};

use crate::browser;
use crate::components::{Header, Sidebar, ToastContainer, provide_toasts, use_toasts};
use crate::context::{browser_client, provide_permissions, provide_session, use_session};
use crate::pages::screens::{
    DISPATCHES, EMPLOYEES, INVOICES, MANUFACTURERS, MEDICINES, MOVEMENTS, SHOPS, STOCK, WAREHOUSES,
};
use crate::pages::{
    ApplicationSettingsPage, AttendancePage, HomePage, LoginPage, PayrollPage, ReportsPage,
    ResourceList, ReturnsPage, StockEntryPage, SystemSettingsPage,
};

/// The main application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    let session = provide_session(browser_client());
    provide_toasts();

    // Load the principal once the app is running in the browser.
    Effect::new(move || session.refresh());

    view! {
        <Title text="PharmaEC Admin"/>
        <Router>
            <Routes fallback=|| view! { <Redirect path="/"/> }>
                <Route path=path!("/login") view=LoginPage/>
                <ParentRoute path=path!("") view=ProtectedLayout>
                    <Route path=path!("") view=HomePage/>
                    <Route path=path!("/warehouses") view=|| view! { <ResourceList screen=&WAREHOUSES/> }/>
                    <Route path=path!("/shops") view=|| view! { <ResourceList screen=&SHOPS/> }/>
                    <Route path=path!("/medicines") view=|| view! { <ResourceList screen=&MEDICINES/> }/>
                    <Route path=path!("/manufacturers") view=|| view! { <ResourceList screen=&MANUFACTURERS/> }/>
                    <Route path=path!("/inventory/stock") view=|| view! { <ResourceList screen=&STOCK/> }/>
                    <Route path=path!("/inventory/entry") view=StockEntryPage/>
                    <Route path=path!("/inventory/movements") view=|| view! { <ResourceList screen=&MOVEMENTS/> }/>
                    <Route path=path!("/dispatches") view=|| view! { <ResourceList screen=&DISPATCHES/> }/>
                    <Route path=path!("/sales/pos") view=HomePage/>
                    <Route path=path!("/sales/invoices") view=|| view! { <ResourceList screen=&INVOICES/> }/>
                    <Route path=path!("/sales/returns") view=ReturnsPage/>
                    <Route path=path!("/hr/employees") view=|| view! { <ResourceList screen=&EMPLOYEES/> }/>
                    <Route path=path!("/hr/attendance") view=AttendancePage/>
                    <Route path=path!("/hr/payroll") view=PayrollPage/>
                    <Route path=path!("/reports") view=ReportsPage/>
                    <Route path=path!("/settings/application") view=ApplicationSettingsPage/>
                    <Route path=path!("/settings/system") view=SystemSettingsPage/>
                </ParentRoute>
            </Routes>
        </Router>
        <ToastContainer/>
    }
}

/// Route guard around the authenticated area.
///
/// The decision reads browser storage, so it is made after hydration; the
/// server and the first client render both show the loading view.
#[component]
fn ProtectedLayout() -> impl IntoView {
    let session = use_session();
    let location = use_location();
    let decision = RwSignal::new(Option::<GuardDecision>::None);

    // Re-checked on every navigation inside the protected area.
    Effect::new(move || {
        location.pathname.track();
        decision.set(Some(check_access(session.api().store())));
    });

    move || match decision.get() {
        None => view! { <LoadingScreen/> }.into_any(),
        Some(GuardDecision::Redirect(path)) => {
            tracing::debug!(path, "no access token, leaving protected area");
            view! { <Redirect path=path/> }.into_any()
        }
        Some(GuardDecision::Render) => view! { <DashboardShell/> }.into_any(),
    }
}

/// Sidebar, header and the active page. Provides the permission checker
/// and the layout preferences to everything below it.
#[component]
fn DashboardShell() -> impl IntoView {
    let session = use_session();
    let toasts = use_toasts();
    let store = session.api().store().clone();

    provide_permissions(Signal::derive(move || session.state().with(SessionState::checker)));

    let sidebar = RwSignal::new(SidebarState::restore(&store));
    let theme = RwSignal::new(Theme::restore(&store));
    provide_context(sidebar);
    provide_context(theme);
    Effect::new(move || browser::apply_theme(theme.get()));

    let loading = Memo::new(move |_| {
        session
            .state()
            .with(|s| s.loading && s.principal.is_none())
    });
    Effect::new(move || {
        if let Some(message) = session.state().with(|s| s.error.clone()) {
            toasts.error(message);
        }
    });

    view! {
        <div class=move || {
            if sidebar.with(SidebarState::is_collapsed) { "layout sidebar-collapsed" } else { "layout" }
        }>
            <Sidebar state=sidebar/>
            <div class="main-area">
                <Header theme=theme/>
                <main class="content">
                    <Show when=move || !loading.get() fallback=|| view! { <LoadingScreen/> }>
                        <Outlet/>
                    </Show>
                </main>
            </div>
        </div>
    }
}

#[component]
fn LoadingScreen() -> impl IntoView {
    view! {
        <div class="app-loading">
            <div class="spinner"></div>
        </div>
    }
}
