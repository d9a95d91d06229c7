//! Building blocks of list screens: status badges, empty states and the
//! pagination footer.

use leptos::prelude::*;

/// Badge colour class for a backend status value.
#[must_use]
pub fn status_class(status: &str) -> &'static str {
    match status {
        "active" | "delivered" | "paid" | "present" | "completed" => "badge badge-success",
        "pending" | "maintenance" | "partial" | "half_day" | "on_leave" | "leave" => {
            "badge badge-warning"
        }
        "in_transit" | "processing" => "badge badge-info",
        "cancelled" | "suspended" | "absent" | "unpaid" | "expired" => "badge badge-danger",
        _ => "badge badge-neutral",
    }
}

/// Turns `in_transit` into `In Transit`.
#[must_use]
pub fn humanize(value: &str) -> String {
    value
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 1-based range of rows shown on `page`, as `(first, last)`.
#[must_use]
pub fn showing_range(page: u32, size: u32, total: u64) -> (u64, u64) {
    if total == 0 {
        return (0, 0);
    }
    let size = u64::from(size.max(1));
    let first = u64::from(page.max(1) - 1) * size + 1;
    (first.min(total), (first + size - 1).min(total))
}

#[component]
pub fn StatusBadge(#[prop(into)] status: String) -> impl IntoView {
    view! { <span class=status_class(&status)>{humanize(&status)}</span> }
}

#[component]
pub fn EmptyState(
    icon: &'static str,
    title: &'static str,
    #[prop(optional)] message: &'static str,
) -> impl IntoView {
    view! {
        <div class="empty-state">
            <span class="material-symbols-outlined empty-icon">{icon}</span>
            <h3>{title}</h3>
            <p>{message}</p>
        </div>
    }
}

/// Footer with the row range and previous/next buttons. Hidden when
/// everything fits on one page.
#[component]
pub fn Pagination(page: RwSignal<u32>, size: u32, total: u64, pages: u32) -> impl IntoView {
    let (first, last) = showing_range(page.get_untracked(), size, total);

    (pages > 1).then(|| {
        view! {
            <div class="pagination">
                <p class="muted">{format!("Showing {first} to {last} of {total}")}</p>
                <div class="pagination-controls">
                    <button
                        class="icon-btn"
                        disabled=move || page.get() <= 1
                        on:click=move |_| page.update(|p| *p = p.saturating_sub(1).max(1))
                    >
                        <span class="material-symbols-outlined">"chevron_left"</span>
                    </button>
                    <span class="page-indicator">
                        {move || format!("Page {} of {pages}", page.get())}
                    </span>
                    <button
                        class="icon-btn"
                        disabled=move || page.get() >= pages
                        on:click=move |_| page.update(|p| *p = (*p + 1).min(pages))
                    >
                        <span class="material-symbols-outlined">"chevron_right"</span>
                    </button>
                </div>
            </div>
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn showing_range_clamps_to_total() {
        assert_eq!(showing_range(1, 10, 42), (1, 10));
        assert_eq!(showing_range(5, 10, 42), (41, 42));
        assert_eq!(showing_range(1, 10, 0), (0, 0));
        assert_eq!(showing_range(0, 10, 3), (1, 3));
    }

    #[test]
    fn statuses_are_humanized() {
        assert_eq!(humanize("in_transit"), "In Transit");
        assert_eq!(humanize("active"), "Active");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn unknown_statuses_get_the_neutral_badge() {
        assert_eq!(status_class("delivered"), "badge badge-success");
        assert_eq!(status_class("cancelled"), "badge badge-danger");
        assert_eq!(status_class("archived"), "badge badge-neutral");
    }
}
