//! Create/edit modal driven by a screen's [`FormSpec`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmaec_api::Resource;
use serde_json::{Map, Value, json};

use crate::components::use_toasts;
use crate::context::use_session;
use crate::pages::screens::{Field, FieldKind, FormSpec};

/// Which record the form is open for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    Create,
    Edit(String),
}

/// Field values as typed, keyed by body key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    values: BTreeMap<&'static str, String>,
}

impl FormDraft {
    /// Empty form. Choices start on their first option and required dates
    /// on `today`.
    #[must_use]
    pub fn blank(form: &FormSpec, today: NaiveDate) -> Self {
        let values = form
            .fields
            .iter()
            .map(|field| {
                let value = match field.kind {
                    FieldKind::Choice(options) => options.first().map(|(v, _)| (*v).to_string()),
                    FieldKind::Date if field.required => Some(today.format("%Y-%m-%d").to_string()),
                    _ => None,
                };
                (field.key, value.unwrap_or_default())
            })
            .collect();
        Self { values }
    }

    /// Form prefilled from a fetched record. Missing fields keep the blank
    /// defaults.
    #[must_use]
    pub fn from_record(form: &FormSpec, record: &Value, today: NaiveDate) -> Self {
        let mut draft = Self::blank(form, today);
        for field in form.fields {
            let value = match record.get(field.source) {
                None | Some(Value::Null) => continue,
                Some(Value::String(s)) if field.kind == FieldKind::Date => {
                    s.get(..10).unwrap_or(s).to_string()
                }
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            };
            draft.set(field.key, value);
        }
        draft
    }

    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }

    pub fn set(&mut self, key: &'static str, value: String) {
        self.values.insert(key, value);
    }

    /// Validates the input and builds the request body.
    ///
    /// Blank optional fields are left out. When `editing`, create-only
    /// fields are left out as well.
    pub fn to_body(&self, form: &FormSpec, editing: bool) -> Result<Value, String> {
        let mut body = Map::new();
        for field in form.fields {
            if editing && field.create_only {
                continue;
            }
            let raw = self.get(field.key).trim();
            if raw.is_empty() {
                if field.required {
                    return Err(format!("{} is required", field.label));
                }
                continue;
            }
            body.insert(field.key.to_string(), typed_value(field, raw)?);
        }
        Ok(Value::Object(body))
    }
}

fn typed_value(field: &Field, raw: &str) -> Result<Value, String> {
    match field.kind {
        FieldKind::Number => {
            if let Ok(whole) = raw.parse::<i64>() {
                return positive(field, whole as f64).map(|()| json!(whole));
            }
            match raw.parse::<f64>() {
                Ok(n) if n.is_finite() => positive(field, n).map(|()| json!(n)),
                _ => Err(format!("Enter a valid {}", field.label.to_lowercase())),
            }
        }
        FieldKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|_| json!(raw))
            .map_err(|_| format!("Enter a valid {}", field.label.to_lowercase())),
        FieldKind::Email if !raw.contains('@') => Err("Enter a valid email address".to_string()),
        FieldKind::Code => Ok(json!(raw.to_lowercase())),
        _ => Ok(json!(raw)),
    }
}

/// Required amounts must be above zero; optional ones may be zero.
fn positive(field: &Field, n: f64) -> Result<(), String> {
    let ok = if field.required { n > 0.0 } else { n >= 0.0 };
    if ok {
        Ok(())
    } else {
        Err(format!("Enter a valid {}", field.label.to_lowercase()))
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Modal that creates or edits one record of `resource`.
///
/// Closes by clearing `target`; bumps `saved` after a successful save so
/// the list refetches.
#[component]
pub fn RecordForm(
    form: &'static FormSpec,
    resource: Resource,
    target: RwSignal<Option<FormTarget>>,
    saved: RwSignal<u32>,
) -> impl IntoView {
    let session = use_session();
    let toasts = use_toasts();

    let edit_id = StoredValue::new(match target.get_untracked() {
        Some(FormTarget::Edit(id)) => Some(id),
        _ => None,
    });
    let editing = edit_id.with_value(Option::is_some);

    let draft = RwSignal::new(FormDraft::blank(form, today()));
    let error = RwSignal::new(Option::<String>::None);
    let loading = RwSignal::new(editing);
    let saving = RwSignal::new(false);

    // Edits start from the full record; list rows omit fields.
    if let Some(id) = edit_id.get_value() {
        let api = session.api();
        spawn_local(async move {
            match api.fetch::<Value>(resource, &id).await {
                Ok(record) => draft.set(FormDraft::from_record(form, &record, today())),
                Err(err) => {
                    tracing::warn!(error = %err, %id, "could not load record for editing");
                    toasts.error(err.user_message());
                    target.set(None);
                }
            }
            loading.set(false);
        });
    }

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let body = match draft.with_untracked(|d| d.to_body(form, editing)) {
            Ok(body) => body,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };
        error.set(None);
        saving.set(true);
        let api = session.api();
        let id = edit_id.get_value();
        spawn_local(async move {
            let result = match &id {
                Some(id) => api.update::<Value, _>(resource, id, &body).await,
                None => api.create::<Value, _>(resource, &body).await,
            };
            match result {
                Ok(_) => {
                    tracing::info!(?resource, id = ?id, "record saved");
                    let verb = if id.is_some() { "updated" } else { "created" };
                    toasts.success(format!("{} {verb} successfully", form.noun));
                    target.set(None);
                    saved.update(|n| *n += 1);
                }
                Err(err) => error.set(Some(err.user_message())),
            }
            saving.set(false);
        });
    };

    let fields = form
        .fields
        .iter()
        .filter(|field| !(editing && field.create_only))
        .map(|field| field_view(field, draft))
        .collect_view();

    let title = if editing {
        format!("Edit {}", form.noun)
    } else {
        format!("Add {}", form.noun)
    };

    view! {
        <div class="modal-overlay">
            <div class="modal wide">
                <h2>{title}</h2>
                <form on:submit=on_submit>
                    <fieldset class="form-grid" disabled=move || loading.get()>
                        {fields}
                    </fieldset>
                    {move || error.get().map(|message| view! { <p class="error">{message}</p> })}
                    <div class="modal-actions">
                        <button type="button" class="secondary-btn" on:click=move |_| target.set(None)>
                            "Cancel"
                        </button>
                        <button
                            type="submit"
                            class="primary-btn"
                            disabled=move || saving.get() || loading.get()
                        >
                            {move || match (saving.get(), editing) {
                                (true, _) => "Saving...",
                                (false, true) => "Update",
                                (false, false) => "Create",
                            }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}

fn field_view(field: &'static Field, draft: RwSignal<FormDraft>) -> AnyView {
    let key = field.key;
    let label = if field.required {
        format!("{} *", field.label)
    } else {
        field.label.to_string()
    };
    match field.kind {
        FieldKind::Choice(options) => view! {
            <label>
                {label}
                <select on:change=move |ev| draft.update(|d| d.set(key, event_target_value(&ev)))>
                    {options
                        .iter()
                        .map(|(value, text)| view! {
                            <option value=*value selected=move || draft.with(|d| d.get(key) == *value)>
                                {*text}
                            </option>
                        })
                        .collect_view()}
                </select>
            </label>
        }
        .into_any(),
        kind => view! {
            <label>
                {label}
                <input
                    type=kind.input_type()
                    placeholder=field.placeholder
                    prop:value=move || draft.with(|d| d.get(key).to_string())
                    on:input=move |ev| draft.update(|d| d.set(key, event_target_value(&ev)))
                />
            </label>
        }
        .into_any(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::screens::{EMPLOYEES, MANUFACTURERS, WAREHOUSES};

    fn form_of(screen: &'static crate::pages::screens::Screen) -> &'static FormSpec {
        screen.form.as_ref().expect("screen has a form")
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
    }

    #[test]
    fn blank_forms_use_defaults() {
        let draft = FormDraft::blank(form_of(&EMPLOYEES), day());
        assert_eq!(draft.get("date_of_joining"), "2025-04-01");
        assert_eq!(draft.get("employment_type"), "full_time");
        assert_eq!(draft.get("department"), "operations");
        assert_eq!(draft.get("name"), "");
    }

    #[test]
    fn manufacturer_codes_are_lowercased() {
        let form = form_of(&MANUFACTURERS);
        let mut draft = FormDraft::blank(form, day());
        draft.set("code", " SUN_Pharma ".to_string());
        draft.set("name", "Sun Pharma".to_string());

        let body = draft.to_body(form, false).unwrap();
        assert_eq!(body, json!({"code": "sun_pharma", "name": "Sun Pharma"}));
    }

    #[test]
    fn missing_required_fields_are_named() {
        let form = form_of(&MANUFACTURERS);
        let mut draft = FormDraft::blank(form, day());
        draft.set("code", "cipla".to_string());
        assert_eq!(draft.to_body(form, false), Err("Name is required".to_string()));
    }

    #[test]
    fn employee_salary_is_sent_as_basic_salary() {
        let form = form_of(&EMPLOYEES);
        let mut draft = FormDraft::blank(form, day());
        draft.set("name", "Asha Rao".to_string());
        draft.set("phone", "9800000000".to_string());
        draft.set("basic_salary", "32000".to_string());

        let body = draft.to_body(form, false).unwrap();
        assert_eq!(body["basic_salary"], json!(32000));
        assert_eq!(body["date_of_joining"], "2025-04-01");
        assert!(body.get("email").is_none());
        assert!(body.get("gender").is_none());

        draft.set("basic_salary", "0".to_string());
        assert_eq!(
            draft.to_body(form, false),
            Err("Enter a valid monthly salary".to_string())
        );
        draft.set("basic_salary", "lots".to_string());
        assert!(draft.to_body(form, false).is_err());
    }

    #[test]
    fn edits_prefill_from_the_record_and_skip_create_only_fields() {
        let form = form_of(&EMPLOYEES);
        let record = json!({
            "id": "e1",
            "name": "Asha Rao",
            "phone": "9800000000",
            "salary": 32000.5,
            "department": "pharmacy",
            "date_of_joining": "2023-06-01T00:00:00",
            "email": null
        });
        let draft = FormDraft::from_record(form, &record, day());
        assert_eq!(draft.get("basic_salary"), "32000.5");
        assert_eq!(draft.get("department"), "pharmacy");
        assert_eq!(draft.get("date_of_joining"), "2023-06-01");
        assert_eq!(draft.get("email"), "");

        let body = draft.to_body(form, true).unwrap();
        assert!(body.get("date_of_joining").is_none());
        assert_eq!(body["basic_salary"], json!(32000.5));
    }

    #[test]
    fn warehouse_code_is_create_only() {
        let form = form_of(&WAREHOUSES);
        let mut draft = FormDraft::blank(form, day());
        for (key, value) in [
            ("name", "Central"),
            ("code", "WH-01"),
            ("address", "1 Ring Road"),
            ("city", "Pune"),
            ("state", "MH"),
            ("pincode", "411001"),
            ("capacity", "500"),
            ("email", "not-an-email"),
        ] {
            draft.set(key, value.to_string());
        }
        assert_eq!(
            draft.to_body(form, false),
            Err("Enter a valid email address".to_string())
        );

        draft.set("email", String::new());
        let created = draft.to_body(form, false).unwrap();
        assert_eq!(created["code"], "WH-01");
        assert_eq!(created["capacity"], json!(500));
        assert_eq!(created["status"], "active");

        let updated = draft.to_body(form, true).unwrap();
        assert!(updated.get("code").is_none());
    }
}
