//! Resource endpoints.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{AttendanceRecord, Batch, NewBatch, SalaryRun, StockAdjustment, StockEntry};

/// Default page size of list screens.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One page of a list endpoint.
///
/// Some endpoints return a bare array instead of the paginated envelope;
/// that is read as a single page holding everything.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub pages: u32,
}

impl<T> Page<T> {
    /// Returns true if a page follows this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    /// Returns true if a page precedes this one.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            size: DEFAULT_PAGE_SIZE,
            pages: 0,
        }
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    items: Vec<T>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    size: Option<u32>,
    #[serde(default)]
    pages: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageRepr<T> {
    Envelope(Envelope<T>),
    Bare(Vec<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match PageRepr::<T>::deserialize(deserializer)? {
            PageRepr::Envelope(env) => {
                let len = env.items.len();
                let total = env.total.unwrap_or(len as u64);
                let size = env.size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
                let pages = env
                    .pages
                    .unwrap_or_else(|| u32::try_from(total.div_ceil(u64::from(size))).unwrap_or(u32::MAX));
                Self {
                    items: env.items,
                    total,
                    page: env.page.unwrap_or(1),
                    size,
                    pages,
                }
            }
            PageRepr::Bare(items) => {
                let total = items.len() as u64;
                Self {
                    size: u32::try_from(items.len()).unwrap_or(u32::MAX),
                    items,
                    total,
                    page: 1,
                    pages: 1,
                }
            }
        })
    }
}

/// The batch listing comes back as `{"medicine_id", "batches": [...]}`;
/// older deployments answer with a page or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum BatchListing {
    Keyed { batches: Vec<Batch> },
    Paged(Page<Batch>),
}

/// Query parameters of a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub size: u32,
    pub search: Option<String>,
    pub status: Option<String>,
    /// Endpoint-specific filters such as `shop_id`.
    pub filters: Vec<(String, String)>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
            search: None,
            status: None,
            filters: Vec::new(),
        }
    }
}

impl ListQuery {
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            page: page.max(1),
            ..Self::default()
        }
    }

    /// Sets the search term; blank terms are dropped.
    #[must_use]
    pub fn with_search(mut self, search: &str) -> Self {
        let search = search.trim();
        self.search = (!search.is_empty()).then(|| search.to_string());
        self
    }

    /// Sets the status filter; blank values are dropped.
    #[must_use]
    pub fn with_status(mut self, status: &str) -> Self {
        self.status = (!status.is_empty()).then(|| status.to_string());
        self
    }

    #[must_use]
    pub fn with_filter(mut self, key: &str, value: impl Into<String>) -> Self {
        self.filters.push((key.to_string(), value.into()));
        self
    }

    /// Flattens into query-string pairs, omitting unset fields.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status".to_string(), status.clone()));
        }
        pairs.extend(self.filters.iter().cloned());
        pairs
    }
}

/// Collections exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Warehouses,
    Shops,
    Medicines,
    Manufacturers,
    StockMovements,
    Dispatches,
    Invoices,
    Employees,
}

impl Resource {
    /// Collection path below the API prefix.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Warehouses => "/warehouses",
            Self::Shops => "/shops",
            Self::Medicines => "/medicines",
            Self::Manufacturers => "/masters/manufacturers",
            Self::StockMovements => "/stock/movements",
            Self::Dispatches => "/dispatches",
            Self::Invoices => "/invoices",
            Self::Employees => "/employees",
        }
    }

    fn item_path(self, id: &str) -> String {
        format!("{}/{id}", self.path())
    }
}

impl ApiClient {
    /// Lists one page of `resource`.
    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: Resource,
        query: &ListQuery,
    ) -> Result<Page<T>, ApiError> {
        self.get(resource.path(), query.to_pairs()).await
    }

    pub async fn fetch<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: &str,
    ) -> Result<T, ApiError> {
        self.get(&resource.item_path(id), Vec::new()).await
    }

    pub async fn create<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: Resource,
        body: &B,
    ) -> Result<T, ApiError> {
        self.post(resource.path(), body).await
    }

    pub async fn update<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: Resource,
        id: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.put(&resource.item_path(id), body).await
    }

    pub async fn remove(&self, resource: Resource, id: &str) -> Result<(), ApiError> {
        self.delete(&resource.item_path(id)).await
    }

    /// Batches of one medicine.
    pub async fn medicine_batches(&self, medicine_id: &str) -> Result<Vec<Batch>, ApiError> {
        let path = format!("{}/batches", Resource::Medicines.item_path(medicine_id));
        let listing: BatchListing = self.get(&path, Vec::new()).await?;
        Ok(match listing {
            BatchListing::Keyed { batches } => batches,
            BatchListing::Paged(page) => page.items,
        })
    }

    pub async fn create_batch(&self, medicine_id: &str, batch: &NewBatch) -> Result<Batch, ApiError> {
        let path = format!("{}/batches", Resource::Medicines.item_path(medicine_id));
        self.post(&path, batch).await
    }

    pub async fn adjust_stock(&self, adjustment: &StockAdjustment) -> Result<Value, ApiError> {
        self.post("/stock/adjust", adjustment).await
    }

    /// Books received stock into a warehouse.
    pub async fn stock_entry(&self, entry: &StockEntry) -> Result<Value, ApiError> {
        self.post("/stock/entry", entry).await
    }

    /// Low-stock and expiry alerts, optionally of one type.
    pub async fn stock_alerts(&self, alert_type: Option<&str>) -> Result<Value, ApiError> {
        let query = alert_type
            .map(|t| vec![("alert_type".to_string(), t.to_string())])
            .unwrap_or_default();
        self.get("/stock/alerts", query).await
    }

    pub async fn update_dispatch_status(
        &self,
        dispatch_id: &str,
        status: &str,
    ) -> Result<Value, ApiError> {
        let path = format!("{}/status", Resource::Dispatches.item_path(dispatch_id));
        self.put(&path, &json!({ "status": status })).await
    }

    pub async fn invoice_items(&self, invoice_id: &str) -> Result<Value, ApiError> {
        let path = format!("{}/items", Resource::Invoices.item_path(invoice_id));
        self.get(&path, Vec::new()).await
    }

    pub async fn process_return<B: Serialize + ?Sized>(
        &self,
        invoice_id: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let path = format!("{}/returns", Resource::Invoices.item_path(invoice_id));
        self.post(&path, body).await
    }

    pub async fn mark_attendance(&self, record: &AttendanceRecord) -> Result<Value, ApiError> {
        self.post("/employees/attendance", record).await
    }

    /// Attendance of one employee for a month.
    pub async fn attendance(
        &self,
        employee_id: &str,
        month: u32,
        year: i32,
    ) -> Result<Value, ApiError> {
        let path = format!("/employees/attendance/{employee_id}");
        let query = vec![
            ("month".to_string(), month.to_string()),
            ("year".to_string(), year.to_string()),
        ];
        self.get(&path, query).await
    }

    pub async fn process_salary(&self, run: &SalaryRun) -> Result<Value, ApiError> {
        self.post("/employees/salary/process", run).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::ScriptedTransport;
    use crate::models::{Manufacturer, Warehouse};
    use crate::transport::{ApiResponse, Body, Method};
    use pharmaec_core::{MemoryStore, keys};
    use std::sync::Arc;

    fn client(responses: Vec<ApiResponse>) -> (Arc<ScriptedTransport>, ApiClient) {
        let transport = Arc::new(ScriptedTransport::new(responses));
        let storage = MemoryStore::with_entries([(keys::ACCESS_TOKEN, "a1")]);
        (transport.clone(), ApiClient::new(transport, Arc::new(storage)))
    }

    #[test]
    fn page_from_envelope() {
        let page: Page<u32> =
            serde_json::from_str(r#"{"items":[1,2],"total":12,"page":1,"size":10,"pages":2}"#)
                .expect("deserialize");
        assert_eq!(page.items, vec![1, 2]);
        assert!(page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn page_without_pages_field_computes_it() {
        let page: Page<u32> =
            serde_json::from_str(r#"{"items":[1],"total":21,"page":3,"size":10}"#).expect("deserialize");
        assert_eq!(page.pages, 3);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn bare_array_is_a_single_page() {
        let page: Page<u32> = serde_json::from_str("[4,5,6]").expect("deserialize");
        assert_eq!(page.total, 3);
        assert_eq!(page.pages, 1);
        assert!(!page.has_next());
    }

    #[test]
    fn query_pairs_skip_blank_fields() {
        let query = ListQuery::page(2)
            .with_search("  para ")
            .with_status("")
            .with_filter("shop_id", "s1");

        assert_eq!(
            query.to_pairs(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("size".to_string(), "10".to_string()),
                ("search".to_string(), "para".to_string()),
                ("shop_id".to_string(), "s1".to_string()),
            ]
        );
        assert_eq!(ListQuery::page(0).page, 1);
    }

    #[tokio::test]
    async fn list_sends_query_and_decodes_page() {
        let (transport, client) = client(vec![ApiResponse::new(
            200,
            r#"{"items":[{"id":"w1","name":"Central","code":"WH-01","status":"active","shop_count":4}],"total":1,"page":1,"size":10,"pages":1}"#,
        )]);

        let page: Page<Warehouse> = client
            .list(Resource::Warehouses, &ListQuery::default().with_status("active"))
            .await
            .unwrap();

        assert_eq!(page.items[0].shop_count, 4);
        let request = &transport.requests()[0];
        assert_eq!(request.path, "/warehouses");
        assert!(request.query.contains(&("status".to_string(), "active".to_string())));
    }

    #[tokio::test]
    async fn dispatch_status_update() {
        let (transport, client) = client(vec![ApiResponse::new(200, r#"{"status":"in_transit"}"#)]);

        client.update_dispatch_status("d1", "in_transit").await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.path, "/dispatches/d1/status");
        assert_eq!(request.body, Body::Json(json!({"status": "in_transit"})));
    }

    #[tokio::test]
    async fn remove_targets_the_item() {
        let (transport, client) = client(vec![ApiResponse::new(204, "")]);

        client.remove(Resource::Manufacturers, "m9").await.unwrap();

        assert_eq!(transport.paths(), vec!["/masters/manufacturers/m9"]);
        assert_eq!(transport.requests()[0].method, Method::Delete);
    }

    #[tokio::test]
    async fn batches_accept_bare_arrays() {
        let (_, client) = client(vec![ApiResponse::new(
            200,
            r#"[{"id":"b1","batch_number":"B-1","expiry_date":"2026-01-31","quantity":10,"mrp":12.5}]"#,
        )]);

        let batches = client.medicine_batches("m1").await.unwrap();

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].batch_number, "B-1");
    }

    #[tokio::test]
    async fn batches_read_the_keyed_listing() {
        let (transport, client) = client(vec![ApiResponse::new(
            200,
            r#"{"medicine_id":"m1","batches":[{"id":"b1","batch_number":"B-1","expiry_date":"2026-01-31","quantity":10,"mrp":12.5},{"id":"b2","batch_number":"B-2"}]}"#,
        )]);

        let batches = client.medicine_batches("m1").await.unwrap();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].quantity, 0);
        assert_eq!(transport.paths(), vec!["/medicines/m1/batches"]);
    }

    #[tokio::test]
    async fn create_posts_to_the_collection() {
        let (transport, client) = client(vec![ApiResponse::new(
            201,
            r#"{"id":"m7","code":"cipla","name":"Cipla"}"#,
        )]);

        let created: Manufacturer = client
            .create(Resource::Manufacturers, &json!({"code": "cipla", "name": "Cipla"}))
            .await
            .unwrap();

        assert_eq!(created.id, "m7");
        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/masters/manufacturers");
        assert_eq!(request.bearer.as_deref(), Some("a1"));
        assert_eq!(request.body, Body::Json(json!({"code": "cipla", "name": "Cipla"})));
    }

    #[tokio::test]
    async fn update_puts_to_the_item() {
        let (transport, client) = client(vec![ApiResponse::new(200, r#"{"id":"e3","name":"Asha"}"#)]);

        let updated: Value = client
            .update(Resource::Employees, "e3", &json!({"basic_salary": 32000}))
            .await
            .unwrap();

        assert_eq!(updated["name"], "Asha");
        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.path, "/employees/e3");
        assert_eq!(request.body, Body::Json(json!({"basic_salary": 32000})));
    }

    #[tokio::test]
    async fn create_batch_posts_below_the_medicine() {
        let (transport, client) = client(vec![ApiResponse::new(
            201,
            r#"{"id":"b4","batch_number":"B-4","expiry_date":"2027-06-30","quantity":200,"mrp":45.0}"#,
        )]);
        let batch = NewBatch {
            batch_number: "B-4".to_string(),
            manufacturing_date: None,
            expiry_date: "2027-06-30".to_string(),
            quantity: 200,
            purchase_price: 30.0,
            mrp: 45.0,
        };

        let created = client.create_batch("m1", &batch).await.unwrap();

        assert_eq!(created.id, "b4");
        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/medicines/m1/batches");
        assert_eq!(
            request.body,
            Body::Json(json!({
                "batch_number": "B-4",
                "expiry_date": "2027-06-30",
                "quantity": 200,
                "purchase_price": 30.0,
                "mrp": 45.0,
            }))
        );
    }

    #[tokio::test]
    async fn adjust_stock_posts_the_adjustment() {
        let (transport, client) = client(vec![ApiResponse::new(200, r#"{"new_quantity":8}"#)]);
        let adjustment = StockAdjustment {
            location_type: "warehouse".to_string(),
            location_id: "w1".to_string(),
            medicine_id: "m1".to_string(),
            batch_id: "b1".to_string(),
            adjustment_quantity: -2,
            reason: "damaged".to_string(),
            notes: None,
        };

        let result = client.adjust_stock(&adjustment).await.unwrap();

        assert_eq!(result["new_quantity"], 8);
        let request = &transport.requests()[0];
        assert_eq!(request.path, "/stock/adjust");
        let Body::Json(body) = &request.body else {
            panic!("expected a JSON body");
        };
        assert_eq!(body["adjustment_quantity"], -2);
        assert!(body.get("notes").is_none());
    }
}
