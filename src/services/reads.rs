//! Read Actions
//!
//! GET actions. Reference-data lookups also have cached variants backed by
//! the client's [`ReadCache`](crate::cache::ReadCache).

use crate::client::NetSuiteClient;
use crate::core::HttpTransport;
use crate::error::RequestError;
use crate::types::{CachedResult, CallResult};

/// Prefix used for demo records when none is given.
pub const DEFAULT_DEMO_PREFIX: &str = "Demo";

impl<T: HttpTransport> NetSuiteClient<T> {
    /// Available demo data templates.
    pub async fn templates(&self) -> CallResult {
        self.get_action("templates", &[]).await
    }

    /// Status of a queued batch job.
    pub async fn job_status(&self, task_id: &str) -> CallResult {
        if task_id.trim().is_empty() {
            return RequestError::invalid("taskId", "must not be empty").into();
        }
        self.get_action("jobStatus", &[("taskId", task_id)]).await
    }

    /// Customers whose name starts with `prefix` (default `Demo`).
    pub async fn list_customers(&self, prefix: Option<&str>) -> CallResult {
        let prefix = prefix.unwrap_or(DEFAULT_DEMO_PREFIX);
        self.get_action("listCustomers", &[("prefix", prefix)]).await
    }

    /// Demo projects of one customer.
    pub async fn list_projects(&self, customer_id: u64) -> CallResult {
        let customer_id = customer_id.to_string();
        self.get_action("listProjects", &[("customerId", customer_id.as_str())])
            .await
    }

    pub async fn billing_types(&self) -> CallResult {
        self.get_action("billingTypes", &[]).await
    }

    pub async fn expense_types(&self) -> CallResult {
        self.get_action("expenseTypes", &[]).await
    }

    pub async fn unit_types(&self) -> CallResult {
        self.get_action("unitTypes", &[]).await
    }

    pub async fn service_items(&self) -> CallResult {
        self.get_action("serviceItems", &[]).await
    }

    pub async fn employees(&self) -> CallResult {
        self.get_action("employees", &[]).await
    }

    /// All projects, optionally filtered by customer.
    pub async fn projects(&self, customer_id: Option<u64>) -> CallResult {
        match customer_id {
            Some(id) => {
                let id = id.to_string();
                self.get_action("projects", &[("customerId", id.as_str())]).await
            }
            None => self.get_action("projects", &[]).await,
        }
    }

    pub async fn customers(&self) -> CallResult {
        self.get_action("customers", &[]).await
    }

    /// [`unit_types`](Self::unit_types) through the read cache.
    pub async fn cached_unit_types(&self, force_refresh: bool) -> CachedResult {
        self.get_action_cached("unitTypes", &[], force_refresh).await
    }

    /// [`service_items`](Self::service_items) through the read cache.
    pub async fn cached_service_items(&self, force_refresh: bool) -> CachedResult {
        self.get_action_cached("serviceItems", &[], force_refresh)
            .await
    }

    /// [`employees`](Self::employees) through the read cache.
    pub async fn cached_employees(&self, force_refresh: bool) -> CachedResult {
        self.get_action_cached("employees", &[], force_refresh).await
    }

    /// [`customers`](Self::customers) through the read cache.
    pub async fn cached_customers(&self, force_refresh: bool) -> CachedResult {
        self.get_action_cached("customers", &[], force_refresh).await
    }

    /// [`projects`](Self::projects) through the read cache, keyed per customer.
    pub async fn cached_projects(&self, customer_id: Option<u64>, force_refresh: bool) -> CachedResult {
        let qualifiers = [("customerId", customer_id.map(|id| id.to_string()))];
        self.get_action_cached("projects", &qualifiers, force_refresh)
            .await
    }
}
