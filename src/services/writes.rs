//! Write Actions
//!
//! POST actions. Parameters are checked only as far as shaping the request
//! needs; a rejected input comes back as a failed [`CallResult`] and nothing
//! is sent.

use rand::Rng;

use crate::client::NetSuiteClient;
use crate::core::HttpTransport;
use crate::error::RequestError;
use crate::types::{
    BatchCreateParams, CallResult, CleanupParams, CreateCustomerParams, CreateEstimateParams,
    CreateProjectParams, CreateProjectTaskParams, CreateServiceItemParams, CreateTimeEntryParams,
    QuickSetupParams,
};

fn require_non_empty(field: &str, value: &str) -> Result<(), RequestError> {
    if value.trim().is_empty() {
        return Err(RequestError::invalid(field, "must not be empty"));
    }
    Ok(())
}

/// Suffix the item name so repeated runs don't collide with existing items.
fn unique_item_name(item_name: &str) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(1000..10000);
    format!("{} - {}", item_name, suffix)
}

impl<T: HttpTransport> NetSuiteClient<T> {
    /// Create a demo prospect with customers and projects from a template.
    ///
    /// Use [`QuickSetupData::from_result`](crate::types::QuickSetupData::from_result)
    /// to read the created records.
    pub async fn quick_setup(&self, params: QuickSetupParams) -> CallResult {
        if let Err(err) = require_non_empty("prospectName", &params.prospect_name) {
            return err.into();
        }
        self.post_action("quickSetup", &params).await
    }

    pub async fn create_customer(&self, params: CreateCustomerParams) -> CallResult {
        if let Err(err) = require_non_empty("companyName", &params.company_name) {
            return err.into();
        }
        self.post_action("createCustomer", &params).await
    }

    pub async fn create_project(&self, params: CreateProjectParams) -> CallResult {
        if let Err(err) = require_non_empty("projectName", &params.project_name) {
            return err.into();
        }
        self.post_action("createProject", &params).await
    }

    /// Create a service item. The name gets a random four-digit suffix,
    /// which is also used as the display name.
    pub async fn create_service_item(&self, mut params: CreateServiceItemParams) -> CallResult {
        if let Err(err) = require_non_empty("itemName", &params.item_name) {
            return err.into();
        }
        params.item_name = unique_item_name(&params.item_name);
        params.display_name = Some(params.item_name.clone());
        self.post_action("createServiceItem", &params).await
    }

    /// Log time against a project. Dates default to today (UTC) and entries
    /// to billable.
    pub async fn create_time_entry(&self, mut params: CreateTimeEntryParams) -> CallResult {
        if !params.hours.is_finite() || params.hours <= 0.0 {
            return RequestError::invalid("hours", "must be a positive number").into();
        }
        if params.date.is_none() {
            params.date = Some(chrono::Utc::now().format("%Y-%m-%d").to_string());
        }
        params.is_billable.get_or_insert(true);
        self.post_action("createTimeEntry", &params).await
    }

    /// Queue bulk demo data generation.
    pub async fn batch_create(&self, params: Option<BatchCreateParams>) -> CallResult {
        let params = params.unwrap_or_default();
        self.post_action("batchCreate", &params).await
    }

    pub async fn create_estimate(&self, params: CreateEstimateParams) -> CallResult {
        if params.items.is_empty() {
            return RequestError::invalid("items", "at least one line item is required").into();
        }
        self.post_action("createEstimate", &params).await
    }

    pub async fn create_project_task(&self, params: CreateProjectTaskParams) -> CallResult {
        if let Err(err) = require_non_empty("taskName", &params.task_name) {
            return err.into();
        }
        self.post_action("createProjectTask", &params).await
    }

    /// Delete demo records of one type whose names start with `prefix`.
    pub async fn cleanup_demo_data(&self, record_type: &str, prefix: &str) -> CallResult {
        let checked = require_non_empty("recordType", record_type)
            .and_then(|_| require_non_empty("prefix", prefix));
        if let Err(err) = checked {
            return err.into();
        }
        let params = CleanupParams {
            record_type: record_type.to_string(),
            prefix: prefix.to_string(),
        };
        self.post_action("cleanupDemoData", &params).await
    }

    /// RESTlet deployment info; doubles as a health check.
    pub async fn get_info(&self) -> CallResult {
        self.post_action("getInfo", &serde_json::Value::Null).await
    }
}
