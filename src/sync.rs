//! Record Sync
//!
//! Pushes local records to NetSuite one create call at a time and reports
//! what was created. Pushes are not atomic: a failed record never rolls back
//! the ones created before it.

use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{info, warn};

use crate::client::NetSuiteClient;
use crate::core::HttpTransport;
use crate::types::{CallResult, CreateCustomerParams, CreateProjectParams, CreateServiceItemParams};

/// Pull a record id out of a RESTlet response body.
///
/// Each candidate is looked up at the top level, then under `data`; `id` is
/// the last resort in the same two places. The first non-null scalar wins.
///
/// # Examples
///
/// ```
/// use netsuite_integration::sync::extract_id;
/// use serde_json::json;
///
/// let body = json!({"success": true, "data": {"customerId": 1234}});
/// assert_eq!(extract_id(&body, &["customerId"]), Some("1234".to_string()));
/// assert_eq!(extract_id(&json!({"success": true}), &["customerId"]), None);
/// ```
pub fn extract_id(body: &Value, candidates: &[&str]) -> Option<String> {
    let nested = body.get("data");

    candidates
        .iter()
        .copied()
        .chain(std::iter::once("id"))
        .find_map(|key| {
            scalar(body.get(key)).or_else(|| scalar(nested.and_then(|data| data.get(key))))
        })
}

fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A record created remotely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncedRecord {
    pub name: String,
    pub remote_id: String,
}

/// A record that could not be pushed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncFailure {
    pub name: String,
    pub reason: String,
}

/// Outcome of one push, in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Plural entity label, e.g. `customers`.
    pub entity: String,
    pub success_count: usize,
    pub error_count: usize,
    pub created: Vec<SyncedRecord>,
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    fn new(entity: &str) -> Self {
        Self {
            entity: entity.to_string(),
            ..Self::default()
        }
    }

    fn record(&mut self, name: String, outcome: Result<String, String>) {
        match outcome {
            Ok(remote_id) => {
                self.success_count += 1;
                self.created.push(SyncedRecord { name, remote_id });
            }
            Err(reason) => {
                self.error_count += 1;
                self.failures.push(SyncFailure { name, reason });
            }
        }
    }

    /// Human-readable summary, e.g. `Pushed 3 customers to NetSuite, 1 failed`.
    pub fn summary(&self) -> String {
        let mut summary = format!("Pushed {} {} to NetSuite", self.success_count, self.entity);
        if self.error_count > 0 {
            summary.push_str(&format!(", {} failed", self.error_count));
        }
        summary
    }

    /// Failure lines as `<name>: <reason>`.
    pub fn errors(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|f| format!("{}: {}", f.name, f.reason))
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.error_count == 0
    }
}

/// A local project to push, referencing its customer's remote id if synced.
#[derive(Clone, Debug)]
pub struct ProjectRecord {
    pub project_name: String,
    pub customer_remote_id: Option<String>,
}

/// Turn a create result into a remote id or a failure reason.
fn created_id(result: &CallResult, candidates: &[&str], label: &str) -> Result<String, String> {
    if !result.success {
        return Err(result.error_message().to_string());
    }
    result
        .data
        .as_ref()
        .and_then(|body| extract_id(body, candidates))
        .ok_or_else(|| format!("No {} ID returned", label))
}

fn finish(report: SyncReport) -> SyncReport {
    if report.is_success() {
        info!(entity = %report.entity, created = report.success_count, "Sync completed");
    } else {
        warn!(
            entity = %report.entity,
            created = report.success_count,
            failed = report.error_count,
            "Sync completed with failures"
        );
    }
    report
}

impl<T: HttpTransport> NetSuiteClient<T> {
    /// Create each customer remotely, at most `concurrency` calls in flight.
    pub async fn push_customers(
        &self,
        customers: Vec<CreateCustomerParams>,
        concurrency: usize,
    ) -> SyncReport {
        let outcomes: Vec<_> = stream::iter(customers)
            .map(|params| async move {
                let name = params.company_name.clone();
                let result = self.create_customer(params).await;
                (name, created_id(&result, &["customerId"], "customer"))
            })
            .buffered(concurrency.max(1))
            .collect()
            .await;

        let mut report = SyncReport::new("customers");
        for (name, outcome) in outcomes {
            report.record(name, outcome);
        }
        finish(report)
    }

    /// Create each project under its already-synced customer.
    ///
    /// Projects whose customer has no remote id fail without a call.
    pub async fn push_projects(&self, projects: Vec<ProjectRecord>, concurrency: usize) -> SyncReport {
        let outcomes: Vec<_> = stream::iter(projects)
            .map(|project| async move {
                let outcome = match project.customer_remote_id.as_deref() {
                    None => Err("Customer not synced to NetSuite".to_string()),
                    Some(raw) => match raw.trim().parse::<u64>() {
                        Err(_) => Err("Invalid customer ID".to_string()),
                        Ok(customer_id) => {
                            let params = CreateProjectParams::new(project.project_name.clone(), customer_id);
                            let result = self.create_project(params).await;
                            created_id(&result, &["projectId"], "project")
                        }
                    },
                };
                (project.project_name, outcome)
            })
            .buffered(concurrency.max(1))
            .collect()
            .await;

        let mut report = SyncReport::new("projects");
        for (name, outcome) in outcomes {
            report.record(name, outcome);
        }
        finish(report)
    }

    /// Create each service item remotely.
    ///
    /// Reported names are the local names, before the uniqueness suffix.
    pub async fn push_service_items(
        &self,
        items: Vec<CreateServiceItemParams>,
        concurrency: usize,
    ) -> SyncReport {
        let outcomes: Vec<_> = stream::iter(items)
            .map(|params| async move {
                let name = params.item_name.clone();
                let result = self.create_service_item(params).await;
                (name, created_id(&result, &["itemId"], "item"))
            })
            .buffered(concurrency.max(1))
            .collect()
            .await;

        let mut report = SyncReport::new("service_items");
        for (name, outcome) in outcomes {
            report.record(name, outcome);
        }
        finish(report)
    }
}
