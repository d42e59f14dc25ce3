//! Action Parameters
//!
//! Typed inputs for RESTlet write actions. Field names serialize to the
//! camelCase keys the RESTlet reads from its `data` envelope.

use serde::{Deserialize, Serialize};

/// Demo data template.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    #[default]
    ProfessionalServices,
    Energy,
    ItServices,
    Creative,
}

/// Parameters for `quickSetup`.
///
/// Project fields are applied to every demo project the RESTlet creates.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickSetupParams {
    pub prospect_name: String,
    pub template: TemplateType,
    pub project_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_manager: Option<String>,
    pub billing_type: String,
    pub project_expense_type: String,
}

impl QuickSetupParams {
    pub fn new(prospect_name: impl Into<String>, template: TemplateType) -> Self {
        Self {
            prospect_name: prospect_name.into(),
            template,
            project_status: "In Progress".to_string(),
            project_manager: None,
            billing_type: "Charge-Based".to_string(),
            project_expense_type: "Regular".to_string(),
        }
    }

    pub fn with_project_manager(mut self, manager: impl Into<String>) -> Self {
        self.project_manager = Some(manager.into());
        self
    }
}

/// Parameters for `cleanupDemoData`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupParams {
    pub record_type: String,
    pub prefix: String,
}

/// Parameters for `createCustomer`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerParams {
    pub company_name: String,
    pub subsidiary: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl CreateCustomerParams {
    /// Customer under the parent subsidiary.
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            subsidiary: 1,
            email: None,
            phone: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// Parameters for `createProject`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectParams {
    pub project_name: String,
    pub customer_id: u64,
    pub project_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_manager: Option<String>,
    pub billing_type: String,
    pub project_expense_type: String,
}

impl CreateProjectParams {
    /// In-progress, charge-based project with regular expenses.
    pub fn new(project_name: impl Into<String>, customer_id: u64) -> Self {
        Self {
            project_name: project_name.into(),
            customer_id,
            project_status: "In Progress".to_string(),
            project_manager: None,
            billing_type: "Charge-Based".to_string(),
            project_expense_type: "Regular".to_string(),
        }
    }

    pub fn with_project_manager(mut self, manager: impl Into<String>) -> Self {
        self.project_manager = Some(manager.into());
        self
    }
}

/// Parameters for `createServiceItem`.
///
/// Internal ids default to the non-taxable schedule, the parent subsidiary
/// and one-time direct revenue posting.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceItemParams {
    pub item_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub tax_schedule: u32,
    pub subsidiary: u32,
    pub include_children: bool,
    pub revenue_recognition_rule: u32,
    pub rev_rec_forecast_rule: u32,
    pub create_revenue_plans_on: Option<String>,
    pub direct_revenue_posting: bool,
}

impl CreateServiceItemParams {
    pub fn new(item_name: impl Into<String>) -> Self {
        Self {
            item_name: item_name.into(),
            display_name: None,
            tax_schedule: 2,
            subsidiary: 1,
            include_children: true,
            revenue_recognition_rule: 109,
            rev_rec_forecast_rule: 109,
            create_revenue_plans_on: None,
            direct_revenue_posting: true,
        }
    }
}

/// Parameters for `createTimeEntry`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeEntryParams {
    pub employee_id: u64,
    pub project_id: u64,
    pub hours: f64,
    /// `YYYY-MM-DD`; today (UTC) when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_billable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl CreateTimeEntryParams {
    pub fn new(employee_id: u64, project_id: u64, hours: f64) -> Self {
        Self {
            employee_id,
            project_id,
            hours,
            date: None,
            is_billable: None,
            memo: None,
        }
    }
}

/// Parameters for `batchCreate`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateParams {
    pub template: TemplateType,
    pub customer_count: u32,
    pub projects_per_customer: u32,
    pub days_of_time: u32,
}

impl Default for BatchCreateParams {
    fn default() -> Self {
        Self {
            template: TemplateType::default(),
            customer_count: 5,
            projects_per_customer: 3,
            days_of_time: 30,
        }
    }
}

/// One estimate line.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateLineItem {
    pub item_id: u64,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<u64>,
}

/// Parameters for `createEstimate`.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEstimateParams {
    pub customer_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_rep_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subsidiary: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trandate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duedate: Option<String>,
    pub items: Vec<EstimateLineItem>,
}

/// Resource assigned to a project task.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTaskAssignee {
    pub resource_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<f64>,
    pub planned_work: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_item_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_class: Option<u64>,
}

/// Parameters for `createProjectTask`.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectTaskParams {
    pub project_id: u64,
    pub task_name: String,
    pub planned_work: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_by_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_service_item_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_billable: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<ProjectTaskAssignee>,
}

/// Record created by `quickSetup`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCustomer {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Project created by `quickSetup`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProject {
    pub id: u64,
    pub name: String,
    pub customer_id: u64,
    #[serde(default)]
    pub url: Option<String>,
}

/// Payload returned by `quickSetup` under its `data` key.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct QuickSetupData {
    #[serde(default)]
    pub customers: Vec<CreatedCustomer>,
    #[serde(default)]
    pub projects: Vec<CreatedProject>,
}

impl QuickSetupData {
    /// Extract the created records from a successful `quickSetup` result.
    pub fn from_result(result: &crate::types::CallResult) -> Option<Self> {
        if !result.success {
            return None;
        }
        let data = result.data.as_ref()?.get("data")?;
        serde_json::from_value(data.clone()).ok()
    }
}
