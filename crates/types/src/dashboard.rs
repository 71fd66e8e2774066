use serde::{Deserialize, Serialize};

use crate::{
    attendance::ClockStatus, employee::Employee, leave::Leave, request::EmployeeRequest,
    salary::Salary,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HrDashboard {
    pub employees: u64,
    pub departments: u64,
    pub leaves: u64,
    pub pending_leaves: u64,
    pub requests: u64,
    pub open_requests: u64,
    pub recent_leaves: Vec<Leave>,
    pub recent_requests: Vec<EmployeeRequest>,
    pub recent_employees: Vec<Employee>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDashboard {
    pub clock: ClockStatus,
    pub hours_this_period: f64,
    pub pending_leaves: u64,
    pub latest_salary: Option<Salary>,
    pub open_requests: u64,
}
