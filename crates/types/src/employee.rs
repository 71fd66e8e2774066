use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::{EmployeeStatus, EmploymentType, Gender};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmergencyContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub relationship: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub department_id: Option<Uuid>,
    pub department_name: Option<String>,
    pub manager_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: String,
    pub employee_code: Option<String>,
    pub position: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub employment_type: EmploymentType,
    pub work_location: Option<String>,
    pub status: EmployeeStatus,
    pub emergency_contact: Option<EmergencyContact>,
    pub skills: Vec<String>,
    pub education: Vec<Education>,
    pub is_verified: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Entry of `all-employees-ids`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRef {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub contact_number: String,
    pub department_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
    pub employee_code: Option<String>,
    pub position: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub employment_type: Option<EmploymentType>,
    pub work_location: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education: Vec<Education>,
}

/// Fields HR may change on an employee record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub department_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
    pub employee_code: Option<String>,
    pub position: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub employment_type: Option<EmploymentType>,
    pub work_location: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub emergency_contact: Option<EmergencyContact>,
    pub skills: Option<Vec<String>>,
    pub education: Option<Vec<Education>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployee {
    pub employee_id: Uuid,
    pub updated_employee: EmployeeChanges,
}

/// Fields an employee may change on their own profile. Anything else in the
/// body is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub contact_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub emergency_contact: Option<EmergencyContact>,
    pub skills: Option<Vec<String>>,
    pub education: Option<Vec<Education>>,
}
