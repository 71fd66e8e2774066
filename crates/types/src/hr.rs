use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::{HrRole, HrStatus};

/// Capabilities an HR profile may be granted individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    CreateEmployee,
    EditEmployee,
    DeleteEmployee,
    ViewSalary,
    ManageSalary,
    ManageLeaves,
    ManageRecruitment,
    ManageRequests,
    ViewReports,
    ManageCalendar,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct HrPermissions {
    pub can_create_employee: bool,
    pub can_edit_employee: bool,
    pub can_delete_employee: bool,
    pub can_view_salary: bool,
    pub can_manage_salary: bool,
    pub can_manage_leaves: bool,
    pub can_manage_recruitment: bool,
    pub can_manage_requests: bool,
    pub can_view_reports: bool,
    pub can_manage_calendar: bool,
}

impl HrPermissions {
    pub fn all() -> Self {
        Self {
            can_create_employee: true,
            can_edit_employee: true,
            can_delete_employee: true,
            can_view_salary: true,
            can_manage_salary: true,
            can_manage_leaves: true,
            can_manage_recruitment: true,
            can_manage_requests: true,
            can_view_reports: true,
            can_manage_calendar: true,
        }
    }

    pub fn allows(&self, permission: Permission) -> bool {
        match permission {
            Permission::CreateEmployee => self.can_create_employee,
            Permission::EditEmployee => self.can_edit_employee,
            Permission::DeleteEmployee => self.can_delete_employee,
            // managing salaries implies seeing them
            Permission::ViewSalary => self.can_view_salary || self.can_manage_salary,
            Permission::ManageSalary => self.can_manage_salary,
            Permission::ManageLeaves => self.can_manage_leaves,
            Permission::ManageRecruitment => self.can_manage_recruitment,
            Permission::ManageRequests => self.can_manage_requests,
            Permission::ViewReports => self.can_view_reports,
            Permission::ManageCalendar => self.can_manage_calendar,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HrProfile {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub department_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: String,
    pub role: HrRole,
    pub status: HrStatus,
    pub permissions: HrPermissions,
    pub is_verified: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHrProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub contact_number: String,
    pub role: Option<HrRole>,
    pub department_id: Option<Uuid>,
    pub permissions: Option<HrPermissions>,
}

/// Editable profile fields. Password, organization and token fields have
/// dedicated endpoints or none at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HrProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub contact_number: Option<String>,
    pub department_id: Option<Uuid>,
    pub status: Option<HrStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionUpdate {
    pub role: Option<HrRole>,
    pub permissions: Option<HrPermissions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: Option<String>,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manage_salary_implies_view() {
        let perms = HrPermissions {
            can_manage_salary: true,
            ..HrPermissions::default()
        };
        assert!(perms.allows(Permission::ViewSalary));
        assert!(!perms.allows(Permission::ManageLeaves));
    }

    #[test]
    fn missing_flags_default_to_false() {
        let perms: HrPermissions =
            serde_json::from_str(r#"{"canManageLeaves":true}"#).unwrap();
        assert!(perms.can_manage_leaves);
        assert!(!perms.can_create_employee);
    }
}
