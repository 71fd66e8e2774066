use ems_types::{
    EmployeeStatus, EmploymentType, Gender,
    employee::{EmergencyContact, Education},
};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub organization_id: Uuid,
    #[sea_orm(indexed)]
    pub department_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub contact_number: String,
    #[sea_orm(unique)]
    pub employee_code: Option<String>,
    pub position: Option<String>,
    pub date_of_birth: Option<Date>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub joining_date: Option<Date>,
    pub employment_type: EmploymentType,
    pub work_location: Option<String>,
    pub status: EmployeeStatus,
    pub emergency_name: Option<String>,
    pub emergency_relationship: Option<String>,
    pub emergency_phone: Option<String>,
    /// JSON array of strings.
    #[sea_orm(column_type = "Text")]
    pub skills: String,
    /// JSON array of education entries.
    #[sea_orm(column_type = "Text")]
    pub education: String,
    pub is_verified: bool,
    pub verification_code: Option<String>,
    pub verification_expires_at: Option<DateTimeWithTimeZone>,
    pub reset_token: Option<String>,
    pub reset_expires_at: Option<DateTimeWithTimeZone>,
    pub last_login_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn skills_list(&self) -> Vec<String> {
        serde_json::from_str(&self.skills).unwrap_or_default()
    }

    pub fn education_list(&self) -> Vec<Education> {
        serde_json::from_str(&self.education).unwrap_or_default()
    }

    pub fn emergency_contact(&self) -> Option<EmergencyContact> {
        if self.emergency_name.is_none()
            && self.emergency_relationship.is_none()
            && self.emergency_phone.is_none()
        {
            return None;
        }
        Some(EmergencyContact {
            name: self.emergency_name.clone().unwrap_or_default(),
            relationship: self.emergency_relationship.clone().unwrap_or_default(),
            phone: self.emergency_phone.clone().unwrap_or_default(),
        })
    }
}

/// Serialized form of the `skills` column.
pub fn encode_skills(skills: &[String]) -> String {
    serde_json::to_string(skills).unwrap_or_else(|_| "[]".to_string())
}

/// Serialized form of the `education` column.
pub fn encode_education(education: &[Education]) -> String {
    serde_json::to_string(education).unwrap_or_else(|_| "[]".to_string())
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id",
        on_delete = "Cascade"
    )]
    Organization,
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id",
        on_delete = "SetNull"
    )]
    Department,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
