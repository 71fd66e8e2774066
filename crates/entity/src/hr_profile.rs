use ems_types::{HrRole, HrStatus, hr::HrPermissions};
use sea_orm::{ActiveValue::Set, entity::prelude::*};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "hr_profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub organization_id: Uuid,
    pub department_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub contact_number: String,
    pub role: HrRole,
    pub status: HrStatus,
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

    pub fn permissions(&self) -> HrPermissions {
        HrPermissions {
            can_create_employee: self.can_create_employee,
            can_edit_employee: self.can_edit_employee,
            can_delete_employee: self.can_delete_employee,
            can_view_salary: self.can_view_salary,
            can_manage_salary: self.can_manage_salary,
            can_manage_leaves: self.can_manage_leaves,
            can_manage_recruitment: self.can_manage_recruitment,
            can_manage_requests: self.can_manage_requests,
            can_view_reports: self.can_view_reports,
            can_manage_calendar: self.can_manage_calendar,
        }
    }
}

impl ActiveModel {
    pub fn set_permissions(&mut self, permissions: HrPermissions) {
        self.can_create_employee = Set(permissions.can_create_employee);
        self.can_edit_employee = Set(permissions.can_edit_employee);
        self.can_delete_employee = Set(permissions.can_delete_employee);
        self.can_view_salary = Set(permissions.can_view_salary);
        self.can_manage_salary = Set(permissions.can_manage_salary);
        self.can_manage_leaves = Set(permissions.can_manage_leaves);
        self.can_manage_recruitment = Set(permissions.can_manage_recruitment);
        self.can_manage_requests = Set(permissions.can_manage_requests);
        self.can_view_reports = Set(permissions.can_view_reports);
        self.can_manage_calendar = Set(permissions.can_manage_calendar);
    }
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
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
