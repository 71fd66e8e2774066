use ems_types::{Portal, RequestPriority, RequestStatus, RequestType};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "employee_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub organization_id: Uuid,
    #[sea_orm(indexed)]
    pub employee_id: Uuid,
    pub department_id: Option<Uuid>,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub request_type: RequestType,
    pub priority: RequestPriority,
    pub status: RequestStatus,
    pub created_by: Portal,
    pub approved_by: Option<Uuid>,
    pub hr_comments: Option<String>,
    pub closed_by: Option<Uuid>,
    pub closed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id",
        on_delete = "Cascade"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
