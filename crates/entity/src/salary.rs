use ems_types::{PaymentType, SalaryStatus};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "salary")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub organization_id: Uuid,
    #[sea_orm(indexed)]
    pub employee_id: Uuid,
    pub basic_pay: f64,
    pub bonuses: f64,
    pub deductions: f64,
    pub net_pay: f64,
    pub currency: String,
    pub due_date: Date,
    pub payment_date: Option<Date>,
    pub status: SalaryStatus,
    pub work_hours: f64,
    pub overtime_hours: f64,
    pub hourly_rate: f64,
    pub payment_type: PaymentType,
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
