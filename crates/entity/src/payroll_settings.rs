use ems_types::salary::PayrollSettings;
use sea_orm::entity::prelude::*;

/// One row per organization; absent rows mean the defaults apply.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payroll_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub organization_id: Uuid,
    pub hourly_rate: f64,
    pub overtime_multiplier: f64,
    pub tax_rate: f64,
    pub standard_day_hours: f64,
    pub period_days: i32,
    pub currency: String,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<Model> for PayrollSettings {
    fn from(model: Model) -> Self {
        Self {
            hourly_rate: model.hourly_rate,
            overtime_multiplier: model.overtime_multiplier,
            tax_rate: model.tax_rate,
            standard_day_hours: model.standard_day_hours,
            period_days: i64::from(model.period_days),
            currency: model.currency,
        }
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
