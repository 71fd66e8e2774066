use ems_types::InterviewStatus;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "interview_insight")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub organization_id: Uuid,
    #[sea_orm(indexed)]
    pub applicant_id: Uuid,
    pub interviewer_id: Option<Uuid>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub interview_date: Date,
    pub response_date: Option<Date>,
    pub status: InterviewStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::applicant::Entity",
        from = "Column::ApplicantId",
        to = "super::applicant::Column::Id",
        on_delete = "Cascade"
    )]
    Applicant,
    #[sea_orm(
        belongs_to = "super::hr_profile::Entity",
        from = "Column::InterviewerId",
        to = "super::hr_profile::Column::Id",
        on_delete = "SetNull"
    )]
    Interviewer,
}

impl Related<super::applicant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applicant.def()
    }
}

impl Related<super::hr_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Interviewer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
