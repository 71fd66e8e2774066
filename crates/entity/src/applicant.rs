use ems_types::ApplicantStatus;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "applicant")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub organization_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub contact_number: String,
    pub applied_role: String,
    pub status: ApplicantStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recruitment_applicant::Entity")]
    RecruitmentApplicant,
    #[sea_orm(has_many = "super::interview_insight::Entity")]
    InterviewInsight,
}

impl Related<super::recruitment_applicant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecruitmentApplicant.def()
    }
}

impl Related<super::interview_insight::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InterviewInsight.def()
    }
}

impl Related<super::recruitment::Entity> for Entity {
    fn to() -> RelationDef {
        super::recruitment_applicant::Relation::Recruitment.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::recruitment_applicant::Relation::Applicant.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
