use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "recruitment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub organization_id: Uuid,
    pub department_id: Option<Uuid>,
    pub job_title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recruitment_applicant::Entity")]
    RecruitmentApplicant,
}

impl Related<super::recruitment_applicant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecruitmentApplicant.def()
    }
}

impl Related<super::applicant::Entity> for Entity {
    fn to() -> RelationDef {
        super::recruitment_applicant::Relation::Applicant.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::recruitment_applicant::Relation::Recruitment.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
