use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "recruitment_applicant")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub recruitment_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub applicant_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recruitment::Entity",
        from = "Column::RecruitmentId",
        to = "super::recruitment::Column::Id",
        on_delete = "Cascade"
    )]
    Recruitment,
    #[sea_orm(
        belongs_to = "super::applicant::Entity",
        from = "Column::ApplicantId",
        to = "super::applicant::Column::Id",
        on_delete = "Cascade"
    )]
    Applicant,
}

impl Related<super::recruitment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recruitment.def()
    }
}

impl Related<super::applicant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applicant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
