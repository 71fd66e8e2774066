use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Organization {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum HrProfile {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Recruitment {
    Table,
    Id,
    OrganizationId,
    DepartmentId,
    JobTitle,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Applicant {
    Table,
    Id,
    OrganizationId,
    FirstName,
    LastName,
    Email,
    ContactNumber,
    AppliedRole,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RecruitmentApplicant {
    Table,
    RecruitmentId,
    ApplicantId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum InterviewInsight {
    Table,
    Id,
    OrganizationId,
    ApplicantId,
    InterviewerId,
    Feedback,
    InterviewDate,
    ResponseDate,
    Status,
    CreatedAt,
    UpdatedAt,
}

fn timestamp<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Recruitment::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Recruitment::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Recruitment::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Recruitment::DepartmentId).uuid())
                    .col(ColumnDef::new(Recruitment::JobTitle).string_len(200).not_null())
                    .col(ColumnDef::new(Recruitment::Description).text().not_null())
                    .col(&mut timestamp(Recruitment::CreatedAt))
                    .col(&mut timestamp(Recruitment::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recruitment_organization")
                            .from(Recruitment::Table, Recruitment::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_recruitment_org_title")
                    .table(Recruitment::Table)
                    .col(Recruitment::OrganizationId)
                    .col(Recruitment::JobTitle)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Applicant::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Applicant::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Applicant::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Applicant::FirstName).string_len(100).not_null())
                    .col(ColumnDef::new(Applicant::LastName).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Applicant::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Applicant::ContactNumber).string_len(40).not_null())
                    .col(ColumnDef::new(Applicant::AppliedRole).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Applicant::Status)
                            .string_len(24)
                            .not_null()
                            .default("Not Specified"),
                    )
                    .col(&mut timestamp(Applicant::CreatedAt))
                    .col(&mut timestamp(Applicant::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applicant_organization")
                            .from(Applicant::Table, Applicant::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecruitmentApplicant::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecruitmentApplicant::RecruitmentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RecruitmentApplicant::ApplicantId).uuid().not_null())
                    .col(&mut timestamp(RecruitmentApplicant::CreatedAt))
                    .primary_key(
                        Index::create()
                            .col(RecruitmentApplicant::RecruitmentId)
                            .col(RecruitmentApplicant::ApplicantId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recruitment_applicant_recruitment")
                            .from(
                                RecruitmentApplicant::Table,
                                RecruitmentApplicant::RecruitmentId,
                            )
                            .to(Recruitment::Table, Recruitment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recruitment_applicant_applicant")
                            .from(RecruitmentApplicant::Table, RecruitmentApplicant::ApplicantId)
                            .to(Applicant::Table, Applicant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InterviewInsight::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InterviewInsight::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InterviewInsight::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(InterviewInsight::ApplicantId).uuid().not_null())
                    .col(ColumnDef::new(InterviewInsight::InterviewerId).uuid())
                    .col(ColumnDef::new(InterviewInsight::Feedback).text())
                    .col(ColumnDef::new(InterviewInsight::InterviewDate).date().not_null())
                    .col(ColumnDef::new(InterviewInsight::ResponseDate).date())
                    .col(
                        ColumnDef::new(InterviewInsight::Status)
                            .string_len(16)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(&mut timestamp(InterviewInsight::CreatedAt))
                    .col(&mut timestamp(InterviewInsight::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interview_insight_organization")
                            .from(InterviewInsight::Table, InterviewInsight::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interview_insight_applicant")
                            .from(InterviewInsight::Table, InterviewInsight::ApplicantId)
                            .to(Applicant::Table, Applicant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interview_insight_interviewer")
                            .from(InterviewInsight::Table, InterviewInsight::InterviewerId)
                            .to(HrProfile::Table, HrProfile::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InterviewInsight::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(RecruitmentApplicant::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Applicant::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recruitment::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
