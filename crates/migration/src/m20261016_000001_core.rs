use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Organization {
    Table,
    Id,
    Name,
    Description,
    Url,
    Mail,
    Policies,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Department {
    Table,
    Id,
    OrganizationId,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum HrProfile {
    Table,
    Id,
    OrganizationId,
    DepartmentId,
    FirstName,
    LastName,
    Email,
    PasswordHash,
    ContactNumber,
    Role,
    Status,
    CanCreateEmployee,
    CanEditEmployee,
    CanDeleteEmployee,
    CanViewSalary,
    CanManageSalary,
    CanManageLeaves,
    CanManageRecruitment,
    CanManageRequests,
    CanViewReports,
    CanManageCalendar,
    IsVerified,
    VerificationCode,
    VerificationExpiresAt,
    ResetToken,
    ResetExpiresAt,
    LastLoginAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Employee {
    Table,
    Id,
    OrganizationId,
    DepartmentId,
    ManagerId,
    FirstName,
    LastName,
    Email,
    PasswordHash,
    ContactNumber,
    EmployeeCode,
    Position,
    DateOfBirth,
    Gender,
    Address,
    JoiningDate,
    EmploymentType,
    WorkLocation,
    Status,
    EmergencyName,
    EmergencyRelationship,
    EmergencyPhone,
    Skills,
    Education,
    IsVerified,
    VerificationCode,
    VerificationExpiresAt,
    ResetToken,
    ResetExpiresAt,
    LastLoginAt,
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

fn flag<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .boolean()
        .not_null()
        .default(false)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organization::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Organization::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Organization::Name)
                            .string_len(200)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Organization::Description).text().not_null())
                    .col(
                        ColumnDef::new(Organization::Url)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Organization::Mail)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Organization::Policies)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(&mut timestamp(Organization::CreatedAt))
                    .col(&mut timestamp(Organization::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Department::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Department::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Department::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Department::Name).string_len(120).not_null())
                    .col(
                        ColumnDef::new(Department::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(&mut timestamp(Department::CreatedAt))
                    .col(&mut timestamp(Department::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_department_organization")
                            .from(Department::Table, Department::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_department_org_name")
                    .table(Department::Table)
                    .col(Department::OrganizationId)
                    .col(Department::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HrProfile::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(HrProfile::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(HrProfile::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(HrProfile::DepartmentId).uuid())
                    .col(ColumnDef::new(HrProfile::FirstName).string_len(100).not_null())
                    .col(ColumnDef::new(HrProfile::LastName).string_len(100).not_null())
                    .col(
                        ColumnDef::new(HrProfile::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(HrProfile::PasswordHash).string().not_null())
                    .col(ColumnDef::new(HrProfile::ContactNumber).string_len(40).not_null())
                    .col(
                        ColumnDef::new(HrProfile::Role)
                            .string_len(32)
                            .not_null()
                            .default("HR-Admin"),
                    )
                    .col(
                        ColumnDef::new(HrProfile::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(&mut flag(HrProfile::CanCreateEmployee))
                    .col(&mut flag(HrProfile::CanEditEmployee))
                    .col(&mut flag(HrProfile::CanDeleteEmployee))
                    .col(&mut flag(HrProfile::CanViewSalary))
                    .col(&mut flag(HrProfile::CanManageSalary))
                    .col(&mut flag(HrProfile::CanManageLeaves))
                    .col(&mut flag(HrProfile::CanManageRecruitment))
                    .col(&mut flag(HrProfile::CanManageRequests))
                    .col(&mut flag(HrProfile::CanViewReports))
                    .col(&mut flag(HrProfile::CanManageCalendar))
                    .col(&mut flag(HrProfile::IsVerified))
                    .col(ColumnDef::new(HrProfile::VerificationCode).string_len(16))
                    .col(ColumnDef::new(HrProfile::VerificationExpiresAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(HrProfile::ResetToken).string_len(64))
                    .col(ColumnDef::new(HrProfile::ResetExpiresAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(HrProfile::LastLoginAt).timestamp_with_time_zone())
                    .col(&mut timestamp(HrProfile::CreatedAt))
                    .col(&mut timestamp(HrProfile::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hr_profile_organization")
                            .from(HrProfile::Table, HrProfile::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hr_profile_department")
                            .from(HrProfile::Table, HrProfile::DepartmentId)
                            .to(Department::Table, Department::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employee::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Employee::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Employee::DepartmentId).uuid())
                    .col(ColumnDef::new(Employee::ManagerId).uuid())
                    .col(ColumnDef::new(Employee::FirstName).string_len(100).not_null())
                    .col(ColumnDef::new(Employee::LastName).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Employee::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Employee::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Employee::ContactNumber).string_len(40).not_null())
                    .col(ColumnDef::new(Employee::EmployeeCode).string_len(40).unique_key())
                    .col(ColumnDef::new(Employee::Position).string_len(120))
                    .col(ColumnDef::new(Employee::DateOfBirth).date())
                    .col(ColumnDef::new(Employee::Gender).string_len(16))
                    .col(ColumnDef::new(Employee::Address).text())
                    .col(ColumnDef::new(Employee::JoiningDate).date())
                    .col(
                        ColumnDef::new(Employee::EmploymentType)
                            .string_len(16)
                            .not_null()
                            .default("Full-time"),
                    )
                    .col(ColumnDef::new(Employee::WorkLocation).string_len(120))
                    .col(
                        ColumnDef::new(Employee::Status)
                            .string_len(16)
                            .not_null()
                            .default("Active"),
                    )
                    .col(ColumnDef::new(Employee::EmergencyName).string_len(120))
                    .col(ColumnDef::new(Employee::EmergencyRelationship).string_len(60))
                    .col(ColumnDef::new(Employee::EmergencyPhone).string_len(40))
                    .col(ColumnDef::new(Employee::Skills).text().not_null().default("[]"))
                    .col(ColumnDef::new(Employee::Education).text().not_null().default("[]"))
                    .col(&mut flag(Employee::IsVerified))
                    .col(ColumnDef::new(Employee::VerificationCode).string_len(16))
                    .col(ColumnDef::new(Employee::VerificationExpiresAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Employee::ResetToken).string_len(64))
                    .col(ColumnDef::new(Employee::ResetExpiresAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Employee::LastLoginAt).timestamp_with_time_zone())
                    .col(&mut timestamp(Employee::CreatedAt))
                    .col(&mut timestamp(Employee::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_organization")
                            .from(Employee::Table, Employee::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_department")
                            .from(Employee::Table, Employee::DepartmentId)
                            .to(Department::Table, Department::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employee_org")
                    .table(Employee::Table)
                    .col(Employee::OrganizationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hr_profile_org")
                    .table(HrProfile::Table)
                    .col(HrProfile::OrganizationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employee::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HrProfile::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Department::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organization::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
