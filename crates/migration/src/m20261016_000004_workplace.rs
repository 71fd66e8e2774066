use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Organization {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Department {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Employee {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ShiftSchedule {
    Table,
    Id,
    OrganizationId,
    EmployeeId,
    Date,
    StartTime,
    EndTime,
    Shift,
    Location,
    Notes,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notice {
    Table,
    Id,
    OrganizationId,
    Title,
    Content,
    Audience,
    DepartmentId,
    EmployeeId,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Balance {
    Table,
    Id,
    OrganizationId,
    Title,
    Description,
    AvailableAmount,
    TotalExpenses,
    ExpenseMonth,
    SubmitDate,
    CreatedBy,
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

fn amount<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).double().not_null().default(0.0).to_owned()
}

fn cascade_fk<T, R>(name: &str, table: T, column: T, parent: R, parent_id: R) -> ForeignKeyCreateStatement
where
    T: IntoIden + 'static,
    R: IntoIden + 'static,
{
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(parent, parent_id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ShiftSchedule::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ShiftSchedule::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ShiftSchedule::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(ShiftSchedule::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(ShiftSchedule::Date).date().not_null())
                    .col(ColumnDef::new(ShiftSchedule::StartTime).time().not_null())
                    .col(ColumnDef::new(ShiftSchedule::EndTime).time().not_null())
                    .col(
                        ColumnDef::new(ShiftSchedule::Shift)
                            .string_len(16)
                            .not_null()
                            .default("custom"),
                    )
                    .col(
                        ColumnDef::new(ShiftSchedule::Location)
                            .string_len(120)
                            .not_null()
                            .default("Office"),
                    )
                    .col(
                        ColumnDef::new(ShiftSchedule::Notes)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ShiftSchedule::Status)
                            .string_len(16)
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(ColumnDef::new(ShiftSchedule::CreatedBy).uuid().not_null())
                    .col(&mut timestamp(ShiftSchedule::CreatedAt))
                    .col(&mut timestamp(ShiftSchedule::UpdatedAt))
                    .foreign_key(&mut cascade_fk(
                        "fk_shift_schedule_organization",
                        ShiftSchedule::Table,
                        ShiftSchedule::OrganizationId,
                        Organization::Table,
                        Organization::Id,
                    ))
                    .foreign_key(&mut cascade_fk(
                        "fk_shift_schedule_employee",
                        ShiftSchedule::Table,
                        ShiftSchedule::EmployeeId,
                        Employee::Table,
                        Employee::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_shift_schedule_employee_date")
                    .table(ShiftSchedule::Table)
                    .col(ShiftSchedule::EmployeeId)
                    .col(ShiftSchedule::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Notice::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notice::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Notice::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Notice::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Notice::Content).text().not_null())
                    .col(
                        ColumnDef::new(Notice::Audience)
                            .string_len(24)
                            .not_null()
                            .default("All"),
                    )
                    .col(ColumnDef::new(Notice::DepartmentId).uuid())
                    .col(ColumnDef::new(Notice::EmployeeId).uuid())
                    .col(ColumnDef::new(Notice::CreatedBy).uuid().not_null())
                    .col(&mut timestamp(Notice::CreatedAt))
                    .col(&mut timestamp(Notice::UpdatedAt))
                    .foreign_key(&mut cascade_fk(
                        "fk_notice_organization",
                        Notice::Table,
                        Notice::OrganizationId,
                        Organization::Table,
                        Organization::Id,
                    ))
                    .foreign_key(&mut cascade_fk(
                        "fk_notice_department",
                        Notice::Table,
                        Notice::DepartmentId,
                        Department::Table,
                        Department::Id,
                    ))
                    .foreign_key(&mut cascade_fk(
                        "fk_notice_employee",
                        Notice::Table,
                        Notice::EmployeeId,
                        Employee::Table,
                        Employee::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Balance::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Balance::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Balance::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Balance::Title).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Balance::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(&mut amount(Balance::AvailableAmount))
                    .col(&mut amount(Balance::TotalExpenses))
                    .col(ColumnDef::new(Balance::ExpenseMonth).string_len(7).not_null())
                    .col(ColumnDef::new(Balance::SubmitDate).date().not_null())
                    .col(ColumnDef::new(Balance::CreatedBy).uuid().not_null())
                    .col(&mut timestamp(Balance::CreatedAt))
                    .col(&mut timestamp(Balance::UpdatedAt))
                    .foreign_key(&mut cascade_fk(
                        "fk_balance_organization",
                        Balance::Table,
                        Balance::OrganizationId,
                        Organization::Table,
                        Organization::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        for (name, table, columns) in [
            (
                "idx_shift_schedule_org_date",
                ShiftSchedule::Table.into_iden(),
                vec![
                    ShiftSchedule::OrganizationId.into_iden(),
                    ShiftSchedule::Date.into_iden(),
                ],
            ),
            (
                "idx_notice_org_created",
                Notice::Table.into_iden(),
                vec![
                    Notice::OrganizationId.into_iden(),
                    Notice::CreatedAt.into_iden(),
                ],
            ),
            (
                "idx_balance_org_month",
                Balance::Table.into_iden(),
                vec![
                    Balance::OrganizationId.into_iden(),
                    Balance::ExpenseMonth.into_iden(),
                ],
            ),
        ] {
            let mut index = Index::create();
            index.name(name).table(table);
            for column in columns {
                index.col(column);
            }
            manager.create_index(index.to_owned()).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Balance::Table.into_iden(),
            Notice::Table.into_iden(),
            ShiftSchedule::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}
