use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Organization {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Employee {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    Id,
    OrganizationId,
    EmployeeId,
    Date,
    Status,
    CheckIn,
    CheckOut,
    WorkHours,
    Comments,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LeaveApplication {
    Table,
    Id,
    OrganizationId,
    EmployeeId,
    Title,
    Reason,
    StartDate,
    EndDate,
    Status,
    ApprovedBy,
    HrComment,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Salary {
    Table,
    Id,
    OrganizationId,
    EmployeeId,
    BasicPay,
    Bonuses,
    Deductions,
    NetPay,
    Currency,
    DueDate,
    PaymentDate,
    Status,
    WorkHours,
    OvertimeHours,
    HourlyRate,
    PaymentType,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PayrollSettings {
    Table,
    OrganizationId,
    HourlyRate,
    OvertimeMultiplier,
    TaxRate,
    StandardDayHours,
    PeriodDays,
    Currency,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EmployeeRequest {
    Table,
    Id,
    OrganizationId,
    EmployeeId,
    DepartmentId,
    Title,
    Content,
    RequestType,
    Priority,
    Status,
    CreatedBy,
    ApprovedBy,
    HrComments,
    ClosedBy,
    ClosedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CalendarEvent {
    Table,
    Id,
    OrganizationId,
    Title,
    Description,
    EventDate,
    Audience,
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

fn org_fk<T: IntoIden + 'static>(name: &str, table: T, column: T) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(Organization::Table, Organization::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

fn employee_fk<T: IntoIden + 'static>(
    name: &str,
    table: T,
    column: T,
) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(Employee::Table, Employee::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Attendance::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Attendance::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Attendance::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(Attendance::Date).date().not_null())
                    .col(
                        ColumnDef::new(Attendance::Status)
                            .string_len(16)
                            .not_null()
                            .default("Present"),
                    )
                    .col(ColumnDef::new(Attendance::CheckIn).time())
                    .col(ColumnDef::new(Attendance::CheckOut).time())
                    .col(&mut amount(Attendance::WorkHours))
                    .col(ColumnDef::new(Attendance::Comments).text())
                    .col(&mut timestamp(Attendance::CreatedAt))
                    .col(&mut timestamp(Attendance::UpdatedAt))
                    .foreign_key(&mut org_fk(
                        "fk_attendance_organization",
                        Attendance::Table,
                        Attendance::OrganizationId,
                    ))
                    .foreign_key(&mut employee_fk(
                        "fk_attendance_employee",
                        Attendance::Table,
                        Attendance::EmployeeId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_attendance_employee_date")
                    .table(Attendance::Table)
                    .col(Attendance::EmployeeId)
                    .col(Attendance::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LeaveApplication::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LeaveApplication::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LeaveApplication::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(LeaveApplication::EmployeeId).uuid().not_null())
                    .col(
                        ColumnDef::new(LeaveApplication::Title)
                            .string_len(200)
                            .not_null()
                            .default("Leave Application"),
                    )
                    .col(ColumnDef::new(LeaveApplication::Reason).text().not_null())
                    .col(ColumnDef::new(LeaveApplication::StartDate).date().not_null())
                    .col(ColumnDef::new(LeaveApplication::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(LeaveApplication::Status)
                            .string_len(16)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(LeaveApplication::ApprovedBy).uuid())
                    .col(ColumnDef::new(LeaveApplication::HrComment).text())
                    .col(&mut timestamp(LeaveApplication::CreatedAt))
                    .col(&mut timestamp(LeaveApplication::UpdatedAt))
                    .check(Expr::col(LeaveApplication::EndDate).gte(Expr::col(LeaveApplication::StartDate)))
                    .foreign_key(&mut org_fk(
                        "fk_leave_organization",
                        LeaveApplication::Table,
                        LeaveApplication::OrganizationId,
                    ))
                    .foreign_key(&mut employee_fk(
                        "fk_leave_employee",
                        LeaveApplication::Table,
                        LeaveApplication::EmployeeId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Salary::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Salary::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Salary::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Salary::EmployeeId).uuid().not_null())
                    .col(&mut amount(Salary::BasicPay))
                    .col(&mut amount(Salary::Bonuses))
                    .col(&mut amount(Salary::Deductions))
                    .col(&mut amount(Salary::NetPay))
                    .col(ColumnDef::new(Salary::Currency).string_len(8).not_null())
                    .col(ColumnDef::new(Salary::DueDate).date().not_null())
                    .col(ColumnDef::new(Salary::PaymentDate).date())
                    .col(
                        ColumnDef::new(Salary::Status)
                            .string_len(16)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(&mut amount(Salary::WorkHours))
                    .col(&mut amount(Salary::OvertimeHours))
                    .col(
                        ColumnDef::new(Salary::HourlyRate)
                            .double()
                            .not_null()
                            .default(17.20),
                    )
                    .col(
                        ColumnDef::new(Salary::PaymentType)
                            .string_len(16)
                            .not_null()
                            .default("Manual"),
                    )
                    .col(&mut timestamp(Salary::CreatedAt))
                    .col(&mut timestamp(Salary::UpdatedAt))
                    .foreign_key(&mut org_fk(
                        "fk_salary_organization",
                        Salary::Table,
                        Salary::OrganizationId,
                    ))
                    .foreign_key(&mut employee_fk(
                        "fk_salary_employee",
                        Salary::Table,
                        Salary::EmployeeId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_salary_employee_due_date")
                    .table(Salary::Table)
                    .col(Salary::EmployeeId)
                    .col(Salary::DueDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PayrollSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PayrollSettings::OrganizationId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PayrollSettings::HourlyRate).double().not_null())
                    .col(
                        ColumnDef::new(PayrollSettings::OvertimeMultiplier)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PayrollSettings::TaxRate).double().not_null())
                    .col(
                        ColumnDef::new(PayrollSettings::StandardDayHours)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PayrollSettings::PeriodDays).integer().not_null())
                    .col(ColumnDef::new(PayrollSettings::Currency).string_len(8).not_null())
                    .col(&mut timestamp(PayrollSettings::UpdatedAt))
                    .foreign_key(&mut org_fk(
                        "fk_payroll_settings_organization",
                        PayrollSettings::Table,
                        PayrollSettings::OrganizationId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmployeeRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeeRequest::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmployeeRequest::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(EmployeeRequest::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(EmployeeRequest::DepartmentId).uuid())
                    .col(ColumnDef::new(EmployeeRequest::Title).string_len(200).not_null())
                    .col(ColumnDef::new(EmployeeRequest::Content).text().not_null())
                    .col(
                        ColumnDef::new(EmployeeRequest::RequestType)
                            .string_len(16)
                            .not_null()
                            .default("General"),
                    )
                    .col(
                        ColumnDef::new(EmployeeRequest::Priority)
                            .string_len(8)
                            .not_null()
                            .default("Medium"),
                    )
                    .col(
                        ColumnDef::new(EmployeeRequest::Status)
                            .string_len(16)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(EmployeeRequest::CreatedBy)
                            .string_len(16)
                            .not_null()
                            .default("Employee"),
                    )
                    .col(ColumnDef::new(EmployeeRequest::ApprovedBy).uuid())
                    .col(ColumnDef::new(EmployeeRequest::HrComments).text())
                    .col(ColumnDef::new(EmployeeRequest::ClosedBy).uuid())
                    .col(ColumnDef::new(EmployeeRequest::ClosedAt).timestamp_with_time_zone())
                    .col(&mut timestamp(EmployeeRequest::CreatedAt))
                    .col(&mut timestamp(EmployeeRequest::UpdatedAt))
                    .foreign_key(&mut org_fk(
                        "fk_request_organization",
                        EmployeeRequest::Table,
                        EmployeeRequest::OrganizationId,
                    ))
                    .foreign_key(&mut employee_fk(
                        "fk_request_employee",
                        EmployeeRequest::Table,
                        EmployeeRequest::EmployeeId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CalendarEvent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CalendarEvent::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CalendarEvent::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(CalendarEvent::Title).string_len(200).not_null())
                    .col(
                        ColumnDef::new(CalendarEvent::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(CalendarEvent::EventDate).date().not_null())
                    .col(
                        ColumnDef::new(CalendarEvent::Audience)
                            .string_len(60)
                            .not_null()
                            .default("All"),
                    )
                    .col(&mut timestamp(CalendarEvent::CreatedAt))
                    .col(&mut timestamp(CalendarEvent::UpdatedAt))
                    .foreign_key(&mut org_fk(
                        "fk_calendar_event_organization",
                        CalendarEvent::Table,
                        CalendarEvent::OrganizationId,
                    ))
                    .to_owned(),
            )
            .await?;

        for (name, table, columns) in [
            (
                "idx_leave_employee",
                LeaveApplication::Table.into_iden(),
                vec![LeaveApplication::EmployeeId.into_iden()],
            ),
            (
                "idx_request_org_created",
                EmployeeRequest::Table.into_iden(),
                vec![
                    EmployeeRequest::OrganizationId.into_iden(),
                    EmployeeRequest::CreatedAt.into_iden(),
                ],
            ),
            (
                "idx_calendar_event_date",
                CalendarEvent::Table.into_iden(),
                vec![
                    CalendarEvent::OrganizationId.into_iden(),
                    CalendarEvent::EventDate.into_iden(),
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
            CalendarEvent::Table.into_iden(),
            EmployeeRequest::Table.into_iden(),
            PayrollSettings::Table.into_iden(),
            Salary::Table.into_iden(),
            LeaveApplication::Table.into_iden(),
            Attendance::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}
