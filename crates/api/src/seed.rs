//! Demo organization used by `ems-server seed` and the integration tests.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use ems_types::{
    ApplicantStatus, AttendanceStatus, EmployeeStatus, EmploymentType, Gender, HrRole, HrStatus,
    InterviewStatus, LeaveStatus, Portal, RequestPriority, RequestStatus, RequestType,
    employee::Education,
    hr::HrPermissions,
    salary::PayrollSettings,
};
use entity::{
    applicant, attendance, calendar_event, department, employee, employee_request, hr_profile,
    interview_insight, leave_application, organization, recruitment, recruitment_applicant,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, prelude::DateTimeWithTimeZone,
};
use uuid::Uuid;

use crate::{attendance::hours_for, auth::hash_password, payroll};

pub const ADMIN_EMAIL: &str = "admin@acme.test";
pub const ADMIN_PASSWORD: &str = "Admin#2024!";
pub const MANAGER_EMAIL: &str = "manager@acme.test";
pub const MANAGER_PASSWORD: &str = "Manager#2024!";
pub const EMPLOYEE_PASSWORD: &str = "Employee#2024!";

pub struct SeededRecords {
    pub organization: organization::Model,
    pub departments: Vec<department::Model>,
    pub hr_profiles: Vec<hr_profile::Model>,
    pub employees: Vec<employee::Model>,
    pub leaves: Vec<leave_application::Model>,
    pub requests: Vec<employee_request::Model>,
    pub recruitments: Vec<recruitment::Model>,
    pub applicants: Vec<applicant::Model>,
}

impl SeededRecords {
    pub fn hr_email(&self, email: &str) -> Option<&hr_profile::Model> {
        self.hr_profiles.iter().find(|p| p.email == email)
    }

    pub fn employee_email(&self, email: &str) -> Option<&employee::Model> {
        self.employees.iter().find(|e| e.email == email)
    }

    pub fn department_named(&self, name: &str) -> Option<&department::Model> {
        self.departments.iter().find(|d| d.name == name)
    }

    pub fn applicant_email(&self, email: &str) -> Option<&applicant::Model> {
        self.applicants.iter().find(|a| a.email == email)
    }

    pub fn leave_of(&self, employee_id: Uuid, status: LeaveStatus) -> Option<&leave_application::Model> {
        self.leaves
            .iter()
            .find(|l| l.employee_id == employee_id && l.status == status)
    }

    pub fn request_titled(&self, title: &str) -> Option<&employee_request::Model> {
        self.requests.iter().find(|r| r.title == title)
    }
}

fn seed_err(err: impl std::fmt::Display) -> DbErr {
    DbErr::Custom(format!("seed: {err}"))
}

fn clock(hour: u32, minute: u32) -> Result<NaiveTime, DbErr> {
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| seed_err("invalid clock time"))
}

struct Person<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
}

async fn insert_hr(
    db: &DatabaseConnection,
    organization_id: Uuid,
    person: Person<'_>,
    role: HrRole,
    permissions: HrPermissions,
    password_hash: &str,
    now: DateTimeWithTimeZone,
) -> Result<hr_profile::Model, DbErr> {
    let mut model = hr_profile::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(organization_id),
        department_id: Set(None),
        first_name: Set(person.first_name.to_string()),
        last_name: Set(person.last_name.to_string()),
        email: Set(person.email.to_string()),
        password_hash: Set(password_hash.to_string()),
        contact_number: Set("+1-555-0100".to_string()),
        role: Set(role),
        status: Set(HrStatus::Active),
        is_verified: Set(true),
        verification_code: Set(None),
        verification_expires_at: Set(None),
        reset_token: Set(None),
        reset_expires_at: Set(None),
        last_login_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    model.set_permissions(permissions);
    model.insert(db).await
}

#[allow(clippy::too_many_arguments)]
async fn insert_employee(
    db: &DatabaseConnection,
    organization_id: Uuid,
    department_id: Uuid,
    person: Person<'_>,
    code: &str,
    position: &str,
    password_hash: &str,
    joined: NaiveDate,
    created_at: DateTimeWithTimeZone,
) -> Result<employee::Model, DbErr> {
    employee::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(organization_id),
        department_id: Set(Some(department_id)),
        manager_id: Set(None),
        first_name: Set(person.first_name.to_string()),
        last_name: Set(person.last_name.to_string()),
        email: Set(person.email.to_string()),
        password_hash: Set(password_hash.to_string()),
        contact_number: Set("+1-555-0199".to_string()),
        employee_code: Set(Some(code.to_string())),
        position: Set(Some(position.to_string())),
        date_of_birth: Set(None),
        gender: Set(Some(Gender::Other)),
        address: Set(None),
        joining_date: Set(Some(joined)),
        employment_type: Set(EmploymentType::FullTime),
        work_location: Set(Some("Head office".to_string())),
        status: Set(EmployeeStatus::Active),
        emergency_name: Set(None),
        emergency_relationship: Set(None),
        emergency_phone: Set(None),
        skills: Set(employee::encode_skills(&["Rust".to_string(), "SQL".to_string()])),
        education: Set(employee::encode_education(&[Education {
            degree: "BSc Computer Science".to_string(),
            institution: "State University".to_string(),
            year: Some(2018),
        }])),
        is_verified: Set(true),
        verification_code: Set(None),
        verification_expires_at: Set(None),
        reset_token: Set(None),
        reset_expires_at: Set(None),
        last_login_at: Set(None),
        created_at: Set(created_at),
        updated_at: Set(created_at),
    }
    .insert(db)
    .await
}

/// Weekdays of the two weeks before `today`.
fn recent_workdays(today: NaiveDate) -> Vec<NaiveDate> {
    (1..=14)
        .rev()
        .map(|back| today - Duration::days(back))
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

async fn insert_attendance(
    db: &DatabaseConnection,
    member: &employee::Model,
    day: NaiveDate,
    check_in: NaiveTime,
    check_out: NaiveTime,
    now: DateTimeWithTimeZone,
) -> Result<(), DbErr> {
    attendance::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(member.organization_id),
        employee_id: Set(member.id),
        date: Set(day),
        status: Set(AttendanceStatus::Present),
        check_in: Set(Some(check_in)),
        check_out: Set(Some(check_out)),
        work_hours: Set(hours_for(Some(check_in), Some(check_out))),
        comments: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;
    Ok(())
}

pub async fn seed_demo(db: &DatabaseConnection, today: NaiveDate) -> Result<SeededRecords, DbErr> {
    let seeded_at: DateTimeWithTimeZone = Utc::now().into();
    let admin_hash = hash_password(ADMIN_PASSWORD).map_err(seed_err)?;
    let manager_hash = hash_password(MANAGER_PASSWORD).map_err(seed_err)?;
    let employee_hash = hash_password(EMPLOYEE_PASSWORD).map_err(seed_err)?;

    let acme = organization::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Acme Corporation".to_string()),
        description: Set("Makers of fine widgets".to_string()),
        url: Set("https://acme.test".to_string()),
        mail: Set("contact@acme.test".to_string()),
        policies: Set(
            "Core hours are 10:00 to 16:00. Leave requests need a week of notice.".to_string(),
        ),
        created_at: Set(seeded_at),
        updated_at: Set(seeded_at),
    }
    .insert(db)
    .await?;

    let mut departments = Vec::new();
    for (name, description) in [
        ("Engineering", "Product development"),
        ("Operations", "Facilities and logistics"),
    ] {
        departments.push(
            department::ActiveModel {
                id: Set(Uuid::new_v4()),
                organization_id: Set(acme.id),
                name: Set(name.to_string()),
                description: Set(description.to_string()),
                created_at: Set(seeded_at),
                updated_at: Set(seeded_at),
            }
            .insert(db)
            .await?,
        );
    }
    let engineering = departments[0].id;
    let operations = departments[1].id;

    let admin = insert_hr(
        db,
        acme.id,
        Person { first_name: "Grace", last_name: "Hopper", email: ADMIN_EMAIL },
        HrRole::Admin,
        HrPermissions::all(),
        &admin_hash,
        seeded_at,
    )
    .await?;
    let manager = insert_hr(
        db,
        acme.id,
        Person { first_name: "Martin", last_name: "Fowler", email: MANAGER_EMAIL },
        HrRole::Manager,
        HrPermissions {
            can_manage_leaves: true,
            can_manage_requests: true,
            can_view_reports: true,
            ..HrPermissions::default()
        },
        &manager_hash,
        seeded_at,
    )
    .await?;

    let joined = today - Duration::days(400);
    let alice = insert_employee(
        db,
        acme.id,
        engineering,
        Person { first_name: "Alice", last_name: "Andersen", email: "alice@acme.test" },
        "EMP-001",
        "Backend Developer",
        &employee_hash,
        joined,
        seeded_at,
    )
    .await?;
    let bob = insert_employee(
        db,
        acme.id,
        engineering,
        Person { first_name: "Bob", last_name: "Brown", email: "bob@acme.test" },
        "EMP-002",
        "QA Engineer",
        &employee_hash,
        joined,
        (Utc::now() + Duration::seconds(1)).into(),
    )
    .await?;
    let carol = insert_employee(
        db,
        acme.id,
        operations,
        Person { first_name: "Carol", last_name: "Clark", email: "carol@acme.test" },
        "EMP-003",
        "Office Manager",
        &employee_hash,
        today - Duration::days(30),
        (Utc::now() + Duration::seconds(2)).into(),
    )
    .await?;

    // alice works standard days, bob stays late; carol has no hours yet
    for day in recent_workdays(today) {
        insert_attendance(db, &alice, day, clock(9, 0)?, clock(17, 0)?, seeded_at).await?;
        insert_attendance(db, &bob, day, clock(9, 0)?, clock(18, 30)?, seeded_at).await?;
    }

    let mut leaves = Vec::new();
    for (member, title, start, days, status) in [
        (&alice, "Family trip", today + Duration::days(7), 3, LeaveStatus::Pending),
        (&bob, "Medical appointment", today - Duration::days(30), 2, LeaveStatus::Approved),
        (&carol, "Moving house", today + Duration::days(3), 1, LeaveStatus::Pending),
    ] {
        leaves.push(
            leave_application::ActiveModel {
                id: Set(Uuid::new_v4()),
                organization_id: Set(acme.id),
                employee_id: Set(member.id),
                title: Set(title.to_string()),
                reason: Set(format!("{title} for {}", member.first_name)),
                start_date: Set(start),
                end_date: Set(start + Duration::days(days - 1)),
                status: Set(status),
                approved_by: Set((status == LeaveStatus::Approved).then_some(admin.id)),
                hr_comment: Set(None),
                created_at: Set(seeded_at),
                updated_at: Set(seeded_at),
            }
            .insert(db)
            .await?,
        );
    }

    let mut requests = Vec::new();
    for (member, title, content, kind, priority, status) in [
        (
            &alice,
            "Laptop replacement",
            "The battery no longer holds a charge.",
            RequestType::ItSupport,
            RequestPriority::High,
            RequestStatus::Pending,
        ),
        (
            &bob,
            "Payslip question",
            "Overtime for last month looks short.",
            RequestType::Finance,
            RequestPriority::Medium,
            RequestStatus::Closed,
        ),
    ] {
        let closed = status == RequestStatus::Closed;
        requests.push(
            employee_request::ActiveModel {
                id: Set(Uuid::new_v4()),
                organization_id: Set(acme.id),
                employee_id: Set(member.id),
                department_id: Set(member.department_id),
                title: Set(title.to_string()),
                content: Set(content.to_string()),
                request_type: Set(kind),
                priority: Set(priority),
                status: Set(status),
                created_by: Set(Portal::Employee),
                approved_by: Set(None),
                hr_comments: Set(closed.then(|| "Corrected in next run".to_string())),
                closed_by: Set(closed.then_some(admin.id)),
                closed_at: Set(closed.then_some(seeded_at)),
                created_at: Set(seeded_at),
                updated_at: Set(seeded_at),
            }
            .insert(db)
            .await?,
        );
    }

    let mut applicants = Vec::new();
    for (first, last, email, role, status) in [
        ("Dana", "Diaz", "dana@applicants.test", "Backend Engineer", ApplicantStatus::ConductInterview),
        ("Evan", "Evans", "evan@applicants.test", "Backend Engineer", ApplicantStatus::Pending),
        ("Fay", "Fischer", "fay@applicants.test", "Office Assistant", ApplicantStatus::NotSpecified),
    ] {
        applicants.push(
            applicant::ActiveModel {
                id: Set(Uuid::new_v4()),
                organization_id: Set(acme.id),
                first_name: Set(first.to_string()),
                last_name: Set(last.to_string()),
                email: Set(email.to_string()),
                contact_number: Set("+1-555-0142".to_string()),
                applied_role: Set(role.to_string()),
                status: Set(status),
                created_at: Set(seeded_at),
                updated_at: Set(seeded_at),
            }
            .insert(db)
            .await?,
        );
    }

    let backend = recruitment::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(acme.id),
        department_id: Set(Some(engineering)),
        job_title: Set("Backend Engineer".to_string()),
        description: Set("Build and run the payroll services.".to_string()),
        created_at: Set(seeded_at),
        updated_at: Set(seeded_at),
    }
    .insert(db)
    .await?;
    for candidate in &applicants[..2] {
        recruitment_applicant::ActiveModel {
            recruitment_id: Set(backend.id),
            applicant_id: Set(candidate.id),
            created_at: Set(seeded_at),
        }
        .insert(db)
        .await?;
    }

    interview_insight::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(acme.id),
        applicant_id: Set(applicants[0].id),
        interviewer_id: Set(Some(admin.id)),
        feedback: Set(Some("Strong systems background".to_string())),
        interview_date: Set(today + Duration::days(2)),
        response_date: Set(None),
        status: Set(InterviewStatus::Pending),
        created_at: Set(seeded_at),
        updated_at: Set(seeded_at),
    }
    .insert(db)
    .await?;

    for (title, offset, audience) in [
        ("Quarterly all-hands", 10, "All"),
        ("Office closed for maintenance", 20, "Operations"),
    ] {
        calendar_event::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(acme.id),
            title: Set(title.to_string()),
            description: Set(String::new()),
            event_date: Set(today + Duration::days(offset)),
            audience: Set(audience.to_string()),
            created_at: Set(seeded_at),
            updated_at: Set(seeded_at),
        }
        .insert(db)
        .await?;
    }

    payroll::save_settings(db, acme.id, &PayrollSettings::default())
        .await
        .map_err(seed_err)?;

    Ok(SeededRecords {
        organization: acme,
        departments,
        hr_profiles: vec![admin, manager],
        employees: vec![alice, bob, carol],
        leaves,
        requests,
        recruitments: vec![backend],
        applicants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workdays_skip_weekends() {
        // 2026-10-16 is a Friday
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let days = recent_workdays(today);
        assert_eq!(days.len(), 10);
        assert!(days.iter().all(|d| *d < today));
        assert!(days.iter().all(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun)));
    }
}
