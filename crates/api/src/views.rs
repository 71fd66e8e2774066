//! Entity rows rendered as wire types.

use chrono::{DateTime, Utc};
use ems_types::{
    Portal,
    attendance::AttendanceRecord,
    auth::AuthUser,
    balance::Balance,
    calendar::CalendarEvent,
    department::Department,
    employee::{Employee, EmployeeRef},
    hr::HrProfile,
    leave::Leave,
    notice::Notice,
    organization::OrganizationInfo,
    recruitment::{Applicant, InterviewInsight, Recruitment},
    request::EmployeeRequest,
    salary::Salary,
    schedule::Schedule,
};
use entity::{
    applicant, attendance, balance, calendar_event, department, employee, employee_request,
    hr_profile, interview_insight, leave_application, notice, organization, recruitment, salary,
    shift_schedule,
};
use sea_orm::prelude::DateTimeWithTimeZone;

pub fn utc(value: DateTimeWithTimeZone) -> DateTime<Utc> {
    value.with_timezone(&Utc)
}

fn utc_opt(value: Option<DateTimeWithTimeZone>) -> Option<DateTime<Utc>> {
    value.map(utc)
}

pub fn employee(model: employee::Model, department_name: Option<String>) -> Employee {
    let emergency_contact = model.emergency_contact();
    let skills = model.skills_list();
    let education = model.education_list();
    Employee {
        id: model.id,
        organization_id: model.organization_id,
        department_id: model.department_id,
        department_name,
        manager_id: model.manager_id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        contact_number: model.contact_number,
        employee_code: model.employee_code,
        position: model.position,
        date_of_birth: model.date_of_birth,
        gender: model.gender,
        address: model.address,
        joining_date: model.joining_date,
        employment_type: model.employment_type,
        work_location: model.work_location,
        status: model.status,
        emergency_contact,
        skills,
        education,
        is_verified: model.is_verified,
        last_login_at: utc_opt(model.last_login_at),
        created_at: utc(model.created_at),
    }
}

pub fn employee_ref(model: employee::Model) -> EmployeeRef {
    EmployeeRef {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
    }
}

pub fn hr_profile(model: hr_profile::Model) -> HrProfile {
    let permissions = model.permissions();
    HrProfile {
        id: model.id,
        organization_id: model.organization_id,
        department_id: model.department_id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        contact_number: model.contact_number,
        role: model.role,
        status: model.status,
        permissions,
        is_verified: model.is_verified,
        last_login_at: utc_opt(model.last_login_at),
        created_at: utc(model.created_at),
    }
}

pub fn hr_user(model: &hr_profile::Model) -> AuthUser {
    AuthUser {
        id: model.id,
        portal: Portal::Hr,
        role: model.role.to_string(),
        first_name: model.first_name.clone(),
        last_name: model.last_name.clone(),
        email: model.email.clone(),
        organization_id: model.organization_id,
        is_verified: model.is_verified,
        last_login_at: utc_opt(model.last_login_at),
    }
}

pub fn employee_user(model: &employee::Model) -> AuthUser {
    AuthUser {
        id: model.id,
        portal: Portal::Employee,
        role: Portal::Employee.to_string(),
        first_name: model.first_name.clone(),
        last_name: model.last_name.clone(),
        email: model.email.clone(),
        organization_id: model.organization_id,
        is_verified: model.is_verified,
        last_login_at: utc_opt(model.last_login_at),
    }
}

pub fn department(model: department::Model, employee_count: u64) -> Department {
    Department {
        id: model.id,
        name: model.name,
        description: model.description,
        employee_count,
    }
}

pub fn attendance(model: attendance::Model, employee_name: Option<String>) -> AttendanceRecord {
    AttendanceRecord {
        id: model.id,
        employee_id: model.employee_id,
        employee_name,
        date: model.date,
        status: model.status,
        check_in: model.check_in,
        check_out: model.check_out,
        work_hours: model.work_hours,
        comments: model.comments,
    }
}

pub fn leave(model: leave_application::Model, employee_name: Option<String>) -> Leave {
    let days = model.days();
    Leave {
        id: model.id,
        employee_id: model.employee_id,
        employee_name,
        title: model.title,
        reason: model.reason,
        start_date: model.start_date,
        end_date: model.end_date,
        days,
        status: model.status,
        approved_by: model.approved_by,
        hr_comment: model.hr_comment,
        created_at: utc(model.created_at),
    }
}

pub fn salary(model: salary::Model, employee_name: Option<String>) -> Salary {
    Salary {
        id: model.id,
        employee_id: model.employee_id,
        employee_name,
        basic_pay: model.basic_pay,
        bonuses: model.bonuses,
        deductions: model.deductions,
        net_pay: model.net_pay,
        currency: model.currency,
        due_date: model.due_date,
        payment_date: model.payment_date,
        status: model.status,
        work_hours: model.work_hours,
        overtime_hours: model.overtime_hours,
        hourly_rate: model.hourly_rate,
        payment_type: model.payment_type,
        created_at: utc(model.created_at),
    }
}

pub fn request(model: employee_request::Model, employee_name: Option<String>) -> EmployeeRequest {
    EmployeeRequest {
        id: model.id,
        employee_id: model.employee_id,
        employee_name,
        department_id: model.department_id,
        title: model.title,
        content: model.content,
        request_type: model.request_type,
        priority: model.priority,
        status: model.status,
        created_by: model.created_by,
        approved_by: model.approved_by,
        hr_comments: model.hr_comments,
        closed_by: model.closed_by,
        closed_at: utc_opt(model.closed_at),
        created_at: utc(model.created_at),
    }
}

pub fn applicant(model: applicant::Model) -> Applicant {
    Applicant {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        contact_number: model.contact_number,
        applied_role: model.applied_role,
        status: model.status,
        created_at: utc(model.created_at),
    }
}

pub fn recruitment(model: recruitment::Model, applicants: Vec<applicant::Model>) -> Recruitment {
    Recruitment {
        id: model.id,
        job_title: model.job_title,
        description: model.description,
        department_id: model.department_id,
        applicants: applicants.into_iter().map(applicant).collect(),
        created_at: utc(model.created_at),
    }
}

pub fn interview(
    model: interview_insight::Model,
    applicant_name: Option<String>,
    interviewer_name: Option<String>,
) -> InterviewInsight {
    InterviewInsight {
        id: model.id,
        applicant_id: model.applicant_id,
        applicant_name,
        interviewer_id: model.interviewer_id,
        interviewer_name,
        feedback: model.feedback,
        interview_date: model.interview_date,
        response_date: model.response_date,
        status: model.status,
        created_at: utc(model.created_at),
    }
}

pub fn calendar_event(model: calendar_event::Model) -> CalendarEvent {
    CalendarEvent {
        id: model.id,
        title: model.title,
        description: model.description,
        event_date: model.event_date,
        audience: model.audience,
    }
}

pub fn organization(model: organization::Model) -> OrganizationInfo {
    OrganizationInfo {
        id: model.id,
        name: model.name,
        description: model.description,
        organization_url: model.url,
        organization_mail: model.mail,
        policies: model.policies,
        created_at: utc(model.created_at),
        updated_at: utc(model.updated_at),
    }
}

pub fn schedule(model: shift_schedule::Model, employee_name: Option<String>) -> Schedule {
    Schedule {
        id: model.id,
        employee_id: model.employee_id,
        employee_name,
        date: model.date,
        start_time: model.start_time,
        end_time: model.end_time,
        shift: model.shift,
        location: model.location,
        notes: model.notes,
        status: model.status,
        created_by: model.created_by,
        created_at: utc(model.created_at),
    }
}

pub fn notice(model: notice::Model) -> Notice {
    Notice {
        id: model.id,
        title: model.title,
        content: model.content,
        audience: model.audience,
        department_id: model.department_id,
        employee_id: model.employee_id,
        created_by: model.created_by,
        created_at: utc(model.created_at),
    }
}

pub fn balance(model: balance::Model) -> Balance {
    Balance {
        id: model.id,
        title: model.title,
        description: model.description,
        available_amount: model.available_amount,
        total_expenses: model.total_expenses,
        expense_month: model.expense_month,
        submit_date: model.submit_date,
        created_by: model.created_by,
        created_at: utc(model.created_at),
    }
}
