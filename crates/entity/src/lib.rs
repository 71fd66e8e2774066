pub mod applicant;
pub mod attendance;
pub mod balance;
pub mod calendar_event;
pub mod department;
pub mod employee;
pub mod employee_request;
pub mod hr_profile;
pub mod interview_insight;
pub mod leave_application;
pub mod notice;
pub mod organization;
pub mod payroll_settings;
pub mod recruitment;
pub mod recruitment_applicant;
pub mod salary;
pub mod shift_schedule;
