use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::{ApplicantStatus, InterviewStatus};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: String,
    pub applied_role: String,
    pub status: ApplicantStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplicant {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: String,
    pub applied_role: String,
    pub status: Option<ApplicantStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantUpdate {
    pub applicant_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub applied_role: Option<String>,
    pub status: Option<ApplicantStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recruitment {
    pub id: Uuid,
    pub job_title: String,
    pub description: String,
    pub department_id: Option<Uuid>,
    pub applicants: Vec<Applicant>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecruitment {
    pub job_title: String,
    pub description: String,
    pub department_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitmentUpdate {
    pub job_title: Option<String>,
    pub description: Option<String>,
    pub department_id: Option<Uuid>,
    /// Applicants to attach to the posting.
    #[serde(default, alias = "applicationIDArray")]
    pub application_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecruitmentUpdateResult {
    pub recruitment: Recruitment,
    pub added: Vec<Uuid>,
    pub already_present: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InterviewInsight {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub applicant_name: Option<String>,
    pub interviewer_id: Option<Uuid>,
    pub interviewer_name: Option<String>,
    pub feedback: Option<String>,
    pub interview_date: NaiveDate,
    pub response_date: Option<NaiveDate>,
    pub status: InterviewStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInterviewInsight {
    pub applicant_id: Uuid,
    pub interviewer_id: Option<Uuid>,
    pub feedback: Option<String>,
    pub interview_date: NaiveDate,
    pub response_date: Option<NaiveDate>,
    pub status: Option<InterviewStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewInsightChanges {
    pub interviewer_id: Option<Uuid>,
    pub feedback: Option<String>,
    pub interview_date: Option<NaiveDate>,
    pub response_date: Option<NaiveDate>,
    pub status: Option<InterviewStatus>,
}
