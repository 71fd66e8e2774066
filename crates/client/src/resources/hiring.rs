//! Recruitment drives, applicants and interview insights. HR only.

use ems_types::{
    Portal,
    recruitment::{
        Applicant, ApplicantUpdate, InterviewInsight, InterviewInsightChanges, NewApplicant,
        NewInterviewInsight, NewRecruitment, Recruitment, RecruitmentUpdate,
        RecruitmentUpdateResult,
    },
};
use uuid::Uuid;

use crate::{client::ApiClient, endpoints, error::ClientResult};

pub struct Recruitments<'a> {
    client: &'a ApiClient,
}

pub struct Applicants<'a> {
    client: &'a ApiClient,
}

pub struct Interviews<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn recruitments(&self) -> Recruitments<'_> {
        Recruitments { client: self }
    }

    pub fn applicants(&self) -> Applicants<'_> {
        Applicants { client: self }
    }

    pub fn interviews(&self) -> Interviews<'_> {
        Interviews { client: self }
    }
}

impl Recruitments<'_> {
    pub async fn create(&self, body: &NewRecruitment) -> ClientResult<Recruitment> {
        self.client
            .post(Portal::Hr, endpoints::recruitment::CREATE, body)
            .await
    }

    pub async fn list(&self) -> ClientResult<Vec<Recruitment>> {
        self.client.get(Portal::Hr, endpoints::recruitment::ALL).await
    }

    pub async fn get(&self, id: Uuid) -> ClientResult<Recruitment> {
        self.client
            .get(Portal::Hr, &endpoints::recruitment::one(id))
            .await
    }

    /// Also links `applicationIds`; already linked applicants are reported
    /// back rather than rejected.
    pub async fn update(&self, id: Uuid, body: &RecruitmentUpdate) -> ClientResult<RecruitmentUpdateResult> {
        self.client
            .patch(Portal::Hr, &endpoints::recruitment::update(id), body)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<String> {
        self.client
            .delete(Portal::Hr, &endpoints::recruitment::delete(id))
            .await
    }
}

impl Applicants<'_> {
    pub async fn create(&self, body: &NewApplicant) -> ClientResult<Applicant> {
        self.client
            .post(Portal::Hr, endpoints::applicant::CREATE, body)
            .await
    }

    pub async fn list(&self) -> ClientResult<Vec<Applicant>> {
        self.client.get(Portal::Hr, endpoints::applicant::ALL).await
    }

    pub async fn get(&self, id: Uuid) -> ClientResult<Applicant> {
        self.client.get(Portal::Hr, &endpoints::applicant::one(id)).await
    }

    pub async fn update(&self, body: &ApplicantUpdate) -> ClientResult<Applicant> {
        self.client
            .patch(Portal::Hr, endpoints::applicant::UPDATE, body)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<String> {
        self.client
            .delete(Portal::Hr, &endpoints::applicant::delete(id))
            .await
    }
}

impl Interviews<'_> {
    pub async fn create(&self, body: &NewInterviewInsight) -> ClientResult<InterviewInsight> {
        self.client
            .post(Portal::Hr, endpoints::interview::CREATE, body)
            .await
    }

    pub async fn list(&self) -> ClientResult<Vec<InterviewInsight>> {
        self.client.get(Portal::Hr, endpoints::interview::ALL).await
    }

    pub async fn get(&self, id: Uuid) -> ClientResult<InterviewInsight> {
        self.client.get(Portal::Hr, &endpoints::interview::one(id)).await
    }

    pub async fn update(&self, id: Uuid, changes: &InterviewInsightChanges) -> ClientResult<InterviewInsight> {
        self.client
            .patch(Portal::Hr, &endpoints::interview::update(id), changes)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<String> {
        self.client
            .delete(Portal::Hr, &endpoints::interview::delete(id))
            .await
    }
}
