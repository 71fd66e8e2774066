//! Attendance and leave.

use chrono::NaiveDate;
use ems_types::{
    LeaveStatus, Portal,
    attendance::{AttendanceChanges, AttendanceRecord, ClockStatus, DateRange, NewAttendance},
    leave::{Leave, LeaveDecision, LeaveFilter, LeaveUpdate, NewLeave},
};
use serde_json::json;
use uuid::Uuid;

use crate::{client::ApiClient, endpoints, error::ClientResult};

pub struct Attendance<'a> {
    client: &'a ApiClient,
}

pub struct Leaves<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn attendance(&self) -> Attendance<'_> {
        Attendance { client: self }
    }

    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { client: self }
    }
}

pub fn range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> DateRange {
    DateRange {
        start_date: start,
        end_date: end,
    }
}

impl Attendance<'_> {
    pub async fn status(&self) -> ClientResult<ClockStatus> {
        self.client
            .get(Portal::Employee, endpoints::attendance::MY_STATUS)
            .await
    }

    pub async fn mine(&self, within: &DateRange) -> ClientResult<Vec<AttendanceRecord>> {
        self.client
            .get_query(Portal::Employee, endpoints::attendance::MINE, within)
            .await
    }

    pub async fn clock_in(&self) -> ClientResult<AttendanceRecord> {
        self.client
            .post(Portal::Employee, endpoints::attendance::CLOCK_IN, &json!({}))
            .await
    }

    pub async fn clock_out(&self) -> ClientResult<AttendanceRecord> {
        self.client
            .post(Portal::Employee, endpoints::attendance::CLOCK_OUT, &json!({}))
            .await
    }

    pub async fn list(&self, within: &DateRange) -> ClientResult<Vec<AttendanceRecord>> {
        self.client
            .get_query(Portal::Hr, endpoints::attendance::ROOT, within)
            .await
    }

    pub async fn for_employee(&self, employee_id: Uuid) -> ClientResult<Vec<AttendanceRecord>> {
        self.client
            .get(Portal::Hr, &endpoints::attendance::for_employee(employee_id))
            .await
    }

    /// Oldest first, optionally bounded.
    pub async fn history(&self, employee_id: Uuid, within: &DateRange) -> ClientResult<Vec<AttendanceRecord>> {
        self.client
            .get_query(Portal::Hr, &endpoints::attendance::history(employee_id), within)
            .await
    }

    pub async fn get(&self, id: Uuid) -> ClientResult<AttendanceRecord> {
        self.client
            .get(Portal::Hr, &endpoints::attendance::one(id))
            .await
    }

    pub async fn create(&self, body: &NewAttendance) -> ClientResult<AttendanceRecord> {
        self.client
            .post(Portal::Hr, endpoints::attendance::ROOT, body)
            .await
    }

    pub async fn update(&self, id: Uuid, changes: &AttendanceChanges) -> ClientResult<AttendanceRecord> {
        self.client
            .patch(Portal::Hr, &endpoints::attendance::one(id), changes)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<String> {
        self.client
            .delete(Portal::Hr, &endpoints::attendance::one(id))
            .await
    }
}

impl Leaves<'_> {
    pub async fn apply(&self, body: &NewLeave) -> ClientResult<Leave> {
        self.client
            .post(Portal::Employee, endpoints::leave::CREATE, body)
            .await
    }

    pub async fn mine(&self) -> ClientResult<Vec<Leave>> {
        self.client.get(Portal::Employee, endpoints::leave::MINE).await
    }

    /// Only pending leaves can be edited.
    pub async fn edit(&self, body: &LeaveUpdate) -> ClientResult<Leave> {
        self.client
            .patch(Portal::Employee, endpoints::leave::EMPLOYEE_UPDATE, body)
            .await
    }

    /// Deletes as `portal`: employees withdraw their own pending leaves,
    /// HR removes any leave of the organization.
    pub async fn delete(&self, portal: Portal, id: Uuid) -> ClientResult<String> {
        self.client.delete(portal, &endpoints::leave::delete(id)).await
    }

    pub async fn list(&self, status: Option<LeaveStatus>) -> ClientResult<Vec<Leave>> {
        let filter = LeaveFilter { status };
        self.client
            .get_query(Portal::Hr, endpoints::leave::ALL, &filter)
            .await
    }

    pub async fn get(&self, id: Uuid) -> ClientResult<Leave> {
        self.client.get(Portal::Hr, &endpoints::leave::one(id)).await
    }

    pub async fn decide(&self, decision: &LeaveDecision) -> ClientResult<Leave> {
        self.client
            .patch(Portal::Hr, endpoints::leave::HR_UPDATE, decision)
            .await
    }
}
