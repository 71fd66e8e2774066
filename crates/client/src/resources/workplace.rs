//! Employee requests, the corporate calendar, shift schedules, notices,
//! the organization profile and dashboards.

use ems_types::{
    Portal,
    calendar::{CalendarEvent, CalendarEventUpdate, NewCalendarEvent},
    dashboard::{EmployeeDashboard, HrDashboard},
    notice::{NewNotice, Notice, NoticeUpdate},
    organization::{OrganizationInfo, OrganizationUpdate},
    request::{
        EmployeeRequest, NewRequest, NewRequestByHr, RequestClose, RequestContentUpdate,
        RequestPriorityUpdate, RequestStatusUpdate,
    },
    schedule::{NewSchedule, Schedule, ScheduleChanges, ScheduleRange},
};
use uuid::Uuid;

use crate::{client::ApiClient, endpoints, error::ClientResult};

pub struct Requests<'a> {
    client: &'a ApiClient,
}

pub struct Calendar<'a> {
    client: &'a ApiClient,
}

pub struct Schedules<'a> {
    client: &'a ApiClient,
}

pub struct Notices<'a> {
    client: &'a ApiClient,
}

pub struct Organization<'a> {
    client: &'a ApiClient,
}

pub struct Dashboards<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn requests(&self) -> Requests<'_> {
        Requests { client: self }
    }

    pub fn calendar(&self) -> Calendar<'_> {
        Calendar { client: self }
    }

    pub fn schedules(&self) -> Schedules<'_> {
        Schedules { client: self }
    }

    pub fn notices(&self) -> Notices<'_> {
        Notices { client: self }
    }

    pub fn organization(&self) -> Organization<'_> {
        Organization { client: self }
    }

    pub fn dashboards(&self) -> Dashboards<'_> {
        Dashboards { client: self }
    }
}

impl Requests<'_> {
    pub async fn create(&self, body: &NewRequest) -> ClientResult<EmployeeRequest> {
        self.client
            .post(Portal::Employee, endpoints::request::CREATE, body)
            .await
    }

    pub async fn update_content(&self, body: &RequestContentUpdate) -> ClientResult<EmployeeRequest> {
        self.client
            .patch(Portal::Employee, endpoints::request::UPDATE_CONTENT, body)
            .await
    }

    pub async fn for_employee(&self, employee_id: Uuid) -> ClientResult<Vec<EmployeeRequest>> {
        self.client
            .get(Portal::Employee, &endpoints::request::for_employee(employee_id))
            .await
    }

    /// Requests of the logged-in employee.
    pub async fn mine(&self) -> ClientResult<Vec<EmployeeRequest>> {
        let me = self.client.employees().me().await?;
        self.for_employee(me.id).await
    }

    pub async fn create_for(&self, body: &NewRequestByHr) -> ClientResult<EmployeeRequest> {
        self.client
            .post(Portal::Hr, endpoints::request::CREATE_BY_HR, body)
            .await
    }

    pub async fn list(&self) -> ClientResult<Vec<EmployeeRequest>> {
        self.client.get(Portal::Hr, endpoints::request::ALL).await
    }

    pub async fn get(&self, id: Uuid) -> ClientResult<EmployeeRequest> {
        self.client.get(Portal::Hr, &endpoints::request::one(id)).await
    }

    pub async fn update_status(&self, body: &RequestStatusUpdate) -> ClientResult<EmployeeRequest> {
        self.client
            .patch(Portal::Hr, endpoints::request::UPDATE_STATUS, body)
            .await
    }

    pub async fn update_priority(&self, body: &RequestPriorityUpdate) -> ClientResult<EmployeeRequest> {
        self.client
            .patch(Portal::Hr, endpoints::request::UPDATE_PRIORITY, body)
            .await
    }

    pub async fn close(&self, body: &RequestClose) -> ClientResult<EmployeeRequest> {
        self.client
            .patch(Portal::Hr, endpoints::request::CLOSE, body)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<String> {
        self.client
            .delete(Portal::Hr, &endpoints::request::delete(id))
            .await
    }
}

impl Calendar<'_> {
    /// Visible from either portal.
    pub async fn list(&self, portal: Portal) -> ClientResult<Vec<CalendarEvent>> {
        self.client.get(portal, endpoints::calendar::ALL).await
    }

    pub async fn create(&self, body: &NewCalendarEvent) -> ClientResult<CalendarEvent> {
        self.client
            .post(Portal::Hr, endpoints::calendar::CREATE, body)
            .await
    }

    pub async fn update(&self, body: &CalendarEventUpdate) -> ClientResult<CalendarEvent> {
        self.client
            .patch(Portal::Hr, endpoints::calendar::UPDATE, body)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<String> {
        self.client
            .delete(Portal::Hr, &endpoints::calendar::delete(id))
            .await
    }
}

impl Schedules<'_> {
    pub async fn list(&self) -> ClientResult<Vec<Schedule>> {
        self.client.get(Portal::Hr, endpoints::schedule::ALL).await
    }

    pub async fn get(&self, id: Uuid) -> ClientResult<Schedule> {
        self.client.get(Portal::Hr, &endpoints::schedule::one(id)).await
    }

    pub async fn for_employee(&self, employee_id: Uuid) -> ClientResult<Vec<Schedule>> {
        self.client
            .get(Portal::Hr, &endpoints::schedule::for_employee(employee_id))
            .await
    }

    pub async fn between(&self, body: &ScheduleRange) -> ClientResult<Vec<Schedule>> {
        self.client
            .post(Portal::Hr, endpoints::schedule::DATE_RANGE, body)
            .await
    }

    pub async fn create(&self, body: &NewSchedule) -> ClientResult<Schedule> {
        self.client
            .post(Portal::Hr, endpoints::schedule::CREATE, body)
            .await
    }

    pub async fn update(&self, id: Uuid, body: &ScheduleChanges) -> ClientResult<Schedule> {
        self.client
            .put(Portal::Hr, &endpoints::schedule::update(id), body)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<String> {
        self.client
            .delete(Portal::Hr, &endpoints::schedule::delete(id))
            .await
    }

    /// Shifts of the logged-in employee.
    pub async fn mine(&self) -> ClientResult<Vec<Schedule>> {
        self.client
            .get(Portal::Employee, endpoints::schedule::MINE)
            .await
    }
}

impl Notices<'_> {
    pub async fn list(&self) -> ClientResult<Vec<Notice>> {
        self.client.get(Portal::Hr, endpoints::notice::ALL).await
    }

    pub async fn get(&self, id: Uuid) -> ClientResult<Notice> {
        self.client.get(Portal::Hr, &endpoints::notice::one(id)).await
    }

    pub async fn create(&self, body: &NewNotice) -> ClientResult<Notice> {
        self.client
            .post(Portal::Hr, endpoints::notice::CREATE, body)
            .await
    }

    pub async fn update(&self, body: &NoticeUpdate) -> ClientResult<Notice> {
        self.client
            .patch(Portal::Hr, endpoints::notice::UPDATE, body)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<String> {
        self.client
            .delete(Portal::Hr, &endpoints::notice::delete(id))
            .await
    }

    pub async fn mine(&self) -> ClientResult<Vec<Notice>> {
        self.client
            .get(Portal::Employee, endpoints::notice::MINE)
            .await
    }
}

impl Organization<'_> {
    pub async fn info(&self) -> ClientResult<OrganizationInfo> {
        self.client
            .get(Portal::Hr, endpoints::organization::INFO)
            .await
    }

    pub async fn update(&self, body: &OrganizationUpdate) -> ClientResult<OrganizationInfo> {
        self.client
            .put(Portal::Hr, endpoints::organization::UPDATE, body)
            .await
    }
}

impl Dashboards<'_> {
    pub async fn hr(&self) -> ClientResult<HrDashboard> {
        self.client.get(Portal::Hr, endpoints::dashboard::HR).await
    }

    pub async fn employee(&self) -> ClientResult<EmployeeDashboard> {
        self.client
            .get(Portal::Employee, endpoints::dashboard::EMPLOYEE)
            .await
    }
}
