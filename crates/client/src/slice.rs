//! Client-side state: one [`Slice`] per resource, driven by async thunks on
//! [`Store`].

use std::future::Future;

use chrono::NaiveDate;
use ems_types::{
    LeaveStatus, Portal,
    attendance::{AttendanceRecord, DateRange},
    calendar::CalendarEvent,
    dashboard::{EmployeeDashboard, HrDashboard},
    department::Department,
    employee::Employee,
    hr::HrProfile,
    leave::{Leave, LeaveDecision, NewLeave},
    notice::Notice,
    recruitment::{Applicant, InterviewInsight, Recruitment},
    request::{EmployeeRequest, NewRequest, RequestClose},
    salary::{AutoPayrollReport, NewSalary, Salary},
    schedule::Schedule,
};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::{
    client::ApiClient,
    error::{ClientError, ClientResult},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Slice<T> {
    pub status: Status,
    pub items: Vec<T>,
    pub error: Option<String>,
}

impl<T> Default for Slice<T> {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            items: Vec::new(),
            error: None,
        }
    }
}

impl<T> Slice<T> {
    pub fn pending(&mut self) {
        self.status = Status::Loading;
        self.error = None;
    }

    /// Replaces the items.
    pub fn fulfilled(&mut self, items: Vec<T>) {
        self.status = Status::Succeeded;
        self.items = items;
        self.error = None;
    }

    /// Keeps the items from the last success.
    pub fn rejected(&mut self, message: impl Into<String>) {
        self.status = Status::Failed;
        self.error = Some(message.into());
    }

    /// Replaces the item `same` matches or appends `item`.
    pub fn upsert(&mut self, item: T, same: impl Fn(&T, &T) -> bool) {
        match self.items.iter().position(|existing| same(existing, &item)) {
            Some(index) => self.items[index] = item,
            None => self.items.push(item),
        }
        self.status = Status::Succeeded;
        self.error = None;
    }

    pub fn remove_where(&mut self, matches: impl Fn(&T) -> bool) {
        self.items.retain(|item| !matches(item));
        self.status = Status::Succeeded;
        self.error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    /// First item; single-value slices such as dashboards hold at most one.
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }
}

/// Runs `call` with the pending/fulfilled/rejected transitions on `slice`.
async fn load<T, F>(slice: &mut Slice<T>, call: F) -> ClientResult<()>
where
    F: Future<Output = ClientResult<Vec<T>>>,
{
    slice.pending();
    match call.await {
        Ok(items) => {
            slice.fulfilled(items);
            Ok(())
        }
        Err(err) => Err(reject(slice, err)),
    }
}

fn reject<T>(slice: &mut Slice<T>, err: ClientError) -> ClientError {
    debug!(error = %err, "thunk rejected");
    slice.rejected(err.user_message());
    err
}

fn one<T, F>(call: F) -> impl Future<Output = ClientResult<Vec<T>>>
where
    F: Future<Output = ClientResult<T>>,
{
    async move { call.await.map(|item| vec![item]) }
}

#[derive(Debug)]
pub struct Store {
    client: ApiClient,
    pub employees: Slice<Employee>,
    pub hr_profiles: Slice<HrProfile>,
    pub departments: Slice<Department>,
    pub leaves: Slice<Leave>,
    pub attendance: Slice<AttendanceRecord>,
    pub salaries: Slice<Salary>,
    pub requests: Slice<EmployeeRequest>,
    pub recruitments: Slice<Recruitment>,
    pub applicants: Slice<Applicant>,
    pub interviews: Slice<InterviewInsight>,
    pub calendar: Slice<CalendarEvent>,
    pub schedules: Slice<Schedule>,
    pub notices: Slice<Notice>,
    pub hr_dashboard: Slice<HrDashboard>,
    pub employee_dashboard: Slice<EmployeeDashboard>,
}

impl Store {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            employees: Slice::default(),
            hr_profiles: Slice::default(),
            departments: Slice::default(),
            leaves: Slice::default(),
            attendance: Slice::default(),
            salaries: Slice::default(),
            requests: Slice::default(),
            recruitments: Slice::default(),
            applicants: Slice::default(),
            interviews: Slice::default(),
            calendar: Slice::default(),
            schedules: Slice::default(),
            notices: Slice::default(),
            hr_dashboard: Slice::default(),
            employee_dashboard: Slice::default(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn fetch_employees(&mut self) -> ClientResult<()> {
        load(&mut self.employees, self.client.employees().list()).await
    }

    pub async fn delete_employee(&mut self, id: Uuid) -> ClientResult<()> {
        self.employees.pending();
        match self.client.employees().delete(id).await {
            Ok(_) => {
                self.employees.remove_where(|employee| employee.id == id);
                Ok(())
            }
            Err(err) => Err(reject(&mut self.employees, err)),
        }
    }

    pub async fn fetch_hr_profiles(&mut self) -> ClientResult<()> {
        load(&mut self.hr_profiles, self.client.hr_profiles().list()).await
    }

    pub async fn fetch_departments(&mut self) -> ClientResult<()> {
        load(&mut self.departments, self.client.departments().list()).await
    }

    pub async fn fetch_leaves(&mut self, status: Option<LeaveStatus>) -> ClientResult<()> {
        load(&mut self.leaves, self.client.leaves().list(status)).await
    }

    pub async fn fetch_my_leaves(&mut self) -> ClientResult<()> {
        load(&mut self.leaves, self.client.leaves().mine()).await
    }

    pub async fn apply_leave(&mut self, body: &NewLeave) -> ClientResult<Leave> {
        self.leaves.pending();
        match self.client.leaves().apply(body).await {
            Ok(leave) => {
                self.leaves.upsert(leave.clone(), |a, b| a.id == b.id);
                Ok(leave)
            }
            Err(err) => Err(reject(&mut self.leaves, err)),
        }
    }

    pub async fn decide_leave(&mut self, decision: &LeaveDecision) -> ClientResult<Leave> {
        self.leaves.pending();
        match self.client.leaves().decide(decision).await {
            Ok(leave) => {
                self.leaves.upsert(leave.clone(), |a, b| a.id == b.id);
                Ok(leave)
            }
            Err(err) => Err(reject(&mut self.leaves, err)),
        }
    }

    pub async fn fetch_attendance(&mut self, within: &DateRange) -> ClientResult<()> {
        load(&mut self.attendance, self.client.attendance().list(within)).await
    }

    pub async fn fetch_my_attendance(&mut self, within: &DateRange) -> ClientResult<()> {
        load(&mut self.attendance, self.client.attendance().mine(within)).await
    }

    pub async fn clock_in(&mut self) -> ClientResult<AttendanceRecord> {
        self.attendance.pending();
        match self.client.attendance().clock_in().await {
            Ok(record) => {
                self.attendance.upsert(record.clone(), |a, b| a.id == b.id);
                Ok(record)
            }
            Err(err) => Err(reject(&mut self.attendance, err)),
        }
    }

    pub async fn clock_out(&mut self) -> ClientResult<AttendanceRecord> {
        self.attendance.pending();
        match self.client.attendance().clock_out().await {
            Ok(record) => {
                self.attendance.upsert(record.clone(), |a, b| a.id == b.id);
                Ok(record)
            }
            Err(err) => Err(reject(&mut self.attendance, err)),
        }
    }

    pub async fn fetch_salaries(&mut self) -> ClientResult<()> {
        load(&mut self.salaries, self.client.salaries().list()).await
    }

    pub async fn fetch_my_salaries(&mut self) -> ClientResult<()> {
        load(&mut self.salaries, self.client.salaries().mine()).await
    }

    pub async fn create_salary(&mut self, body: &NewSalary) -> ClientResult<Salary> {
        self.salaries.pending();
        match self.client.salaries().create(body).await {
            Ok(salary) => {
                self.salaries.upsert(salary.clone(), |a, b| a.id == b.id);
                Ok(salary)
            }
            Err(err) => Err(reject(&mut self.salaries, err)),
        }
    }

    pub async fn delete_salary(&mut self, id: Uuid) -> ClientResult<()> {
        self.salaries.pending();
        match self.client.salaries().delete(id).await {
            Ok(_) => {
                self.salaries.remove_where(|salary| salary.id == id);
                Ok(())
            }
            Err(err) => Err(reject(&mut self.salaries, err)),
        }
    }

    /// Runs automatic payroll and merges the generated salaries.
    pub async fn run_auto_payroll(&mut self, period_end: Option<NaiveDate>) -> ClientResult<AutoPayrollReport> {
        self.salaries.pending();
        match self.client.salaries().auto_payroll(period_end).await {
            Ok(report) => {
                for salary in &report.salaries {
                    self.salaries.upsert(salary.clone(), |a, b| a.id == b.id);
                }
                self.salaries.status = Status::Succeeded;
                Ok(report)
            }
            Err(err) => Err(reject(&mut self.salaries, err)),
        }
    }

    pub async fn fetch_requests(&mut self) -> ClientResult<()> {
        load(&mut self.requests, self.client.requests().list()).await
    }

    pub async fn fetch_my_requests(&mut self) -> ClientResult<()> {
        load(&mut self.requests, self.client.requests().mine()).await
    }

    pub async fn create_request(&mut self, body: &NewRequest) -> ClientResult<EmployeeRequest> {
        self.requests.pending();
        match self.client.requests().create(body).await {
            Ok(request) => {
                self.requests.upsert(request.clone(), |a, b| a.id == b.id);
                Ok(request)
            }
            Err(err) => Err(reject(&mut self.requests, err)),
        }
    }

    pub async fn close_request(&mut self, body: &RequestClose) -> ClientResult<EmployeeRequest> {
        self.requests.pending();
        match self.client.requests().close(body).await {
            Ok(request) => {
                self.requests.upsert(request.clone(), |a, b| a.id == b.id);
                Ok(request)
            }
            Err(err) => Err(reject(&mut self.requests, err)),
        }
    }

    pub async fn fetch_recruitments(&mut self) -> ClientResult<()> {
        load(&mut self.recruitments, self.client.recruitments().list()).await
    }

    pub async fn fetch_applicants(&mut self) -> ClientResult<()> {
        load(&mut self.applicants, self.client.applicants().list()).await
    }

    pub async fn fetch_interviews(&mut self) -> ClientResult<()> {
        load(&mut self.interviews, self.client.interviews().list()).await
    }

    pub async fn fetch_calendar(&mut self, portal: Portal) -> ClientResult<()> {
        load(&mut self.calendar, self.client.calendar().list(portal)).await
    }

    pub async fn fetch_schedules(&mut self) -> ClientResult<()> {
        load(&mut self.schedules, self.client.schedules().list()).await
    }

    pub async fn fetch_my_schedule(&mut self) -> ClientResult<()> {
        load(&mut self.schedules, self.client.schedules().mine()).await
    }

    pub async fn fetch_notices(&mut self) -> ClientResult<()> {
        load(&mut self.notices, self.client.notices().list()).await
    }

    pub async fn fetch_my_notices(&mut self) -> ClientResult<()> {
        load(&mut self.notices, self.client.notices().mine()).await
    }

    pub async fn fetch_hr_dashboard(&mut self) -> ClientResult<()> {
        load(&mut self.hr_dashboard, one(self.client.dashboards().hr())).await
    }

    pub async fn fetch_employee_dashboard(&mut self) -> ClientResult<()> {
        load(&mut self.employee_dashboard, one(self.client.dashboards().employee())).await
    }
}
