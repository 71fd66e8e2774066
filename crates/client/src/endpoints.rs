//! Server paths, relative to the base URL.

use ems_types::Portal;
use uuid::Uuid;

pub const HEALTHZ: &str = "/healthz";
pub const WS: &str = "/ws";

/// Prefix of the auth routes for `portal`.
pub fn auth_base(portal: Portal) -> &'static str {
    match portal {
        Portal::Hr => "/api/auth/HR",
        Portal::Employee => "/api/auth/employee",
    }
}

pub fn auth(portal: Portal, action: &str) -> String {
    format!("{}/{action}", auth_base(portal))
}

pub fn reset_password(portal: Portal, token: &str) -> String {
    format!("{}/reset-password/{token}", auth_base(portal))
}

pub mod employee {
    use super::Uuid;

    pub const ALL: &str = "/api/v1/employee/all";
    pub const ALL_IDS: &str = "/api/v1/employee/all-employees-ids";
    pub const UPDATE: &str = "/api/v1/employee/update-employee";
    pub const BY_EMPLOYEE: &str = "/api/v1/employee/by-employee";
    pub const UPDATE_PROFILE: &str = "/api/v1/employee/update-profile";

    pub fn delete(id: Uuid) -> String {
        format!("/api/v1/employee/delete-employee/{id}")
    }

    pub fn by_hr(id: Uuid) -> String {
        format!("/api/v1/employee/by-HR/{id}")
    }
}

pub mod hr {
    use super::Uuid;

    pub const ALL: &str = "/api/v1/HR/all-profiles";
    pub const CREATE: &str = "/api/v1/HR/create-profile";

    pub fn profile(id: Uuid) -> String {
        format!("/api/v1/HR/profile/{id}")
    }

    pub fn update(id: Uuid) -> String {
        format!("/api/v1/HR/update-profile/{id}")
    }

    pub fn delete(id: Uuid) -> String {
        format!("/api/v1/HR/delete-profile/{id}")
    }

    pub fn permissions(id: Uuid) -> String {
        format!("/api/v1/HR/update-permissions/{id}")
    }

    pub fn change_password(id: Uuid) -> String {
        format!("/api/v1/HR/change-password/{id}")
    }
}

pub mod department {
    use super::Uuid;

    pub const ALL: &str = "/api/v1/department/all";
    pub const CREATE: &str = "/api/v1/department/create-department";
    pub const UPDATE: &str = "/api/v1/department/update-department";

    pub fn delete(id: Uuid) -> String {
        format!("/api/v1/department/delete-department/{id}")
    }
}

pub mod salary {
    use super::Uuid;

    pub const CREATE: &str = "/api/v1/salary/create";
    pub const ALL: &str = "/api/v1/salary/all";
    pub const UPDATE: &str = "/api/v1/salary/update";
    pub const MINE: &str = "/api/v1/salary/employee/my-salary";
    pub const SETTINGS: &str = "/api/v1/salary/settings";
    pub const CALCULATE: &str = "/api/v1/salary/calculate";
    pub const AUTO_PAYROLL: &str = "/api/v1/salary/auto-payroll";

    pub fn delete(id: Uuid) -> String {
        format!("/api/v1/salary/delete/{id}")
    }

    pub fn one(id: Uuid) -> String {
        format!("/api/v1/salary/{id}")
    }
}

pub mod leave {
    use super::Uuid;

    pub const CREATE: &str = "/api/v1/leave/create-leave";
    pub const MINE: &str = "/api/v1/leave/my-leaves";
    pub const EMPLOYEE_UPDATE: &str = "/api/v1/leave/employee-update-leave";
    pub const ALL: &str = "/api/v1/leave/all";
    pub const HR_UPDATE: &str = "/api/v1/leave/HR-update-leave";

    pub fn delete(id: Uuid) -> String {
        format!("/api/v1/leave/delete-leave/{id}")
    }

    pub fn one(id: Uuid) -> String {
        format!("/api/v1/leave/{id}")
    }
}

pub mod attendance {
    use super::Uuid;

    pub const MY_STATUS: &str = "/api/v1/attendance/employee/my-status";
    pub const MINE: &str = "/api/v1/attendance/employee/my-attendance";
    pub const CLOCK_IN: &str = "/api/v1/attendance/employee/clock-in";
    pub const CLOCK_OUT: &str = "/api/v1/attendance/employee/clock-out";
    pub const ROOT: &str = "/api/v1/attendance";

    pub fn for_employee(id: Uuid) -> String {
        format!("/api/v1/attendance/employee/{id}")
    }

    pub fn history(id: Uuid) -> String {
        format!("/api/v1/attendance/employee-history/{id}")
    }

    pub fn one(id: Uuid) -> String {
        format!("/api/v1/attendance/{id}")
    }
}

pub mod request {
    use super::Uuid;

    pub const CREATE: &str = "/api/v1/generate-request/create-request";
    pub const UPDATE_CONTENT: &str = "/api/v1/generate-request/update-request-content";
    pub const CREATE_BY_HR: &str = "/api/v1/generate-request/create-request-by-hr";
    pub const ALL: &str = "/api/v1/generate-request/all";
    pub const UPDATE_STATUS: &str = "/api/v1/generate-request/update-request-status";
    pub const CLOSE: &str = "/api/v1/generate-request/close-request";
    pub const UPDATE_PRIORITY: &str = "/api/v1/generate-request/update-priority";

    pub fn for_employee(id: Uuid) -> String {
        format!("/api/v1/generate-request/employee/{id}")
    }

    pub fn delete(id: Uuid) -> String {
        format!("/api/v1/generate-request/delete-request/{id}")
    }

    pub fn one(id: Uuid) -> String {
        format!("/api/v1/generate-request/{id}")
    }
}

pub mod recruitment {
    use super::Uuid;

    pub const CREATE: &str = "/api/v1/recruitment/create-recruitment";
    pub const ALL: &str = "/api/v1/recruitment/all";

    pub fn update(id: Uuid) -> String {
        format!("/api/v1/recruitment/update-recruitment/{id}")
    }

    pub fn delete(id: Uuid) -> String {
        format!("/api/v1/recruitment/delete-recruitment/{id}")
    }

    pub fn one(id: Uuid) -> String {
        format!("/api/v1/recruitment/{id}")
    }
}

pub mod applicant {
    use super::Uuid;

    pub const CREATE: &str = "/api/v1/applicant/create-applicant";
    pub const ALL: &str = "/api/v1/applicant/all";
    pub const UPDATE: &str = "/api/v1/applicant/update-applicant";

    pub fn delete(id: Uuid) -> String {
        format!("/api/v1/applicant/delete-applicant/{id}")
    }

    pub fn one(id: Uuid) -> String {
        format!("/api/v1/applicant/{id}")
    }
}

pub mod interview {
    use super::Uuid;

    pub const CREATE: &str = "/api/v1/interview-insights/create-interview";
    pub const ALL: &str = "/api/v1/interview-insights/all";

    pub fn update(id: Uuid) -> String {
        format!("/api/v1/interview-insights/update-interview/{id}")
    }

    pub fn delete(id: Uuid) -> String {
        format!("/api/v1/interview-insights/delete-interview/{id}")
    }

    pub fn one(id: Uuid) -> String {
        format!("/api/v1/interview-insights/{id}")
    }
}

pub mod calendar {
    use super::Uuid;

    pub const ALL: &str = "/api/v1/corporate-calendar/all";
    pub const CREATE: &str = "/api/v1/corporate-calendar/create-event";
    pub const UPDATE: &str = "/api/v1/corporate-calendar/update-event";

    pub fn delete(id: Uuid) -> String {
        format!("/api/v1/corporate-calendar/delete-event/{id}")
    }
}

pub mod organization {
    pub const INFO: &str = "/api/v1/organization/info";
    pub const UPDATE: &str = "/api/v1/organization/update";
}

pub mod schedule {
    use super::Uuid;

    pub const ALL: &str = "/api/v1/schedule/all";
    pub const CREATE: &str = "/api/v1/schedule/create-schedule";
    pub const DATE_RANGE: &str = "/api/v1/schedule/date-range";
    pub const MINE: &str = "/api/v1/schedule/employee/my-schedule";

    pub fn update(id: Uuid) -> String {
        format!("/api/v1/schedule/update-schedule/{id}")
    }

    pub fn delete(id: Uuid) -> String {
        format!("/api/v1/schedule/delete-schedule/{id}")
    }

    pub fn for_employee(id: Uuid) -> String {
        format!("/api/v1/schedule/employee/{id}")
    }

    pub fn one(id: Uuid) -> String {
        format!("/api/v1/schedule/{id}")
    }
}

pub mod notice {
    use super::Uuid;

    pub const ALL: &str = "/api/v1/notice/all";
    pub const CREATE: &str = "/api/v1/notice/create-notice";
    pub const UPDATE: &str = "/api/v1/notice/update-notice";
    pub const MINE: &str = "/api/v1/notice/employee/my-notices";

    pub fn delete(id: Uuid) -> String {
        format!("/api/v1/notice/delete-notice/{id}")
    }

    pub fn one(id: Uuid) -> String {
        format!("/api/v1/notice/{id}")
    }
}

pub mod balance {
    use super::Uuid;

    pub const ALL: &str = "/api/v1/balance/all";
    pub const CREATE: &str = "/api/v1/balance/create-balance";
    pub const UPDATE: &str = "/api/v1/balance/update-balance";

    pub fn delete(id: Uuid) -> String {
        format!("/api/v1/balance/delete-balance/{id}")
    }

    pub fn one(id: Uuid) -> String {
        format!("/api/v1/balance/{id}")
    }
}

pub mod dashboard {
    pub const HR: &str = "/api/v1/dashboard/HR-dashboard";
    pub const EMPLOYEE: &str = "/api/v1/dashboard/employee-dashboard";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_paths_follow_portal() {
        assert_eq!(auth(Portal::Hr, "login"), "/api/auth/HR/login");
        assert_eq!(
            reset_password(Portal::Employee, "abc"),
            "/api/auth/employee/reset-password/abc"
        );
    }

    #[test]
    fn schedule_paths_carry_ids() {
        let id = Uuid::nil();
        assert_eq!(
            schedule::update(id),
            "/api/v1/schedule/update-schedule/00000000-0000-0000-0000-000000000000"
        );
        assert!(schedule::for_employee(id).starts_with("/api/v1/schedule/employee/"));
    }
}
