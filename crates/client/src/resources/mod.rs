//! Typed wrappers over the REST endpoints, one handle per resource.

pub mod hiring;
pub mod payroll;
pub mod people;
pub mod time;
pub mod workplace;

pub use hiring::{Applicants, Interviews, Recruitments};
pub use payroll::{Balances, Salaries};
pub use people::{Departments, Employees, HrProfiles};
pub use time::{Attendance, Leaves, range};
pub use workplace::{Calendar, Dashboards, Notices, Organization, Requests, Schedules};
