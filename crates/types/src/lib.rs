//! Request and response shapes spoken between the EMS server and its
//! clients. Enum values serialize to the exact strings stored in the
//! database and shown in the portals.

pub mod attendance;
pub mod auth;
pub mod balance;
pub mod calendar;
pub mod dashboard;
pub mod department;
pub mod employee;
pub mod enums;
pub mod envelope;
pub mod hr;
pub mod leave;
pub mod notice;
pub mod notification;
pub mod organization;
pub mod recruitment;
pub mod request;
pub mod salary;
pub mod schedule;
pub mod time_format;

pub use enums::*;
pub use envelope::{ApiEnvelope, ErrorBody};
