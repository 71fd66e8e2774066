use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} value `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares an enum whose serde representation and (with the `sea-orm`
/// feature) database representation are the same business string.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident: $db_type:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[cfg_attr(feature = "sea-orm", derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum))]
        #[cfg_attr(feature = "sea-orm", sea_orm(rs_type = "String", db_type = $db_type))]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                #[cfg_attr(feature = "sea-orm", sea_orm(string_value = $wire))]
                $variant,
            )+
        }

        impl $name {
            pub const VARIANTS: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// Which half of the application a token or record belongs to.
    pub enum Portal: "String(Some(16))" {
        Hr => "HR",
        Employee => "Employee",
    }
}

impl Portal {
    /// Cookie and token-store key for this portal.
    pub fn token_key(self) -> &'static str {
        match self {
            Portal::Hr => "HRtoken",
            Portal::Employee => "EMtoken",
        }
    }
}

wire_enum! {
    pub enum HrRole: "String(Some(32))" {
        Admin => "HR-Admin",
        Director => "HR_Director",
        Manager => "HR_Manager",
        Specialist => "HR_Specialist",
        Assistant => "HR_Assistant",
    }
}

impl HrRole {
    pub fn level(self) -> u8 {
        match self {
            HrRole::Admin => 5,
            HrRole::Director => 4,
            HrRole::Manager => 3,
            HrRole::Specialist => 2,
            HrRole::Assistant => 1,
        }
    }
}

wire_enum! {
    pub enum HrStatus: "String(Some(16))" {
        Active => "active",
        Inactive => "inactive",
        Suspended => "suspended",
    }
}

wire_enum! {
    pub enum Gender: "String(Some(16))" {
        Male => "Male",
        Female => "Female",
        Other => "Other",
    }
}

wire_enum! {
    pub enum EmploymentType: "String(Some(16))" {
        FullTime => "Full-time",
        PartTime => "Part-time",
        Contract => "Contract",
        Intern => "Intern",
    }
}

wire_enum! {
    pub enum EmployeeStatus: "String(Some(16))" {
        Active => "Active",
        Inactive => "Inactive",
        OnLeave => "On Leave",
        Terminated => "Terminated",
    }
}

wire_enum! {
    pub enum AttendanceStatus: "String(Some(16))" {
        Present => "Present",
        Absent => "Absent",
        Late => "Late",
        HalfDay => "Half Day",
        Leave => "Leave",
    }
}

wire_enum! {
    pub enum LeaveStatus: "String(Some(16))" {
        Pending => "Pending",
        Approved => "Approved",
        Rejected => "Rejected",
    }
}

wire_enum! {
    pub enum SalaryStatus: "String(Some(16))" {
        Pending => "Pending",
        Delayed => "Delayed",
        Paid => "Paid",
        Scheduled => "Scheduled",
        AutoGenerated => "Auto-Generated",
    }
}

wire_enum! {
    pub enum PaymentType: "String(Some(16))" {
        Manual => "Manual",
        AutoCalculated => "Auto-calculated",
        AutoPayroll => "Auto-Payroll",
    }
}

wire_enum! {
    pub enum ApplicantStatus: "String(Some(24))" {
        ConductInterview => "Conduct-Interview",
        Rejected => "Rejected",
        Pending => "Pending",
        InterviewCompleted => "Interview Completed",
        NotSpecified => "Not Specified",
    }
}

wire_enum! {
    pub enum InterviewStatus: "String(Some(16))" {
        Pending => "Pending",
        Canceled => "Canceled",
        Completed => "Completed",
    }
}

wire_enum! {
    pub enum RequestType: "String(Some(16))" {
        ItSupport => "IT Support",
        HrSupport => "HR Support",
        Facilities => "Facilities",
        Finance => "Finance",
        General => "General",
    }
}

wire_enum! {
    pub enum RequestPriority: "String(Some(8))" {
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
}

wire_enum! {
    pub enum RequestStatus: "String(Some(16))" {
        Pending => "Pending",
        Approved => "Approved",
        Denied => "Denied",
        InReview => "In Review",
        Closed => "Closed",
    }
}

wire_enum! {
    /// Named slot of a shift schedule.
    pub enum ShiftType: "String(Some(16))" {
        Morning => "morning",
        Afternoon => "afternoon",
        Evening => "evening",
        Night => "night",
        Custom => "custom",
    }
}

wire_enum! {
    pub enum ScheduleStatus: "String(Some(16))" {
        Scheduled => "scheduled",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

wire_enum! {
    /// Who a notice is addressed to.
    pub enum NoticeAudience: "String(Some(24))" {
        All => "All",
        DepartmentSpecific => "Department-Specific",
        EmployeeSpecific => "Employee-Specific",
    }
}

impl RequestStatus {
    pub fn is_open(self) -> bool {
        !matches!(self, RequestStatus::Closed | RequestStatus::Denied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_strings_match_business_vocabulary() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::HalfDay).unwrap(),
            "\"Half Day\""
        );
        assert_eq!(
            serde_json::from_str::<HrRole>("\"HR-Admin\"").unwrap(),
            HrRole::Admin
        );
        assert_eq!(RequestType::ItSupport.to_string(), "IT Support");
        assert_eq!(
            "Auto-Generated".parse::<SalaryStatus>().unwrap(),
            SalaryStatus::AutoGenerated
        );
        assert_eq!(ShiftType::Night.as_str(), "night");
        assert_eq!(
            serde_json::from_str::<NoticeAudience>("\"Department-Specific\"").unwrap(),
            NoticeAudience::DepartmentSpecific
        );
    }

    #[test]
    fn unknown_values_are_rejected() {
        let err = "HR-Boss".parse::<HrRole>().unwrap_err();
        assert_eq!(err.kind, "HrRole");
        assert!(serde_json::from_str::<LeaveStatus>("\"Maybe\"").is_err());
    }

    #[test]
    fn portal_token_keys() {
        assert_eq!(Portal::Hr.token_key(), "HRtoken");
        assert_eq!(Portal::Employee.token_key(), "EMtoken");
    }
}
