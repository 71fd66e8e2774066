use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use ems_types::{AttendanceStatus, attendance::ClockStatus};
use entity::attendance;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    payroll::round2,
    views,
};

/// Hours between two clock times; a check-out before the check-in is an
/// overnight shift.
pub fn work_hours(check_in: NaiveTime, check_out: NaiveTime) -> f64 {
    let mut minutes = (check_out - check_in).num_minutes() as f64;
    if minutes < 0.0 {
        minutes += 24.0 * 60.0;
    }
    round2(minutes / 60.0)
}

pub fn hours_for(check_in: Option<NaiveTime>, check_out: Option<NaiveTime>) -> f64 {
    match (check_in, check_out) {
        (Some(start), Some(end)) => work_hours(start, end),
        _ => 0.0,
    }
}

/// Clock reading truncated to the minute.
pub fn clock_time(now: DateTime<Utc>) -> NaiveTime {
    NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(NaiveTime::MIN)
}

pub async fn record_for_day<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
    day: NaiveDate,
) -> ApiResult<Option<attendance::Model>> {
    Ok(attendance::Entity::find()
        .filter(attendance::Column::EmployeeId.eq(employee_id))
        .filter(attendance::Column::Date.eq(day))
        .one(db)
        .await?)
}

pub async fn clock_in<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    employee_id: Uuid,
    now: DateTime<Utc>,
) -> ApiResult<attendance::Model> {
    let today = now.date_naive();
    let time = clock_time(now);
    match record_for_day(db, employee_id, today).await? {
        Some(existing) if existing.check_in.is_some() => {
            Err(ApiError::bad_request("Already clocked in for today"))
        }
        Some(existing) if existing.status == AttendanceStatus::Leave => {
            Err(ApiError::bad_request("Today is marked as approved leave"))
        }
        Some(existing) => {
            let mut active: attendance::ActiveModel = existing.into();
            active.check_in = Set(Some(time));
            active.status = Set(AttendanceStatus::Present);
            active.updated_at = Set(now.into());
            Ok(active.update(db).await?)
        }
        None => Ok(attendance::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            employee_id: Set(employee_id),
            date: Set(today),
            status: Set(AttendanceStatus::Present),
            check_in: Set(Some(time)),
            check_out: Set(None),
            work_hours: Set(0.0),
            comments: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(db)
        .await?),
    }
}

pub async fn clock_out<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
    now: DateTime<Utc>,
) -> ApiResult<attendance::Model> {
    let today = now.date_naive();
    let record = record_for_day(db, employee_id, today)
        .await?
        .filter(|record| record.check_in.is_some())
        .ok_or_else(|| ApiError::bad_request("Not clocked in yet"))?;
    if record.check_out.is_some() {
        return Err(ApiError::bad_request("Already clocked out"));
    }
    let time = clock_time(now);
    let hours = hours_for(record.check_in, Some(time));
    let mut active: attendance::ActiveModel = record.into();
    active.check_out = Set(Some(time));
    active.work_hours = Set(hours);
    active.updated_at = Set(now.into());
    Ok(active.update(db).await?)
}

pub async fn clock_status<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
    today: NaiveDate,
) -> ApiResult<ClockStatus> {
    let record = record_for_day(db, employee_id, today).await?;
    Ok(ClockStatus {
        is_clocked_in: record.as_ref().is_some_and(|r| r.check_in.is_some()),
        has_clocked_out: record.as_ref().is_some_and(|r| r.check_out.is_some()),
        today: record.map(|r| views::attendance(r, None)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn same_day_shift() {
        assert_eq!(work_hours(at(9, 0), at(17, 30)), 8.5);
        assert_eq!(work_hours(at(9, 10), at(9, 30)), 0.33);
    }

    #[test]
    fn overnight_shift_wraps() {
        assert_eq!(work_hours(at(22, 0), at(6, 0)), 8.0);
    }

    #[test]
    fn missing_punch_counts_nothing() {
        assert_eq!(hours_for(Some(at(9, 0)), None), 0.0);
        assert_eq!(hours_for(None, None), 0.0);
    }

    #[test]
    fn clock_time_drops_seconds() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 8, 59, 47).unwrap();
        assert_eq!(clock_time(now), at(8, 59));
    }
}
