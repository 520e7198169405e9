use std::collections::HashMap;

use crate::database::models::{
    DaySchedule, ShiftDetail, ShiftType, WeekNavigation, WeekRef, WeekSchedule,
};
use crate::database::repositories::ScheduleRepository;
use crate::error::AppError;

/// Builds the weekly schedule view: one week's days with their shifts,
/// per-day absence counts, and wrap-aware navigation state.
#[derive(Clone)]
pub struct ScheduleService {
    schedule_repository: ScheduleRepository,
}

impl ScheduleService {
    pub fn new(schedule_repository: ScheduleRepository) -> Self {
        Self {
            schedule_repository,
        }
    }

    /// Sanity check before any lookup; a malformed pair is a client
    /// error, not a missing week.
    pub fn validate_week_ref(year: i32, week_number: i32) -> Result<WeekRef, AppError> {
        if year < 1 {
            return Err(AppError::bad_request("Invalid year parameter"));
        }
        if week_number < 1 || week_number > 53 {
            return Err(AppError::bad_request("Invalid week parameter"));
        }
        Ok(WeekRef::new(year, week_number))
    }

    pub async fn get_week(&self, week_ref: WeekRef) -> Result<Option<WeekSchedule>, AppError> {
        let Some(week) = self
            .schedule_repository
            .find_week(week_ref.year, week_ref.week_number)
            .await?
        else {
            return Ok(None);
        };

        let days = self.schedule_repository.days_for_week(week.id).await?;
        let shifts = self.schedule_repository.shifts_for_week(week.id).await?;

        let mut by_day: HashMap<i64, Vec<ShiftDetail>> = HashMap::new();
        for shift in shifts {
            by_day.entry(shift.day_id).or_default().push(shift);
        }

        let days = days
            .into_iter()
            .map(|day| {
                let shifts = by_day.remove(&day.id).unwrap_or_default();
                DaySchedule {
                    id: day.id,
                    name: day.name,
                    date: day.date,
                    absences: count_absences(&shifts),
                    shifts,
                }
            })
            .collect();

        let navigation = self.navigation_for(week_ref).await?;

        Ok(Some(WeekSchedule {
            id: week.id,
            week_number: week.week_number,
            year: week.year,
            days,
            navigation,
        }))
    }

    pub async fn week_exists(&self, week_ref: WeekRef) -> Result<bool, AppError> {
        Ok(self
            .schedule_repository
            .week_exists(week_ref.year, week_ref.week_number)
            .await?)
    }

    /// The legacy route addresses a week by number alone; it resolves to
    /// the most recent year that has such a week.
    pub async fn resolve_year_for_week(&self, week_number: i32) -> Result<Option<i32>, AppError> {
        Ok(self
            .schedule_repository
            .latest_year_for_week(week_number)
            .await?)
    }

    async fn navigation_for(&self, week_ref: WeekRef) -> Result<WeekNavigation, AppError> {
        let previous = week_ref.previous();
        let next = week_ref.next();

        Ok(WeekNavigation {
            has_previous: self.week_exists(previous).await?,
            has_next: self.week_exists(next).await?,
            previous,
            next,
        })
    }
}

pub fn count_absences(shifts: &[ShiftDetail]) -> usize {
    shifts.iter().filter(|s| s.shift_type.is_absence()).count()
}

/// Stable ascending order by start time; shifts without a start time
/// (absence types) sort first.
pub fn sort_by_start_time(shifts: &mut [ShiftDetail]) {
    shifts.sort_by_key(|s| s.start_time);
}

/// Shifts matching the view's type predicate, in stable start-time order.
pub fn filter_shifts_by_type<F>(shifts: &[ShiftDetail], predicate: F) -> Vec<ShiftDetail>
where
    F: Fn(ShiftType) -> bool,
{
    let mut filtered: Vec<ShiftDetail> = shifts
        .iter()
        .filter(|s| predicate(s.shift_type))
        .cloned()
        .collect();
    sort_by_start_time(&mut filtered);
    filtered
}
