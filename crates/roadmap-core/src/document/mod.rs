//! The nested week → day → task document and lookups over it.
//!
//! Lookups are linear scans in document order. When several tasks share an
//! id, the first one in week order, then day order, then task order wins.

mod task_id;

pub use roadmap_db::models::{Comment, Day, Feedback, PENDING_STATUS, Task, Week};
pub use task_id::{TaskIdError, TaskLocation, parse_task_id};

/// Days per week; day numbers above this wrap around.
pub const DAYS_PER_WEEK: i64 = 7;

/// First task anywhere in the document with this id.
pub fn find_task<'a>(weeks: &'a [Week], task_id: &str) -> Option<&'a Task> {
    weeks
        .iter()
        .flat_map(|week| week.days.iter())
        .flat_map(|day| day.tasks.iter())
        .find(|task| task.task_id == task_id)
}

/// Mutable variant of [`find_task`].
pub fn find_task_mut<'a>(weeks: &'a mut [Week], task_id: &str) -> Option<&'a mut Task> {
    weeks
        .iter_mut()
        .flat_map(|week| week.days.iter_mut())
        .flat_map(|day| day.tasks.iter_mut())
        .find(|task| task.task_id == task_id)
}

/// The day at `location`: the first matching day of the first week with the
/// requested number. Later weeks reusing that number are not searched.
pub fn find_day_mut(weeks: &mut [Week], location: TaskLocation) -> Option<&mut Day> {
    weeks
        .iter_mut()
        .find(|week| week.week == location.week)?
        .days
        .iter_mut()
        .find(|day| day.day == location.day)
}

/// Wrap a day number into 1..=7 by repeatedly subtracting seven.
///
/// Values of seven or less are returned unchanged, including zero and
/// negatives.
pub fn normalize_day(day: i64) -> i64 {
    if day > DAYS_PER_WEEK {
        (day - 1) % DAYS_PER_WEEK + 1
    } else {
        day
    }
}
