use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone};

use super::reminder::Reminder;

/// Width of the "just became due" window checked by the periodic ticker.
const DUE_WINDOW_SECS: i64 = 60;

/// The single overdue predicate shared by the OVERDUE filter, `stats` and
/// display highlighting.
pub fn is_overdue(reminder: &Reminder, now: DateTime<Local>) -> bool {
    !reminder.completed && reminder.due_date < now
}

/// True while `now` sits inside `[due, due + 60s)` for an incomplete
/// reminder. Hook point for a future one-shot notification.
pub fn in_due_window(reminder: &Reminder, now: DateTime<Local>) -> bool {
    if reminder.completed {
        return false;
    }
    let due = reminder.due_date;
    due <= now && now < due + Duration::seconds(DUE_WINDOW_SECS)
}

/// Due date used when the parser returns none: the next 9:00 AM local
/// (today if 9:00 is still ahead, otherwise tomorrow).
pub fn default_due_date(now: DateTime<Local>) -> DateTime<Local> {
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
    let mut date = now.date_naive();
    if now.time() >= nine {
        date = date.succ_opt().unwrap_or(date);
    }
    Local
        .from_local_datetime(&date.and_time(nine))
        .single()
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder_due_at(due: DateTime<Local>, completed: bool) -> Reminder {
        let mut r = Reminder::new("test".to_string(), None, due);
        r.completed = completed;
        r
    }

    #[test]
    fn test_past_incomplete_is_overdue() {
        let now = Local.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        let r = reminder_due_at(now - Duration::hours(1), false);
        assert!(is_overdue(&r, now));
    }

    #[test]
    fn test_completed_is_never_overdue() {
        let now = Local.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        let r = reminder_due_at(now - Duration::days(3), true);
        assert!(!is_overdue(&r, now));
    }

    #[test]
    fn test_future_is_not_overdue() {
        let now = Local.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        let r = reminder_due_at(now + Duration::minutes(1), false);
        assert!(!is_overdue(&r, now));
    }

    #[test]
    fn test_due_window_boundaries() {
        let due = Local.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        let r = reminder_due_at(due, false);

        assert!(!in_due_window(&r, due - Duration::seconds(1)));
        assert!(in_due_window(&r, due));
        assert!(in_due_window(&r, due + Duration::seconds(59)));
        assert!(!in_due_window(&r, due + Duration::seconds(60)));
    }

    #[test]
    fn test_due_window_ignores_completed() {
        let due = Local.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        let r = reminder_due_at(due, true);
        assert!(!in_due_window(&r, due + Duration::seconds(10)));
    }

    #[test]
    fn test_default_due_date_before_nine_is_today() {
        let now = Local.with_ymd_and_hms(2026, 6, 1, 7, 30, 0).unwrap();
        let due = default_due_date(now);
        assert_eq!(due, Local.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_default_due_date_after_nine_is_tomorrow() {
        let now = Local.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap();
        let due = default_due_date(now);
        assert_eq!(due, Local.with_ymd_and_hms(2026, 6, 2, 9, 0, 0).unwrap());
    }
}
