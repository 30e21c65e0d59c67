//! Daily trigger scheduling.
//!
//! The next fire time is a pure function of "now" and the configured UTC
//! time-of-day, so the loop simply sleeps until then, fires, and re-arms.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use std::future::Future;
use tracing::{debug, info};

/// Fires once per day at a fixed UTC time-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    at: NaiveTime,
}

impl DailySchedule {
    pub fn new(at: NaiveTime) -> Self {
        Self { at }
    }

    pub fn at(&self) -> NaiveTime {
        self.at
    }

    /// First fire time strictly after `now`.
    pub fn next_fire_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive().and_time(self.at).and_utc();
        if today > now {
            today
        } else {
            today + Duration::days(1)
        }
    }

    /// How long to wait from `now` until the next fire.
    pub fn wait_from(&self, now: DateTime<Utc>) -> std::time::Duration {
        (self.next_fire_after(now) - now)
            .to_std()
            .unwrap_or_default()
    }

    /// Sleep until each fire time and run `job`, forever.
    ///
    /// Re-arms from the later of the wall clock and the last fire time, so one
    /// day never fires twice even if the sleep wakes slightly early. A job that
    /// overruns the next fire time skips it.
    pub async fn run<F, Fut>(&self, mut job: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut next = self.next_fire_after(Utc::now());
        loop {
            let wait = (next - Utc::now()).to_std().unwrap_or_default();
            info!(next_run = %next, wait_secs = wait.as_secs(), "Scheduler armed");

            tokio::time::sleep(wait).await;

            debug!(scheduled_for = %next, fired_at = %Utc::now(), "Scheduler fired");
            job().await;

            next = self.next_fire_after(Utc::now().max(next));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn seven_am() -> DailySchedule {
        DailySchedule::new(NaiveTime::from_hms_opt(7, 0, 0).unwrap())
    }

    #[test]
    fn test_fires_later_today() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 5, 30, 0).unwrap();
        assert_eq!(
            seven_am().next_fire_after(now),
            Utc.with_ymd_and_hms(2025, 3, 10, 7, 0, 0).unwrap()
        );
        assert_eq!(seven_am().wait_from(now).as_secs(), 90 * 60);
    }

    #[test]
    fn test_fires_tomorrow_once_passed() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 7, 0, 1).unwrap();
        assert_eq!(
            seven_am().next_fire_after(now),
            Utc.with_ymd_and_hms(2025, 3, 11, 7, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_exact_fire_time_rearms_for_tomorrow() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 7, 0, 0).unwrap();
        assert_eq!(
            seven_am().next_fire_after(now),
            Utc.with_ymd_and_hms(2025, 3, 11, 7, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_month_and_year_rollover() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
        assert_eq!(
            seven_am().next_fire_after(now),
            Utc.with_ymd_and_hms(2025, 1, 1, 7, 0, 0).unwrap()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_invokes_job() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let fired = Arc::new(AtomicU32::new(0));
        let counter = fired.clone();
        let schedule = seven_am();

        let handle = tokio::spawn(async move {
            schedule
                .run(move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }
                })
                .await;
        });

        // Paused clock auto-advances past the (at most one day) wait.
        tokio::time::sleep(std::time::Duration::from_secs(24 * 3600 + 1)).await;
        assert!(fired.load(Ordering::SeqCst) >= 1);
        handle.abort();
    }
}
