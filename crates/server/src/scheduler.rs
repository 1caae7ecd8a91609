//! Daily manager report, fired once a day at a configured local hour.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use hotelier_db::{DailyReport, FrontDesk};

use crate::documents::DocumentRenderer;

/// Time from `now` until the next `hour:00`. An hour equal to the current one
/// that has already passed rolls over to tomorrow.
pub fn until_next_run(now: NaiveDateTime, hour: u32) -> Duration {
    let at = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let mut next = now.date().and_time(at);
    if next <= now {
        next += chrono::Duration::days(1);
    }
    (next - now).to_std().unwrap_or(Duration::ZERO)
}

#[derive(Debug)]
pub struct ReportRun {
    pub report: DailyReport,
    pub archived: Option<PathBuf>,
}

/// Generates the report for `as_of`, notifies the manager, and archives a rendered
/// copy under `output_dir`. Archive failures are logged and do not fail the run.
pub async fn run_once(
    desk: &FrontDesk,
    renderer: &DocumentRenderer,
    output_dir: &Path,
    as_of: NaiveDate,
) -> Result<ReportRun, hotelier_core::ApplicationError> {
    let report = desk.daily_report(as_of).await?;

    let archived = match renderer.render_daily_report(&report.stats).await {
        Ok(document) => match document.save(output_dir).await {
            Ok(path) => Some(path),
            Err(error) => {
                warn!(event_name = "report.archive_failed", error = %error, "report not archived");
                None
            }
        },
        Err(error) => {
            warn!(event_name = "report.render_failed", error = %error, "report not rendered");
            None
        }
    };

    Ok(ReportRun { report, archived })
}

pub fn spawn(
    desk: Arc<FrontDesk>,
    renderer: Arc<DocumentRenderer>,
    output_dir: PathBuf,
    hour: u32,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let wait = until_next_run(Local::now().naive_local(), hour);
            info!(
                event_name = "report.scheduled",
                wait_secs = wait.as_secs(),
                hour,
                "next daily report scheduled"
            );
            tokio::time::sleep(wait).await;

            let as_of = desk.today();
            match run_once(&desk, &renderer, &output_dir, as_of).await {
                Ok(run) => info!(
                    event_name = "report.daily_completed",
                    as_of = %as_of,
                    archived = ?run.archived,
                    delivery = ?run.report.delivery,
                    "daily report completed"
                ),
                Err(error) => error!(
                    event_name = "report.daily_failed",
                    as_of = %as_of,
                    error = %error,
                    "daily report failed"
                ),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::NaiveDate;

    use hotelier_core::clock::FixedClock;
    use hotelier_core::notify::{ImmediateSink, MemoryNotifier, NotificationEvent};
    use hotelier_db::{
        connect_with_settings, migrations, FrontDesk, RoomInventory, SqlHotelRepository,
    };

    use super::{run_once, until_next_run};
    use crate::documents::DocumentRenderer;

    fn at(raw: &str) -> chrono::NaiveDateTime {
        chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").expect("datetime")
    }

    #[test]
    fn next_run_is_later_today_before_the_hour() {
        assert_eq!(until_next_run(at("2025-01-10 09:30:00"), 12), Duration::from_secs(9_000));
    }

    #[test]
    fn next_run_rolls_to_tomorrow_at_or_after_the_hour() {
        assert_eq!(until_next_run(at("2025-01-10 12:00:00"), 12), Duration::from_secs(86_400));
        assert_eq!(until_next_run(at("2025-01-10 23:00:00"), 12), Duration::from_secs(46_800));
    }

    #[tokio::test]
    async fn run_once_notifies_and_archives() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        RoomInventory::load(&pool).await.expect("seed");

        let notifier = Arc::new(MemoryNotifier::new());
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).expect("date");
        let desk = FrontDesk::new(
            Arc::new(SqlHotelRepository::new(pool)),
            Arc::new(FixedClock(today)),
            Arc::new(ImmediateSink::new(notifier.clone())),
        );
        let renderer = DocumentRenderer::embedded("Grand Hotel", "Rs.").expect("templates");
        let dir = tempfile::tempdir().expect("tempdir");

        let run = run_once(&desk, &renderer.html_only(), dir.path(), today).await.expect("report");

        assert_eq!(run.report.stats.total_rooms, 10);
        assert_eq!(run.report.stats.occupied_rooms, 0);
        let archived = run.archived.expect("archived copy");
        assert!(archived.ends_with("daily_report_2025-01-10.html"));
        assert!(matches!(
            notifier.events().as_slice(),
            [NotificationEvent::DailyReport { .. }]
        ));
    }
}
