use chrono::{Local, NaiveDate};

/// Source of "today" for past-date checks and reports.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The server's local calendar date.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
