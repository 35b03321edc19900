//! Weekly operating-hours schedule.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use tablebook_core::types::TimeWindow;

/// One service period on a weekday. A day may have several periods
/// (lunch and dinner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    /// Day of week.
    pub weekday: Weekday,
    /// Opening time.
    pub open: NaiveTime,
    /// Closing time.
    pub close: NaiveTime,
}

/// A restaurant's weekly schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatingHours(pub Vec<DayHours>);

impl OperatingHours {
    /// Whether no schedule has been published.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Service periods for the weekday of `date`.
    pub fn periods_on(&self, date: NaiveDate) -> impl Iterator<Item = &DayHours> {
        let weekday = date.weekday();
        self.0.iter().filter(move |d| d.weekday == weekday)
    }

    /// Whether `window` on `date` lies inside a single service period.
    /// An empty schedule imposes no restriction.
    pub fn contains(&self, date: NaiveDate, window: &TimeWindow) -> bool {
        if self.is_empty() {
            return true;
        }
        self.periods_on(date).any(|period| {
            window.within(&TimeWindow {
                start: period.open,
                end: period.close,
            })
        })
    }
}
