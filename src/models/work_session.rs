//! Work session (time tracking) model
//!
//! A session records the hours worked on a day and what they are worth at
//! the hourly rate in force.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::WorkSessionId;
use super::money::Money;

/// A tracked block of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSession {
    pub id: WorkSessionId,

    /// Day the work happened
    pub date: NaiveDate,

    #[serde(default)]
    pub description: String,

    pub time_start: NaiveTime,
    pub time_end: NaiveTime,

    /// Computed from start and end
    pub time_total_minutes: i64,

    pub rate_hour: Money,

    /// Computed: rate_hour prorated over time_total_minutes
    pub rate_total: Money,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkSession {
    /// Create a session, computing its totals
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        time_start: NaiveTime,
        time_end: NaiveTime,
        rate_hour: Money,
    ) -> Self {
        let now = Utc::now();
        let mut session = Self {
            id: WorkSessionId::new(),
            date,
            description: description.into(),
            time_start,
            time_end,
            time_total_minutes: 0,
            rate_hour,
            rate_total: Money::zero(),
            created_at: now,
            updated_at: now,
        };
        session.recompute();
        session
    }

    /// Refresh the derived totals after start, end or rate changed
    pub fn recompute(&mut self) {
        self.time_total_minutes = (self.time_end - self.time_start).num_minutes();
        self.rate_total = self.rate_hour.mul_ratio(self.time_total_minutes, 60);
    }

    /// "3h25" style rendering of the total time
    pub fn duration_label(&self) -> String {
        format!(
            "{}h{:02}",
            self.time_total_minutes / 60,
            self.time_total_minutes % 60
        )
    }

    pub fn validate(&self) -> Result<(), WorkSessionValidationError> {
        if self.time_end < self.time_start {
            return Err(WorkSessionValidationError::EndBeforeStart);
        }

        if self.rate_hour.is_negative() {
            return Err(WorkSessionValidationError::NegativeRate);
        }

        if self
            .rate_hour
            .checked_mul_ratio(self.time_total_minutes, 60)
            .is_none()
        {
            return Err(WorkSessionValidationError::TotalOverflow);
        }

        Ok(())
    }
}

impl fmt::Display for WorkSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.duration_label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkSessionValidationError {
    EndBeforeStart,
    NegativeRate,
    TotalOverflow,
}

impl fmt::Display for WorkSessionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndBeforeStart => write!(f, "End time cannot be before start time"),
            Self::NegativeRate => write!(f, "Hourly rate cannot be negative"),
            Self::TotalOverflow => write!(f, "Hourly rate is too large for this session"),
        }
    }
}

impl std::error::Error for WorkSessionValidationError {}
