//! Work session service
//!
//! Logged hours of work, priced from an hourly rate. When no rate is given
//! the most recently registered hourly rate is used.

use chrono::{NaiveDate, NaiveTime, Utc};

use crate::error::{GastosError, GastosResult};
use crate::models::{Money, WorkSession, WorkSessionId};
use crate::storage::Storage;

use super::pagination::{paginate, Page};

/// Service for work session management
pub struct WorkSessionService<'a> {
    storage: &'a Storage,
}

/// Input for logging a work session
#[derive(Debug, Clone)]
pub struct WorkSessionInput {
    pub date: NaiveDate,
    pub description: String,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    /// Falls back to the latest registered hourly rate
    pub rate_hour: Option<Money>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkSessionUpdate {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub time_start: Option<NaiveTime>,
    pub time_end: Option<NaiveTime>,
    pub rate_hour: Option<Money>,
}

/// Time and money summed over a set of sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkTotals {
    pub minutes: i64,
    pub amount: Money,
}

impl WorkTotals {
    pub fn of(sessions: &[WorkSession]) -> Self {
        sessions.iter().fold(Self::default(), |acc, s| Self {
            minutes: acc.minutes + s.time_total_minutes,
            amount: acc.amount + s.rate_total,
        })
    }

    pub fn duration_label(&self) -> String {
        format!("{}h{:02}", self.minutes / 60, self.minutes % 60)
    }
}

impl<'a> WorkSessionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Log a new work session
    pub fn create(&self, input: WorkSessionInput) -> GastosResult<WorkSession> {
        let rate_hour = match input.rate_hour {
            Some(rate) => rate,
            None => self.current_rate()?,
        };

        let session = WorkSession::new(
            input.date,
            input.description.trim(),
            input.time_start,
            input.time_end,
            rate_hour,
        );
        session
            .validate()
            .map_err(|e| GastosError::Validation(e.to_string()))?;

        self.storage.work_sessions.upsert(session.clone())?;
        self.storage.work_sessions.save()?;
        self.storage.log_create(&session)?;

        log::info!(
            "logged {} of work on {} ({})",
            session.duration_label(),
            session.date,
            session.rate_total
        );
        Ok(session)
    }

    /// The most recently registered hourly rate
    fn current_rate(&self) -> GastosResult<Money> {
        self.storage
            .hourly_rates
            .get_all()?
            .last()
            .map(|r| r.price)
            .ok_or_else(|| {
                GastosError::InvalidInput(
                    "No hourly rate given and none registered; add one with `gastos rate add`"
                        .into(),
                )
            })
    }

    pub fn get(&self, id: WorkSessionId) -> GastosResult<Option<WorkSession>> {
        self.storage.work_sessions.get(id)
    }

    pub fn find(&self, identifier: &str) -> GastosResult<Option<WorkSession>> {
        self.storage.work_sessions.find_unique(|s| s.id.matches(identifier))
    }

    /// List sessions whose description contains `search` (case-insensitive)
    pub fn list(
        &self,
        search: Option<&str>,
        page: usize,
        per_page: usize,
    ) -> GastosResult<Page<WorkSession>> {
        let term = search.unwrap_or_default().trim().to_lowercase();
        let sessions = self
            .storage
            .work_sessions
            .filter(|s| s.description.to_lowercase().contains(&term))?;
        paginate(sessions, page, per_page)
    }

    /// Sessions dated within `from..=to`
    pub fn in_range(&self, from: NaiveDate, to: NaiveDate) -> GastosResult<Vec<WorkSession>> {
        self.storage
            .work_sessions
            .filter(|s| s.date >= from && s.date <= to)
    }

    /// Edit a session; totals are recomputed
    pub fn update(&self, id: WorkSessionId, changes: WorkSessionUpdate) -> GastosResult<WorkSession> {
        let mut session = self
            .storage
            .work_sessions
            .get(id)?
            .ok_or_else(|| GastosError::NotFound {
                entity_type: "Work session",
                identifier: id.to_string(),
            })?;
        let before = session.clone();

        if let Some(date) = changes.date {
            session.date = date;
        }
        if let Some(description) = changes.description {
            session.description = description.trim().to_string();
        }
        if let Some(start) = changes.time_start {
            session.time_start = start;
        }
        if let Some(end) = changes.time_end {
            session.time_end = end;
        }
        if let Some(rate) = changes.rate_hour {
            session.rate_hour = rate;
        }

        session.recompute();
        session.updated_at = Utc::now();
        session
            .validate()
            .map_err(|e| GastosError::Validation(e.to_string()))?;

        self.storage.work_sessions.upsert(session.clone())?;
        self.storage.work_sessions.save()?;
        self.storage.log_update(&before, &session)?;

        Ok(session)
    }

    pub fn delete(&self, id: WorkSessionId) -> GastosResult<WorkSession> {
        let session = self
            .storage
            .work_sessions
            .remove(id)?
            .ok_or_else(|| GastosError::NotFound {
                entity_type: "Work session",
                identifier: id.to_string(),
            })?;

        self.storage.work_sessions.save()?;
        self.storage.log_delete(&session)?;

        Ok(session)
    }
}
