//! Pagination, ordering and filtering rules shared by the listing operations.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};

use super::domain::Job;
use super::error::PortalError;

pub const DEFAULT_PAGE: usize = 0;
pub const DEFAULT_LIMIT: usize = 5;
/// Window used by the `recent` filter, inclusive of its lower bound.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Skip `page * limit` candidates, then take at most `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub const fn new(page: usize, limit: usize) -> Self {
        Self { page, limit }
    }

    pub const fn offset(&self) -> usize {
        self.page.saturating_mul(self.limit)
    }

    pub fn apply<T>(&self, candidates: impl IntoIterator<Item = T>) -> Vec<T> {
        candidates
            .into_iter()
            .skip(self.offset())
            .take(self.limit)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Ctc,
    Date,
    Name,
}

impl SortField {
    fn compare(self, left: &Job, right: &Job) -> Ordering {
        match self {
            SortField::Ctc => left.ctc.cmp(&right.ctc),
            SortField::Date => left.date_added.cmp(&right.date_added),
            SortField::Name => left.name.cmp(&right.name),
        }
    }
}

impl FromStr for SortField {
    type Err = PortalError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "ctc" => Ok(Self::Ctc),
            "date" => Ok(Self::Date),
            "name" => Ok(Self::Name),
            other => Err(PortalError::validation(format!(
                "orderBy must be one of ctc, date, name (got '{other}')"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Seeker-facing listings and all domain listings: `"asc"` ascends, anything else descends.
    pub fn seeker_facing(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => Self::Ascending,
            _ => Self::Descending,
        }
    }

    /// Organisation job listings: `"dsc"` descends, anything else (absent included) ascends.
    pub fn organisation_facing(raw: Option<&str>) -> Self {
        match raw {
            Some("dsc") => Self::Descending,
            _ => Self::Ascending,
        }
    }

    fn orient(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Field and direction to order jobs by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl JobOrder {
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Stable: jobs comparing equal keep their natural (insertion) order.
    pub fn sort(&self, jobs: &mut [Job]) {
        jobs.sort_by(|left, right| self.direction.orient(self.field.compare(left, right)));
    }
}

impl Default for JobOrder {
    fn default() -> Self {
        Self::new(SortField::Date, SortDirection::Descending)
    }
}

/// Narrowing applied by the `certain` listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobFilter {
    /// Added within the last seven days.
    Recent,
    /// Remaining vacancy equals the value exactly.
    Vacancy(u32),
    /// Compensation equals the value exactly.
    Ctc(u64),
}

impl JobFilter {
    pub fn parse(filter_by: &str, value: Option<u64>) -> Result<Self, PortalError> {
        match filter_by.trim() {
            "recent" => Ok(Self::Recent),
            "vacancy" => {
                let value = value.ok_or_else(|| {
                    PortalError::validation("filter is required when filtering by vacancy")
                })?;
                let vacancy = u32::try_from(value)
                    .map_err(|_| PortalError::validation("filter is out of range for vacancy"))?;
                Ok(Self::Vacancy(vacancy))
            }
            "ctc" => value.map(Self::Ctc).ok_or_else(|| {
                PortalError::validation("filter is required when filtering by ctc")
            }),
            other => Err(PortalError::validation(format!(
                "filterBy must be one of recent, vacancy, ctc (got '{other}')"
            ))),
        }
    }

    fn matches(self, job: &Job, now: DateTime<Utc>) -> bool {
        match self {
            JobFilter::Recent => job.date_added >= now - Duration::days(RECENT_WINDOW_DAYS),
            JobFilter::Vacancy(vacancy) => job.vacancy == vacancy,
            JobFilter::Ctc(ctc) => job.ctc == ctc,
        }
    }

    /// Seekers only see open jobs, except when asking for an exact vacancy count.
    pub fn matches_for_seekers(self, job: &Job, now: DateTime<Utc>) -> bool {
        match self {
            JobFilter::Vacancy(_) => self.matches(job, now),
            JobFilter::Recent | JobFilter::Ctc(_) => job.is_open() && self.matches(job, now),
        }
    }

    /// Organisations see their own jobs whether or not seats remain.
    pub fn matches_for_organisation(self, job: &Job, now: DateTime<Utc>) -> bool {
        self.matches(job, now)
    }
}
