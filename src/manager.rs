// 📋 Job Manager - the ledger of job entries
//
// Invariant: for every (name, date) pair, the hours of all entries
// sharing that pair never exceed the daily limit (8 by default).
// Every mutation checks it first and leaves the ledger untouched on failure.
//
// Lookups for remove/edit are by value: the FIRST entry equal to the
// given Job wins, so with duplicate entries only one is affected.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use log::{debug, info, warn};
use serde_json::Value;

use crate::error::{JobError, Result};
use crate::job::Job;
use crate::storage;

/// Default maximum hours per worker per date, across all jobs.
pub const DEFAULT_DAILY_HOUR_LIMIT: u32 = 8;

// ============================================================================
// JOB MANAGER
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct JobManager {
    jobs: Vec<Job>,
    daily_limit: u32,
}

impl JobManager {
    /// Create an empty ledger with the default daily limit.
    pub fn new() -> Self {
        Self::with_daily_limit(DEFAULT_DAILY_HOUR_LIMIT)
    }

    /// Create an empty ledger with a custom daily limit.
    pub fn with_daily_limit(daily_limit: u32) -> Self {
        JobManager {
            jobs: Vec::new(),
            daily_limit,
        }
    }

    /// Build a ledger from existing jobs, inserting them one at a time in
    /// order. Fails exactly like [`Self::add_job`] would on the first job
    /// that breaks the daily limit.
    pub fn from_jobs(jobs: impl IntoIterator<Item = Job>) -> Result<Self> {
        Self::from_jobs_with_limit(jobs, DEFAULT_DAILY_HOUR_LIMIT)
    }

    /// Same as [`Self::from_jobs`] under a custom daily limit.
    pub fn from_jobs_with_limit(
        jobs: impl IntoIterator<Item = Job>,
        daily_limit: u32,
    ) -> Result<Self> {
        let mut manager = Self::with_daily_limit(daily_limit);
        for job in jobs {
            manager.add_job(job)?;
        }
        Ok(manager)
    }

    /// Build a ledger from an untyped JSON array of job objects.
    ///
    /// Every element is validated before any is inserted.
    pub fn from_values(value: &Value) -> Result<Self> {
        let items = value.as_array().ok_or(JobError::NotA {
            what: "jobs",
            expected: "an array of job objects",
        })?;

        let jobs = items
            .iter()
            .map(Job::from_value)
            .collect::<Result<Vec<_>>>()?;

        Self::from_jobs(jobs)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Current entries in insertion order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Hours already booked for `name` on `date`.
    pub fn total_hours_for(&self, name: &str, date: &str) -> u32 {
        self.jobs
            .iter()
            .filter(|j| j.name() == name && j.date() == date)
            .map(Job::hours)
            .sum()
    }

    /// Whether `hours` more can be booked for `name` on `date`.
    pub fn is_worker_available(&self, name: &str, date: &str, hours: u32) -> bool {
        self.total_hours_for(name, date)
            .checked_add(hours)
            .is_some_and(|total| total <= self.daily_limit)
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Append `job` if the worker still has room on that date.
    pub fn add_job(&mut self, job: Job) -> Result<()> {
        let booked = self.total_hours_for(job.name(), job.date());
        self.check_capacity(&job, booked)?;

        debug!("added {}", job);
        self.jobs.push(job);
        Ok(())
    }

    /// Remove the first entry equal to `job` and return it.
    pub fn remove_job(&mut self, job: &Job) -> Result<Job> {
        let index = self.position_of(job)?;
        let removed = self.jobs.remove(index);

        debug!("removed {}", removed);
        Ok(removed)
    }

    /// Replace the first entry equal to `old_job` with `new_job`, keeping its
    /// position. The replaced entry does not count against the new job's
    /// daily total.
    pub fn edit_job(&mut self, old_job: &Job, new_job: Job) -> Result<()> {
        let index = self.position_of(old_job)?;

        let booked: u32 = self
            .jobs
            .iter()
            .enumerate()
            .filter(|(i, j)| {
                *i != index && j.name() == new_job.name() && j.date() == new_job.date()
            })
            .map(|(_, j)| j.hours())
            .sum();
        self.check_capacity(&new_job, booked)?;

        debug!("edited {} -> {}", self.jobs[index], new_job);
        self.jobs[index] = new_job;
        Ok(())
    }

    fn position_of(&self, job: &Job) -> Result<usize> {
        self.jobs
            .iter()
            .position(|j| j == job)
            .ok_or_else(|| JobError::NotFound(job.to_string()))
    }

    fn check_capacity(&self, job: &Job, booked: u32) -> Result<()> {
        if booked.saturating_add(job.hours()) > self.daily_limit {
            warn!(
                "rejected {}: {} hours already booked for {} on {}",
                job,
                booked,
                job.name(),
                job.date()
            );
            return Err(JobError::CapacityExceeded {
                name: job.name().to_string(),
                date: job.date().to_string(),
                booked,
                requested: job.hours(),
                limit: self.daily_limit,
            });
        }
        Ok(())
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Entries whose category matches exactly (case-sensitive).
    pub fn search_by_category(&self, category: &str) -> Vec<&Job> {
        self.jobs.iter().filter(|j| j.category() == category).collect()
    }

    /// Entries whose rate is exactly `rate`.
    pub fn search_by_rate(&self, rate: f64) -> Vec<&Job> {
        self.jobs.iter().filter(|j| j.rate() == rate).collect()
    }

    pub fn search_by_name_and_date(&self, name: &str, date: &str) -> Vec<&Job> {
        self.jobs
            .iter()
            .filter(|j| j.name() == name && j.date() == date)
            .collect()
    }

    // ========================================================================
    // AGGREGATES
    // ========================================================================

    /// Sum of rate × hours for each requested name. Names with no entries
    /// map to `0.0`; repeated names appear once.
    pub fn total_cost_per_name<S: AsRef<str>>(&self, names: &[S]) -> BTreeMap<String, f64> {
        let mut totals: BTreeMap<String, f64> = names
            .iter()
            .map(|n| (n.as_ref().to_string(), 0.0))
            .collect();

        for job in &self.jobs {
            if let Some(total) = totals.get_mut(job.name()) {
                *total += job.cost();
            }
        }

        totals
    }

    /// For every name present, how many entries fall in each category.
    pub fn category_count_per_name(&self) -> BTreeMap<String, BTreeMap<String, usize>> {
        let mut counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();

        for job in &self.jobs {
            *counts
                .entry(job.name().to_string())
                .or_default()
                .entry(job.category().to_string())
                .or_default() += 1;
        }

        counts
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Write every entry, in order, to a CSV file at `path`.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        storage::write_jobs(path, &self.jobs)?;

        info!("saved {} jobs to {}", self.jobs.len(), path.display());
        Ok(())
    }

    /// Replace the ledger with the contents of the CSV file at `path`.
    ///
    /// Rows are re-checked against the daily limit in file order. On any
    /// failure the current entries are left as they were.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let jobs = storage::read_jobs(path)?;

        let loaded = Self::from_jobs_with_limit(jobs, self.daily_limit)?;

        info!("loaded {} jobs from {}", loaded.len(), path.display());
        self.jobs = loaded.jobs;
        Ok(())
    }
}

impl Default for JobManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JobManager({} jobs)", self.jobs.len())
    }
}

// ============================================================================
// TESTS
// ============================================================================
