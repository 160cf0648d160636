//! History view: recently assessed jobs from the extraction API.
//!
//! Skill rows are fetched once per `(days_back, limit)` and kept in a
//! [`SkillsCache`] owned by the view. Nothing refreshes the cache behind
//! the caller's back; regenerate and explicit refresh invalidate it.

use std::collections::HashMap;
use std::sync::Arc;

use copilot_types::{JobData, JobId, JobPayload, Qualification, SkillKind, SkillRow};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use super::detail::JobDetail;
use super::summary::JobSummary;
use crate::api::{ApiClient, ApiError};
use crate::error::ViewError;

pub const DEFAULT_DAYS_BACK: u32 = 5;
pub const JOBS_LIMIT: u32 = 200;
pub const SKILLS_LIMIT: u32 = 300;

/// Parse a user-entered look-back window. Like an integer form field, only
/// the leading digits count (`"3abc"` is 3, `"5.5"` is 5). Missing input or
/// input with no leading digits means the default; anything below one day
/// means one day.
pub fn clamp_days_back(input: Option<&str>) -> u32 {
    input
        .and_then(leading_integer)
        .map(|n| n.clamp(1, i64::from(u32::MAX)) as u32)
        .unwrap_or(DEFAULT_DAYS_BACK)
}

fn leading_integer(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }
    // Overlong digit runs saturate instead of failing.
    let n = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -n } else { n })
}

pub type SkillsByJob = HashMap<JobId, Vec<SkillRow>>;

pub fn group_skills(rows: Vec<SkillRow>) -> SkillsByJob {
    let mut map = SkillsByJob::new();
    for row in rows {
        map.entry(row.job_id.clone()).or_default().push(row);
    }
    map
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sections {
    pub required: Vec<Qualification>,
    pub additional: Vec<Qualification>,
    pub evaluated: Vec<Qualification>,
}

/// Split a job's skill rows into the three qualification lists.
/// Rows of an unknown kind are dropped.
pub fn map_skills_to_sections(skills: &[SkillRow]) -> Sections {
    let mut sections = Sections::default();
    for row in skills {
        let target = match row.job_skills_type {
            SkillKind::RequiredQualification => &mut sections.required,
            SkillKind::AdditionalQualification => &mut sections.additional,
            SkillKind::EvaluatedQualification => &mut sections.evaluated,
            SkillKind::Other => continue,
        };
        target.push(row.to_qualification());
    }
    sections
}

/// `job` with its qualification lists replaced by the ones from `skills`.
pub fn with_sections(job: &JobData, skills: &[SkillRow]) -> JobData {
    let sections = map_skills_to_sections(skills);
    JobData {
        required_qualifications: sections.required,
        additional_qualifications: sections.additional,
        evaluated_qualifications: sections.evaluated,
        ..job.clone()
    }
}

/// Per-view cache of grouped skill rows keyed by `(days_back, limit)`.
#[derive(Debug, Default)]
pub struct SkillsCache {
    entries: RwLock<HashMap<(u32, u32), Arc<SkillsByJob>>>,
}

impl SkillsCache {
    pub async fn get(&self, days_back: u32, limit: u32) -> Option<Arc<SkillsByJob>> {
        self.entries.read().await.get(&(days_back, limit)).cloned()
    }

    pub async fn insert(&self, days_back: u32, limit: u32, skills: SkillsByJob) -> Arc<SkillsByJob> {
        let skills = Arc::new(skills);
        self.entries
            .write()
            .await
            .insert((days_back, limit), Arc::clone(&skills));
        skills
    }

    pub async fn invalidate(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryRow {
    pub summary: JobSummary,
    pub detail: JobDetail,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryPage {
    pub days_back: u32,
    pub hide_applied: bool,
    pub rows: Vec<HistoryRow>,
}

pub struct HistoryView {
    api: ApiClient,
    cache: SkillsCache,
}

impl HistoryView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cache: SkillsCache::default(),
        }
    }

    pub fn cache(&self) -> &SkillsCache {
        &self.cache
    }

    /// Fetch jobs and skills concurrently and build the page.
    pub async fn load(&self, days_back: u32, hide_applied: bool) -> Result<HistoryPage, ViewError> {
        let days_back = days_back.max(1);
        let (jobs, skills) = tokio::join!(self.api.jobs_recent(days_back, JOBS_LIMIT), self.skills(days_back));
        let (jobs, skills) = (jobs?, skills?);

        let rows = jobs
            .iter()
            .map(JobPayload::view)
            .filter(|job| !(hide_applied && job.is_applied()))
            .map(|job| {
                let job_skills = job
                    .job_id
                    .as_ref()
                    .and_then(|id| skills.get(id))
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                HistoryRow {
                    summary: JobSummary::from_job(&job, job_skills),
                    detail: JobDetail::from_job(&with_sections(&job, job_skills)),
                }
            })
            .collect();

        Ok(HistoryPage {
            days_back,
            hide_applied,
            rows,
        })
    }

    /// Cached skill rows for the window, fetched on first use.
    pub async fn skills(&self, days_back: u32) -> Result<Arc<SkillsByJob>, ApiError> {
        if let Some(hit) = self.cache.get(days_back, SKILLS_LIMIT).await {
            return Ok(hit);
        }
        debug!(days_back, "fetching job skills");
        let rows = self.api.job_skills_recent(days_back, SKILLS_LIMIT).await?;
        Ok(self.cache.insert(days_back, SKILLS_LIMIT, group_skills(rows)).await)
    }

    /// Explicit refresh: forget cached skills so the next load refetches.
    pub async fn refresh(&self) {
        self.cache.invalidate().await;
    }

    /// Set a job's applied flag at the API.
    pub async fn set_applied(&self, job_id: &JobId, applied: bool) -> Result<(), ViewError> {
        super::actions::set_job_applied(&self.api, job_id, applied).await
    }

    /// Regenerate a job's assessment, invalidate the skills cache and return
    /// the refreshed detail.
    pub async fn regenerate(&self, job_id: &JobId, days_back: u32) -> Result<JobDetail, ViewError> {
        let data = super::actions::regenerate_job(&self.api, job_id).await?;
        self.cache.invalidate().await;
        let skills = self.skills(days_back.max(1)).await?;
        let job_skills = skills.get(job_id).map(Vec::as_slice).unwrap_or_default();
        Ok(JobDetail::from_job(&with_sections(&data.view(), job_skills)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(job: i64, kind: SkillKind, matched: Option<bool>) -> SkillRow {
        SkillRow {
            job_id: JobId::Int(job),
            job_skills_atomic_string: Some(format!("skill-{job}")),
            job_skills_match: matched,
            job_skills_match_reasoning: Some("because".into()),
            job_skills_type: kind,
        }
    }

    #[test]
    fn days_back_parsing() {
        assert_eq!(clamp_days_back(None), 5);
        assert_eq!(clamp_days_back(Some("")), 5);
        assert_eq!(clamp_days_back(Some("abc")), 5);
        assert_eq!(clamp_days_back(Some("0")), 1);
        assert_eq!(clamp_days_back(Some("-3")), 1);
        assert_eq!(clamp_days_back(Some(" 14 ")), 14);
        assert_eq!(clamp_days_back(Some("3abc")), 3);
        assert_eq!(clamp_days_back(Some("5.5")), 5);
        assert_eq!(clamp_days_back(Some("-")), 5);
        assert_eq!(clamp_days_back(Some("+7d")), 7);
        assert_eq!(clamp_days_back(Some("99999999999999999999")), u32::MAX);
    }

    #[test]
    fn groups_and_sections() {
        let grouped = group_skills(vec![
            row(1, SkillKind::RequiredQualification, Some(true)),
            row(2, SkillKind::AdditionalQualification, Some(false)),
            row(1, SkillKind::EvaluatedQualification, Some(true)),
            row(1, SkillKind::Other, None),
        ]);
        assert_eq!(grouped.len(), 2);

        let sections = map_skills_to_sections(&grouped[&JobId::Int(1)]);
        assert_eq!(sections.required.len(), 1);
        assert_eq!(sections.required[0].matched, Some(true));
        assert!(sections.additional.is_empty());
        // Evaluated rows keep the requirement text only.
        assert_eq!(sections.evaluated.len(), 1);
        assert_eq!(sections.evaluated[0].matched, None);
        assert_eq!(sections.evaluated[0].match_reason, None);
    }

    #[tokio::test]
    async fn cache_is_keyed_and_invalidated() {
        let cache = SkillsCache::default();
        cache.insert(5, 300, group_skills(vec![row(1, SkillKind::RequiredQualification, None)])).await;
        assert!(cache.get(5, 300).await.is_some());
        assert!(cache.get(7, 300).await.is_none());
        assert!(cache.get(5, 100).await.is_none());
        cache.invalidate().await;
        assert_eq!(cache.len().await, 0);
    }
}
