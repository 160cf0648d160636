use chrono::{DateTime, Utc};
use copilot_types::{JobData, Qualification, SkillKind, SkillRow, Task, TaskStatus};
use serde::Serialize;

/// How well a qualification list is matched, bucketed for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FractionClass {
    #[serde(rename = "fraction-good")]
    Good,
    #[serde(rename = "fraction-ok")]
    Ok,
    #[serde(rename = "fraction-bad")]
    Bad,
    #[serde(rename = "fraction-empty")]
    Empty,
}

impl FractionClass {
    pub fn css_class(&self) -> &'static str {
        match self {
            FractionClass::Good => "fraction-good",
            FractionClass::Ok => "fraction-ok",
            FractionClass::Bad => "fraction-bad",
            FractionClass::Empty => "fraction-empty",
        }
    }
}

/// `matched / total` over a qualification list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchFraction {
    pub matched: usize,
    pub total: usize,
    pub class: FractionClass,
}

impl MatchFraction {
    pub fn new(matched: usize, total: usize) -> Self {
        Self {
            matched,
            total,
            class: classify(matched, total),
        }
    }

    pub fn of(items: &[Qualification]) -> Self {
        Self::new(items.iter().filter(|q| q.is_match()).count(), items.len())
    }

    fn of_skills(skills: &[SkillRow], kind: SkillKind) -> Self {
        let rows = skills.iter().filter(|s| s.job_skills_type == kind);
        let (matched, total) = rows.fold((0, 0), |(m, t), s| {
            (m + usize::from(s.job_skills_match.unwrap_or(false)), t + 1)
        });
        Self::new(matched, total)
    }
}

pub fn classify(matched: usize, total: usize) -> FractionClass {
    if total == 0 {
        return FractionClass::Empty;
    }
    let ratio = matched as f64 / total as f64;
    if ratio >= 0.75 {
        FractionClass::Good
    } else if ratio >= 0.5 {
        FractionClass::Ok
    } else {
        FractionClass::Bad
    }
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One collapsed row of a session or history list.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    /// Task id for session rows, job id for history rows.
    pub key: String,
    pub job_id: Option<String>,
    pub title: String,
    pub location: String,
    pub when: Option<String>,
    /// Lifecycle status; history rows have none.
    pub status: Option<TaskStatus>,
    pub required: MatchFraction,
    pub additional: MatchFraction,
    pub applied: bool,
    pub expandable: bool,
}

impl JobSummary {
    pub fn from_task(task: &Task) -> Self {
        let status = task.status();
        let fallback = if status == TaskStatus::Completed {
            "Untitled"
        } else {
            "Processing..."
        };
        let data = task.job();
        let data = data.as_ref();
        let when: DateTime<Utc> = task.completed_at().unwrap_or(task.submitted_at);
        let (required, additional) = data
            .map(|d| {
                (
                    MatchFraction::of(&d.required_qualifications),
                    MatchFraction::of(&d.additional_qualifications),
                )
            })
            .unwrap_or((MatchFraction::new(0, 0), MatchFraction::new(0, 0)));

        Self {
            key: task.id.clone(),
            job_id: data.and_then(|d| d.job_id.as_ref()).map(ToString::to_string),
            title: data.map_or_else(|| fallback.to_owned(), |d| d.display_title(fallback)),
            location: location(data),
            when: Some(when.format(TIME_FORMAT).to_string()),
            status: Some(status),
            required,
            additional,
            applied: task.is_applied(),
            expandable: status == TaskStatus::Completed,
        }
    }

    /// History row; fractions come from the job's skill rows.
    pub fn from_job(job: &JobData, skills: &[SkillRow]) -> Self {
        let job_id = job.job_id.as_ref().map(ToString::to_string);
        let when = job
            .last_assessed_at
            .and_then(unix_seconds)
            .map(|t| t.format(TIME_FORMAT).to_string());
        Self {
            key: job_id.clone().unwrap_or_default(),
            job_id,
            title: job.display_title("Untitled"),
            location: location(Some(job)),
            when,
            status: None,
            required: MatchFraction::of_skills(skills, SkillKind::RequiredQualification),
            additional: MatchFraction::of_skills(skills, SkillKind::AdditionalQualification),
            applied: job.is_applied(),
            expandable: true,
        }
    }
}

fn location(data: Option<&JobData>) -> String {
    data.and_then(|d| d.job_location.as_deref())
        .filter(|l| !l.trim().is_empty())
        .unwrap_or("N/A")
        .to_owned()
}

fn unix_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.trunc() as i64;
    let nanos = ((secs - secs.trunc()) * 1e9) as u32;
    DateTime::from_timestamp(whole, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use copilot_types::JobId;
    use serde_json::json;

    #[test]
    fn fraction_thresholds() {
        assert_eq!(classify(0, 0), FractionClass::Empty);
        assert_eq!(classify(3, 4), FractionClass::Good);
        assert_eq!(classify(2, 4), FractionClass::Ok);
        assert_eq!(classify(1, 4), FractionClass::Bad);
        assert_eq!(classify(2, 3).css_class(), "fraction-ok");
    }

    #[test]
    fn unfinished_task_row() {
        let task = Task::queued("t-1", "https://example.com/jobs/1", Utc::now());
        let row = JobSummary::from_task(&task);
        assert_eq!(row.title, "Processing...");
        assert_eq!(row.location, "N/A");
        assert_eq!(row.status, Some(TaskStatus::Queued));
        assert_eq!(row.required.class, FractionClass::Empty);
        assert!(!row.expandable);
        assert!(!row.applied);
    }

    #[test]
    fn completed_task_row() {
        let submitted = Utc::now() - Duration::minutes(5);
        let mut task = Task::queued("t-2", "https://example.com/jobs/2", submitted);
        task.start().unwrap();
        let qual = |matched: u8| json!({ "requirement": "Rust", "match": matched });
        let data = serde_json::from_value(json!({
            "job_id": 42,
            "job_company": "Acme",
            "job_applied": 1,
            "required_qualifications": [qual(1), qual(1), qual(1), qual(0)],
            "additional_qualifications": [qual(0)]
        }))
        .unwrap();
        let done = Utc::now();
        task.complete(data, done).unwrap();

        let row = JobSummary::from_task(&task);
        assert_eq!(row.title, "Untitled at Acme");
        assert_eq!(row.job_id.as_deref(), Some("42"));
        assert_eq!(row.when, Some(done.format(TIME_FORMAT).to_string()));
        assert_eq!((row.required.matched, row.required.total), (3, 4));
        assert_eq!(row.required.class, FractionClass::Good);
        assert_eq!(row.additional.class, FractionClass::Bad);
        assert!(row.applied);
        assert!(row.expandable);
    }

    #[test]
    fn history_row_uses_skills() {
        let job = JobData {
            job_id: Some(JobId::Int(7)),
            job_title: Some("Engineer".into()),
            job_location: Some("Remote".into()),
            last_assessed_at: Some(0.0),
            ..Default::default()
        };
        let skill = |kind, matched| SkillRow {
            job_id: JobId::Int(7),
            job_skills_atomic_string: Some("x".into()),
            job_skills_match: Some(matched),
            job_skills_match_reasoning: None,
            job_skills_type: kind,
        };
        let skills = vec![
            skill(SkillKind::RequiredQualification, true),
            skill(SkillKind::RequiredQualification, false),
            skill(SkillKind::EvaluatedQualification, false),
        ];
        let row = JobSummary::from_job(&job, &skills);
        assert_eq!(row.key, "7");
        assert_eq!(row.title, "Engineer");
        assert_eq!(row.location, "Remote");
        assert_eq!(row.when.as_deref(), Some("1970-01-01 00:00"));
        assert_eq!((row.required.matched, row.required.total), (1, 2));
        assert_eq!(row.required.class, FractionClass::Ok);
        assert_eq!(row.additional.class, FractionClass::Empty);
        assert_eq!(row.status, None);
    }
}
