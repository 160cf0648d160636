use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;

/// Identifier of a job posting as known to the extraction API.
///
/// The API hands out integer ids, but older payloads carry them as text;
/// both forms are sent back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Int(i64),
    Text(String),
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Int(n) => write!(f, "{n}"),
            JobId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for JobId {
    fn from(n: i64) -> Self {
        JobId::Int(n)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        // Path segments arrive as text; keep numeric ids numeric.
        match s.parse::<i64>() {
            Ok(n) => JobId::Int(n),
            Err(_) => JobId::Text(s.to_owned()),
        }
    }
}

/// A single requirement with its match verdict.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Qualification {
    pub requirement: Option<String>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub matched: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_reason: Option<String>,
}

impl Qualification {
    pub fn is_match(&self) -> bool {
        self.matched.unwrap_or(false)
    }

    /// Read one entry of a qualification list; non-objects read as empty.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key);
        Self {
            requirement: field("requirement").and_then(lenient::text),
            matched: field("match").and_then(lenient::value_flag),
            match_reason: field("match_reason").and_then(lenient::text),
        }
    }
}

/// Job payload exactly as the extraction API returned it.
///
/// Completed tasks store this untouched: keys, value types and unknown
/// fields all survive a store round trip. Views read it through
/// [`JobPayload::view`]; the only in-place edit is the applied flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobPayload(Map<String, Value>);

impl JobPayload {
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn job_id(&self) -> Option<JobId> {
        self.get("job_id").and_then(lenient::job_id)
    }

    /// Applied means `job_applied` is exactly `1` or `true`.
    pub fn is_applied(&self) -> bool {
        self.get("job_applied").is_some_and(lenient::is_set)
    }

    /// Write `job_applied` as `1`/`0`, the form the API itself uses.
    pub fn set_applied(&mut self, applied: bool) {
        self.0.insert("job_applied".to_owned(), Value::from(u8::from(applied)));
    }

    /// Typed read-only view of the known fields.
    pub fn view(&self) -> JobData {
        JobData::from_payload(self)
    }
}

impl From<Map<String, Value>> for JobPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Typed view of a [`JobPayload`] used for rendering.
///
/// Built leniently: a field of an unexpected type reads as absent instead
/// of failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobData {
    pub job_id: Option<JobId>,
    pub job_title: Option<String>,
    pub job_company: Option<String>,
    pub job_salary: Option<String>,
    pub job_location: Option<String>,
    pub job_url: Option<String>,
    pub job_url_direct: Option<String>,
    pub job_description: Option<String>,
    pub job_applied: bool,
    /// Unix seconds of the last assessment run.
    pub last_assessed_at: Option<f64>,
    pub required_qualifications: Vec<Qualification>,
    pub additional_qualifications: Vec<Qualification>,
    pub evaluated_qualifications: Vec<Qualification>,
}

impl JobData {
    pub fn from_payload(payload: &JobPayload) -> Self {
        let text = |key: &str| payload.get(key).and_then(lenient::text);
        let list = |key: &str| -> Vec<Qualification> {
            payload
                .get(key)
                .and_then(Value::as_array)
                .map(|items| items.iter().map(Qualification::from_value).collect())
                .unwrap_or_default()
        };
        Self {
            job_id: payload.job_id(),
            job_title: text("job_title"),
            job_company: text("job_company"),
            job_salary: text("job_salary"),
            job_location: text("job_location"),
            job_url: text("job_url"),
            job_url_direct: text("job_url_direct"),
            job_description: text("job_description"),
            job_applied: payload.is_applied(),
            last_assessed_at: payload.get("last_assessed_at").and_then(lenient::timestamp),
            required_qualifications: list("required_qualifications"),
            additional_qualifications: list("additional_qualifications"),
            evaluated_qualifications: list("evaluated_qualifications"),
        }
    }

    /// `true` when the user has marked this job as applied.
    pub fn is_applied(&self) -> bool {
        self.job_applied
    }

    /// `"<title> at <company>"`, or just the title when the company is unknown.
    pub fn display_title(&self, fallback: &str) -> String {
        let title = non_empty(self.job_title.as_deref()).unwrap_or(fallback);
        match non_empty(self.job_company.as_deref()) {
            Some(company) => format!("{title} at {company}"),
            None => title.to_owned(),
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// Which section of the assessment a skill row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    RequiredQualification,
    AdditionalQualification,
    EvaluatedQualification,
    #[serde(other)]
    Other,
}

/// One row of `GET /job_skills_recent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRow {
    #[serde(deserialize_with = "lenient::required_job_id")]
    pub job_id: JobId,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub job_skills_atomic_string: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_flag")]
    pub job_skills_match: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub job_skills_match_reasoning: Option<String>,
    pub job_skills_type: SkillKind,
}

impl SkillRow {
    pub fn to_qualification(&self) -> Qualification {
        match self.job_skills_type {
            SkillKind::EvaluatedQualification => Qualification {
                requirement: self.job_skills_atomic_string.clone(),
                ..Default::default()
            },
            _ => Qualification {
                requirement: self.job_skills_atomic_string.clone(),
                matched: self.job_skills_match,
                match_reason: self.job_skills_match_reasoning.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> JobPayload {
        match value {
            Value::Object(map) => JobPayload::from(map),
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn payload_survives_round_trip_verbatim() {
        let raw = json!({
            "job_id": 42,
            "job_title": "Rust Engineer",
            "job_salary": 150000,
            "job_applied": 0,
            "required_qualifications": [
                { "requirement": "Rust", "match": 1, "match_reason": "5 years" }
            ],
            "last_assessed_at": "2025-01-01T00:00:00Z",
            "job_source": "linkedin"
        });
        let data: JobPayload = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&data).unwrap(), raw);
    }

    #[test]
    fn view_reads_loose_types() {
        let data = payload(json!({
            "job_id": 12.0,
            "job_salary": 150000,
            "job_applied": 1,
            "required_qualifications": [
                { "requirement": "Rust", "match": 1, "match_reason": "5 years" },
                "not an object"
            ],
            "additional_qualifications": null,
            "last_assessed_at": "2025-01-01T00:00:00Z"
        }));
        let view = data.view();
        assert_eq!(view.job_id, Some(JobId::Int(12)));
        assert_eq!(view.job_salary.as_deref(), Some("150000"));
        assert!(view.is_applied());
        assert!(view.required_qualifications[0].is_match());
        assert_eq!(view.required_qualifications[1], Qualification::default());
        assert!(view.additional_qualifications.is_empty());
        assert_eq!(view.last_assessed_at, Some(1_735_689_600.0));
    }

    #[test]
    fn set_applied_touches_only_the_flag() {
        let mut data = payload(json!({ "job_id": 5, "job_applied": true, "extra": [1, 2] }));
        assert!(data.is_applied());
        data.set_applied(false);
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({ "job_id": 5, "job_applied": 0, "extra": [1, 2] })
        );
        data.set_applied(true);
        assert_eq!(data.get("job_applied"), Some(&json!(1)));
    }

    #[test]
    fn only_one_or_true_counts_as_applied() {
        assert!(!payload(json!({ "job_applied": 2 })).is_applied());
        assert!(!payload(json!({ "job_applied": "1" })).is_applied());
        assert!(!payload(json!({})).is_applied());
    }

    #[test]
    fn display_title_falls_back() {
        let mut data = JobData::default();
        assert_eq!(data.display_title("Untitled"), "Untitled");
        data.job_title = Some("Engineer".into());
        data.job_company = Some("Acme".into());
        assert_eq!(data.display_title("Untitled"), "Engineer at Acme");
    }

    #[test]
    fn job_id_from_path_segment() {
        assert_eq!(JobId::from("17"), JobId::Int(17));
        assert_eq!(JobId::from("abc-1"), JobId::Text("abc-1".into()));
        assert_eq!(JobId::Int(17).to_string(), "17");
    }

    #[test]
    fn evaluated_skill_drops_match_fields() {
        let row: SkillRow = serde_json::from_value(json!({
            "job_id": 3,
            "job_skills_atomic_string": "Leadership",
            "job_skills_match": 1,
            "job_skills_match_reasoning": "led a team",
            "job_skills_type": "evaluated_qualification"
        }))
        .unwrap();
        let q = row.to_qualification();
        assert_eq!(q.requirement.as_deref(), Some("Leadership"));
        assert_eq!(q.matched, None);
        assert_eq!(q.match_reason, None);
    }

    #[test]
    fn unknown_skill_kind_is_other() {
        let row: SkillRow = serde_json::from_value(json!({
            "job_id": "x",
            "job_skills_type": "nice_to_have"
        }))
        .unwrap();
        assert_eq!(row.job_skills_type, SkillKind::Other);
    }
}
