use copilot_types::{JobData, Qualification};
use serde::Serialize;

use super::summary::MatchFraction;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualificationRow {
    pub requirement: String,
    pub matched: bool,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualificationTable {
    pub title: &'static str,
    /// Requirement / Match / Match Reason; otherwise Requirement only.
    pub three_column: bool,
    pub fraction: Option<MatchFraction>,
    pub rows: Vec<QualificationRow>,
}

/// Expanded view of one job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobDetail {
    pub job_id: Option<String>,
    pub fields: Vec<DetailField>,
    pub description: String,
    pub applied: bool,
    pub tables: Vec<QualificationTable>,
}

impl JobDetail {
    pub fn from_job(data: &JobData) -> Self {
        let job_id = data.job_id.as_ref().map(ToString::to_string);
        let mut fields = Vec::new();
        let plain = [
            ("Company", &data.job_company),
            ("Title", &data.job_title),
            ("Salary", &data.job_salary),
            ("Location", &data.job_location),
        ];
        for (label, value) in plain {
            if let Some(v) = value {
                fields.push(DetailField {
                    label,
                    value: or_na(v),
                    href: None,
                });
            }
        }
        if let Some(url) = &data.job_url_direct {
            let href = Some(url.trim()).filter(|u| !u.is_empty());
            let text = match (&href, &job_id) {
                (Some(_), Some(id)) => format!("View Job {id}"),
                (Some(_), None) => "View Job".to_owned(),
                (None, _) => "N/A".to_owned(),
            };
            fields.push(DetailField {
                label: "Direct Link",
                value: text,
                href: href.map(str::to_owned),
            });
        }

        let tables = [
            ("Required Qualifications", &data.required_qualifications, true),
            ("Additional Qualifications", &data.additional_qualifications, true),
            ("Evaluated Qualifications", &data.evaluated_qualifications, false),
        ]
        .into_iter()
        .filter(|(_, items, _)| !items.is_empty())
        .map(|(title, items, three_column)| table(title, items, three_column))
        .collect();

        Self {
            job_id,
            fields,
            description: data
                .job_description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| "Not found.".to_owned()),
            applied: data.is_applied(),
            tables,
        }
    }
}

fn table(title: &'static str, items: &[Qualification], three_column: bool) -> QualificationTable {
    QualificationTable {
        title,
        three_column,
        fraction: three_column.then(|| MatchFraction::of(items)),
        rows: items
            .iter()
            .map(|q| QualificationRow {
                requirement: q.requirement.as_deref().map_or_else(|| "N/A".to_owned(), or_na),
                matched: q.is_match(),
                reason: q.match_reason.as_deref().map_or_else(|| "N/A".to_owned(), or_na),
            })
            .collect(),
    }
}

fn or_na(s: &str) -> String {
    if s.trim().is_empty() { "N/A".to_owned() } else { s.to_owned() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copilot_types::JobId;

    #[test]
    fn builds_fields_and_tables() {
        let data = JobData {
            job_id: Some(JobId::Int(9)),
            job_title: Some("Engineer".into()),
            job_company: Some(String::new()),
            job_url_direct: Some("https://jobs.example.com/9".into()),
            required_qualifications: vec![Qualification {
                requirement: Some("Rust".into()),
                matched: Some(true),
                match_reason: None,
            }],
            evaluated_qualifications: vec![Qualification {
                requirement: None,
                ..Default::default()
            }],
            ..Default::default()
        };
        let detail = JobDetail::from_job(&data);

        let labels: Vec<_> = detail.fields.iter().map(|f| f.label).collect();
        assert_eq!(labels, ["Company", "Title", "Direct Link"]);
        assert_eq!(detail.fields[0].value, "N/A");
        assert_eq!(detail.fields[2].value, "View Job 9");
        assert_eq!(detail.fields[2].href.as_deref(), Some("https://jobs.example.com/9"));
        assert_eq!(detail.description, "Not found.");

        assert_eq!(detail.tables.len(), 2);
        let required = &detail.tables[0];
        assert_eq!(required.fraction.map(|f| (f.matched, f.total)), Some((1, 1)));
        assert_eq!(required.rows[0].reason, "N/A");
        let evaluated = &detail.tables[1];
        assert!(!evaluated.three_column);
        assert!(evaluated.fraction.is_none());
        assert_eq!(evaluated.rows[0].requirement, "N/A");
    }
}
