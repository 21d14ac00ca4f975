use serde::{Deserialize, Serialize};

use super::company::MinPicture;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Draft,
    Published,
    Staffed,
    Cancelled,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Junior,
    Middle,
    Senior,
}

impl ExperienceLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Junior" => Some(Self::Junior),
            "Middle" => Some(Self::Middle),
            "Senior" => Some(Self::Senior),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Junior => "Junior",
            Self::Middle => "Middle",
            Self::Senior => "Senior",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPriority {
    Urgent,
    High,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "Full Time")]
    FullTime,
    #[serde(rename = "Part Time")]
    PartTime,
    Contract,
    Internship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemotePolicy {
    #[serde(rename = "On-Site")]
    OnSite,
    Hybrid,
    #[serde(rename = "Full Remote")]
    FullRemote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryRange {
    pub start: i64,
    pub end: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageRequirement {
    pub language: String,
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSkill {
    pub skill_id: i64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub skill_type: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Responsibility {
    pub dwa_id: i64,
    #[serde(default, rename = "DWA_Title")]
    pub dwa_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobBenefit {
    #[serde(default)]
    pub icon: Option<MinPicture>,
    #[serde(default)]
    pub benefit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub edited_at: i64,
    pub status: JobStatus,
    pub company_id: i64,
    #[serde(default)]
    pub employer_id: i64,
    #[serde(default)]
    pub employers_access: Option<Vec<i64>>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub priority: Option<JobPriority>,
    #[serde(default)]
    pub employment_type: Option<EmploymentType>,
    #[serde(default)]
    pub remote_possibilities: Option<RemotePolicy>,
    #[serde(default)]
    pub starting_date: String,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub languages: Vec<LanguageRequirement>,
    #[serde(default)]
    pub salary_range: Option<SalaryRange>,
    #[serde(default)]
    pub skills: Vec<JobSkill>,
    #[serde(default)]
    pub responsibilities: Vec<Responsibility>,
    #[serde(default)]
    pub benefits: Vec<JobBenefit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_record_parses_with_backend_spellings() {
        let body = r#"{
            "id": 11,
            "status": "Published",
            "company_id": 3,
            "title": "Senior Rust Engineer",
            "experience_level": "Senior",
            "priority": "urgent",
            "employment_type": "Full Time",
            "remote_possibilities": "Full Remote",
            "salary_range": {"start": 70000, "end": 95000},
            "languages": [{"language": "German", "level": "B2"}],
            "skills": [{"skill_id": 5, "title": "Rust"}]
        }"#;
        let job: Job = serde_json::from_str(body).expect("job should parse");
        assert_eq!(job.status, JobStatus::Published);
        assert_eq!(job.experience_level, Some(ExperienceLevel::Senior));
        assert_eq!(job.priority, Some(JobPriority::Urgent));
        assert_eq!(job.employment_type, Some(EmploymentType::FullTime));
        assert_eq!(job.remote_possibilities, Some(RemotePolicy::FullRemote));
        assert_eq!(job.salary_range.as_ref().map(|r| r.end), Some(95000));
        assert_eq!(job.skills[0].title, "Rust");
        assert!(job.responsibilities.is_empty());
    }

    #[test]
    fn experience_level_parses_only_known_values() {
        assert_eq!(ExperienceLevel::parse("Junior"), Some(ExperienceLevel::Junior));
        assert_eq!(ExperienceLevel::parse("Middle"), Some(ExperienceLevel::Middle));
        assert_eq!(ExperienceLevel::parse("senior"), None);
        assert_eq!(ExperienceLevel::parse(""), None);
    }
}
