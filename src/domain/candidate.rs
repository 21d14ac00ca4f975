use serde::Deserialize;

use super::job::ExperienceLevel;

/// Upper bound of the salary slider; at or above this the range is
/// considered unbounded and the parameter is omitted.
pub const SALARY_CAP: u32 = 200_000;

/// Raw query parameters as the UI sends them (camelCase names, comma-joined
/// lists). Parsed into a `CandidateFilter` before anything touches the
/// backend.
#[derive(Debug, Default, Deserialize)]
pub struct CandidateQueryParams {
    pub skills: Option<String>,
    #[serde(rename = "experienceLevel")]
    pub experience_level: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "minRating")]
    pub min_rating: Option<f64>,
    #[serde(rename = "minSalary")]
    pub min_salary: Option<u32>,
    #[serde(rename = "maxSalary")]
    pub max_salary: Option<u32>,
    #[serde(rename = "availableIn")]
    pub available_in: Option<u32>,
    #[serde(rename = "jobId")]
    pub job_id: Option<i64>,
}

/// Typed candidate-pool filter. `available_in` is whole days from today.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CandidateFilter {
    pub skills: Vec<String>,
    pub experience_levels: Vec<ExperienceLevel>,
    pub location: Option<String>,
    pub min_rating: Option<f64>,
    pub min_salary: Option<u32>,
    pub max_salary: Option<u32>,
    pub available_in: Option<u32>,
    pub job_id: Option<i64>,
}

impl CandidateFilter {
    pub fn from_params(params: CandidateQueryParams) -> Result<Self, String> {
        let skills = params
            .skills
            .as_deref()
            .map(split_list)
            .unwrap_or_default();

        let mut experience_levels = Vec::new();
        for raw in params
            .experience_level
            .as_deref()
            .map(split_list)
            .unwrap_or_default()
        {
            let level = ExperienceLevel::parse(&raw)
                .ok_or_else(|| format!("unknown experience level: {raw}"))?;
            experience_levels.push(level);
        }

        if let (Some(min), Some(max)) = (params.min_salary, params.max_salary) {
            if min > max {
                return Err("minSalary cannot exceed maxSalary".into());
            }
        }

        Ok(Self {
            skills,
            experience_levels,
            location: params.location.filter(|l| !l.trim().is_empty()),
            min_rating: params.min_rating,
            min_salary: params.min_salary,
            max_salary: params.max_salary,
            available_in: params.available_in,
            job_id: params.job_id,
        })
    }

    /// Canonical query string for the candidate-pool endpoint. Inactive
    /// values (empty lists, zeroes, the unbounded salary cap) are omitted.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if !self.skills.is_empty() {
            pairs.push(("skills", self.skills.join(",")));
        }
        if !self.experience_levels.is_empty() {
            let joined = self
                .experience_levels
                .iter()
                .map(|l| l.as_str())
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("experienceLevel", joined));
        }
        if let Some(location) = &self.location {
            pairs.push(("location", location.clone()));
        }
        if let Some(rating) = self.min_rating {
            if rating > 0.0 {
                pairs.push(("minRating", format!("{rating}")));
            }
        }
        if let Some(salary) = self.min_salary {
            if salary > 0 {
                pairs.push(("minSalary", salary.to_string()));
            }
        }
        if let Some(salary) = self.max_salary {
            if salary < SALARY_CAP {
                pairs.push(("maxSalary", salary.to_string()));
            }
        }
        if let Some(days) = self.available_in {
            pairs.push(("availableIn", days.to_string()));
        }
        if let Some(id) = self.job_id {
            pairs.push(("jobId", id.to_string()));
        }
        pairs
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_filter_encodes_in_canonical_order() {
        let filter = CandidateFilter::from_params(CandidateQueryParams {
            skills: Some("Rust, SQL".into()),
            experience_level: Some("Middle,Senior".into()),
            location: Some("Berlin".into()),
            min_rating: Some(4.5),
            min_salary: Some(60_000),
            max_salary: Some(120_000),
            available_in: Some(14),
            job_id: Some(11),
        })
        .expect("filter should parse");
        assert_eq!(
            filter.to_query_string(),
            "skills=Rust%2CSQL&experienceLevel=Middle%2CSenior&location=Berlin\
             &minRating=4.5&minSalary=60000&maxSalary=120000&availableIn=14&jobId=11"
        );
    }

    #[test]
    fn inactive_values_are_omitted() {
        let filter = CandidateFilter::from_params(CandidateQueryParams {
            skills: Some("".into()),
            min_rating: Some(0.0),
            min_salary: Some(0),
            max_salary: Some(SALARY_CAP),
            ..CandidateQueryParams::default()
        })
        .expect("filter should parse");
        assert_eq!(filter.to_query_string(), "");
    }

    #[test]
    fn skill_values_are_percent_encoded() {
        let filter = CandidateFilter::from_params(CandidateQueryParams {
            skills: Some("C++".into()),
            ..CandidateQueryParams::default()
        })
        .expect("filter should parse");
        assert_eq!(filter.to_query_string(), "skills=C%2B%2B");
    }

    #[test]
    fn unknown_experience_level_is_rejected() {
        let err = CandidateFilter::from_params(CandidateQueryParams {
            experience_level: Some("Junior,Wizard".into()),
            ..CandidateQueryParams::default()
        })
        .expect_err("must reject");
        assert_eq!(err, "unknown experience level: Wizard");
    }

    #[test]
    fn inverted_salary_range_is_rejected() {
        let err = CandidateFilter::from_params(CandidateQueryParams {
            min_salary: Some(90_000),
            max_salary: Some(50_000),
            ..CandidateQueryParams::default()
        })
        .expect_err("must reject");
        assert_eq!(err, "minSalary cannot exceed maxSalary");
    }
}
