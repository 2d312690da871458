use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use careers_core::{DomainError, DomainResult, Entity, JobId};

/// Posting lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum JobStatus {
    #[default]
    Active,
    Closed,
    Draft,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "Active",
            JobStatus::Closed => "Closed",
            JobStatus::Draft => "Draft",
        }
    }
}

impl core::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for JobStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(JobStatus::Active),
            "Closed" => Ok(JobStatus::Closed),
            "Draft" => Ok(JobStatus::Draft),
            other => Err(DomainError::validation(format!("unknown job status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub title: String,
    pub department: String,
    #[serde(rename = "type")]
    pub employment_type: String,
    pub location: String,
    pub experience: String,
    pub salary: String,
    pub description: String,
    pub responsibilities: String,
    pub requirements: String,
    pub deadline: Option<NaiveDate>,
    pub status: JobStatus,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl JobPosting {
    /// Shown on the public careers page.
    pub fn is_public(&self) -> bool {
        self.is_visible && self.status == JobStatus::Active
    }

    pub fn apply(&mut self, patch: JobPostingPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(DomainError::validation("title must not be empty"));
            }
        }

        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.department {
            self.department = v;
        }
        if let Some(v) = patch.employment_type {
            self.employment_type = v;
        }
        if let Some(v) = patch.location {
            self.location = v;
        }
        if let Some(v) = patch.experience {
            self.experience = v;
        }
        if let Some(v) = patch.salary {
            self.salary = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.responsibilities {
            self.responsibilities = v;
        }
        if let Some(v) = patch.requirements {
            self.requirements = v;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(visible) = patch.is_visible {
            self.is_visible = visible;
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = deadline;
        }
        self.updated_at = Some(now);
        Ok(())
    }
}

impl Entity for JobPosting {
    type Id = JobId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Create request. Only `title` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewJobPosting {
    pub title: String,
    pub department: String,
    #[serde(rename = "type")]
    pub employment_type: String,
    pub location: String,
    pub experience: String,
    pub salary: String,
    pub description: String,
    pub responsibilities: String,
    pub requirements: String,
    pub deadline: Option<NaiveDate>,
    pub status: Option<JobStatus>,
    pub is_visible: bool,
}

impl NewJobPosting {
    pub fn into_posting(self, id: JobId, now: DateTime<Utc>) -> DomainResult<JobPosting> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("title is required"));
        }
        Ok(JobPosting {
            id,
            title,
            department: self.department,
            employment_type: self.employment_type,
            location: self.location,
            experience: self.experience,
            salary: self.salary,
            description: self.description,
            responsibilities: self.responsibilities,
            requirements: self.requirements,
            deadline: self.deadline,
            status: self.status.unwrap_or_default(),
            is_visible: self.is_visible,
            created_at: now,
            updated_at: None,
        })
    }
}

/// Partial update: only fields present in the request change.
///
/// `deadline` distinguishes "absent" (`None`) from "cleared" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JobPostingPatch {
    pub title: Option<String>,
    pub department: Option<String>,
    #[serde(rename = "type")]
    pub employment_type: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
    pub responsibilities: Option<String>,
    pub requirements: Option<String>,
    #[serde(deserialize_with = "present")]
    pub deadline: Option<Option<NaiveDate>>,
    pub status: Option<JobStatus>,
    pub is_visible: Option<bool>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<NaiveDate>::deserialize(deserializer).map(Some)
}
