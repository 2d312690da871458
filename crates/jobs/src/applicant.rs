use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use careers_core::{ApplicantId, DomainError, DomainResult, Entity, JobId};

/// Review pipeline stage of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ApplicantStatus {
    #[default]
    Applied,
    Shortlisted,
    Interviewed,
    Hired,
    Rejected,
}

impl ApplicantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicantStatus::Applied => "Applied",
            ApplicantStatus::Shortlisted => "Shortlisted",
            ApplicantStatus::Interviewed => "Interviewed",
            ApplicantStatus::Hired => "Hired",
            ApplicantStatus::Rejected => "Rejected",
        }
    }
}

impl core::fmt::Display for ApplicantStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ApplicantStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Applied" => Ok(ApplicantStatus::Applied),
            "Shortlisted" => Ok(ApplicantStatus::Shortlisted),
            "Interviewed" => Ok(ApplicantStatus::Interviewed),
            "Hired" => Ok(ApplicantStatus::Hired),
            "Rejected" => Ok(ApplicantStatus::Rejected),
            other => Err(DomainError::validation(format!("unknown applicant status '{other}'"))),
        }
    }
}

/// A submitted application. `job_id` is `None` for a general resume drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub job_id: Option<JobId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub resume_url: String,
    pub cover_letter: String,
    pub status: ApplicantStatus,
    pub notes: String,
    pub applied_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Applicant {
    pub fn is_general(&self) -> bool {
        self.job_id.is_none()
    }

    pub fn apply(&mut self, patch: ApplicantPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if patch.status.is_none() && patch.notes.is_none() {
            return Err(DomainError::validation("nothing to update"));
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        self.updated_at = Some(now);
        Ok(())
    }
}

impl Entity for Applicant {
    type Id = ApplicantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.applied_at
    }
}

/// Public application form. `name` and `email` are required.
///
/// Status is not accepted here; every submission starts as `Applied`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewApplicant {
    #[serde(alias = "jobId")]
    pub job_id: Option<JobId>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(alias = "resumeUrl")]
    pub resume_url: Option<String>,
    #[serde(alias = "coverLetter")]
    pub cover_letter: Option<String>,
}

impl NewApplicant {
    pub fn into_applicant(self, id: ApplicantId, now: DateTime<Utc>) -> DomainResult<Applicant> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        let email = self.email.trim().to_string();
        if email.is_empty() {
            return Err(DomainError::validation("email is required"));
        }
        if !is_plausible_email(&email) {
            return Err(DomainError::validation("invalid email format"));
        }
        Ok(Applicant {
            id,
            job_id: self.job_id,
            name,
            email,
            phone: self.phone.unwrap_or_default().trim().to_string(),
            resume_url: self.resume_url.unwrap_or_default().trim().to_string(),
            cover_letter: self.cover_letter.unwrap_or_default(),
            status: ApplicantStatus::Applied,
            notes: String::new(),
            applied_at: now,
            updated_at: None,
        })
    }
}

/// Reviewer update: status and/or notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApplicantPatch {
    pub status: Option<ApplicantStatus>,
    pub notes: Option<String>,
}

/// `local@domain.tld` with no whitespace and a single `@`.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.starts_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> NewApplicant {
        NewApplicant {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            ..Default::default()
        }
    }

    #[test]
    fn submission_starts_as_applied() {
        let a = form().into_applicant(ApplicantId::new(), Utc::now()).unwrap();
        assert_eq!(a.status, ApplicantStatus::Applied);
        assert!(a.is_general());
        assert_eq!(a.notes, "");
        assert_eq!(a.updated_at, None);
    }

    #[test]
    fn name_and_email_are_required() {
        let no_name = NewApplicant { name: " ".into(), ..form() };
        assert!(matches!(
            no_name.into_applicant(ApplicantId::new(), Utc::now()),
            Err(DomainError::Validation(_))
        ));
        let no_email = NewApplicant { email: String::new(), ..form() };
        assert!(no_email.into_applicant(ApplicantId::new(), Utc::now()).is_err());
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for bad in ["ada", "ada@", "@example.com", "ada@example", "a b@example.com", "a@b@c.com", "ada@.com"] {
            let req = NewApplicant { email: bad.into(), ..form() };
            assert!(
                req.into_applicant(ApplicantId::new(), Utc::now()).is_err(),
                "accepted {bad}"
            );
        }
        assert!(is_plausible_email("first.last+tag@mail.example.co"));
    }

    #[test]
    fn form_accepts_camel_case_aliases() {
        let job = JobId::new();
        let req: NewApplicant = serde_json::from_value(json!({
            "jobId": job.to_string(),
            "name": "Ada",
            "email": "ada@example.com",
            "resumeUrl": "https://cv.example.com/ada.pdf",
            "coverLetter": null,
        }))
        .unwrap();
        assert_eq!(req.job_id, Some(job));
        assert_eq!(req.resume_url.as_deref(), Some("https://cv.example.com/ada.pdf"));
        assert_eq!(req.cover_letter, None);
    }

    #[test]
    fn form_ignores_submitted_status() {
        let req: NewApplicant = serde_json::from_value(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "status": "Hired",
        }))
        .unwrap();
        let a = req.into_applicant(ApplicantId::new(), Utc::now()).unwrap();
        assert_eq!(a.status, ApplicantStatus::Applied);
    }

    #[test]
    fn patch_updates_status_and_notes() {
        let mut a = form().into_applicant(ApplicantId::new(), Utc::now()).unwrap();
        let patch: ApplicantPatch =
            serde_json::from_value(json!({ "status": "Shortlisted", "notes": "strong" })).unwrap();
        a.apply(patch, Utc::now()).unwrap();
        assert_eq!(a.status, ApplicantStatus::Shortlisted);
        assert_eq!(a.notes, "strong");
        assert!(a.updated_at.is_some());
    }

    #[test]
    fn empty_patch_is_rejected() {
        let mut a = form().into_applicant(ApplicantId::new(), Utc::now()).unwrap();
        assert!(a.apply(ApplicantPatch::default(), Utc::now()).is_err());
        assert_eq!(a.updated_at, None);
    }

    #[test]
    fn status_parses_exact_names() {
        assert_eq!("Hired".parse::<ApplicantStatus>().unwrap(), ApplicantStatus::Hired);
        assert!("hired".parse::<ApplicantStatus>().is_err());
    }
}
