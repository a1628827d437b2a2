use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entries::{Entries, Entry};
use super::user::UserSummary;
use crate::database::{Collection, Document};
use crate::error::{ApiError, FieldError};
use crate::validation::{self, Validate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
    pub youtube: String,
    pub twitter: String,
    pub instagram: String,
    pub linkedin: String,
    pub facebook: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

impl Entry for Experience {
    fn entry_id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub id: Uuid,
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

impl Entry for Education {
    fn entry_id(&self) -> Uuid {
        self.id
    }
}

/// One per user. Experience and education are only reachable through the owner's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub githubusername: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub social: Option<Social>,
    #[serde(default)]
    pub experience: Entries<Experience>,
    #[serde(default)]
    pub education: Entries<Education>,
    pub date: DateTime<Utc>,
}

impl Profile {
    /// Skeleton written when an upsert finds no profile for the user
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            status: None,
            company: None,
            location: None,
            website: None,
            bio: None,
            githubusername: None,
            skills: Vec::new(),
            social: None,
            experience: Entries::new(),
            education: Entries::new(),
            date: Utc::now(),
        }
    }
}

impl Document for Profile {
    const COLLECTION: Collection = Collection::Profiles;
    const NAME: &'static str = "Profile";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Profile with its owner's public details
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: Profile,
    pub user: Option<UserSummary>,
}

/// Skills arrive either as a list or as one comma-delimited string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Delimited(String),
}

impl SkillsInput {
    fn is_blank(&self) -> bool {
        match self {
            SkillsInput::List(items) => items.is_empty(),
            SkillsInput::Delimited(s) => s.trim().is_empty(),
        }
    }
}

/// Body of `POST /api/profile`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileInput {
    pub status: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub skills: Option<SkillsInput>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    pub facebook: Option<String>,
}

impl Validate for ProfileInput {
    fn checks(&self) -> Vec<Option<FieldError>> {
        vec![
            validation::not_blank("status", self.status.as_deref(), "Status is required"),
            self.skills
                .as_ref()
                .filter(|s| s.is_blank())
                .map(|_| FieldError::new("skills", "Skills is required")),
        ]
    }
}

/// Body of `PUT /api/profile/experience`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperienceInput {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

impl Validate for ExperienceInput {
    fn checks(&self) -> Vec<Option<FieldError>> {
        vec![
            validation::required("title", self.title.as_deref(), "Title is required"),
            validation::required("company", self.company.as_deref(), "Company is required"),
            validation::required("from", self.from.as_deref(), "From date is required"),
            validation::date("from", self.from.as_deref()),
            validation::date("to", self.to.as_deref()),
        ]
    }
}

impl ExperienceInput {
    pub fn into_entry(self) -> Result<Experience, ApiError> {
        self.validate()?;
        let from = validation::parse_date(self.from.as_deref())
            .ok_or_else(|| ApiError::invalid_field("from", "From date is required"))?;

        Ok(Experience {
            id: Uuid::new_v4(),
            title: self.title.unwrap_or_default(),
            company: self.company.unwrap_or_default(),
            location: self.location,
            from,
            to: validation::parse_date(self.to.as_deref()),
            current: self.current.unwrap_or(false),
            description: self.description,
        })
    }
}

/// Body of `PUT /api/profile/education`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EducationInput {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub fieldofstudy: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

impl Validate for EducationInput {
    fn checks(&self) -> Vec<Option<FieldError>> {
        vec![
            validation::required("school", self.school.as_deref(), "School is required"),
            validation::required("degree", self.degree.as_deref(), "Degree is required"),
            validation::required(
                "fieldofstudy",
                self.fieldofstudy.as_deref(),
                "Field of study is required",
            ),
            validation::required("from", self.from.as_deref(), "From date is required"),
            validation::date("from", self.from.as_deref()),
            validation::date("to", self.to.as_deref()),
        ]
    }
}

impl EducationInput {
    pub fn into_entry(self) -> Result<Education, ApiError> {
        self.validate()?;
        let from = validation::parse_date(self.from.as_deref())
            .ok_or_else(|| ApiError::invalid_field("from", "From date is required"))?;

        Ok(Education {
            id: Uuid::new_v4(),
            school: self.school.unwrap_or_default(),
            degree: self.degree.unwrap_or_default(),
            fieldofstudy: self.fieldofstudy.unwrap_or_default(),
            from,
            to: validation::parse_date(self.to.as_deref()),
            current: self.current.unwrap_or(false),
            description: self.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn skills_accept_list_or_string() {
        let list: ProfileInput =
            serde_json::from_value(json!({ "skills": ["go", "rust"] })).unwrap();
        assert_eq!(
            list.skills,
            Some(SkillsInput::List(vec!["go".to_string(), "rust".to_string()]))
        );

        let text: ProfileInput = serde_json::from_value(json!({ "skills": "go, rust" })).unwrap();
        assert_eq!(text.skills, Some(SkillsInput::Delimited("go, rust".to_string())));
    }

    #[test]
    fn misspelled_fields_are_rejected() {
        let err = serde_json::from_value::<ProfileInput>(json!({ "stauts": "Developer" }));
        assert!(err.is_err());

        let err = serde_json::from_value::<ExperienceInput>(json!({
            "title": "Dev",
            "company": "Acme",
            "from": "2020-01-01",
            "until": "2021-01-01",
        }));
        assert!(err.is_err());

        let err = serde_json::from_value::<EducationInput>(json!({ "field_of_study": "CS" }));
        assert!(err.is_err());
    }

    #[test]
    fn blank_skills_fail_validation() {
        let input: ProfileInput = serde_json::from_value(json!({ "skills": "  " })).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn experience_requires_title_company_and_from() {
        let err = ExperienceInput::default().into_entry().unwrap_err();
        match err {
            ApiError::ValidationFailed(errors) => assert_eq!(errors.len(), 3),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn experience_entry_gets_fresh_id_and_dates() {
        let input = ExperienceInput {
            title: Some("Engineer".to_string()),
            company: Some("Acme".to_string()),
            from: Some("2019-04-01".to_string()),
            current: Some(true),
            ..Default::default()
        };

        let entry = input.into_entry().unwrap();
        assert_eq!(entry.from, NaiveDate::from_ymd_opt(2019, 4, 1).unwrap());
        assert!(entry.to.is_none());
        assert!(entry.current);
    }

    #[test]
    fn education_rejects_bad_dates() {
        let input = EducationInput {
            school: Some("MIT".to_string()),
            degree: Some("BSc".to_string()),
            fieldofstudy: Some("CS".to_string()),
            from: Some("last year".to_string()),
            ..Default::default()
        };
        assert!(input.into_entry().is_err());
    }

    #[test]
    fn stored_profile_without_optional_fields_decodes() {
        let id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let profile: Profile = serde_json::from_value(json!({
            "id": id,
            "user_id": user_id,
            "status": "dev",
            "date": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert!(profile.skills.is_empty());
        assert!(profile.experience.is_empty());
        assert!(profile.social.is_none());
    }
}
