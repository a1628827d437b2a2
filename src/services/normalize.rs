//! Builds the merge-set document for a profile upsert from raw profile input.

use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;
use uuid::Uuid;

use crate::error::{ApiError, FieldError};
use crate::models::{ProfileInput, SkillsInput, Social};

/// Fields written by one profile upsert. Absent fields are left as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub githubusername: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social: Option<Social>,
}

impl ProfileUpdate {
    /// Top-level fields for the store's merge-set
    pub fn into_fields(self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

pub fn build_profile_update(
    input: ProfileInput,
    acting_user_id: Uuid,
) -> Result<ProfileUpdate, ApiError> {
    let mut errors = Vec::new();

    let website = input.website.map(|website| {
        // A blank website is stored as given
        if website.trim().is_empty() {
            return website;
        }
        normalize_url(&website).unwrap_or_else(|_| {
            errors.push(FieldError::new("website", "Website must be a valid URL"));
            website
        })
    });

    let social = build_social(
        [
            ("youtube", input.youtube),
            ("twitter", input.twitter),
            ("instagram", input.instagram),
            ("linkedin", input.linkedin),
            ("facebook", input.facebook),
        ],
        &mut errors,
    );

    if !errors.is_empty() {
        return Err(ApiError::validation_failed(errors));
    }

    Ok(ProfileUpdate {
        user_id: acting_user_id,
        status: input.status,
        company: input.company,
        location: input.location,
        website,
        bio: input.bio,
        githubusername: input.githubusername,
        skills: input.skills.map(|skills| match skills {
            SkillsInput::List(items) => items,
            SkillsInput::Delimited(raw) => split_skills(&raw),
        }),
        social,
    })
}

/// All five links or nothing; partial input is dropped
fn build_social(
    links: [(&str, Option<String>); 5],
    errors: &mut Vec<FieldError>,
) -> Option<Social> {
    if !links.iter().all(|(_, v)| v.as_deref().is_some_and(|v| !v.is_empty())) {
        return None;
    }

    let [youtube, twitter, instagram, linkedin, facebook] = links.map(|(field, value)| {
        let value = value.unwrap_or_default();
        normalize_url(&value).unwrap_or_else(|_| {
            errors.push(FieldError::new(field, format!("{} must be a valid URL", field)));
            value
        })
    });

    Some(Social {
        youtube,
        twitter,
        instagram,
        linkedin,
        facebook,
    })
}

/// Comma-split; each skill is trimmed and then prefixed with a single space
pub fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',').map(|skill| format!(" {}", skill.trim())).collect()
}

/// Canonical HTTPS form: scheme forced to https, lowercase host without `www.`,
/// no trailing slash
pub fn normalize_url(raw: &str) -> Result<String, url::ParseError> {
    let trimmed = raw.trim();

    let with_scheme = if let Some(rest) = trimmed.strip_prefix("//") {
        format!("https://{}", rest)
    } else if trimmed
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http://"))
    {
        format!("https://{}", &trimmed[7..])
    } else if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&with_scheme)?;

    if let Some(bare) = url.host_str().and_then(|h| h.strip_prefix("www.")) {
        if bare.contains('.') {
            let bare = bare.to_string();
            url.set_host(Some(&bare))?;
        }
    }

    let path = url.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        url.set_path(path.trim_end_matches('/'));
    }

    let mut normalized = url.to_string();
    if url.path() == "/" && url.query().is_none() && url.fragment().is_none() {
        normalized.pop();
    }
    Ok(normalized)
}

fn has_scheme(s: &str) -> bool {
    s.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}
