use serde::{Deserialize, Serialize};

/// En källhänvisning kopplad till en medlem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSource {
    pub label: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl MemberSource {
    pub fn new(label: impl Into<String>, url: Option<String>) -> Self {
        Self {
            label: label.into(),
            url,
        }
    }
}

/// En medlem i släktträdet. `parent_id = None` markerar en rot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "fatherId")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub death_year: Option<i32>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub sources: Vec<MemberSource>,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: parent_id.map(str::to_string),
            birth_year: None,
            death_year: None,
            biography: None,
            tagline: None,
            sources: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Levnadsår för visning, `?` för okända år
    pub fn years_display(&self) -> String {
        match (self.birth_year, self.death_year) {
            (None, None) => String::new(),
            (birth, death) => format!(
                "{} – {}",
                birth.map(|y| y.to_string()).unwrap_or_else(|| "?".into()),
                death.map(|y| y.to_string()).unwrap_or_else(|| "?".into()),
            ),
        }
    }

    pub fn validate(&self) -> Result<(), MemberValidationError> {
        if self.id.trim().is_empty() {
            return Err(MemberValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(MemberValidationError::EmptyName(self.id.clone()));
        }
        if let (Some(birth), Some(death)) = (self.birth_year, self.death_year) {
            if death < birth {
                return Err(MemberValidationError::DeathBeforeBirth(self.id.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemberValidationError {
    #[error("Medlem saknar ID")]
    EmptyId,
    #[error("Medlem {0} saknar namn")]
    EmptyName(String),
    #[error("Medlem {0}: dödsår före födelseår")]
    DeathBeforeBirth(String),
}
