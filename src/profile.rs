use serde::Serialize;

use crate::unsplash::ProfileResult;

/// The signed-in user as shown on the profile screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    username: String,
    name: String,
    login_name: String,
    bio: Option<String>,
}

impl Profile {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn login_name(&self) -> &str {
        &self.login_name
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }
}

impl From<&ProfileResult> for Profile {
    fn from(profile: &ProfileResult) -> Self {
        let name = [profile.first_name(), profile.last_name()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            username: profile.username().to_owned(),
            name,
            login_name: format!("@{}", profile.username()),
            bio: profile.bio().map(str::to_owned),
        }
    }
}
