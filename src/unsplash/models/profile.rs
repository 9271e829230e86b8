use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Body of `GET /me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResult {
    username: String,
    first_name: Option<String>,
    last_name: Option<String>,
    bio: Option<String>,
}

impl ProfileResult {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }
}

/// Body of `GET /users/{username}`, reduced to the avatar renditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResult {
    profile_image: HashMap<String, String>,
}

impl UserResult {
    pub fn avatar_url(&self) -> Option<&str> {
        self.profile_image.get("small").map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_tolerates_null_names() {
        let profile: ProfileResult = serde_json::from_str(
            r#"{"username":"jdoe","first_name":"Jane","last_name":null,"bio":null,"id":"x"}"#,
        )
        .unwrap();

        assert_eq!(profile.username(), "jdoe");
        assert_eq!(profile.first_name(), Some("Jane"));
        assert_eq!(profile.last_name(), None);
    }

    #[test]
    fn avatar_is_the_small_rendition() {
        let user: UserResult = serde_json::from_str(
            r#"{"profile_image":{"small":"https://x/s.jpg","large":"https://x/l.jpg"}}"#,
        )
        .unwrap();

        assert_eq!(user.avatar_url(), Some("https://x/s.jpg"));
    }
}
