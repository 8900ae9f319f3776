use serde::{Deserialize, Serialize};

/// An uploaded image as the API references it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<ImageRef>,
}

/// An account record as returned by the authentication endpoints.
///
/// The nested profile is optional: freshly registered accounts have none
/// until the user fills one in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile: Option<Profile>,
}

impl User {
    /// Display name for headers and comment bylines: profile name when the
    /// user has set one, username otherwise.
    pub fn display_name(&self) -> &str {
        self.profile
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub user: Option<User>,
}

impl Post {
    pub fn author_name(&self) -> &str {
        self.user.as_ref().map(|u| u.display_name()).unwrap_or("unknown")
    }

    pub fn caption(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub content: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// A post together with the viewer-dependent data the detail screen needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    pub post: Post,
    pub likes: u64,
    pub liked_by_viewer: bool,
}

/// Successful response of `POST auth/local`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInResponse {
    pub jwt: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_profile(name: Option<&str>) -> User {
        User {
            id: 1,
            username: "jdoe".to_string(),
            email: "j@d.oe".to_string(),
            profile: Some(Profile {
                id: 7,
                name: name.map(str::to_string),
                bio: None,
                avatar: None,
            }),
        }
    }

    #[test]
    fn test_display_name_prefers_profile_name() {
        let user = user_with_profile(Some("John Doe"));
        assert_eq!(user.display_name(), "John Doe");
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        assert_eq!(user_with_profile(None).display_name(), "jdoe");
        assert_eq!(user_with_profile(Some("")).display_name(), "jdoe");

        let bare = User {
            id: 2,
            username: "solo".to_string(),
            email: String::new(),
            profile: None,
        };
        assert_eq!(bare.display_name(), "solo");
    }

    #[test]
    fn test_post_accessors_tolerate_missing_fields() {
        let post = Post {
            id: 3,
            description: None,
            images: Vec::new(),
            user: None,
        };
        assert_eq!(post.author_name(), "unknown");
        assert_eq!(post.caption(), "");
    }

    #[test]
    fn test_user_deserializes_without_optional_fields() {
        let user: User = serde_json::from_str(r#"{"id": 9, "username": "kim"}"#).unwrap();
        assert_eq!(user.id, 9);
        assert_eq!(user.email, "");
        assert!(user.profile.is_none());
    }
}
