//! User profile types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marketplace role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Client,
    Freelancer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Client => f.write_str("client"),
            Role::Freelancer => f.write_str("freelancer"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "freelancer" => Ok(Role::Freelancer),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// A single portfolio entry on a freelancer profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// A public user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub username: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub bio: String,
    pub role: Role,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default)]
    pub reviews_count: u32,
    #[serde(default)]
    pub portfolio: Vec<PortfolioItem>,
    pub joined_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parses_lowercase() {
        assert_eq!("freelancer".parse::<Role>().unwrap(), Role::Freelancer);
        assert_eq!(Role::default(), Role::Client);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_profile_minimal_payload() {
        let json = r#"{
            "id": "u-7",
            "username": "mara",
            "displayName": "Mara",
            "role": "freelancer",
            "joinedAt": "2024-06-01T00:00:00Z"
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.role, Role::Freelancer);
        assert!(profile.portfolio.is_empty());
        assert!(profile.hourly_rate.is_none());
    }
}
