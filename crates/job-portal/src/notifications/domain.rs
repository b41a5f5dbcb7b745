use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audience a notification is addressed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    #[default]
    JobSeeker,
    Employer,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::JobSeeker => "job_seeker",
            UserType::Employer => "employer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "job_seeker" | "jobseeker" | "seeker" => Some(Self::JobSeeker),
            "employer" => Some(Self::Employer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub user_type: UserType,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload accepted by the emitter before an id and timestamp are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: i64,
    pub user_type: UserType,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_type_accepts_common_spellings() {
        assert_eq!(UserType::parse("job_seeker"), Some(UserType::JobSeeker));
        assert_eq!(UserType::parse(" Employer "), Some(UserType::Employer));
        assert_eq!(UserType::parse("admin"), None);
    }

    #[test]
    fn user_type_serializes_snake_case() {
        let value = serde_json::to_value(UserType::JobSeeker).expect("serializes");
        assert_eq!(value, serde_json::json!("job_seeker"));
    }
}
