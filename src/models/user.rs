use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

pub const USERS_COLLECTION: &str = "users";

// User document as stored in MongoDB
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub user_id: String,  // PRIMARY IDENTIFIER - referenced by sessions
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

impl User {
    /// New account with an empty skill list and a freshly generated user_id
    pub fn new(username: &str, password_hash: String) -> Self {
        let now = BsonDateTime::now();
        Self {
            _id: None,
            user_id: ObjectId::new().to_hex(),
            username: username.to_string(),
            password_hash,
            skills: Vec::new(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// Public view of a user; never carries the password hash
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub skills: Vec<String>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.clone(),
            username: user.username.clone(),
            skills: user.skills.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_starts_without_skills() {
        let user = User::new("alice", "hash".to_string());
        assert!(user.skills.is_empty());
        assert_eq!(user.user_id.len(), 24);
        assert!(user._id.is_none());
    }

    #[test]
    fn test_user_info_hides_password_hash() {
        let user = User::new("alice", "secret-hash".to_string());
        let json = serde_json::to_string(&UserInfo::from(&user)).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"username\":\"alice\""));
    }

    #[test]
    fn test_missing_skills_field_defaults_to_empty() {
        let doc = mongodb::bson::doc! {
            "user_id": "abc",
            "username": "bob",
            "password_hash": "h",
        };
        let user: User = mongodb::bson::from_document(doc).unwrap();
        assert!(user.skills.is_empty());
        assert!(user.created_at.is_none());
    }
}
