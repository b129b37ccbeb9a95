use serde::{Deserialize, Deserializer, Serialize};

/// Returned as the only element of the result whenever the provider call or parsing fails
pub const FALLBACK_MESSAGE: &str = "Error: Could not fetch recommendations. Please try again.";

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RecommendRequest {
    // Missing or null behaves like an empty list
    #[serde(default, deserialize_with = "null_as_empty")]
    pub skills: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ordered job titles, or the single-element fallback
pub type RecommendationResult = Vec<String>;

pub fn fallback_result() -> RecommendationResult {
    vec![FALLBACK_MESSAGE.to_string()]
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_missing_or_null_is_empty() {
        for raw in [r#"{}"#, r#"{"skills":null}"#, r#"{"skills":[]}"#] {
            let request: RecommendRequest = serde_json::from_str(raw).unwrap();
            assert!(request.skills.is_empty(), "{}", raw);
        }

        let request: RecommendRequest = serde_json::from_str(r#"{"skills":["Rust"]}"#).unwrap();
        assert_eq!(request.skills, vec!["Rust"]);
    }

    #[test]
    fn test_skills_wrong_type_still_rejected() {
        assert!(serde_json::from_str::<RecommendRequest>(r#"{"skills":"Rust"}"#).is_err());
    }
}
