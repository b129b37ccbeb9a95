use crate::{
    api::metrics,
    database::UserStore,
    models::{fallback_result, RecommendationResult},
    services::openai_service::{ChatPrompt, CompletionProvider},
    utils::AppError,
};

pub const NO_SKILLS_MESSAGE: &str = "No skills provided";

const SYSTEM_PROMPT: &str = "You are a 'Smart Job Recommender' assistant. Your task is to analyze a \
    list of skills and recommend 5 relevant job titles. \
    Return ONLY a JSON array of strings, with nothing else. \
    Do not add any introductory text, extra explanations, or markdown. \
    Example format: [\"Data Scientist\", \"Software Engineer\", \"Product Manager\"]";

const SKILLS_LABEL: &str = "Skills: ";
const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f32 = 0.5;

/// Prompt for a skill list: fixed system instruction plus the skills comma-joined in input order
pub fn build_prompt(skills: &[String]) -> ChatPrompt {
    ChatPrompt {
        system: SYSTEM_PROMPT.to_string(),
        user: format!("{}{}", SKILLS_LABEL, skills.join(", ")),
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    }
}

/// Strict parse of the provider text as a JSON array of strings
pub fn parse_recommendations(content: &str) -> Result<RecommendationResult, AppError> {
    serde_json::from_str::<Vec<String>>(content)
        .map_err(|e| AppError::ProviderError(format!("Response is not a JSON array of strings: {}", e)))
}

/// Saves the skills to the user's profile and asks the provider for job titles.
///
/// Only an empty skill list is an error. A failed profile save is logged and ignored,
/// and any provider or parsing failure degrades to the fallback result.
pub async fn submit_skills(
    store: &dyn UserStore,
    provider: &dyn CompletionProvider,
    user_id: &str,
    skills: &[String],
) -> Result<RecommendationResult, AppError> {
    if skills.is_empty() {
        return Err(AppError::Validation(NO_SKILLS_MESSAGE.to_string()));
    }

    metrics::increment_recommendation_requests();

    if let Err(e) = store.set_skills(user_id, skills).await {
        metrics::increment_skill_save_failures();
        log::warn!("⚠️  Error updating skills for user {}: {}", user_id, e);
    }

    Ok(get_job_recommendations(provider, skills).await)
}

/// One provider call, no retries; never fails
pub async fn get_job_recommendations(
    provider: &dyn CompletionProvider,
    skills: &[String],
) -> RecommendationResult {
    let prompt = build_prompt(skills);

    let outcome = match provider.complete(&prompt).await {
        Ok(content) => parse_recommendations(&content),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(job_titles) => {
            log::info!("✅ Received {} job recommendations", job_titles.len());
            job_titles
        }
        Err(e) => {
            metrics::increment_recommendation_fallbacks();
            log::error!("❌ Error calling recommendation provider: {}", e);
            fallback_result()
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Provider that replays a canned outcome and records every prompt it receives
    pub struct ScriptedProvider {
        outcome: Result<String, AppError>,
        prompts: Mutex<Vec<ChatPrompt>>,
    }

    impl ScriptedProvider {
        pub fn replying(content: &str) -> Self {
            Self { outcome: Ok(content.to_string()), prompts: Mutex::new(Vec::new()) }
        }

        pub fn failing(error: AppError) -> Self {
            Self { outcome: Err(error), prompts: Mutex::new(Vec::new()) }
        }

        pub fn prompts(&self) -> Vec<ChatPrompt> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(&self, prompt: &ChatPrompt) -> Result<String, AppError> {
            self.prompts.lock().unwrap().push(prompt.clone());
            self.outcome.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::ScriptedProvider;
    use super::*;
    use crate::database::memory::InMemoryUserStore;
    use crate::models::{User, FALLBACK_MESSAGE};

    const FIVE_TITLES: &str =
        r#"["Data Analyst","Backend Engineer","Data Engineer","BI Developer","ML Engineer"]"#;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn store_with_user() -> (InMemoryUserStore, String) {
        let user = User::new("alice", "hash".to_string());
        let user_id = user.user_id.clone();
        (InMemoryUserStore::new().with_user(user), user_id)
    }

    #[test]
    fn test_prompt_lists_skills_in_order() {
        let prompt = build_prompt(&skills(&["Python", "SQL", "Docker"]));
        assert_eq!(prompt.user, "Skills: Python, SQL, Docker");
        assert_eq!(prompt.max_tokens, 150);
        assert_eq!(prompt.temperature, 0.5);
        assert!(prompt.system.contains("5 relevant job titles"));
        assert!(prompt.system.contains("ONLY a JSON array of strings"));
    }

    #[test]
    fn test_parse_rejects_prose_and_non_string_arrays() {
        assert!(parse_recommendations("Sure! Here are some jobs: ...").is_err());
        assert!(parse_recommendations(r#"{"jobs":["A"]}"#).is_err());
        assert!(parse_recommendations("[1, 2, 3]").is_err());
        assert!(parse_recommendations("```json\n[\"A\"]\n```").is_err());
    }

    #[tokio::test]
    async fn test_end_to_end_python_sql() {
        let (store, user_id) = store_with_user();
        let provider = ScriptedProvider::replying(FIVE_TITLES);

        let result = submit_skills(&store, &provider, &user_id, &skills(&["Python", "SQL"]))
            .await
            .unwrap();

        assert_eq!(
            result,
            skills(&["Data Analyst", "Backend Engineer", "Data Engineer", "BI Developer", "ML Engineer"])
        );
        assert_eq!(store.skills_of(&user_id), Some(skills(&["Python", "SQL"])));

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].user, "Skills: Python, SQL");
    }

    #[tokio::test]
    async fn test_empty_skills_has_no_side_effects() {
        let (store, user_id) = store_with_user();
        let provider = ScriptedProvider::replying(FIVE_TITLES);

        let err = submit_skills(&store, &provider, &user_id, &[]).await.unwrap_err();

        assert_eq!(err, AppError::Validation("No skills provided".to_string()));
        assert!(provider.prompts().is_empty());
        assert_eq!(store.skill_writes(), 0);
    }

    #[tokio::test]
    async fn test_result_is_returned_verbatim() {
        let (store, user_id) = store_with_user();
        let provider = ScriptedProvider::replying(r#"["C","A","C","B"]"#);

        let result = submit_skills(&store, &provider, &user_id, &skills(&["Rust"])).await.unwrap();

        assert_eq!(result, skills(&["C", "A", "C", "B"]));
    }

    #[tokio::test]
    async fn test_skills_replace_previous_list() {
        let mut user = User::new("bob", "hash".to_string());
        user.skills = skills(&["COBOL", "Fortran"]);
        let user_id = user.user_id.clone();
        let store = InMemoryUserStore::new().with_user(user);
        let provider = ScriptedProvider::replying(r#"["A"]"#);

        submit_skills(&store, &provider, &user_id, &skills(&["Rust"])).await.unwrap();

        assert_eq!(store.skills_of(&user_id), Some(skills(&["Rust"])));
    }

    #[tokio::test]
    async fn test_non_json_reply_falls_back() {
        let (store, user_id) = store_with_user();
        let provider = ScriptedProvider::replying("Sure! Here are some jobs: Data Analyst, ...");

        let result = submit_skills(&store, &provider, &user_id, &skills(&["SQL"])).await.unwrap();

        assert_eq!(result, vec![FALLBACK_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_provider_failure_matches_malformed_fallback() {
        let (store, user_id) = store_with_user();
        let timeout = ScriptedProvider::failing(AppError::ProviderError("request timed out".into()));
        let garbage = ScriptedProvider::replying("not json");

        let from_timeout = submit_skills(&store, &timeout, &user_id, &skills(&["SQL"])).await.unwrap();
        let from_garbage = submit_skills(&store, &garbage, &user_id, &skills(&["SQL"])).await.unwrap();

        assert_eq!(from_timeout, from_garbage);
        assert_eq!(from_timeout, vec![FALLBACK_MESSAGE.to_string()]);
        assert_eq!(timeout.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_persistence_failure_does_not_block_recommendations() {
        let store = InMemoryUserStore::failing_writes();
        let provider = ScriptedProvider::replying(r#"["Backend Engineer"]"#);

        let result = submit_skills(&store, &provider, "any-user", &skills(&["Go"])).await.unwrap();

        assert_eq!(result, skills(&["Backend Engineer"]));
        assert_eq!(store.skill_writes(), 1);
        assert_eq!(provider.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_user_still_gets_recommendations() {
        let store = InMemoryUserStore::new();
        let provider = ScriptedProvider::replying(r#"["Analyst"]"#);

        let result = submit_skills(&store, &provider, "missing", &skills(&["Excel"])).await.unwrap();

        assert_eq!(result, skills(&["Analyst"]));
    }
}
