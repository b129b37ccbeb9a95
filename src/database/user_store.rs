use crate::{
    database::MongoDB,
    models::{User, USERS_COLLECTION},
    utils::AppError,
};
use async_trait::async_trait;
use mongodb::bson::{doc, DateTime as BsonDateTime};
use mongodb::error::{ErrorKind, WriteFailure};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Persistence operations the auth and recommendation flows need from the credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Fails with `AppError::Conflict` when the username is already taken
    async fn insert_user(&self, user: &User) -> Result<(), AppError>;

    /// Replaces the whole skills array; fails with `AppError::NotFound` if no document matched
    async fn set_skills(&self, user_id: &str, skills: &[String]) -> Result<(), AppError>;

    /// Cheap round trip used by the health endpoint
    async fn ping(&self) -> Result<(), AppError>;
}

#[async_trait]
impl UserStore for MongoDB {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let collection = self.collection::<User>(USERS_COLLECTION);

        let user = collection.find_one(doc! { "user_id": user_id }).await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let collection = self.collection::<User>(USERS_COLLECTION);

        let user = collection.find_one(doc! { "username": username }).await?;

        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let collection = self.collection::<User>(USERS_COLLECTION);

        match collection.insert_one(user).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(AppError::Conflict(format!(
                "username '{}' already exists",
                user.username
            ))),
            Err(e) => Err(AppError::DatabaseError(format!("Failed to create user: {}", e))),
        }
    }

    async fn set_skills(&self, user_id: &str, skills: &[String]) -> Result<(), AppError> {
        let collection = self.collection::<User>(USERS_COLLECTION);

        let update = doc! {
            "$set": {
                "skills": skills.to_vec(),
                "updated_at": BsonDateTime::now(),
            }
        };

        let result = collection
            .update_one(doc! { "user_id": user_id }, update)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update skills: {}", e)))?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.database().run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        _ => false,
    }
}
