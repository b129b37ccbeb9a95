// In-memory UserStore used by service and handler tests
use crate::{database::UserStore, models::User, utils::AppError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    skill_writes: AtomicUsize,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `set_skills` call fail, simulating an unavailable database
    pub fn failing_writes() -> Self {
        let store = Self::default();
        store.fail_writes.store(true, Ordering::SeqCst);
        store
    }

    /// Makes every lookup fail, as if the database dropped the connection
    pub fn failing_reads() -> Self {
        let store = Self::default();
        store.fail_reads.store(true, Ordering::SeqCst);
        store
    }

    pub fn with_user(self, user: User) -> Self {
        self.users.lock().unwrap().push(user);
        self
    }

    /// Number of `set_skills` calls, successful or not
    pub fn skill_writes(&self) -> usize {
        self.skill_writes.load(Ordering::SeqCst)
    }

    pub fn skills_of(&self, user_id: &str) -> Option<Vec<String>> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user_id == user_id)
            .map(|u| u.skills.clone())
    }

    fn check_reads(&self) -> Result<(), AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError("server selection timeout".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.check_reads()?;
        Ok(self.users.lock().unwrap().iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.check_reads()?;
        Ok(self.users.lock().unwrap().iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(AppError::Conflict(format!("username '{}' already exists", user.username)));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_reads()
    }

    async fn set_skills(&self, user_id: &str, skills: &[String]) -> Result<(), AppError> {
        self.skill_writes.fetch_add(1, Ordering::SeqCst);

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError("connection reset".to_string()));
        }

        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.user_id == user_id) {
            Some(user) => {
                user.skills = skills.to_vec();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("User {} not found", user_id))),
        }
    }
}
