pub mod user_store;

#[cfg(test)]
pub mod memory;

pub use user_store::*;

use crate::models::USERS_COLLECTION;
use mongodb::{Client, Collection, Database};
use std::error::Error;

const DEFAULT_DB_NAME: &str = "job_recommender";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        let db = client.database(&database_name_from_uri(uri));

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Unique indexes on users; the username index closes the check-then-insert race on registration
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let users = self.database().collection::<mongodb::bson::Document>(USERS_COLLECTION);

        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(username_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(username) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let user_id_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(user_id_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(user_id) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

/// Database name is the URI path segment, e.g. `mongodb://host:27017/recommender?retryWrites=true`
fn database_name_from_uri(uri: &str) -> String {
    let without_scheme = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);

    without_scheme
        .split_once('/')
        .map(|(_, path)| path.split('?').next().unwrap_or(""))
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DB_NAME)
        .to_string()
}
