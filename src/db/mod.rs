use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};
use std::time::Duration;

use crate::{config::Config, errors::AppResult};

const APP_NAME: &str = "learnwise";

#[derive(Clone)]
pub struct Database {
    client: Client,
    db_name: String,
}

/// Each CLI command runs its store operations one at a time, so the pool stays small.
async fn client_options(config: &Config) -> AppResult<ClientOptions> {
    let mut options = ClientOptions::parse(&config.mongo_conn_string).await?;

    options.app_name = Some(APP_NAME.to_string());
    options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
    options.max_pool_size = Some(4);
    options.connect_timeout = Some(Duration::from_secs(5));
    options.server_selection_timeout = Some(Duration::from_secs(5));

    Ok(options)
}

impl Database {
    /// Connects and pings, so an unreachable server fails here rather than on first use.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let client = Client::with_options(client_options(config).await?)?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        log::info!("Connected to MongoDB database '{}'", config.mongo_db_name);

        Ok(Self {
            client,
            db_name: config.mongo_db_name.clone(),
        })
    }

    pub fn get_collection<T>(&self, collection_name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client
            .database(&self.db_name)
            .collection(collection_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_structure() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Database>();
    }

    #[tokio::test]
    async fn client_options_identify_the_app() {
        let options = client_options(&Config::test_config())
            .await
            .expect("plain mongodb URI parses without a server");

        assert_eq!(options.app_name.as_deref(), Some("learnwise"));
        assert_eq!(options.max_pool_size, Some(4));
        assert_eq!(options.server_selection_timeout, Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn bad_connection_string_is_a_database_error() {
        let mut config = Config::test_config();
        config.mongo_conn_string = "localhost:27017".to_string();

        let err = client_options(&config).await.unwrap_err();

        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }
}
