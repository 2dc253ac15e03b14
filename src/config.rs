use crate::{
    config::{admin::AdminConfig, storage::StorageConfig},
    error::{BadEnvVarSnafu, ParsePortSnafu, ShowcaseResult},
};
use dotenvy::var;
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use std::sync::Arc;

pub mod admin;
pub mod storage;

///what the running server needs after it's connected to the database
#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    storage_config: Arc<StorageConfig>,
    admin_config: Arc<AdminConfig>,
}

impl RuntimeConfiguration {
    pub fn new() -> ShowcaseResult<Self> {
        Ok(Self::from_parts(StorageConfig::new()?, AdminConfig::new()?))
    }

    pub fn from_parts(storage_config: StorageConfig, admin_config: AdminConfig) -> Self {
        Self {
            storage_config: Arc::new(storage_config),
            admin_config: Arc::new(admin_config),
        }
    }

    pub fn storage_config(&self) -> Arc<StorageConfig> {
        self.storage_config.clone()
    }

    pub fn admin_config(&self) -> Arc<AdminConfig> {
        self.admin_config.clone()
    }
}

#[derive(Debug)]
pub struct DbConfig {
    user: String,
    password: SecretString,
    path: String,
    port: u16,
    database: String,
}

impl DbConfig {
    pub fn new() -> ShowcaseResult<Self> {
        Self::from_env("DB_USER", "DB_PASSWORD")
    }

    ///same database, but logged in as the role the bulk seeder is allowed to write with
    pub fn elevated() -> ShowcaseResult<Self> {
        Self::from_env("SEED_DB_USER", "SEED_DB_PASSWORD")
    }

    fn from_env(user_var: &'static str, password_var: &'static str) -> ShowcaseResult<Self> {
        let get_env_var = |name| var(name).context(BadEnvVarSnafu { name });

        Ok(Self {
            user: get_env_var(user_var)?,
            password: SecretString::from(get_env_var(password_var)?),
            path: get_env_var("DB_PATH")?,
            port: get_env_var("DB_PORT")?.parse().context(ParsePortSnafu)?,
            database: get_env_var("DB_NAME")?,
        })
    }

    pub fn get_db_path(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.path,
            self.port,
            self.database
        )
    }
}
