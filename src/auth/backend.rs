use crate::{
    config::admin::AdminConfig,
    error::{JoinBlockingTaskSnafu, ShowcaseError},
};
use async_trait::async_trait;
use axum_login::{AuthUser, AuthnBackend, UserId};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use snafu::ResultExt;
use std::sync::Arc;

/// The logged-in admin. There is only ever one, identified by the configured email.
#[derive(Debug, Clone)]
pub struct Admin {
    pub email: String,
    bcrypt_hashed_password: SecretString,
}

impl Admin {
    fn from_config(config: &AdminConfig) -> Self {
        Self {
            email: config.email().to_string(),
            bcrypt_hashed_password: config.hashed_password().clone(),
        }
    }
}

impl AuthUser for Admin {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.email.clone()
    }

    //changing the password logs everyone out
    fn session_auth_hash(&self) -> &[u8] {
        self.bcrypt_hashed_password.expose_secret().as_bytes()
    }
}

#[derive(Clone, Deserialize)]
pub struct AdminCredentials {
    pub email: String,
    pub password: SecretString,
}

#[derive(Clone)]
pub struct AdminBackend {
    admin_config: Arc<AdminConfig>,
}

impl AdminBackend {
    pub const fn new(admin_config: Arc<AdminConfig>) -> Self {
        Self { admin_config }
    }
}

#[async_trait]
impl AuthnBackend for AdminBackend {
    type User = Admin;
    type Credentials = AdminCredentials;
    type Error = ShowcaseError;

    async fn authenticate(
        &self,
        AdminCredentials { email, password }: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        let config = self.admin_config.clone();
        let verified = tokio::task::spawn_blocking(move || config.verify(&email, &password))
            .await
            .context(JoinBlockingTaskSnafu)??;

        if verified {
            info!("Admin logged in");
            Ok(Some(Admin::from_config(&self.admin_config)))
        } else {
            warn!("Failed admin login attempt");
            Ok(None)
        }
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        Ok((user_id == self.admin_config.email().as_str())
            .then(|| Admin::from_config(&self.admin_config)))
    }
}
