use crate::{
    auth::backend::AdminBackend,
    error::{ShowcaseError, ShowcaseResult},
};
use axum_login::AuthSession;

pub mod backend;
pub mod postgres_store;

pub type ShowcaseSession = AuthSession<AdminBackend>;

pub trait AuthUtilities {
    fn is_admin(&self) -> bool;
    fn ensure_admin(&self) -> ShowcaseResult<()>;
}

impl AuthUtilities for ShowcaseSession {
    fn is_admin(&self) -> bool {
        self.user.is_some()
    }

    fn ensure_admin(&self) -> ShowcaseResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ShowcaseError::NotLoggedIn)
        }
    }
}
