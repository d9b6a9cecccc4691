//! Public/Admin session state
//!
//! The admin gate is a plaintext comparison against one shared secret held
//! by the client. Anyone who can run the client can bypass it, so it only
//! hides the editing controls; it does not protect the data.

use super::store::FlagStore;
use crate::error::StoreError;

/// Key of the durable admin flag
pub const ADMIN_FLAG_KEY: &str = "ultra_portfolio_admin";

/// Value stored under [`ADMIN_FLAG_KEY`] while in admin mode
const ADMIN_FLAG_VALUE: &str = "true";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Public,
    Admin,
}

/// Outcome of a credential check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Granted,
    Denied,
}

#[derive(Debug, Clone)]
pub struct Session {
    mode: Mode,
    secret: String,
}

impl Session {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            mode: Mode::Public,
            secret: secret.into(),
        }
    }

    /// Restore the mode persisted by a previous run.
    /// Anything other than the exact admin value reads as public.
    pub async fn restore(
        secret: impl Into<String>,
        flags: &dyn FlagStore,
    ) -> Result<Self, StoreError> {
        let mut session = Self::new(secret);
        if flags.read_flag(ADMIN_FLAG_KEY).await?.as_deref() == Some(ADMIN_FLAG_VALUE) {
            session.mode = Mode::Admin;
        }
        Ok(session)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_admin(&self) -> bool {
        self.mode == Mode::Admin
    }

    /// Switch to admin mode if `password` matches the shared secret.
    /// The flag is written before the in-memory mode changes.
    pub async fn login(
        &mut self,
        password: &str,
        flags: &dyn FlagStore,
    ) -> Result<LoginOutcome, StoreError> {
        if password != self.secret {
            tracing::warn!("Admin login rejected");
            return Ok(LoginOutcome::Denied);
        }

        flags.write_flag(ADMIN_FLAG_KEY, ADMIN_FLAG_VALUE).await?;
        self.mode = Mode::Admin;
        tracing::info!("🔓 Admin mode enabled");

        Ok(LoginOutcome::Granted)
    }

    pub async fn logout(&mut self, flags: &dyn FlagStore) -> Result<(), StoreError> {
        flags.clear_flag(ADMIN_FLAG_KEY).await?;
        self.mode = Mode::Public;
        tracing::info!("🔒 Back to public mode");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::library::Library;

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let library = Library::open_in_memory().unwrap();
        let mut session = Session::new("admin");

        let outcome = session.login("guess", &library).await.unwrap();

        assert_eq!(outcome, LoginOutcome::Denied);
        assert_eq!(session.mode(), Mode::Public);
        assert_eq!(library.read_flag(ADMIN_FLAG_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_admin_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        {
            let library = Library::open(dir.path()).unwrap();
            let mut session = Session::new("admin");
            assert_eq!(
                session.login("admin", &library).await.unwrap(),
                LoginOutcome::Granted
            );
            assert!(session.is_admin());
        }

        let library = Library::open(dir.path()).unwrap();
        let restored = Session::restore("admin", &library).await.unwrap();
        assert_eq!(restored.mode(), Mode::Admin);
    }

    #[tokio::test]
    async fn test_logout_clears_flag() {
        let library = Library::open_in_memory().unwrap();
        let mut session = Session::new("admin");
        session.login("admin", &library).await.unwrap();

        session.logout(&library).await.unwrap();

        assert_eq!(session.mode(), Mode::Public);
        let restored = Session::restore("admin", &library).await.unwrap();
        assert_eq!(restored.mode(), Mode::Public);
    }

    #[tokio::test]
    async fn test_unexpected_flag_value_reads_as_public() {
        let library = Library::open_in_memory().unwrap();
        library.write_flag(ADMIN_FLAG_KEY, "yes").await.unwrap();

        let restored = Session::restore("admin", &library).await.unwrap();
        assert_eq!(restored.mode(), Mode::Public);
    }
}
