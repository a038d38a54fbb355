//! The `finboard login` command.

use crate::api::{self, Mode, SessionProvider, User};
use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use tracing::debug;

/// Signs in with email and password and saves the session to the home directory.
///
/// In `Mode::Test` no request is made; the offline backend's user is reported instead.
///
/// # Errors
/// - Returns an error if the credentials are rejected or the session cannot be saved.
pub async fn login(config: &Config, mode: Mode, email: &str, password: &str) -> Result<Out<User>> {
    let user = match mode {
        Mode::Rest => {
            let session = SessionProvider::sign_in(config, email, password)
                .await
                .context("Unable to sign in")?;
            debug!(
                "Session saved to {}, valid until {}",
                session.path().display(),
                session.expires_at()
            );
            session.user().clone()
        }
        Mode::Test => api::backend(config, mode).await?.user().await?,
    };
    let who = user.email.clone().unwrap_or_else(|| user.id.clone());
    Ok(Out::new(format!("Signed in as {who}"), user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_login_in_test_mode() {
        let env = TestEnv::new().await;
        let out = login(&env.config(), Mode::Test, "x@example.com", "secret")
            .await
            .unwrap();
        assert_eq!(out.message(), "Signed in as test@example.com");
        assert_eq!(out.structure().unwrap().id, "test-user");
    }

    #[tokio::test]
    async fn test_rest_backend_requires_session() {
        let env = TestEnv::new().await;
        let result = api::backend(&env.config(), Mode::Rest).await;
        let message = format!("{:#}", result.err().unwrap());
        assert!(message.contains("finboard login"));
    }
}
