use anyhow::{Context, Result};
use keyring::Entry;
use tracing::debug;

/// Keychain service name for stored passwords
const SERVICE_NAME: &str = "couriersync";

/// OS keychain storage for the login password, so repeat logins can skip
/// the password prompt. Everything here is convenience: a missing or
/// broken keychain only means the user types the password again.
pub struct CredentialStore;

impl CredentialStore {
    /// Store the password for a username in the OS keychain
    pub fn store(username: &str, password: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, username)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(password)
            .context("Failed to store password in keychain")?;
        Ok(())
    }

    /// Stored password for a username, if the keychain has one.
    /// Keychain errors read as "nothing stored".
    pub fn stored_password(username: &str) -> Option<String> {
        let entry = match Entry::new(SERVICE_NAME, username) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "keychain unavailable");
                return None;
            }
        };
        entry.get_password().ok()
    }

    /// Delete the stored password for a username
    pub fn forget(username: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, username)
            .context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete credential from keychain")?;
        Ok(())
    }
}
