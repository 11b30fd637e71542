use std::sync::Arc;

use anyhow::anyhow;
use tracing::{debug, info, warn};

use messagely_db::Database;
use messagely_db::models::NewUserRow;
use messagely_types::models::{Account, AccountProfile, PublicAccount, ReceivedMessage, SentMessage};

use crate::clock::{Clock, SystemClock};
use crate::config::{AuthPolicy, DirectoryConfig};
use crate::error::{DirectoryError, Result};
use crate::hasher::{Argon2Hasher, CredentialHasher};
use crate::records;

/// Accounts and the messages between them. Stateless apart from the shared
/// store handle; cheap to clone.
#[derive(Clone)]
pub struct AccountDirectory {
    db: Arc<Database>,
    hasher: Arc<dyn CredentialHasher>,
    clock: Arc<dyn Clock>,
    auth_policy: AuthPolicy,
    /// Verified against when the username is unknown, so both failure paths
    /// cost one hash verification.
    dummy_hash: Arc<str>,
}

impl AccountDirectory {
    pub fn new(db: Arc<Database>, config: DirectoryConfig) -> Result<Self> {
        let hasher = Argon2Hasher::new(config.hash_cost)?;
        let dummy_hash = hasher.hash("messagely-unknown-account")?;

        Ok(Self {
            db,
            hasher: Arc::new(hasher),
            clock: Arc::new(SystemClock),
            auth_policy: config.auth_policy,
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the hasher. The dummy hash stays the Argon2 one built in `new`.
    pub fn with_hasher(mut self, hasher: Arc<dyn CredentialHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    // -- Credentials --

    /// Create an account. The returned record carries the credential hash;
    /// callers must not send it anywhere.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
    ) -> Result<Account> {
        require_present(
            &[username, password, first_name, last_name, phone],
            "Username, password, first and last name, and phone are required",
        )?;

        let hasher = self.hasher.clone();
        let secret = password.to_owned();
        let credential_hash = blocking(move || hasher.hash(&secret)).await?;

        let join_at = records::format_timestamp(self.clock.now());

        let db = self.db.clone();
        let (name, first, last, phone_no) = (
            username.to_owned(),
            first_name.to_owned(),
            last_name.to_owned(),
            phone.to_owned(),
        );
        let inserted = blocking(move || {
            db.insert_user(&NewUserRow {
                username: &name,
                password: &credential_hash,
                first_name: &first,
                last_name: &last,
                phone: &phone_no,
                join_at: &join_at,
            })
        })
        .await?;

        let row = inserted.ok_or_else(|| {
            DirectoryError::Conflict(format!("Username '{}' is already taken", username))
        })?;

        let account = records::account(row)?;
        info!("Registered account {}", account.username);
        Ok(account)
    }

    /// Check a username/password pair and return the stored account.
    /// Issues no token; that is the caller's job.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Account> {
        require_present(&[username, password], "Username and password required")?;

        let db = self.db.clone();
        let name = username.to_owned();
        let row = blocking(move || db.get_user_by_username(&name)).await?;

        let Some(row) = row else {
            let hasher = self.hasher.clone();
            let secret = password.to_owned();
            let dummy = self.dummy_hash.clone();
            // outcome ignored; only the cost matters
            let _ = blocking(move || hasher.verify(&secret, &dummy)).await;

            warn!("Authentication failed for {}: unknown username", username);
            return Err(self.auth_policy.unknown_username());
        };

        let hasher = self.hasher.clone();
        let secret = password.to_owned();
        let stored = row.password.clone();
        let matches = blocking(move || hasher.verify(&secret, &stored)).await?;

        if !matches {
            warn!("Authentication failed for {}: incorrect password", username);
            return Err(self.auth_policy.wrong_password());
        }

        records::account(row).map_err(Into::into)
    }

    /// Stamp `last_login_at` with the current time. Unknown usernames are a
    /// silent no-op.
    pub async fn update_login_timestamp(&self, username: &str) -> Result<()> {
        let at = records::format_timestamp(self.clock.now());

        let db = self.db.clone();
        let name = username.to_owned();
        let changed = blocking(move || db.update_last_login(&name, &at)).await?;

        if changed == 0 {
            debug!("Login timestamp not updated: no account {}", username);
        } else {
            info!("Recorded login for {}", username);
        }
        Ok(())
    }

    // -- Queries --

    pub async fn all(&self) -> Result<Vec<PublicAccount>> {
        let db = self.db.clone();
        let rows = blocking(move || db.list_users()).await?;
        Ok(rows.into_iter().map(records::public).collect())
    }

    pub async fn get(&self, username: &str) -> Result<AccountProfile> {
        let db = self.db.clone();
        let name = username.to_owned();
        let row = blocking(move || db.get_user_profile(&name)).await?;

        let row = row.ok_or_else(|| DirectoryError::NotFound(format!("Can't find user: {}", username)))?;
        records::profile(row).map_err(Into::into)
    }

    /// Messages sent by `username`, recipient attached as `to_user`.
    pub async fn messages_from(&self, username: &str) -> Result<Vec<SentMessage>> {
        let db = self.db.clone();
        let name = username.to_owned();
        let rows = blocking(move || db.messages_from(&name)).await?;

        let messages = rows
            .into_iter()
            .map(records::sent)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(messages)
    }

    /// Messages received by `username`, sender attached as `from_user`.
    pub async fn messages_to(&self, username: &str) -> Result<Vec<ReceivedMessage>> {
        let db = self.db.clone();
        let name = username.to_owned();
        let rows = blocking(move || db.messages_to(&name)).await?;

        let messages = rows
            .into_iter()
            .map(records::received)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(messages)
    }
}

/// Whitespace-only counts as missing.
fn require_present(fields: &[&str], message: &str) -> Result<()> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(DirectoryError::Validation(message.to_string()));
    }
    Ok(())
}

/// Run store access and hashing off the async runtime.
async fn blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let value = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {}", e))??;
    Ok(value)
}
