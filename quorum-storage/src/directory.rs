//! Public key to user resolution.

use quorum_core::{PublicKey, UserId};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;

/// Lookup into the external user account subsystem.
///
/// Called while the inventory guard is held, so implementations must not
/// block on I/O.
pub trait UserDirectory: Send + Sync {
    /// Resolve the user owning a public key.
    fn user_id_by_public_key(&self, public_key: &str) -> Option<UserId>;

    /// Resolve a user's display name.
    fn username(&self, user_id: &str) -> Option<String>;
}

/// Directory that knows nobody. Every lookup misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyUserDirectory;

impl UserDirectory for EmptyUserDirectory {
    fn user_id_by_public_key(&self, _public_key: &str) -> Option<UserId> {
        None
    }

    fn username(&self, _user_id: &str) -> Option<String> {
        None
    }
}

/// One user account and the public keys it signs with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserAccount {
    #[serde(rename = "userid")]
    pub user_id: UserId,
    pub username: String,
    #[serde(rename = "publickeys", default)]
    pub public_keys: Vec<PublicKey>,
}

#[derive(Debug, Default)]
struct Users {
    by_public_key: HashMap<PublicKey, UserId>,
    names: HashMap<UserId, String>,
}

/// User directory kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<Users>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user and one of their public keys.
    ///
    /// A user may hold several keys; call once per key.
    pub fn register(
        &self,
        user_id: impl Into<UserId>,
        username: impl Into<String>,
        public_key: impl Into<PublicKey>,
    ) {
        let user_id = user_id.into();
        match self.users.write() {
            Ok(mut users) => {
                users.by_public_key.insert(public_key.into(), user_id.clone());
                users.names.insert(user_id, username.into());
            }
            Err(_) => tracing::error!(user_id = %user_id, "User directory lock poisoned"),
        }
    }

    /// Build a directory from a JSON array of [`UserAccount`]s.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let accounts: Vec<UserAccount> = serde_json::from_str(json)?;
        let directory = Self::new();
        for account in accounts {
            directory.register_account(account);
        }
        Ok(directory)
    }

    /// Register every key of `account`.
    pub fn register_account(&self, account: UserAccount) {
        for public_key in account.public_keys {
            self.register(account.user_id.clone(), account.username.clone(), public_key);
        }
    }

    pub fn len(&self) -> usize {
        self.users.read().map(|u| u.names.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn user_id_by_public_key(&self, public_key: &str) -> Option<UserId> {
        self.users.read().ok()?.by_public_key.get(public_key).cloned()
    }

    fn username(&self, user_id: &str) -> Option<String> {
        self.users.read().ok()?.names.get(user_id).cloned()
    }
}
