//! bcrypt password hashing off the async executor

use std::sync::Arc;

use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::InfrastructureError;

/// Hashes and verifies passwords with bcrypt on the blocking thread pool
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    /// Hash of a random secret, computed on first use at `cost`
    placeholder: Arc<OnceCell<String>>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    /// Hasher with an explicit work factor (4..=31)
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost,
            placeholder: Arc::new(OnceCell::new()),
        }
    }

    pub async fn hash(&self, password: &str) -> Result<String, InfrastructureError> {
        let password = password.to_string();
        let cost = self.cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hash)
    }

    /// False for a wrong password; an unparsable stored hash is an error
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, InfrastructureError> {
        let password = password.to_string();
        let hash = hash.to_string();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
        Ok(matches)
    }

    /// Verify `password` against a hash nobody knows the password of
    ///
    /// Costs the same as `verify` on a stored hash, so a lookup miss takes as
    /// long as a wrong password.
    pub async fn verify_placeholder(&self, password: &str) -> Result<bool, InfrastructureError> {
        let hash = self
            .placeholder
            .get_or_try_init(|| async {
                let secret = Uuid::new_v4().to_string();
                self.hash(&secret).await
            })
            .await?;
        self.verify(password, hash).await
    }
}
