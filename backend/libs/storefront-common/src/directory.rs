//! User existence checks
//!
//! Products may reference an owning user. Before a product is stored the
//! owner is looked up through a `UserDirectory`, which is either the remote
//! User service (REST or gRPC) or, in the monolith, the in-process user
//! repository.
//!
//! Implementations never fail: an unreachable or misbehaving authority is
//! reported as "does not exist", the same answer as a genuinely absent user.

use async_trait::async_trait;

use crate::repository::UserRepository;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// `true` only when the authority affirmatively reports the user present
    async fn user_exists(&self, user_id: &str) -> bool;
}

/// Directory backed by a user repository in the same process
#[derive(Clone, Default)]
pub struct LocalUserDirectory {
    users: UserRepository,
}

impl LocalUserDirectory {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserDirectory for LocalUserDirectory {
    async fn user_exists(&self, user_id: &str) -> bool {
        self.users.contains(user_id).await
    }
}
