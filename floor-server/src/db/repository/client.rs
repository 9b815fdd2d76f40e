//! Client Repository + directory lookup
//!
//! 核心只需要把 registered/guest 双态引用解析成展示名和通知邮箱，
//! 这里同时提供 [`ClientDirectory`] 的数据库实现。

use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::booking::ClientDirectory;
use crate::db::models::{ClientKind, ClientRef, GuestClient, RegisteredClient};

const REGISTERED: &str = "registered_client";
const GUEST: &str = "guest_client";

#[derive(Clone)]
pub struct ClientRepository {
    base: BaseRepository,
}

impl ClientRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find a registered client by email
    pub async fn find_registered_by_email(
        &self,
        email: &str,
    ) -> RepoResult<Option<RegisteredClient>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM registered_client WHERE email = $email LIMIT 1")
            .bind(("email", email.trim().to_ascii_lowercase()))
            .await?;
        let clients: Vec<RegisteredClient> = result.take(0)?;
        Ok(clients.into_iter().next())
    }

    /// Find a guest client by email
    pub async fn find_guest_by_email(&self, email: &str) -> RepoResult<Option<GuestClient>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM guest_client WHERE email = $email LIMIT 1")
            .bind(("email", email.trim().to_ascii_lowercase()))
            .await?;
        let clients: Vec<GuestClient> = result.take(0)?;
        Ok(clients.into_iter().next())
    }

    /// Create a guest client (implicit, on first reservation)
    pub async fn create_guest(&self, guest: GuestClient) -> RepoResult<GuestClient> {
        let created: Option<GuestClient> = self.base.db().create(GUEST).content(guest).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create guest client".to_string()))
    }

    /// Create a registered client (seed/test support; registration itself is external)
    pub async fn create_registered(
        &self,
        client: RegisteredClient,
    ) -> RepoResult<RegisteredClient> {
        let created: Option<RegisteredClient> =
            self.base.db().create(REGISTERED).content(client).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create registered client".to_string()))
    }

    async fn resolve(&self, client: &ClientRef) -> RepoResult<Option<(String, String)>> {
        match client.kind {
            ClientKind::Registered => {
                let found: Option<RegisteredClient> =
                    self.base.db().select(client.id.clone()).await?;
                Ok(found.map(|c| (c.name, c.email)))
            }
            ClientKind::Guest => {
                let found: Option<GuestClient> = self.base.db().select(client.id.clone()).await?;
                Ok(found.map(|c| (c.name, c.email)))
            }
        }
    }
}

/// Database-backed [`ClientDirectory`]
#[derive(Clone)]
pub struct DbClientDirectory {
    repo: ClientRepository,
}

impl DbClientDirectory {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            repo: ClientRepository::new(db),
        }
    }
}

#[async_trait]
impl ClientDirectory for DbClientDirectory {
    async fn display_name(&self, client: &ClientRef) -> RepoResult<Option<String>> {
        Ok(self.repo.resolve(client).await?.map(|(name, _)| name))
    }

    async fn notification_email(&self, client: &ClientRef) -> RepoResult<Option<String>> {
        Ok(self.repo.resolve(client).await?.map(|(_, email)| email))
    }
}
