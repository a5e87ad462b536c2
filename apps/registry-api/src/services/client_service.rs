//! Client business rules.
//!
//! Runs after structural validation and before anything is written.
//! Checks run in a fixed order and stop at the first failure:
//!
//! ```text
//! create:  inn unique ─► name unique ─► parent exists ─► insert
//! update:  target exists ─► inn unique* ─► name unique* ─► parent exists* ─► write
//!          (* only for fields present in the patch; own row excluded)
//! ```

use registry_core::{Client, ClientListQuery, ClientPage, ClientPatch, CoreError, NewClient};
use registry_db::{ClientRepository, Database};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiResult;

/// Client operations with the registry's business rules applied.
#[derive(Debug, Clone)]
pub struct ClientService {
    db: Database,
}

impl ClientService {
    pub fn new(db: Database) -> Self {
        ClientService { db }
    }

    fn repo(&self) -> ClientRepository {
        self.db.clients()
    }

    /// One page of clients plus the filtered total.
    pub async fn list(&self, query: &ClientListQuery) -> ApiResult<ClientPage> {
        let (items, total) = self.repo().list(query).await?;
        Ok(ClientPage { items, total })
    }

    /// Like [`list`](Self::list), restricted to clients without a parent.
    pub async fn list_parents(&self, query: &ClientListQuery) -> ApiResult<ClientPage> {
        let mut query = query.clone();
        query.filter.root_only = true;
        query.filter.parent_id = None;
        self.list(&query).await
    }

    pub async fn get(&self, id: Uuid) -> ApiResult<Client> {
        self.repo()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ClientNotFound.into())
    }

    pub async fn create(&self, new: NewClient) -> ApiResult<Client> {
        self.ensure_unique(new.inn.as_deref(), Some(&new.name), None)
            .await?;
        if let Some(parent_id) = new.parent_id {
            self.ensure_parent_exists(parent_id).await?;
        }

        let client = self.repo().insert(&new).await?;

        info!(client_id = %client.client_id, name = %client.name, "Client created");
        Ok(client)
    }

    pub async fn update(&self, id: Uuid, patch: ClientPatch) -> ApiResult<Client> {
        if !self.repo().exists(id).await? {
            return Err(CoreError::ClientNotFound.into());
        }

        self.ensure_unique(patch.new_inn(), patch.name.as_deref(), Some(id))
            .await?;
        if let Some(parent_id) = patch.new_parent_id() {
            self.ensure_parent_exists(parent_id).await?;
        }

        let client = self.repo().update(id, &patch).await?;

        info!(client_id = %id, "Client updated");
        Ok(client)
    }

    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        self.repo().delete(id).await?;

        info!(client_id = %id, "Client deleted");
        Ok(())
    }

    /// INN first: it is the stronger business key.
    async fn ensure_unique(
        &self,
        inn: Option<&str>,
        name: Option<&str>,
        excluding: Option<Uuid>,
    ) -> ApiResult<()> {
        let repo = self.repo();

        if let Some(inn) = inn {
            if let Some(existing) = repo.find_by_inn(inn, excluding).await? {
                warn!(inn, existing = %existing.client_id, "Rejected duplicate INN");
                return Err(CoreError::ClientAlreadyExistsByInn.into());
            }
        }

        if let Some(name) = name {
            if let Some(existing) = repo.find_by_name(name, excluding).await? {
                warn!(name, existing = %existing.client_id, "Rejected duplicate name");
                return Err(CoreError::ClientAlreadyExists.into());
            }
        }

        Ok(())
    }

    async fn ensure_parent_exists(&self, parent_id: Uuid) -> ApiResult<()> {
        if !self.repo().exists(parent_id).await? {
            warn!(%parent_id, "Rejected unknown parent");
            return Err(CoreError::ParentClientNotFound.into());
        }
        Ok(())
    }
}
