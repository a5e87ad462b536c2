//! # Client Repository
//!
//! Database operations for clients.
//!
//! ## Key Operations
//! - Filtered, sorted, paginated listing with a total count
//! - CRUD operations
//! - Uniqueness lookups (name, INN) used by the business rules
//!
//! ## Listing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How a List Query Is Built                            │
//! │                                                                         │
//! │  ClientListQuery                                                       │
//! │       │                                                                 │
//! │       ├── filter ──► WHERE (name_folded LIKE ? OR ...) AND parent_id=? │
//! │       │                  │                                              │
//! │       │                  └──► SELECT COUNT(*) ... ──► total            │
//! │       │                                                                 │
//! │       ├── sort ────► ORDER BY <column> <dir>, rowid <dir>              │
//! │       │                                                                 │
//! │       └── page ────► LIMIT ? OFFSET ?           ──► items              │
//! │                                                                         │
//! │  Column names come from ClientSortBy, never from the request text.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use registry_core::{Client, ClientFilter, ClientListQuery, ClientPatch, NewClient, SortOrder};

/// Columns of [`Client`], in struct order.
const CLIENT_COLUMNS: &str =
    "client_id, name, full_name, party_type, inn, region_id, parent_id, created_at, updated_at";

/// Repository for client database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ClientRepository::new(pool);
///
/// let client = repo.insert(&new_client).await?;
/// let found = repo.get_by_id(client.client_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Lists clients matching `query`.
    ///
    /// ## Returns
    /// `(items, total)` where `total` is the filtered count before paging.
    pub async fn list(&self, query: &ClientListQuery) -> DbResult<(Vec<Client>, i64)> {
        debug!(
            search = ?query.filter.query,
            sort_by = query.sort.by.column(),
            limit = query.page.limit,
            offset = query.page.offset,
            "Listing clients"
        );

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM clients");
        push_filter(&mut count, &query.filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let direction = match query.sort.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {CLIENT_COLUMNS} FROM clients"));
        push_filter(&mut select, &query.filter);
        // rowid follows insertion order, which keeps pages stable on ties.
        select.push(format!(
            " ORDER BY {column} {direction}, rowid {direction}",
            column = query.sort.by.column()
        ));
        select
            .push(" LIMIT ")
            .push_bind(i64::from(query.page.limit))
            .push(" OFFSET ")
            .push_bind(query.page.offset);

        let items = select
            .build_query_as::<Client>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = items.len(), total, "List returned clients");
        Ok((items, total))
    }

    /// Gets a client by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Client))` - Client found
    /// * `Ok(None)` - Client not found
    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE client_id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// True when a client with this ID exists.
    pub async fn exists(&self, id: Uuid) -> DbResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM clients WHERE client_id = ?1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Finds the client using `name`, ignoring the client `excluding`.
    ///
    /// The match is exact and case-sensitive.
    pub async fn find_by_name(&self, name: &str, excluding: Option<Uuid>) -> DbResult<Option<Client>> {
        self.find_by_column("name", name, excluding).await
    }

    /// Finds the client using `inn`, ignoring the client `excluding`.
    pub async fn find_by_inn(&self, inn: &str, excluding: Option<Uuid>) -> DbResult<Option<Client>> {
        self.find_by_column("inn", inn, excluding).await
    }

    async fn find_by_column(
        &self,
        column: &'static str,
        value: &str,
        excluding: Option<Uuid>,
    ) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients \
             WHERE {column} = ?1 AND (?2 IS NULL OR client_id <> ?2) \
             LIMIT 1"
        ))
        .bind(value)
        .bind(excluding)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Inserts a new client, assigning its ID and timestamps.
    ///
    /// ## Returns
    /// * `Ok(Client)` - The stored record
    /// * `Err(DbError::UniqueViolation)` - Name or INN already taken
    pub async fn insert(&self, new: &NewClient) -> DbResult<Client> {
        let now = Utc::now();
        let client = Client {
            client_id: Uuid::new_v4(),
            name: new.name.clone(),
            full_name: new.full_name.clone(),
            party_type: new.party_type,
            inn: new.inn.clone(),
            region_id: new.region_id,
            parent_id: new.parent_id,
            created_at: now,
            updated_at: now,
        };

        debug!(client_id = %client.client_id, name = %client.name, "Inserting client");

        sqlx::query(
            r#"
            INSERT INTO clients (
                client_id, name, full_name, party_type, inn,
                region_id, parent_id, created_at, updated_at,
                name_folded, full_name_folded, inn_folded
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9,
                ?10, ?11, ?12
            )
            "#,
        )
        .bind(client.client_id)
        .bind(&client.name)
        .bind(&client.full_name)
        .bind(client.party_type)
        .bind(&client.inn)
        .bind(client.region_id)
        .bind(client.parent_id)
        .bind(client.created_at)
        .bind(client.updated_at)
        .bind(fold(&client.name))
        .bind(client.full_name.as_deref().map(fold))
        .bind(client.inn.as_deref().map(fold))
        .execute(&self.pool)
        .await?;

        Ok(client)
    }

    /// Applies `patch` to the client `id` and bumps `updated_at`.
    ///
    /// ## Returns
    /// * `Ok(Client)` - The updated record
    /// * `Err(DbError::NotFound)` - Client doesn't exist
    /// * `Err(DbError::UniqueViolation)` - New name or INN already taken
    pub async fn update(&self, id: Uuid, patch: &ClientPatch) -> DbResult<Client> {
        debug!(client_id = %id, "Updating client");

        let mut client = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Client", id))?;

        patch.apply_to(&mut client);
        client.updated_at = next_updated_at(client.updated_at);

        let result = sqlx::query(
            r#"
            UPDATE clients SET
                name = ?2,
                full_name = ?3,
                party_type = ?4,
                inn = ?5,
                region_id = ?6,
                parent_id = ?7,
                updated_at = ?8,
                name_folded = ?9,
                full_name_folded = ?10,
                inn_folded = ?11
            WHERE client_id = ?1
            "#,
        )
        .bind(client.client_id)
        .bind(&client.name)
        .bind(&client.full_name)
        .bind(client.party_type)
        .bind(&client.inn)
        .bind(client.region_id)
        .bind(client.parent_id)
        .bind(client.updated_at)
        .bind(fold(&client.name))
        .bind(client.full_name.as_deref().map(fold))
        .bind(client.inn.as_deref().map(fold))
        .execute(&self.pool)
        .await?;

        // Deleted between the read and the write.
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        Ok(client)
    }

    /// Hard-deletes a client. Children keep their (now dangling) `parent_id`.
    ///
    /// ## Returns
    /// * `Ok(())` - Row removed
    /// * `Err(DbError::NotFound)` - Client doesn't exist
    pub async fn delete(&self, id: Uuid) -> DbResult<()> {
        debug!(client_id = %id, "Deleting client");

        let result = sqlx::query("DELETE FROM clients WHERE client_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        Ok(())
    }

    /// Counts all clients (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Query Helpers
// =============================================================================

/// Appends the WHERE clause for `filter`.
fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ClientFilter) {
    let mut first = true;

    if let Some(query) = &filter.query {
        let pattern = format!("%{}%", escape_like(&fold(query)));
        push_conjunction(qb, &mut first);
        qb.push("(name_folded LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR full_name_folded LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR inn_folded LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }

    if filter.root_only {
        push_conjunction(qb, &mut first);
        qb.push("parent_id IS NULL");
    } else if let Some(parent_id) = filter.parent_id {
        push_conjunction(qb, &mut first);
        qb.push("parent_id = ").push_bind(parent_id);
    }

    if let Some(region_id) = filter.region_id {
        push_conjunction(qb, &mut first);
        qb.push("region_id = ").push_bind(region_id);
    }

    if let Some(party_type) = filter.party_type {
        push_conjunction(qb, &mut first);
        qb.push("party_type = ").push_bind(party_type);
    }
}

fn push_conjunction(qb: &mut QueryBuilder<'_, Sqlite>, first: &mut bool) {
    qb.push(if std::mem::take(first) { " WHERE " } else { " AND " });
}

/// Escapes LIKE wildcards so user input only ever matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Case folding used for the `*_folded` search columns.
fn fold(value: &str) -> String {
    value.to_lowercase()
}

/// `updated_at` for a mutation: now, but always after `previous`.
fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + Duration::microseconds(1))
}

// =============================================================================
// Unit Tests
// =============================================================================
