// src/core/database.rs
//! Lead, list and list-membership persistence on SQLite

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use tracing::{error, info};

use crate::lead_search::ParsedLead;
use crate::utils::{ensure_dir_exists, slugify};

// ===== Core Database Connection Management =====

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database file and run migrations
    pub async fn new(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            ensure_dir_exists(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to database: {}", database_path.display())
            })?;

        info!(
            "Database connection established: {}",
            database_path.display()
        );

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Private in-memory database; a single long-lived connection keeps it alive
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid in-memory database URL")?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get pool reference for custom operations
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS leads (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                external_id TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT '',
                full_name TEXT NOT NULL DEFAULT '',
                email TEXT,
                phone TEXT,
                linkedin_url TEXT NOT NULL DEFAULT '',
                photo_url TEXT,
                current_title TEXT NOT NULL DEFAULT '',
                current_company TEXT NOT NULL DEFAULT '',
                company_linkedin_url TEXT NOT NULL DEFAULT '',
                headline TEXT NOT NULL DEFAULT '',
                level TEXT NOT NULL DEFAULT '',
                department TEXT NOT NULL DEFAULT '',
                location TEXT NOT NULL DEFAULT '',
                country TEXT NOT NULL DEFAULT '',
                region TEXT NOT NULL DEFAULT '',
                industry TEXT NOT NULL DEFAULT '',
                company_size TEXT NOT NULL DEFAULT '',
                company_domain TEXT NOT NULL DEFAULT '',
                company_location TEXT NOT NULL DEFAULT '',
                company_founded TEXT NOT NULL DEFAULT '',
                company_revenue TEXT NOT NULL DEFAULT '',
                company_subindustry TEXT NOT NULL DEFAULT '',
                seniority_level TEXT,
                skills TEXT NOT NULL DEFAULT '',
                bio TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS lead_lists (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                slug TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS lead_list_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                lead_id INTEGER NOT NULL REFERENCES leads(id) ON DELETE CASCADE,
                list_id INTEGER NOT NULL REFERENCES lead_lists(id) ON DELETE CASCADE,
                notes TEXT NOT NULL DEFAULT '',
                added_at TEXT NOT NULL,
                UNIQUE (lead_id, list_id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Create indexes
        for statement in [
            "CREATE INDEX IF NOT EXISTS idx_leads_name ON leads(first_name, last_name);",
            "CREATE INDEX IF NOT EXISTS idx_leads_company ON leads(current_company);",
            "CREATE INDEX IF NOT EXISTS idx_leads_location ON leads(country, location);",
            "CREATE INDEX IF NOT EXISTS idx_leads_industry ON leads(industry);",
            "CREATE INDEX IF NOT EXISTS idx_leads_seniority ON leads(seniority_level);",
            "CREATE INDEX IF NOT EXISTS idx_list_items_list ON lead_list_items(list_id);",
        ] {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        info!("Database migrations completed");
        Ok(())
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}

// ===== Models =====

/// Lead columns in bind order
const LEAD_COLUMNS: [&str; 26] = [
    "external_id",
    "first_name",
    "last_name",
    "full_name",
    "email",
    "phone",
    "linkedin_url",
    "photo_url",
    "current_title",
    "current_company",
    "company_linkedin_url",
    "headline",
    "level",
    "department",
    "location",
    "country",
    "region",
    "industry",
    "company_size",
    "company_domain",
    "company_location",
    "company_founded",
    "company_revenue",
    "company_subindustry",
    "seniority_level",
    "skills",
];

fn lead_select_columns(table_alias: &str) -> String {
    let mut columns = vec![format!("{}.id", table_alias)];
    columns.extend(
        LEAD_COLUMNS
            .iter()
            .chain(["bio", "created_at", "updated_at"].iter())
            .map(|c| format!("{}.{}", table_alias, c)),
    );
    columns.join(", ")
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StoredLead {
    pub id: i64,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub lead: ParsedLead,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LeadList {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ListedLead {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub lead: StoredLead,
    pub added_at: DateTime<Utc>,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadListWithLeads {
    #[serde(flatten)]
    pub list: LeadList,
    pub lead_count: usize,
    pub leads: Vec<ListedLead>,
}

/// Result of a list operation that can be refused without being an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn refused(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkAddResult {
    pub added: usize,
    pub skipped: usize,
    pub errors: usize,
    pub total: usize,
}

// ===== Lead Repository =====

pub struct LeadRepository<'a> {
    pool: &'a SqlitePool,
}

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

fn bind_lead<'q>(query: SqliteQuery<'q>, lead: &'q ParsedLead) -> SqliteQuery<'q> {
    query
        .bind(lead.external_id.as_str())
        .bind(lead.first_name.as_str())
        .bind(lead.last_name.as_str())
        .bind(lead.full_name.as_str())
        .bind(lead.email.as_deref())
        .bind(lead.phone.as_deref())
        .bind(lead.linkedin_url.as_str())
        .bind(lead.photo_url.as_deref())
        .bind(lead.current_title.as_str())
        .bind(lead.current_company.as_str())
        .bind(lead.company_linkedin_url.as_str())
        .bind(lead.headline.as_str())
        .bind(lead.level.as_str())
        .bind(lead.department.as_str())
        .bind(lead.location.as_str())
        .bind(lead.country.as_str())
        .bind(lead.region.as_str())
        .bind(lead.industry.as_str())
        .bind(lead.company_size.as_str())
        .bind(lead.company_domain.as_str())
        .bind(lead.company_location.as_str())
        .bind(lead.company_founded.as_str())
        .bind(lead.company_revenue.as_str())
        .bind(lead.company_subindustry.as_str())
        .bind(lead.seniority_level)
        .bind(lead.skills.as_str())
        .bind(lead.bio.as_str())
}

impl<'a> LeadRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or update by `external_id`. Returns the stored row and whether it was created.
    pub async fn create_or_update(&self, lead: &ParsedLead) -> Result<(StoredLead, bool)> {
        if lead.external_id.trim().is_empty() {
            anyhow::bail!("external_id is required");
        }

        let mut lead = lead.clone();
        if lead.full_name.trim().is_empty() {
            lead.full_name = format!("{} {}", lead.first_name, lead.last_name)
                .trim()
                .to_string();
        }

        let existed = self.find_by_external_id(&lead.external_id).await?.is_some();

        let insert_columns = LEAD_COLUMNS
            .iter()
            .chain(["bio", "created_at", "updated_at"].iter())
            .copied()
            .collect::<Vec<_>>();
        let placeholders = vec!["?"; insert_columns.len()].join(", ");
        let updates = LEAD_COLUMNS
            .iter()
            .skip(1)
            .chain(["bio", "updated_at"].iter())
            .map(|c| format!("{c} = excluded.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO leads ({}) VALUES ({}) ON CONFLICT(external_id) DO UPDATE SET {}",
            insert_columns.join(", "),
            placeholders,
            updates
        );

        let now = Utc::now();
        bind_lead(sqlx::query(&sql), &lead)
            .bind(now)
            .bind(now)
            .execute(self.pool)
            .await
            .with_context(|| format!("Failed to save lead {}", lead.external_id))?;

        let stored = self
            .find_by_external_id(&lead.external_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Lead {} vanished after save", lead.external_id))?;

        info!(
            "Lead {} {} (ID: {})",
            stored.lead.full_name,
            if existed { "updated" } else { "created" },
            stored.id
        );

        Ok((stored, !existed))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<StoredLead>> {
        let sql = format!("SELECT {} FROM leads l WHERE l.id = ?", lead_select_columns("l"));
        let lead = sqlx::query_as::<_, StoredLead>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(lead)
    }

    pub async fn find_by_external_id(&self, external_id: &str) -> Result<Option<StoredLead>> {
        let sql = format!(
            "SELECT {} FROM leads l WHERE l.external_id = ?",
            lead_select_columns("l")
        );
        let lead = sqlx::query_as::<_, StoredLead>(&sql)
            .bind(external_id)
            .fetch_optional(self.pool)
            .await?;
        Ok(lead)
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM leads")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

// ===== Lead List Repository =====

pub struct LeadListRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> LeadListRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<LeadList>> {
        let list = sqlx::query_as::<_, LeadList>(
            "SELECT id, name, slug, description, created_at, updated_at FROM lead_lists WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(list)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<LeadList>> {
        let list = sqlx::query_as::<_, LeadList>(
            "SELECT id, name, slug, description, created_at, updated_at FROM lead_lists WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;
        Ok(list)
    }

    pub async fn list_all(&self) -> Result<Vec<LeadList>> {
        let lists = sqlx::query_as::<_, LeadList>(
            "SELECT id, name, slug, description, created_at, updated_at FROM lead_lists ORDER BY name ASC",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(lists)
    }

    async fn slug_taken(&self, slug: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM lead_lists WHERE slug = ?")
            .bind(slug)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn unique_slug(&self, name: &str) -> Result<String> {
        let base = match slugify(name) {
            slug if slug.is_empty() => "list".to_string(),
            slug => slug,
        };
        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.slug_taken(&candidate).await? {
            candidate = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        Ok(candidate)
    }

    /// Insert a list; `None` when the name is already in use
    pub async fn create(&self, name: &str, description: &str) -> Result<Option<LeadList>> {
        if self.find_by_name(name).await?.is_some() {
            return Ok(None);
        }

        let slug = self.unique_slug(name).await?;
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO lead_lists (name, slug, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(&slug)
        .bind(description)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to create list '{}'", name))?;

        Ok(Some(LeadList {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            slug,
            description: description.to_string(),
            created_at: now,
            updated_at: now,
        }))
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM lead_list_items WHERE list_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM lead_lists WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn contains(&self, list_id: i64, lead_id: i64) -> Result<bool> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM lead_list_items WHERE list_id = ? AND lead_id = ?")
                .bind(list_id)
                .bind(lead_id)
                .fetch_optional(self.pool)
                .await?;
        Ok(row.is_some())
    }

    pub async fn add_item(&self, list_id: i64, lead_id: i64, notes: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO lead_list_items (lead_id, list_id, notes, added_at) VALUES (?, ?, ?, ?)",
        )
        .bind(lead_id)
        .bind(list_id)
        .bind(notes)
        .bind(Utc::now())
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to add lead {} to list {}", lead_id, list_id))?;
        Ok(())
    }

    pub async fn remove_item(&self, list_id: i64, lead_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM lead_list_items WHERE list_id = ? AND lead_id = ?")
            .bind(list_id)
            .bind(lead_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Leads in a list, most recently added first
    pub async fn leads(&self, list_id: i64) -> Result<Vec<ListedLead>> {
        let sql = format!(
            r#"
            SELECT {}, i.added_at, i.notes
            FROM lead_list_items i
            JOIN leads l ON l.id = i.lead_id
            WHERE i.list_id = ?
            ORDER BY i.added_at DESC, i.id DESC
            "#,
            lead_select_columns("l")
        );
        let leads = sqlx::query_as::<_, ListedLead>(&sql)
            .bind(list_id)
            .fetch_all(self.pool)
            .await?;
        Ok(leads)
    }

    /// Lists a lead belongs to
    pub async fn lists_for_lead(&self, lead_id: i64) -> Result<Vec<LeadList>> {
        let lists = sqlx::query_as::<_, LeadList>(
            r#"
            SELECT ll.id, ll.name, ll.slug, ll.description, ll.created_at, ll.updated_at
            FROM lead_lists ll
            JOIN lead_list_items i ON i.list_id = ll.id
            WHERE i.lead_id = ?
            ORDER BY ll.name ASC
            "#,
        )
        .bind(lead_id)
        .fetch_all(self.pool)
        .await?;
        Ok(lists)
    }
}

// ===== Lead Service =====

/// Lead and list operations as exposed to the API and the CLI
pub struct LeadService<'a> {
    leads: LeadRepository<'a>,
    lists: LeadListRepository<'a>,
}

impl<'a> LeadService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self {
            leads: LeadRepository::new(pool),
            lists: LeadListRepository::new(pool),
        }
    }

    pub fn leads(&self) -> &LeadRepository<'a> {
        &self.leads
    }

    pub fn lists(&self) -> &LeadListRepository<'a> {
        &self.lists
    }

    pub async fn create_or_update_lead(&self, lead: &ParsedLead) -> Result<StoredLead> {
        let (stored, _) = self.leads.create_or_update(lead).await?;
        Ok(stored)
    }

    pub async fn create_list(&self, name: &str, description: &str) -> Result<(ActionOutcome, Option<LeadList>)> {
        let name = name.trim();
        if name.is_empty() {
            return Ok((ActionOutcome::refused("List name is required"), None));
        }

        match self.lists.create(name, description.trim()).await? {
            Some(list) => {
                info!("List '{}' created", name);
                Ok((
                    ActionOutcome::ok(format!("List '{}' created successfully", name)),
                    Some(list),
                ))
            }
            None => Ok((
                ActionOutcome::refused(format!("List with name '{}' already exists", name)),
                None,
            )),
        }
    }

    pub async fn get_or_create_list(&self, name: &str) -> Result<LeadList> {
        let name = name.trim();
        if let Some(list) = self.lists.find_by_name(name).await? {
            return Ok(list);
        }
        let description = format!("Auto-created list: {}", name);
        match self.lists.create(name, &description).await? {
            Some(list) => Ok(list),
            None => self
                .lists
                .find_by_name(name)
                .await?
                .ok_or_else(|| anyhow::anyhow!("List '{}' could not be created", name)),
        }
    }

    pub async fn delete_list(&self, list_id: i64) -> Result<ActionOutcome> {
        let Some(list) = self.lists.find_by_id(list_id).await? else {
            return Ok(ActionOutcome::refused("List not found"));
        };
        self.lists.delete(list_id).await?;
        info!("List '{}' deleted", list.name);
        Ok(ActionOutcome::ok(format!(
            "List '{}' deleted successfully",
            list.name
        )))
    }

    pub async fn add_lead_to_list(&self, lead_id: i64, list_name: &str, notes: &str) -> Result<ActionOutcome> {
        let list = self.get_or_create_list(list_name).await?;

        if self.lists.contains(list.id, lead_id).await? {
            return Ok(ActionOutcome::refused(format!(
                "Lead is already in list '{}'",
                list.name
            )));
        }

        self.lists.add_item(list.id, lead_id, notes).await?;
        info!("Lead {} added to list '{}'", lead_id, list.name);
        Ok(ActionOutcome::ok(format!(
            "Lead successfully added to '{}'",
            list.name
        )))
    }

    pub async fn remove_lead_from_list(&self, lead_id: i64, list_id: i64) -> Result<ActionOutcome> {
        if self.lists.remove_item(list_id, lead_id).await? {
            info!("Lead {} removed from list {}", lead_id, list_id);
            Ok(ActionOutcome::ok("Lead removed from list"))
        } else {
            Ok(ActionOutcome::refused("Lead was not in this list"))
        }
    }

    pub async fn bulk_add_leads_to_list(&self, lead_ids: &[i64], list_name: &str) -> Result<BulkAddResult> {
        let list = self.get_or_create_list(list_name).await?;
        let mut result = BulkAddResult {
            total: lead_ids.len(),
            ..Default::default()
        };

        for &lead_id in lead_ids {
            if self.lists.contains(list.id, lead_id).await? {
                result.skipped += 1;
                continue;
            }
            match self.lists.add_item(list.id, lead_id, "").await {
                Ok(()) => result.added += 1,
                Err(e) => {
                    error!("Error adding lead {}: {}", lead_id, e);
                    result.errors += 1;
                }
            }
        }

        info!(
            "Bulk add to '{}': {} added, {} skipped, {} errors",
            list.name, result.added, result.skipped, result.errors
        );
        Ok(result)
    }

    pub async fn all_lists_with_leads(&self) -> Result<Vec<LeadListWithLeads>> {
        let mut result = Vec::new();
        for list in self.lists.list_all().await? {
            let leads = self.lists.leads(list.id).await?;
            result.push(LeadListWithLeads {
                lead_count: leads.len(),
                list,
                leads,
            });
        }
        Ok(result)
    }

    pub async fn leads_in_list(&self, list_id: i64) -> Result<Vec<ListedLead>> {
        self.lists.leads(list_id).await
    }
}
