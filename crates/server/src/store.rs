//! Article persistence.

use std::future::Future;
use std::sync::Mutex;

use anyhow::{Context, anyhow};
use deadpool_postgres::{Pool, Runtime};
use gleaner_core::ExtractedArticle;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio_postgres::NoTls;
use uuid::Uuid;

const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS articles (
    id               UUID PRIMARY KEY,
    title            TEXT NOT NULL,
    author           TEXT,
    published_date   TIMESTAMPTZ,
    summary          TEXT,
    meta_description TEXT,
    content          JSONB NOT NULL DEFAULT '[]',
    images           JSONB NOT NULL DEFAULT '[]',
    source_url       TEXT,
    tags             TEXT[] NOT NULL DEFAULT '{}',
    is_published     BOOLEAN NOT NULL DEFAULT FALSE,
    scraped_at       TIMESTAMPTZ NOT NULL
)";

const INSERT_ARTICLE: &str = "
INSERT INTO articles (
    id, title, author, published_date, summary, meta_description,
    content, images, source_url, tags, is_published, scraped_at
) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)";

/// Body of `POST /api/articles`: a scraped article plus editorial fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    #[serde(flatten)]
    pub article: ExtractedArticle,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_published: bool,
}

/// A saved article.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredArticle {
    pub id: Uuid,
    pub article: NewArticle,
    pub scraped_at: OffsetDateTime,
}

pub trait ArticleStore: Send + Sync {
    /// Persist `article` and return its generated id.
    fn insert(&self, article: NewArticle) -> impl Future<Output = anyhow::Result<Uuid>> + Send;
}

/// Keeps articles in process memory. Used when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    articles: Mutex<Vec<StoredArticle>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<StoredArticle> {
        self.articles.lock().ok()?.iter().find(|stored| stored.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.articles.lock().map(|articles| articles.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArticleStore for MemoryStore {
    async fn insert(&self, article: NewArticle) -> anyhow::Result<Uuid> {
        let id = Uuid::new_v4();
        let stored = StoredArticle { id, article, scraped_at: OffsetDateTime::now_utc() };
        self.articles
            .lock()
            .map_err(|_| anyhow!("article store lock poisoned"))?
            .push(stored);
        Ok(id)
    }
}

/// Postgres-backed store using a deadpool connection pool.
#[derive(Clone)]
pub struct PostgresStore {
    pool: Pool,
}

impl PostgresStore {
    pub fn connect(database_url: &str) -> anyhow::Result<Self> {
        let config = deadpool_postgres::Config { url: Some(database_url.to_string()), ..Default::default() };
        let pool = config
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .context("Failed to create database pool")?;
        Ok(Self { pool })
    }

    /// Create the articles table if it does not exist.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        let client = self.pool.get().await.context("Failed to get database connection")?;
        client.batch_execute(CREATE_TABLE).await.context("Failed to create articles table")?;
        Ok(())
    }
}

impl ArticleStore for PostgresStore {
    async fn insert(&self, new: NewArticle) -> anyhow::Result<Uuid> {
        let id = Uuid::new_v4();
        let content = serde_json::to_value(&new.article.content)?;
        let images = serde_json::to_value(&new.article.images)?;
        let source_url = Some(new.article.source_url.as_str()).filter(|url| !url.is_empty());
        let scraped_at = OffsetDateTime::now_utc();

        let client = self.pool.get().await.context("Failed to get database connection")?;
        client
            .execute(
                INSERT_ARTICLE,
                &[
                    &id,
                    &new.article.title,
                    &new.article.author,
                    &new.article.published_date,
                    &new.article.summary,
                    &new.article.meta_description,
                    &content,
                    &images,
                    &source_url,
                    &new.tags,
                    &new.is_published,
                    &scraped_at,
                ],
            )
            .await
            .context("Failed to insert article")?;

        Ok(id)
    }
}

/// The store chosen at startup.
pub enum Store {
    Memory(MemoryStore),
    Postgres(PostgresStore),
}

impl ArticleStore for Store {
    async fn insert(&self, article: NewArticle) -> anyhow::Result<Uuid> {
        match self {
            Store::Memory(store) => store.insert(article).await,
            Store::Postgres(store) => store.insert(article).await,
        }
    }
}
