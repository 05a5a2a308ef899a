use anyhow::{anyhow, Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::{
    domain::{
        normalize_initial, resolve_thumbnail, BoardMember, BoardMemberId, EventId, EventRecord,
        HeroContent, MediaKind, ProjectId, ProjectImage, ProjectRecord, QuickItem, QuickItemId,
        QuickSection,
    },
    protocol::{EventPatch, NewQuickItem, QuickItemPatch},
};

pub mod media;

pub use media::{LocalBucketStore, ObjectStore, MEDIA_ROUTE_PREFIX};

const BOARD_COLUMNS: &str =
    "id, name, position, description, image_url, initial, sequence, linkedin, instagram, email";
const EVENT_COLUMNS: &str = "id, title, date, time, location, description";
const QUICK_COLUMNS: &str =
    "id, section, title, description, media_type, media_url, thumbnail_url, sequence";
const HERO_COLUMNS: &str = "background_image, title, subtitle, description, cta_text";

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn list_board_members(&self) -> Result<Vec<BoardMember>> {
        let rows = sqlx::query(&format!(
            "SELECT {BOARD_COLUMNS} FROM board_members ORDER BY sequence ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .context("failed to list board members")?;
        Ok(rows.iter().map(board_member_from_row).collect())
    }

    /// Upserts every member in one transaction. Members carrying an id
    /// overwrite that row (or create it); members without one get a fresh id.
    /// Returns the stored rows in request order.
    pub async fn save_board_members(&self, members: &[BoardMember]) -> Result<Vec<BoardMember>> {
        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(members.len());

        for member in members {
            let row = sqlx::query(&format!(
                "INSERT INTO board_members ({BOARD_COLUMNS})
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    position = excluded.position,
                    description = excluded.description,
                    image_url = excluded.image_url,
                    initial = excluded.initial,
                    sequence = excluded.sequence,
                    linkedin = excluded.linkedin,
                    instagram = excluded.instagram,
                    email = excluded.email
                 RETURNING {BOARD_COLUMNS}"
            ))
            .bind(member.id.map(|id| id.0))
            .bind(&member.name)
            .bind(&member.position)
            .bind(&member.description)
            .bind(&member.image_url)
            .bind(normalize_initial(&member.initial))
            .bind(member.sequence)
            .bind(member.linkedin.as_deref())
            .bind(member.instagram.as_deref())
            .bind(member.email.as_deref())
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("failed to upsert board member '{}'", member.name))?;
            saved.push(board_member_from_row(&row));
        }

        tx.commit().await?;
        Ok(saved)
    }

    /// Returns the number of rows removed; an unknown id removes nothing.
    pub async fn delete_board_member(&self, id: BoardMemberId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM board_members WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .context("failed to delete board member")?;
        Ok(result.rows_affected())
    }

    pub async fn list_events(&self) -> Result<Vec<EventRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY date ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .context("failed to list events")?;
        Ok(rows.iter().map(event_from_row).collect())
    }

    /// Inserts a new event. Any id on `event` is ignored.
    pub async fn create_event(&self, event: &EventRecord) -> Result<EventRecord> {
        let row = sqlx::query(&format!(
            "INSERT INTO events (title, date, time, location, description)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(&event.title)
        .bind(&event.date)
        .bind(&event.time)
        .bind(&event.location)
        .bind(&event.description)
        .fetch_one(&self.pool)
        .await
        .context("failed to create event")?;
        Ok(event_from_row(&row))
    }

    /// Applies the fields present on `patch`; absent ones keep their value.
    pub async fn update_event(&self, id: EventId, patch: &EventPatch) -> Result<Option<EventRecord>> {
        let row = sqlx::query(&format!(
            "UPDATE events SET
                title = COALESCE(?, title),
                date = COALESCE(?, date),
                time = COALESCE(?, time),
                location = COALESCE(?, location),
                description = COALESCE(?, description)
             WHERE id = ?
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(patch.title.as_deref())
        .bind(patch.date.as_deref())
        .bind(patch.time.as_deref())
        .bind(patch.location.as_deref())
        .bind(patch.description.as_deref())
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .context("failed to update event")?;
        Ok(row.as_ref().map(event_from_row))
    }

    pub async fn delete_event(&self, id: EventId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .context("failed to delete event")?;
        Ok(result.rows_affected())
    }

    /// Newest first.
    pub async fn list_quick_items(&self) -> Result<Vec<QuickItem>> {
        let rows = sqlx::query(&format!(
            "SELECT {QUICK_COLUMNS} FROM quick_items ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .context("failed to list quick items")?;
        rows.iter().map(quick_item_from_row).collect()
    }

    pub async fn create_quick_item(&self, item: &NewQuickItem) -> Result<QuickItem> {
        let row = sqlx::query(&format!(
            "INSERT INTO quick_items (section, title, description, media_type, media_url, thumbnail_url, sequence)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {QUICK_COLUMNS}"
        ))
        .bind(item.section.as_str())
        .bind(item.title.as_deref())
        .bind(item.description.as_deref())
        .bind(item.media_type.as_str())
        .bind(&item.media_url)
        .bind(resolve_thumbnail(item.thumbnail_url.as_deref()))
        .bind(item.sequence)
        .fetch_one(&self.pool)
        .await
        .context("failed to create quick item")?;
        quick_item_from_row(&row)
    }

    /// Applies the fields present on `patch`. A thumbnail sent blank resets
    /// to the placeholder; an absent one keeps the stored value.
    pub async fn update_quick_item(
        &self,
        id: QuickItemId,
        patch: &QuickItemPatch,
    ) -> Result<Option<QuickItem>> {
        let row = sqlx::query(&format!(
            "UPDATE quick_items SET
                section = COALESCE(?, section),
                title = COALESCE(?, title),
                description = COALESCE(?, description),
                media_type = COALESCE(?, media_type),
                media_url = COALESCE(?, media_url),
                thumbnail_url = COALESCE(?, thumbnail_url),
                sequence = COALESCE(?, sequence)
             WHERE id = ?
             RETURNING {QUICK_COLUMNS}"
        ))
        .bind(patch.section.map(QuickSection::as_str))
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.media_type.map(MediaKind::as_str))
        .bind(patch.media_url.as_deref())
        .bind(
            patch
                .thumbnail_url
                .as_deref()
                .map(|url| resolve_thumbnail(Some(url))),
        )
        .bind(patch.sequence)
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .context("failed to update quick item")?;
        row.as_ref().map(quick_item_from_row).transpose()
    }

    pub async fn delete_quick_item(&self, id: QuickItemId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM quick_items WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .context("failed to delete quick item")?;
        Ok(result.rows_affected())
    }

    pub async fn load_hero(&self) -> Result<Option<HeroContent>> {
        let row = sqlx::query(&format!(
            "SELECT {HERO_COLUMNS} FROM hero_content WHERE id = 1"
        ))
        .fetch_optional(&self.pool)
        .await
        .context("failed to load hero content")?;
        Ok(row.as_ref().map(hero_from_row))
    }

    pub async fn save_hero(&self, hero: &HeroContent) -> Result<HeroContent> {
        let row = sqlx::query(&format!(
            "INSERT INTO hero_content (id, {HERO_COLUMNS}) VALUES (1, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                background_image = excluded.background_image,
                title = excluded.title,
                subtitle = excluded.subtitle,
                description = excluded.description,
                cta_text = excluded.cta_text,
                updated_at = CURRENT_TIMESTAMP
             RETURNING {HERO_COLUMNS}"
        ))
        .bind(&hero.background_image)
        .bind(&hero.title)
        .bind(&hero.subtitle)
        .bind(&hero.description)
        .bind(&hero.cta_text)
        .fetch_one(&self.pool)
        .await
        .context("failed to save hero content")?;
        Ok(hero_from_row(&row))
    }

    pub async fn create_project(
        &self,
        title: &str,
        description: &str,
        detail_description: &str,
        image_urls: &[String],
    ) -> Result<ProjectId> {
        let mut tx = self.pool.begin().await?;
        let rec = sqlx::query(
            "INSERT INTO projects (title, description, detail_description) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(title)
        .bind(description)
        .bind(detail_description)
        .fetch_one(&mut *tx)
        .await
        .context("failed to create project")?;
        let project_id = ProjectId(rec.get::<i64, _>(0));

        for (position, url) in image_urls.iter().enumerate() {
            sqlx::query("INSERT INTO project_images (project_id, image_url, position) VALUES (?, ?, ?)")
                .bind(project_id.0)
                .bind(url)
                .bind(position as i64)
                .execute(&mut *tx)
                .await
                .context("failed to attach project image")?;
        }

        tx.commit().await?;
        Ok(project_id)
    }

    pub async fn add_project_image(&self, project_id: ProjectId, image_url: &str) -> Result<()> {
        let exists = sqlx::query("SELECT 1 FROM projects WHERE id = ?")
            .bind(project_id.0)
            .fetch_optional(&self.pool)
            .await?
            .is_some();
        if !exists {
            return Err(anyhow!("project {} does not exist", project_id.0));
        }

        sqlx::query(
            "INSERT INTO project_images (project_id, image_url, position)
             VALUES (?, ?, (SELECT COALESCE(MAX(position) + 1, 0) FROM project_images WHERE project_id = ?))",
        )
        .bind(project_id.0)
        .bind(image_url)
        .bind(project_id.0)
        .execute(&self.pool)
        .await
        .context("failed to attach project image")?;
        Ok(())
    }

    pub async fn delete_project(&self, project_id: ProjectId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(project_id.0)
            .execute(&self.pool)
            .await
            .context("failed to delete project")?;
        Ok(result.rows_affected())
    }

    pub async fn list_projects(&self) -> Result<Vec<ProjectRecord>> {
        let projects = sqlx::query(
            "SELECT id, title, description, detail_description FROM projects ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list projects")?;

        let image_rows = sqlx::query(
            "SELECT project_id, image_url FROM project_images ORDER BY project_id ASC, position ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list project images")?;

        let mut images: HashMap<i64, Vec<ProjectImage>> = HashMap::new();
        for row in image_rows {
            images
                .entry(row.get::<i64, _>("project_id"))
                .or_default()
                .push(ProjectImage {
                    image_url: row.get::<String, _>("image_url"),
                });
        }

        Ok(projects
            .into_iter()
            .map(|r| {
                let id = r.get::<i64, _>("id");
                ProjectRecord {
                    id: ProjectId(id),
                    title: r.get::<String, _>("title"),
                    description: r.get::<String, _>("description"),
                    detail_description: r.get::<String, _>("detail_description"),
                    images: images.remove(&id).unwrap_or_default(),
                }
            })
            .collect())
    }
}

fn board_member_from_row(r: &SqliteRow) -> BoardMember {
    BoardMember {
        id: Some(BoardMemberId(r.get::<i64, _>("id"))),
        name: r.get::<String, _>("name"),
        position: r.get::<String, _>("position"),
        description: r.get::<String, _>("description"),
        image_url: r.get::<String, _>("image_url"),
        initial: r.get::<String, _>("initial"),
        sequence: r.get::<i64, _>("sequence"),
        linkedin: r.get::<Option<String>, _>("linkedin"),
        instagram: r.get::<Option<String>, _>("instagram"),
        email: r.get::<Option<String>, _>("email"),
    }
}

fn event_from_row(r: &SqliteRow) -> EventRecord {
    EventRecord {
        id: Some(EventId(r.get::<i64, _>("id"))),
        title: r.get::<String, _>("title"),
        date: r.get::<String, _>("date"),
        time: r.get::<String, _>("time"),
        location: r.get::<String, _>("location"),
        description: r.get::<String, _>("description"),
    }
}

fn quick_item_from_row(r: &SqliteRow) -> Result<QuickItem> {
    let section = r.get::<String, _>("section");
    let media_type = r.get::<String, _>("media_type");
    Ok(QuickItem {
        id: QuickItemId(r.get::<i64, _>("id")),
        section: QuickSection::parse(&section)
            .ok_or_else(|| anyhow!("unknown quick item section '{section}'"))?,
        title: r.get::<Option<String>, _>("title"),
        description: r.get::<Option<String>, _>("description"),
        media_type: MediaKind::parse(&media_type)
            .ok_or_else(|| anyhow!("unknown quick item media type '{media_type}'"))?,
        media_url: r.get::<String, _>("media_url"),
        thumbnail_url: r.get::<String, _>("thumbnail_url"),
        sequence: r.get::<i64, _>("sequence"),
    })
}

fn hero_from_row(r: &SqliteRow) -> HeroContent {
    HeroContent {
        background_image: r.get::<String, _>("background_image"),
        title: r.get::<String, _>("title"),
        subtitle: r.get::<String, _>("subtitle"),
        description: r.get::<String, _>("description"),
        cta_text: r.get::<String, _>("cta_text"),
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
