//! Chapter Service - publication, premium gating and chapter CRUD.
//!
//! Publishing is the one multi-step write in the system: the chapter insert
//! and the story bump commit together, then followers are notified on a
//! best-effort basis.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::{Deserialize, Serialize};

use crate::domain::{ContentGate, DomainError, Entitlement, Identity, can_read};
use crate::models::{Chapter, Story, chapter, story};
use crate::services::{engagement_service, notification_service, store_service, story_service};

#[derive(Debug, Clone, Deserialize)]
pub struct PublishChapter {
    pub story_id: i32,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Debug, Clone)]
pub struct PublishedChapter {
    pub chapter: Chapter,
    /// Followers that received a notification.
    pub notified: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChapterChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_premium: Option<bool>,
}

/// A chapter without its body, as listed on a story page.
#[derive(Debug, Clone, Serialize)]
pub struct ChapterSummary {
    pub id: i32,
    pub story_id: i32,
    pub number: i32,
    pub title: String,
    pub is_premium: bool,
    pub published_at: DateTime<Utc>,
    pub like_count: u64,
    pub comment_count: u64,
    pub is_liked: bool,
    pub is_read: bool,
}

/// A chapter as served to one reader. `content` is `None` when the reader
/// may not see the body.
#[derive(Debug, Clone, Serialize)]
pub struct ChapterView {
    pub id: i32,
    pub story_id: i32,
    pub story_title: String,
    pub author_id: i32,
    pub number: i32,
    pub title: String,
    pub content: Option<String>,
    pub is_premium: bool,
    pub story_is_premium: bool,
    pub needs_subscription: bool,
    pub published_at: DateTime<Utc>,
    pub like_count: u64,
    pub comment_count: u64,
    pub is_liked: bool,
    pub is_read: bool,
    pub previous_chapter_id: Option<i32>,
    pub next_chapter_id: Option<i32>,
}

fn require_text(value: &str, field: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("Chapter {field} is required")));
    }
    Ok(trimmed.to_string())
}

async fn find_chapter<C: ConnectionTrait>(db: &C, id: i32) -> Result<Chapter, DomainError> {
    chapter::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Chapter"))
}

/// The story a chapter belongs to. A chapter without one is an orphaned row.
async fn story_of(db: &DatabaseConnection, chapter: &Chapter) -> Result<Story, DomainError> {
    story::Entity::find_by_id(chapter.story_id)
        .one(db)
        .await?
        .ok_or(DomainError::OrphanedReference {
            entity: "chapter",
            id: chapter.id,
        })
}

/// Evaluate the premium gate for one reader. The subscription lookup only
/// happens when the answer depends on it.
pub async fn reader_can_read(
    db: &DatabaseConnection,
    reader: Option<&Identity>,
    chapter: &Chapter,
    story: &Story,
) -> bool {
    let gate = ContentGate {
        chapter_premium: chapter.is_premium,
        story_premium: story.is_premium,
        author_id: story.author_id,
    };

    let entitlement = match reader {
        Some(r) if gate.needs_entitlement(Some(r)) => {
            Entitlement::from_lookup(store_service::active_subscription(db, r.user_id).await)
        }
        _ => Entitlement::Missing,
    };

    can_read(reader, &gate, entitlement)
}

/// Load a chapter the reader is allowed to see in full.
pub async fn ensure_readable(
    db: &DatabaseConnection,
    chapter_id: i32,
    reader: Option<&Identity>,
) -> Result<(Chapter, Story), DomainError> {
    let chapter = find_chapter(db, chapter_id).await?;
    let story = story_of(db, &chapter).await?;

    if !reader_can_read(db, reader, &chapter, &story).await {
        return Err(match reader {
            None => DomainError::Authentication("Log in to read this chapter".to_string()),
            Some(_) => DomainError::forbidden("An active subscription is required for this chapter"),
        });
    }

    Ok((chapter, story))
}

/// Append a chapter to a story and notify its followers.
pub async fn publish_chapter(
    db: &DatabaseConnection,
    actor: &Identity,
    input: PublishChapter,
) -> Result<PublishedChapter, DomainError> {
    let story = story_service::find_story(db, input.story_id).await?;
    actor.ensure_can_manage(story.author_id, "story")?;

    let title = require_text(&input.title, "title")?;
    let content = require_text(&input.content, "content")?;
    let now = Utc::now();

    let txn = db.begin().await?;

    let last_number = chapter::Entity::find()
        .filter(chapter::Column::StoryId.eq(story.id))
        .order_by_desc(chapter::Column::Number)
        .one(&txn)
        .await?
        .map(|c| c.number)
        .unwrap_or(0);

    let chapter = chapter::ActiveModel {
        story_id: Set(story.id),
        number: Set(last_number + 1),
        title: Set(title),
        content: Set(content),
        is_premium: Set(input.is_premium),
        published_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| match DomainError::from(e) {
        DomainError::Conflict(_) => DomainError::Conflict(
            "Another chapter was published at the same time, please retry".to_string(),
        ),
        other => other,
    })?;

    story::Entity::update_many()
        .col_expr(story::Column::UpdatedAt, Expr::value(now))
        .filter(story::Column::Id.eq(story.id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(
        "Chapter {} ('{}') published in story {}",
        chapter.number,
        chapter.title,
        story.id
    );

    let notified = notification_service::notify_followers(db, &chapter).await;

    Ok(PublishedChapter { chapter, notified })
}

/// Chapters of a story in reading order, without their bodies.
pub async fn list_chapters(
    db: &DatabaseConnection,
    story_id: i32,
    viewer: Option<i32>,
) -> Result<Vec<ChapterSummary>, DomainError> {
    story_service::find_story(db, story_id).await?;
    summaries_for_story(db, story_id, viewer).await
}

pub(crate) async fn summaries_for_story(
    db: &DatabaseConnection,
    story_id: i32,
    viewer: Option<i32>,
) -> Result<Vec<ChapterSummary>, DomainError> {
    let chapters = chapter::Entity::find()
        .filter(chapter::Column::StoryId.eq(story_id))
        .order_by_asc(chapter::Column::Number)
        .all(db)
        .await?;

    let mut summaries = Vec::with_capacity(chapters.len());
    for c in chapters {
        let (is_liked, is_read) = match viewer {
            Some(user_id) => (
                engagement_service::is_chapter_liked(db, c.id, user_id).await?,
                engagement_service::has_read(db, c.id, user_id).await?,
            ),
            None => (false, false),
        };

        summaries.push(ChapterSummary {
            id: c.id,
            story_id: c.story_id,
            number: c.number,
            title: c.title,
            is_premium: c.is_premium,
            published_at: c.published_at,
            like_count: engagement_service::chapter_like_count(db, c.id).await?,
            comment_count: engagement_service::chapter_comment_count(db, c.id).await?,
            is_liked,
            is_read,
        });
    }

    Ok(summaries)
}

/// A chapter as one reader may see it. Gated bodies are withheld, never sent.
pub async fn get_chapter(
    db: &DatabaseConnection,
    id: i32,
    reader: Option<&Identity>,
) -> Result<ChapterView, DomainError> {
    let chapter = find_chapter(db, id).await?;
    let story = story_of(db, &chapter).await?;
    let readable = reader_can_read(db, reader, &chapter, &story).await;

    let (is_liked, is_read) = match reader {
        Some(r) => (
            engagement_service::is_chapter_liked(db, chapter.id, r.user_id).await?,
            engagement_service::has_read(db, chapter.id, r.user_id).await?,
        ),
        None => (false, false),
    };

    let previous_chapter_id = chapter::Entity::find()
        .filter(chapter::Column::StoryId.eq(story.id))
        .filter(chapter::Column::Number.lt(chapter.number))
        .order_by_desc(chapter::Column::Number)
        .one(db)
        .await?
        .map(|c| c.id);

    let next_chapter_id = chapter::Entity::find()
        .filter(chapter::Column::StoryId.eq(story.id))
        .filter(chapter::Column::Number.gt(chapter.number))
        .order_by_asc(chapter::Column::Number)
        .one(db)
        .await?
        .map(|c| c.id);

    Ok(ChapterView {
        id: chapter.id,
        story_id: story.id,
        story_title: story.title,
        author_id: story.author_id,
        number: chapter.number,
        title: chapter.title,
        content: readable.then_some(chapter.content),
        is_premium: chapter.is_premium,
        story_is_premium: story.is_premium,
        needs_subscription: !readable,
        published_at: chapter.published_at,
        like_count: engagement_service::chapter_like_count(db, id).await?,
        comment_count: engagement_service::chapter_comment_count(db, id).await?,
        is_liked,
        is_read,
        previous_chapter_id,
        next_chapter_id,
    })
}

pub async fn update_chapter(
    db: &DatabaseConnection,
    actor: &Identity,
    id: i32,
    changes: ChapterChanges,
) -> Result<Chapter, DomainError> {
    let existing = find_chapter(db, id).await?;
    let story = story_of(db, &existing).await?;
    actor.ensure_can_manage(story.author_id, "chapter")?;

    let mut active: chapter::ActiveModel = existing.into();
    if let Some(title) = changes.title {
        active.title = Set(require_text(&title, "title")?);
    }
    if let Some(content) = changes.content {
        active.content = Set(require_text(&content, "content")?);
    }
    if let Some(is_premium) = changes.is_premium {
        active.is_premium = Set(is_premium);
    }

    Ok(active.update(db).await?)
}

/// Remove a chapter with its comments, likes and notifications. Remaining
/// chapters keep their numbers.
pub async fn delete_chapter(
    db: &DatabaseConnection,
    actor: &Identity,
    id: i32,
) -> Result<(), DomainError> {
    let existing = find_chapter(db, id).await?;
    let story = story_of(db, &existing).await?;
    actor.ensure_can_manage(story.author_id, "chapter")?;

    let txn = db.begin().await?;

    chapter::Entity::delete_by_id(existing.id).exec(&txn).await?;
    story::Entity::update_many()
        .col_expr(story::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(story::Column::Id.eq(story.id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!("Chapter {} deleted from story {}", existing.number, story.id);
    Ok(())
}
