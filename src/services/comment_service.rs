//! Comment Service - chapter comments and the moderation workflow.

use chrono::{DateTime, Utc};
use sea_orm::*;
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::{DomainError, Identity, ModerationAction, ModerationOutcome, ModerationState};
use crate::models::user::UserSummary;
use crate::models::{Comment, chapter, comment, story, user};
use crate::services::chapter_service;

const MAX_COMMENT_LEN: usize = 2000;

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: i32,
    pub chapter_id: i32,
    pub content: String,
    pub is_reported: bool,
    pub created_at: DateTime<Utc>,
    pub author: Option<UserSummary>,
}

impl CommentView {
    fn new(c: Comment, author: Option<UserSummary>) -> Self {
        Self {
            id: c.id,
            chapter_id: c.chapter_id,
            content: c.content,
            is_reported: c.is_reported,
            created_at: c.created_at,
            author,
        }
    }
}

/// A reported comment with everything a moderator needs to judge it.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModerationEntry {
    Resolved {
        comment: CommentView,
        chapter_id: i32,
        chapter_number: i32,
        chapter_title: String,
        story_id: i32,
        story_title: String,
    },
    /// Author, chapter or story could not be found.
    Orphaned {
        comment: CommentView,
        missing: &'static str,
    },
}

/// Comments on a chapter, oldest first. Reported comments stay listed.
pub async fn list_for_chapter(
    db: &DatabaseConnection,
    chapter_id: i32,
) -> Result<Vec<CommentView>, DomainError> {
    chapter::Entity::find_by_id(chapter_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Chapter"))?;

    let rows = comment::Entity::find()
        .filter(comment::Column::ChapterId.eq(chapter_id))
        .order_by_asc(comment::Column::CreatedAt)
        .order_by_asc(comment::Column::Id)
        .find_also_related(user::Entity)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(c, u)| CommentView::new(c, u.map(UserSummary::from)))
        .collect())
}

/// Comment on a chapter the author is allowed to read.
pub async fn add_comment(
    db: &DatabaseConnection,
    author: &Identity,
    chapter_id: i32,
    content: &str,
) -> Result<CommentView, DomainError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DomainError::validation("Comment cannot be empty"));
    }
    if content.chars().count() > MAX_COMMENT_LEN {
        return Err(DomainError::validation(format!(
            "Comment cannot exceed {MAX_COMMENT_LEN} characters"
        )));
    }

    chapter_service::ensure_readable(db, chapter_id, Some(author)).await?;

    let created = comment::ActiveModel {
        chapter_id: Set(chapter_id),
        user_id: Set(author.user_id),
        content: Set(content.to_string()),
        is_reported: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let summary = user::Entity::find_by_id(author.user_id)
        .one(db)
        .await?
        .map(UserSummary::from);

    Ok(CommentView::new(created, summary))
}

/// Apply a moderation action to a comment.
pub async fn moderate(
    db: &DatabaseConnection,
    actor: &Identity,
    comment_id: i32,
    action: ModerationAction,
) -> Result<ModerationOutcome, DomainError> {
    if let Some(role) = action.required_role() {
        actor.ensure_role(&[role])?;
    }

    let existing = comment::Entity::find_by_id(comment_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Comment"))?;

    let outcome = ModerationState::from_flag(existing.is_reported).apply(action);
    match outcome {
        ModerationOutcome::Unchanged(_) => {}
        ModerationOutcome::Moved(state) => {
            let mut active: comment::ActiveModel = existing.into();
            active.is_reported = Set(state.is_reported());
            active.update(db).await?;
        }
        ModerationOutcome::Deleted => {
            comment::Entity::delete_by_id(comment_id).exec(db).await?;
        }
    }

    tracing::info!(
        "Comment {} {:?} by user {}: {:?}",
        comment_id,
        action,
        actor.user_id,
        outcome
    );
    Ok(outcome)
}

/// Reported comments, newest first, each resolved to its author, chapter and
/// story.
pub async fn reported_queue(db: &DatabaseConnection) -> Result<Vec<ModerationEntry>, DomainError> {
    let rows = comment::Entity::find()
        .filter(comment::Column::IsReported.eq(true))
        .order_by_desc(comment::Column::CreatedAt)
        .find_also_related(user::Entity)
        .all(db)
        .await?;

    let chapter_ids: Vec<i32> = rows.iter().map(|(c, _)| c.chapter_id).collect();
    let chapters: HashMap<i32, chapter::Model> = chapter::Entity::find()
        .filter(chapter::Column::Id.is_in(chapter_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let story_ids: Vec<i32> = chapters.values().map(|c| c.story_id).collect();
    let stories: HashMap<i32, story::Model> = story::Entity::find()
        .filter(story::Column::Id.is_in(story_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let entries = rows
        .into_iter()
        .map(|(c, u)| {
            let chapter = chapters.get(&c.chapter_id);
            let story = chapter.and_then(|ch| stories.get(&ch.story_id));
            let has_author = u.is_some();
            let view = CommentView::new(c, u.map(UserSummary::from));

            match (has_author, chapter, story) {
                (true, Some(ch), Some(s)) => ModerationEntry::Resolved {
                    comment: view,
                    chapter_id: ch.id,
                    chapter_number: ch.number,
                    chapter_title: ch.title.clone(),
                    story_id: s.id,
                    story_title: s.title.clone(),
                },
                (has_author, chapter, _) => {
                    let missing = if !has_author {
                        "author"
                    } else if chapter.is_none() {
                        "chapter"
                    } else {
                        "story"
                    };
                    tracing::warn!("Reported comment {} has a missing {}", view.id, missing);
                    ModerationEntry::Orphaned {
                        comment: view,
                        missing,
                    }
                }
            }
        })
        .collect();

    Ok(entries)
}
