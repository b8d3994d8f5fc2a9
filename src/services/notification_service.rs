//! Notification Service - new-chapter fan-out and the reader's inbox.

use chrono::{DateTime, Utc};
use sea_orm::*;
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::DomainError;
use crate::models::{Chapter, chapter, follow, notification, story};

/// Insert one unread notification per follower of the chapter's story.
///
/// Each insert stands alone: a failure is logged and skipped, and never
/// undoes the publication. Returns how many notifications were created.
pub async fn notify_followers(db: &DatabaseConnection, chapter: &Chapter) -> usize {
    let followers = match follow::Entity::find()
        .filter(follow::Column::StoryId.eq(chapter.story_id))
        .all(db)
        .await
    {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(
                "Could not load followers of story {}: {}",
                chapter.story_id,
                e
            );
            return 0;
        }
    };

    let mut created = 0;
    for f in followers {
        let note = notification::ActiveModel {
            user_id: Set(f.user_id),
            chapter_id: Set(chapter.id),
            is_read: Set(false),
            created_at: Set(chapter.published_at),
            ..Default::default()
        };

        match notification::Entity::insert(note).exec(db).await {
            Ok(_) => created += 1,
            Err(e) => tracing::warn!(
                "Failed to notify user {} about chapter {}: {}",
                f.user_id,
                chapter.id,
                e
            ),
        }
    }

    tracing::debug!("Chapter {} notified {} follower(s)", chapter.id, created);
    created
}

/// A notification joined to the chapter and story it announces.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationEntry {
    Resolved {
        id: i32,
        is_read: bool,
        created_at: DateTime<Utc>,
        chapter_id: i32,
        chapter_number: i32,
        chapter_title: String,
        story_id: i32,
        story_title: String,
        story_cover_url: Option<String>,
    },
    /// The chapter or story no longer exists.
    Orphaned {
        id: i32,
        is_read: bool,
        created_at: DateTime<Utc>,
        chapter_id: i32,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationFeed {
    pub notifications: Vec<NotificationEntry>,
    pub unread: usize,
}

/// The user's notifications, newest first.
pub async fn list_for_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<NotificationFeed, DomainError> {
    let rows = notification::Entity::find()
        .filter(notification::Column::UserId.eq(user_id))
        .order_by_desc(notification::Column::CreatedAt)
        .order_by_desc(notification::Column::Id)
        .find_also_related(chapter::Entity)
        .all(db)
        .await?;

    let story_ids: Vec<i32> = rows
        .iter()
        .filter_map(|(_, c)| c.as_ref().map(|c| c.story_id))
        .collect();

    let mut stories = HashMap::new();
    if !story_ids.is_empty() {
        for s in story::Entity::find()
            .filter(story::Column::Id.is_in(story_ids))
            .all(db)
            .await?
        {
            stories.insert(s.id, s);
        }
    }

    let unread = rows.iter().filter(|(n, _)| !n.is_read).count();
    let notifications = rows
        .into_iter()
        .map(|(n, c)| match c.and_then(|c| stories.get(&c.story_id).map(|s| (c, s))) {
            Some((c, s)) => NotificationEntry::Resolved {
                id: n.id,
                is_read: n.is_read,
                created_at: n.created_at,
                chapter_id: c.id,
                chapter_number: c.number,
                chapter_title: c.title,
                story_id: s.id,
                story_title: s.title.clone(),
                story_cover_url: s.cover_url.clone(),
            },
            None => {
                tracing::warn!("Notification {} points at a missing chapter or story", n.id);
                NotificationEntry::Orphaned {
                    id: n.id,
                    is_read: n.is_read,
                    created_at: n.created_at,
                    chapter_id: n.chapter_id,
                }
            }
        })
        .collect();

    Ok(NotificationFeed {
        notifications,
        unread,
    })
}

/// Mark one of the user's own notifications as read.
pub async fn mark_read(db: &DatabaseConnection, user_id: i32, id: i32) -> Result<(), DomainError> {
    let note = notification::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Notification"))?;

    // Someone else's notification is reported as missing.
    if note.user_id != user_id {
        return Err(DomainError::not_found("Notification"));
    }

    if !note.is_read {
        let mut active: notification::ActiveModel = note.into();
        active.is_read = Set(true);
        active.update(db).await?;
    }

    Ok(())
}
