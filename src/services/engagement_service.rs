//! Engagement Service - likes, follows, read tracking and the counts derived
//! from them.
//!
//! Counts are never stored: every figure is recomputed from the underlying
//! rows so it always agrees with the like/comment tables.

use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict, Query, SelectStatement};
use sea_orm::*;

use crate::domain::{DomainError, Identity};
use crate::models::{
    chapter, chapter_like, chapter_read, comment, follow, notification, story, story_like,
};
use crate::services::chapter_service;

fn chapter_ids_of(story_id: i32) -> SelectStatement {
    Query::select()
        .column(chapter::Column::Id)
        .from(chapter::Entity)
        .and_where(chapter::Column::StoryId.eq(story_id))
        .to_owned()
}

pub async fn story_like_count<C: ConnectionTrait>(db: &C, story_id: i32) -> Result<u64, DomainError> {
    Ok(story_like::Entity::find()
        .filter(story_like::Column::StoryId.eq(story_id))
        .count(db)
        .await?)
}

pub async fn chapter_like_count<C: ConnectionTrait>(
    db: &C,
    chapter_id: i32,
) -> Result<u64, DomainError> {
    Ok(chapter_like::Entity::find()
        .filter(chapter_like::Column::ChapterId.eq(chapter_id))
        .count(db)
        .await?)
}

pub async fn chapter_comment_count<C: ConnectionTrait>(
    db: &C,
    chapter_id: i32,
) -> Result<u64, DomainError> {
    Ok(comment::Entity::find()
        .filter(comment::Column::ChapterId.eq(chapter_id))
        .count(db)
        .await?)
}

pub async fn chapter_count<C: ConnectionTrait>(db: &C, story_id: i32) -> Result<u64, DomainError> {
    Ok(chapter::Entity::find()
        .filter(chapter::Column::StoryId.eq(story_id))
        .count(db)
        .await?)
}

pub async fn follower_count<C: ConnectionTrait>(db: &C, story_id: i32) -> Result<u64, DomainError> {
    Ok(follow::Entity::find()
        .filter(follow::Column::StoryId.eq(story_id))
        .count(db)
        .await?)
}

/// Likes on the story itself plus likes on every one of its chapters.
pub async fn total_likes<C: ConnectionTrait>(db: &C, story_id: i32) -> Result<u64, DomainError> {
    let on_story = story_like_count(db, story_id).await?;
    let on_chapters = chapter_like::Entity::find()
        .filter(chapter_like::Column::ChapterId.in_subquery(chapter_ids_of(story_id)))
        .count(db)
        .await?;

    Ok(on_story + on_chapters)
}

/// Comments across all chapters of the story.
pub async fn total_comments<C: ConnectionTrait>(db: &C, story_id: i32) -> Result<u64, DomainError> {
    Ok(comment::Entity::find()
        .filter(comment::Column::ChapterId.in_subquery(chapter_ids_of(story_id)))
        .count(db)
        .await?)
}

pub async fn is_story_liked<C: ConnectionTrait>(
    db: &C,
    story_id: i32,
    user_id: i32,
) -> Result<bool, DomainError> {
    Ok(story_like::Entity::find_by_id((story_id, user_id))
        .one(db)
        .await?
        .is_some())
}

pub async fn is_chapter_liked<C: ConnectionTrait>(
    db: &C,
    chapter_id: i32,
    user_id: i32,
) -> Result<bool, DomainError> {
    Ok(chapter_like::Entity::find_by_id((chapter_id, user_id))
        .one(db)
        .await?
        .is_some())
}

pub async fn is_following<C: ConnectionTrait>(
    db: &C,
    story_id: i32,
    user_id: i32,
) -> Result<bool, DomainError> {
    Ok(follow::Entity::find_by_id((user_id, story_id))
        .one(db)
        .await?
        .is_some())
}

pub async fn has_read<C: ConnectionTrait>(
    db: &C,
    chapter_id: i32,
    user_id: i32,
) -> Result<bool, DomainError> {
    Ok(chapter_read::Entity::find_by_id((user_id, chapter_id))
        .one(db)
        .await?
        .is_some())
}

/// Delete the pair if it exists, otherwise insert it. Returns whether the
/// pair exists afterwards.
async fn toggle_pair<E, A>(
    db: &DatabaseConnection,
    existing: DeleteMany<E>,
    insert: Insert<A>,
    conflict: OnConflict,
) -> Result<bool, DomainError>
where
    E: EntityTrait,
    A: ActiveModelTrait,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    let txn = db.begin().await?;

    let removed = existing.exec(&txn).await?;
    let present = if removed.rows_affected > 0 {
        false
    } else {
        insert.on_conflict(conflict).exec_without_returning(&txn).await?;
        true
    };

    txn.commit().await?;
    Ok(present)
}

async fn ensure_story(db: &DatabaseConnection, story_id: i32) -> Result<(), DomainError> {
    story::Entity::find_by_id(story_id)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or_else(|| DomainError::not_found("Story"))
}

pub async fn toggle_story_like(
    db: &DatabaseConnection,
    story_id: i32,
    user_id: i32,
) -> Result<bool, DomainError> {
    ensure_story(db, story_id).await?;

    toggle_pair(
        db,
        story_like::Entity::delete_many()
            .filter(story_like::Column::StoryId.eq(story_id))
            .filter(story_like::Column::UserId.eq(user_id)),
        story_like::Entity::insert(story_like::ActiveModel {
            story_id: Set(story_id),
            user_id: Set(user_id),
        }),
        OnConflict::columns([story_like::Column::StoryId, story_like::Column::UserId])
            .do_nothing()
            .to_owned(),
    )
    .await
}

pub async fn toggle_chapter_like(
    db: &DatabaseConnection,
    chapter_id: i32,
    user_id: i32,
) -> Result<bool, DomainError> {
    chapter::Entity::find_by_id(chapter_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Chapter"))?;

    toggle_pair(
        db,
        chapter_like::Entity::delete_many()
            .filter(chapter_like::Column::ChapterId.eq(chapter_id))
            .filter(chapter_like::Column::UserId.eq(user_id)),
        chapter_like::Entity::insert(chapter_like::ActiveModel {
            chapter_id: Set(chapter_id),
            user_id: Set(user_id),
        }),
        OnConflict::columns([chapter_like::Column::ChapterId, chapter_like::Column::UserId])
            .do_nothing()
            .to_owned(),
    )
    .await
}

/// Follow or unfollow a story. Followers are notified of new chapters.
pub async fn toggle_follow(
    db: &DatabaseConnection,
    story_id: i32,
    user_id: i32,
) -> Result<bool, DomainError> {
    ensure_story(db, story_id).await?;

    toggle_pair(
        db,
        follow::Entity::delete_many()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::StoryId.eq(story_id)),
        follow::Entity::insert(follow::ActiveModel {
            user_id: Set(user_id),
            story_id: Set(story_id),
        }),
        OnConflict::columns([follow::Column::UserId, follow::Column::StoryId])
            .do_nothing()
            .to_owned(),
    )
    .await
}

/// Record that the reader finished a chapter and clear its notifications.
pub async fn mark_read(
    db: &DatabaseConnection,
    chapter_id: i32,
    reader: &Identity,
) -> Result<(), DomainError> {
    chapter_service::ensure_readable(db, chapter_id, Some(reader)).await?;

    let txn = db.begin().await?;

    chapter_read::Entity::insert(chapter_read::ActiveModel {
        user_id: Set(reader.user_id),
        chapter_id: Set(chapter_id),
        read_at: Set(Utc::now()),
    })
    .on_conflict(
        OnConflict::columns([chapter_read::Column::UserId, chapter_read::Column::ChapterId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(&txn)
    .await?;

    notification::Entity::update_many()
        .col_expr(notification::Column::IsRead, Expr::value(true))
        .filter(notification::Column::UserId.eq(reader.user_id))
        .filter(notification::Column::ChapterId.eq(chapter_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(())
}
