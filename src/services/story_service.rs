//! Story Service - catalog browsing, story pages and story CRUD.

use chrono::Utc;
use sea_orm::sea_query::{OnConflict, Query};
use sea_orm::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::{DomainError, Identity};
use crate::models::story::{Language, StoryKind, StoryStatus};
use crate::models::user::{Role, UserSummary};
use crate::models::{Genre, Story, follow, genre, story, story_genre, user};
use crate::services::chapter_service::{self, ChapterSummary};
use crate::services::engagement_service;

pub const DEFAULT_PAGE_SIZE: u64 = 8;
const MAX_PAGE_SIZE: u64 = 50;

/// Catalog query as received from the client. `"all"` disables a filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoryQuery {
    pub language: Option<String>,
    pub genre: Option<String>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// A story with its author, genres and engagement figures.
#[derive(Debug, Clone, Serialize)]
pub struct StoryCard {
    #[serde(flatten)]
    pub story: Story,
    pub author: Option<UserSummary>,
    pub genres: Vec<Genre>,
    pub chapter_count: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    pub follower_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryPage {
    pub stories: Vec<StoryCard>,
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryDetail {
    #[serde(flatten)]
    pub card: StoryCard,
    pub chapters: Vec<ChapterSummary>,
    pub is_liked: bool,
    pub is_following: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoryInput {
    pub title: String,
    pub synopsis: Option<String>,
    pub cover_url: Option<String>,
    pub language: Language,
    #[serde(default = "default_status")]
    pub status: StoryStatus,
    #[serde(default = "default_kind")]
    pub kind: StoryKind,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

fn default_status() -> StoryStatus {
    StoryStatus::Ongoing
}

fn default_kind() -> StoryKind {
    StoryKind::Book
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoryChanges {
    pub title: Option<String>,
    pub synopsis: Option<String>,
    pub cover_url: Option<String>,
    pub language: Option<Language>,
    pub status: Option<StoryStatus>,
    pub kind: Option<StoryKind>,
    pub is_premium: Option<bool>,
    pub genre_ids: Option<Vec<i32>>,
}

fn active_filter(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "all")
}

fn parse_language(value: &str) -> Result<Language, DomainError> {
    match value {
        "pt" => Ok(Language::Pt),
        "en" => Ok(Language::En),
        "es" => Ok(Language::Es),
        other => Err(DomainError::validation(format!("Unknown language '{other}'"))),
    }
}

fn require_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::validation("Story title is required"));
    }
    Ok(title.to_string())
}

pub async fn find_story<C: ConnectionTrait>(db: &C, id: i32) -> Result<Story, DomainError> {
    story::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Story"))
}

async fn build_card(db: &DatabaseConnection, story: Story) -> Result<StoryCard, DomainError> {
    let author = user::Entity::find_by_id(story.author_id)
        .one(db)
        .await?
        .map(UserSummary::from);
    let genres = story
        .find_related(genre::Entity)
        .order_by_asc(genre::Column::Name)
        .all(db)
        .await?;

    Ok(StoryCard {
        author,
        genres,
        chapter_count: engagement_service::chapter_count(db, story.id).await?,
        total_likes: engagement_service::total_likes(db, story.id).await?,
        total_comments: engagement_service::total_comments(db, story.id).await?,
        follower_count: engagement_service::follower_count(db, story.id).await?,
        story,
    })
}

async fn build_cards(
    db: &DatabaseConnection,
    stories: Vec<Story>,
) -> Result<Vec<StoryCard>, DomainError> {
    let mut cards = Vec::with_capacity(stories.len());
    for s in stories {
        cards.push(build_card(db, s).await?);
    }
    Ok(cards)
}

/// One page of the catalog, most recently updated first.
pub async fn list_stories(
    db: &DatabaseConnection,
    query: StoryQuery,
) -> Result<StoryPage, DomainError> {
    let mut select = story::Entity::find();

    if let Some(lang) = active_filter(&query.language) {
        select = select.filter(story::Column::Language.eq(parse_language(lang)?));
    }

    if let Some(genre) = active_filter(&query.genre) {
        let genre_id: i32 = genre
            .parse()
            .map_err(|_| DomainError::validation("Genre must be a numeric id"))?;
        select = select.filter(
            story::Column::Id.in_subquery(
                Query::select()
                    .column(story_genre::Column::StoryId)
                    .from(story_genre::Entity)
                    .and_where(story_genre::Column::GenreId.eq(genre_id))
                    .to_owned(),
            ),
        );
    }

    if let Some(search) = active_filter(&query.search) {
        select = select.filter(
            Condition::any()
                .add(story::Column::Title.contains(search))
                .add(
                    story::Column::AuthorId.in_subquery(
                        Query::select()
                            .column(user::Column::Id)
                            .from(user::Entity)
                            .and_where(user::Column::DisplayName.contains(search))
                            .to_owned(),
                    ),
                ),
        );
    }

    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let page = query.page.unwrap_or(1).max(1);

    let paginator = select
        .order_by_desc(story::Column::UpdatedAt)
        .order_by_desc(story::Column::Id)
        .paginate(db, limit);

    let total = paginator.num_items().await?;
    let total_pages = total.div_ceil(limit);

    // Past the last page there is nothing to fetch, and the offset could overflow.
    let stories = if page > total_pages {
        Vec::new()
    } else {
        paginator.fetch_page(page - 1).await?
    };

    Ok(StoryPage {
        stories: build_cards(db, stories).await?,
        total,
        page,
        total_pages,
    })
}

/// Every story by one author, most recently updated first.
pub async fn stories_by_author(
    db: &DatabaseConnection,
    author_id: i32,
) -> Result<Vec<StoryCard>, DomainError> {
    user::Entity::find_by_id(author_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Author"))?;

    let stories = story::Entity::find()
        .filter(story::Column::AuthorId.eq(author_id))
        .order_by_desc(story::Column::UpdatedAt)
        .all(db)
        .await?;

    build_cards(db, stories).await
}

/// Stories the user follows, most recently updated first.
pub async fn followed_stories(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<StoryCard>, DomainError> {
    let stories = story::Entity::find()
        .filter(
            story::Column::Id.in_subquery(
                Query::select()
                    .column(follow::Column::StoryId)
                    .from(follow::Entity)
                    .and_where(follow::Column::UserId.eq(user_id))
                    .to_owned(),
            ),
        )
        .order_by_desc(story::Column::UpdatedAt)
        .all(db)
        .await?;

    build_cards(db, stories).await
}

/// The full story page for one viewer.
pub async fn get_story(
    db: &DatabaseConnection,
    id: i32,
    viewer: Option<i32>,
) -> Result<StoryDetail, DomainError> {
    let story = find_story(db, id).await?;
    let chapters = chapter_service::summaries_for_story(db, id, viewer).await?;

    let (is_liked, is_following) = match viewer {
        Some(user_id) => (
            engagement_service::is_story_liked(db, id, user_id).await?,
            engagement_service::is_following(db, id, user_id).await?,
        ),
        None => (false, false),
    };

    Ok(StoryDetail {
        card: build_card(db, story).await?,
        chapters,
        is_liked,
        is_following,
    })
}

async fn replace_genres<C: ConnectionTrait>(
    db: &C,
    story_id: i32,
    genre_ids: &[i32],
) -> Result<(), DomainError> {
    story_genre::Entity::delete_many()
        .filter(story_genre::Column::StoryId.eq(story_id))
        .exec(db)
        .await?;

    let unique: BTreeSet<i32> = genre_ids.iter().copied().collect();
    if unique.is_empty() {
        return Ok(());
    }

    story_genre::Entity::insert_many(unique.into_iter().map(|genre_id| {
        story_genre::ActiveModel {
            story_id: Set(story_id),
            genre_id: Set(genre_id),
        }
    }))
    .on_conflict(
        OnConflict::columns([story_genre::Column::StoryId, story_genre::Column::GenreId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    Ok(())
}

pub async fn create_story(
    db: &DatabaseConnection,
    actor: &Identity,
    input: StoryInput,
) -> Result<Story, DomainError> {
    actor.ensure_role(&[Role::Author, Role::Admin])?;
    let title = require_title(&input.title)?;
    let now = Utc::now();

    let txn = db.begin().await?;

    let created = story::ActiveModel {
        author_id: Set(actor.user_id),
        title: Set(title),
        synopsis: Set(input.synopsis),
        cover_url: Set(input.cover_url),
        language: Set(input.language),
        status: Set(input.status),
        kind: Set(input.kind),
        is_premium: Set(input.is_premium),
        published_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    replace_genres(&txn, created.id, &input.genre_ids).await?;
    txn.commit().await?;

    tracing::info!("Story {} created by user {}", created.id, actor.user_id);
    Ok(created)
}

pub async fn update_story(
    db: &DatabaseConnection,
    actor: &Identity,
    id: i32,
    changes: StoryChanges,
) -> Result<Story, DomainError> {
    let existing = find_story(db, id).await?;
    actor.ensure_can_manage(existing.author_id, "story")?;

    let mut active: story::ActiveModel = existing.into();
    if let Some(title) = changes.title {
        active.title = Set(require_title(&title)?);
    }
    if let Some(synopsis) = changes.synopsis {
        active.synopsis = Set(Some(synopsis));
    }
    if let Some(cover_url) = changes.cover_url {
        active.cover_url = Set(Some(cover_url));
    }
    if let Some(language) = changes.language {
        active.language = Set(language);
    }
    if let Some(status) = changes.status {
        active.status = Set(status);
    }
    if let Some(kind) = changes.kind {
        active.kind = Set(kind);
    }
    if let Some(is_premium) = changes.is_premium {
        active.is_premium = Set(is_premium);
    }
    active.updated_at = Set(Utc::now());

    let txn = db.begin().await?;
    let updated = active.update(&txn).await?;
    if let Some(genre_ids) = changes.genre_ids {
        replace_genres(&txn, id, &genre_ids).await?;
    }
    txn.commit().await?;

    Ok(updated)
}

/// Delete a story with everything hanging off it.
pub async fn delete_story(
    db: &DatabaseConnection,
    actor: &Identity,
    id: i32,
) -> Result<(), DomainError> {
    let existing = find_story(db, id).await?;
    actor.ensure_can_manage(existing.author_id, "story")?;

    story::Entity::delete_by_id(id).exec(db).await?;
    tracing::info!("Story {} deleted by user {}", id, actor.user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_and_blank_disable_filters() {
        assert_eq!(active_filter(&Some("all".to_string())), None);
        assert_eq!(active_filter(&Some("  ".to_string())), None);
        assert_eq!(active_filter(&None), None);
        assert_eq!(active_filter(&Some("pt".to_string())), Some("pt"));
    }

    #[test]
    fn unknown_language_is_rejected() {
        assert!(parse_language("fr").is_err());
        assert_eq!(parse_language("es").unwrap(), Language::Es);
    }
}
