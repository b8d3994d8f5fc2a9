mod common;

use axum::http::StatusCode;
use fabulis::models::user::Role;
use fabulis::services::engagement_service;
use serde_json::json;

#[tokio::test]
async fn test_story_like_toggles_and_restores_count() {
    let app = common::setup().await;
    let author = app.user("Bruno", Role::Author).await;
    let reader = app.user("Rita", Role::Reader).await;
    let story = app.story(author.id, "Saga", false).await;
    let uri = format!("/api/stories/{}/like", story.id);

    let (status, body) = app.post(&uri, Some(&reader.token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_liked"], true);
    assert_eq!(body["total_likes"], 1);

    let (_, body) = app.post(&uri, Some(&reader.token), json!({})).await;
    assert_eq!(body["is_liked"], false);
    assert_eq!(body["total_likes"], 0);

    let (status, _) = app.post(&uri, None, json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_like_unknown_story_is_not_found() {
    let app = common::setup().await;
    let reader = app.user("Rita", Role::Reader).await;

    let (status, body) = app
        .post("/api/stories/4242/like", Some(&reader.token), json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Story not found");
}

#[tokio::test]
async fn test_total_likes_counts_story_and_chapter_likes() {
    let app = common::setup().await;
    let author = app.user("Bruno", Role::Author).await;
    let a = app.user("Ana", Role::Reader).await;
    let b = app.user("Beto", Role::Reader).await;
    let story = app.story(author.id, "Saga", false).await;
    let one = app.chapter(story.id, 1, false).await;
    let two = app.chapter(story.id, 2, false).await;

    engagement_service::toggle_story_like(&app.db, story.id, a.id)
        .await
        .unwrap();
    engagement_service::toggle_chapter_like(&app.db, one.id, a.id)
        .await
        .unwrap();
    engagement_service::toggle_chapter_like(&app.db, one.id, b.id)
        .await
        .unwrap();

    let (status, body) = app
        .post(&format!("/api/chapters/{}/like", two.id), Some(&b.token), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_liked"], true);
    assert_eq!(body["like_count"], 1);

    assert_eq!(
        engagement_service::total_likes(&app.db, story.id).await.unwrap(),
        4
    );

    let (_, detail) = app
        .get(&format!("/api/stories/{}", story.id), Some(&a.token))
        .await;
    assert_eq!(detail["total_likes"], 4);
    assert_eq!(detail["is_liked"], true);
    assert_eq!(detail["chapters"][0]["is_liked"], true);
    assert_eq!(detail["chapters"][1]["is_liked"], false);
}

#[tokio::test]
async fn test_follow_toggle_and_follows_list() {
    let app = common::setup().await;
    let author = app.user("Bruno", Role::Author).await;
    let reader = app.user("Rita", Role::Reader).await;
    let followed = app.story(author.id, "Followed", false).await;
    app.story(author.id, "Ignored", false).await;
    let uri = format!("/api/stories/{}/follow", followed.id);

    let (_, body) = app.post(&uri, Some(&reader.token), json!({})).await;
    assert_eq!(body["is_following"], true);
    assert_eq!(body["follower_count"], 1);

    let (status, follows) = app.get("/api/users/me/follows", Some(&reader.token)).await;
    assert_eq!(status, StatusCode::OK);
    let follows = follows.as_array().unwrap();
    assert_eq!(follows.len(), 1);
    assert_eq!(follows[0]["title"], "Followed");

    let (_, detail) = app
        .get(&format!("/api/stories/{}", followed.id), Some(&reader.token))
        .await;
    assert_eq!(detail["is_following"], true);

    let (_, body) = app.post(&uri, Some(&reader.token), json!({})).await;
    assert_eq!(body["is_following"], false);
    assert_eq!(body["follower_count"], 0);

    let (_, follows) = app.get("/api/users/me/follows", Some(&reader.token)).await;
    assert!(follows.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_catalog_paginates_with_default_page_size() {
    let app = common::setup().await;
    let author = app.user("Bruno", Role::Author).await;
    for i in 0..10 {
        app.story(author.id, &format!("Story {i}"), false).await;
    }

    let (status, page) = app.get("/api/stories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 10);
    assert_eq!(page["page"], 1);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["stories"].as_array().unwrap().len(), 8);
    // Most recently updated first.
    assert_eq!(page["stories"][0]["title"], "Story 9");

    let (_, page) = app.get("/api/stories?page=2", None).await;
    assert_eq!(page["stories"].as_array().unwrap().len(), 2);

    let (_, page) = app.get("/api/stories?limit=5&page=2", None).await;
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["stories"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_catalog_filters_by_language_genre_and_search() {
    let app = common::setup().await;
    let admin = app.user("Aline", Role::Admin).await;
    let author = app.user("Bruno", Role::Author).await;
    let other = app.user("Carlos", Role::Author).await;

    let (status, genre) = app
        .post("/api/genres", Some(&admin.token), json!({ "name": "Fantasy" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let genre_id = genre["id"].as_i64().unwrap();

    let (status, created) = app
        .post(
            "/api/stories",
            Some(&author.token),
            json!({
                "title": "Dragons of Lisbon",
                "language": "pt",
                "genre_ids": [genre_id],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Story created");

    app.story(author.id, "Harbor Nights", false).await;
    app.story(other.id, "Quiet Fields", false).await;

    let (_, page) = app.get("/api/stories?language=pt", None).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["stories"][0]["title"], "Dragons of Lisbon");
    assert_eq!(page["stories"][0]["genres"][0]["name"], "Fantasy");

    let (_, page) = app.get("/api/stories?language=all", None).await;
    assert_eq!(page["total"], 3);

    let (_, page) = app
        .get(&format!("/api/stories?genre={genre_id}"), None)
        .await;
    assert_eq!(page["total"], 1);

    let (_, page) = app.get("/api/stories?search=harbor", None).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["stories"][0]["title"], "Harbor Nights");

    // Searching matches the author's display name as well.
    let (_, page) = app.get("/api/stories?search=Carlos", None).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["stories"][0]["author"]["display_name"], "Carlos");

    let (status, _) = app.get("/api/stories?language=klingon", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_readers_cannot_create_stories() {
    let app = common::setup().await;
    let reader = app.user("Rita", Role::Reader).await;

    let (status, _) = app
        .post(
            "/api/stories",
            Some(&reader.token),
            json!({ "title": "Mine", "language": "en" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_chapter_read_state_is_per_viewer() {
    let app = common::setup().await;
    let author = app.user("Bruno", Role::Author).await;
    let reader = app.user("Rita", Role::Reader).await;
    let story = app.story(author.id, "Saga", false).await;
    let chapter = app.chapter(story.id, 1, false).await;

    let (status, _) = app
        .post(
            &format!("/api/chapters/{}/read", chapter.id),
            Some(&reader.token),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Marking twice is harmless.
    let (status, _) = app
        .post(
            &format!("/api/chapters/{}/read", chapter.id),
            Some(&reader.token),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, view) = app
        .get(&format!("/api/chapters/{}", chapter.id), Some(&reader.token))
        .await;
    assert_eq!(view["is_read"], true);

    let (_, view) = app
        .get(&format!("/api/chapters/{}", chapter.id), Some(&author.token))
        .await;
    assert_eq!(view["is_read"], false);
}

#[tokio::test]
async fn test_pages_past_the_end_are_empty() {
    let app = common::setup().await;
    let author = app.user("Bruno", Role::Author).await;
    for i in 0..3 {
        app.story(author.id, &format!("Story {i}"), false).await;
    }

    let (status, page) = app
        .get("/api/stories?page=18446744073709551615&limit=50", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["total_pages"], 1);
    assert!(page["stories"].as_array().unwrap().is_empty());

    let (_, page) = app.get("/api/stories?page=2&limit=3", None).await;
    assert!(page["stories"].as_array().unwrap().is_empty());
}
