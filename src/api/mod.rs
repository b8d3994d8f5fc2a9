pub mod admin;
pub mod auth;
pub mod chapters;
pub mod comments;
pub mod error;
pub mod extract;
pub mod genres;
pub mod health;
pub mod notifications;
pub mod store;
pub mod stories;
pub mod upload;
pub mod users;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use crate::infrastructure::AppState;

/// Every `/api` route. Handlers enforce authentication through their
/// extractors and ownership through the services.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::get_me))
        // Stories
        .route(
            "/stories",
            get(stories::list_stories).post(stories::create_story),
        )
        .route("/stories/author/:author_id", get(stories::list_by_author))
        .route(
            "/stories/:id",
            get(stories::get_story)
                .put(stories::update_story)
                .delete(stories::delete_story),
        )
        .route("/stories/:id/like", post(stories::toggle_like))
        .route("/stories/:id/follow", post(stories::toggle_follow))
        // Chapters
        .route("/chapters", post(chapters::publish_chapter))
        .route("/chapters/story/:story_id", get(chapters::list_for_story))
        .route(
            "/chapters/:id",
            get(chapters::get_chapter)
                .put(chapters::update_chapter)
                .delete(chapters::delete_chapter),
        )
        .route("/chapters/:id/like", post(chapters::toggle_like))
        .route("/chapters/:id/read", post(chapters::mark_read))
        .route(
            "/chapters/:id/comments",
            get(chapters::list_comments).post(chapters::add_comment),
        )
        // Comments & moderation
        .route("/comments/:id/report", post(comments::report))
        .route("/admin/comments/reported", get(comments::reported_queue))
        .route("/admin/comments/:id/approve", post(comments::approve))
        .route(
            "/admin/comments/:id",
            axum::routing::delete(comments::delete),
        )
        // Admin
        .route("/admin/users", get(admin::list_users))
        .route(
            "/admin/users/:id",
            put(admin::update_user).delete(admin::delete_user),
        )
        .route("/admin/subscriptions", get(admin::list_subscriptions))
        .route("/admin/finance/summary", get(admin::finance_summary))
        .route(
            "/admin/finance/transactions",
            get(admin::recent_transactions),
        )
        // Notifications & reader dashboard
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/:id/read", post(notifications::mark_read))
        .route("/users/me", put(users::update_me))
        .route("/users/me/follows", get(users::my_follows))
        .route("/users/:id", get(users::public_profile))
        // Genres
        .route(
            "/genres",
            get(genres::list_genres).post(genres::create_genre),
        )
        .route(
            "/genres/:id",
            put(genres::rename_genre).delete(genres::delete_genre),
        )
        // Store
        .route("/store/plans", get(store::list_plans).post(store::create_plan))
        .route(
            "/store/plans/:id",
            put(store::update_plan).delete(store::delete_plan),
        )
        .route("/store/subscribe", post(store::subscribe))
        .route("/store/subscription/check", get(store::check_subscription))
        .route(
            "/store/products",
            get(store::list_products).post(store::create_product),
        )
        .route(
            "/store/products/:id",
            get(store::get_product)
                .put(store::update_product)
                .delete(store::delete_product),
        )
        .route("/store/sales", post(store::create_sale))
        .route("/store/sales/my", get(store::my_sales))
        // Uploads
        .route(
            "/upload",
            post(upload::upload_image)
                .layer(DefaultBodyLimit::max(upload::MAX_UPLOAD_BYTES + 64 * 1024)),
        )
        .with_state(state)
}
