#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use fabulis::auth::create_jwt;
use fabulis::config::Config;
use fabulis::db;
use fabulis::models::story::{Language, StoryKind, StoryStatus};
use fabulis::models::user::Role;
use fabulis::models::{chapter, product, story, subscription_plan, user};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`

pub struct TestApp {
    pub db: DatabaseConnection,
    pub router: Router,
    pub config: Config,
}

pub async fn setup() -> TestApp {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let config = Config::for_tests();
    let router = fabulis::server::build_router(db.clone(), config.clone());
    TestApp { db, router, config }
}

pub struct TestUser {
    pub id: i32,
    pub token: String,
}

impl TestApp {
    /// Insert an account directly and mint a token for it.
    pub async fn user(&self, name: &str, role: Role) -> TestUser {
        let now = Utc::now();
        let created = user::ActiveModel {
            display_name: Set(name.to_string()),
            email: Set(format!("{}@example.com", name.to_lowercase())),
            password_hash: Set("not-a-real-hash".to_string()),
            avatar_url: Set(None),
            role: Set(role),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to create user");

        let token = create_jwt(
            &self.config.jwt_secret,
            created.id,
            &created.email,
            role,
            self.config.jwt_ttl_days,
        )
        .expect("Failed to create JWT");

        TestUser {
            id: created.id,
            token,
        }
    }

    pub async fn story(&self, author_id: i32, title: &str, is_premium: bool) -> story::Model {
        let now = Utc::now();
        story::ActiveModel {
            author_id: Set(author_id),
            title: Set(title.to_string()),
            synopsis: Set(None),
            cover_url: Set(None),
            language: Set(Language::En),
            status: Set(StoryStatus::Ongoing),
            kind: Set(StoryKind::Book),
            is_premium: Set(is_premium),
            published_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to create story")
    }

    pub async fn chapter(&self, story_id: i32, number: i32, is_premium: bool) -> chapter::Model {
        chapter::ActiveModel {
            story_id: Set(story_id),
            number: Set(number),
            title: Set(format!("Chapter {number}")),
            content: Set(format!("Body of chapter {number}")),
            is_premium: Set(is_premium),
            published_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to create chapter")
    }

    pub async fn plan(&self, name: &str, price: f64, duration_days: i32) -> subscription_plan::Model {
        subscription_plan::ActiveModel {
            name: Set(name.to_string()),
            price: Set(price),
            description: Set(None),
            duration_days: Set(duration_days),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to create plan")
    }

    pub async fn product(&self, name: &str, price: f64) -> product::Model {
        product::ActiveModel {
            name: Set(name.to_string()),
            description: Set(None),
            price: Set(price),
            cover_url: Set(None),
            kind: Set(product::ProductKind::Book),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to create product")
    }

    /// Send a request through the full router; returns status and JSON body
    /// (`Value::Null` for non-JSON bodies).
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().uri(uri).method(method);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(json) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, token, Some(body)).await
    }
}
