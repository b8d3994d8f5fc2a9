mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use fabulis::models::user::Role;
use fabulis::models::{sale_item, user_subscription};
use fabulis::services::store_service;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

fn parse_date(value: &serde_json::Value) -> DateTime<Utc> {
    serde_json::from_value(value.clone()).unwrap()
}

#[tokio::test]
async fn test_monthly_plan_runs_for_its_duration() {
    let app = common::setup().await;
    let reader = app.user("Rita", Role::Reader).await;
    let plan = app.plan("Monthly", 14.90, 30).await;

    let (status, body) = app
        .post(
            "/api/store/subscribe",
            Some(&reader.token),
            json!({ "plan_id": plan.id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let start = parse_date(&body["start_date"]);
    let end = parse_date(&body["end_date"]);
    assert_eq!(end - start, Duration::days(30));

    let (status, check) = app
        .get("/api/store/subscription/check", Some(&reader.token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(check["has_active_subscription"], true);
    assert_eq!(check["plan"]["name"], "Monthly");

    let (_, me) = app.get("/api/auth/me", Some(&reader.token)).await;
    assert_eq!(me["has_active_subscription"], true);
}

#[tokio::test]
async fn test_subscribe_to_missing_plan() {
    let app = common::setup().await;
    let reader = app.user("Rita", Role::Reader).await;

    let (status, body) = app
        .post("/api/store/subscribe", Some(&reader.token), json!({ "plan_id": 77 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Plan not found");

    let (_, check) = app
        .get("/api/store/subscription/check", Some(&reader.token))
        .await;
    assert_eq!(check["has_active_subscription"], false);
}

#[tokio::test]
async fn test_resubscribing_leaves_one_active_subscription() {
    let app = common::setup().await;
    let reader = app.user("Rita", Role::Reader).await;
    let monthly = app.plan("Monthly", 14.90, 30).await;
    let annual = app.plan("Annual", 149.90, 365).await;

    store_service::subscribe(&app.db, reader.id, monthly.id)
        .await
        .unwrap();
    let latest = store_service::subscribe(&app.db, reader.id, annual.id)
        .await
        .unwrap();

    let active = user_subscription::Entity::find()
        .filter(user_subscription::Column::UserId.eq(reader.id))
        .filter(user_subscription::Column::EndDate.gt(Utc::now()))
        .all(&app.db)
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, latest.id);

    // The superseded row is kept as history.
    let all = user_subscription::Entity::find()
        .filter(user_subscription::Column::UserId.eq(reader.id))
        .all(&app.db)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let status = store_service::subscription_status(&app.db, reader.id)
        .await
        .unwrap();
    assert_eq!(status.plan.map(|p| p.name), Some("Annual".to_string()));
}

#[tokio::test]
async fn test_sale_snapshots_catalog_price() {
    let app = common::setup().await;
    let admin = app.user("Aline", Role::Admin).await;
    let reader = app.user("Rita", Role::Reader).await;
    let product = app.product("Hardcover", 89.90).await;

    let (status, body) = app
        .post(
            "/api/store/sales",
            Some(&reader.token),
            json!({ "items": [{ "id": product.id, "price": 89.90, "quantity": 1 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["total"], 89.90);
    let sale_id = body["sale_id"].as_i64().unwrap() as i32;

    let (status, _) = app
        .send(
            "PUT",
            &format!("/api/store/products/{}", product.id),
            Some(&admin.token),
            Some(json!({ "name": "Hardcover", "price": 99.90, "kind": "book" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let items = sale_item::Entity::find()
        .filter(sale_item::Column::SaleId.eq(sale_id))
        .all(&app.db)
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].price, 89.90);

    let (status, history) = app.get("/api/store/sales/my", Some(&reader.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history[0]["total"], 89.90);
    assert_eq!(history[0]["items"][0]["price"], 89.90);
    assert_eq!(history[0]["items"][0]["product_name"], "Hardcover");
}

#[tokio::test]
async fn test_sale_total_sums_quantities() {
    let app = common::setup().await;
    let reader = app.user("Rita", Role::Reader).await;
    let book = app.product("Paperback", 39.90).await;
    let ebook = app.product("Ebook", 19.90).await;

    let sale = store_service::create_sale(
        &app.db,
        reader.id,
        vec![
            store_service::SaleLine {
                product_id: book.id,
                quantity: 2,
                price: None,
            },
            store_service::SaleLine {
                product_id: ebook.id,
                quantity: 1,
                price: Some(19.90),
            },
        ],
    )
    .await
    .unwrap();

    assert_eq!(sale.total, 99.70);
}

#[tokio::test]
async fn test_sale_rejects_stale_price_and_bad_carts() {
    let app = common::setup().await;
    let reader = app.user("Rita", Role::Reader).await;
    let product = app.product("Hardcover", 89.90).await;

    let (status, _) = app
        .post(
            "/api/store/sales",
            Some(&reader.token),
            json!({ "items": [{ "id": product.id, "price": 79.90, "quantity": 1 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post("/api/store/sales", Some(&reader.token), json!({ "items": [] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/store/sales",
            Some(&reader.token),
            json!({ "items": [{ "id": product.id, "quantity": 0 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/store/sales",
            Some(&reader.token),
            json!({ "items": [{ "id": 999, "quantity": 1 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            "/api/store/sales",
            None,
            json!({ "items": [{ "id": product.id, "quantity": 1 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, history) = app.get("/api/store/sales/my", Some(&reader.token)).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_referenced_catalog_entries_cannot_be_deleted() {
    let app = common::setup().await;
    let admin = app.user("Aline", Role::Admin).await;
    let reader = app.user("Rita", Role::Reader).await;
    let sold = app.product("Hardcover", 89.90).await;
    let unsold = app.product("Poster", 9.90).await;
    let plan = app.plan("Monthly", 14.90, 30).await;

    store_service::create_sale(
        &app.db,
        reader.id,
        vec![store_service::SaleLine {
            product_id: sold.id,
            quantity: 1,
            price: None,
        }],
    )
    .await
    .unwrap();
    store_service::subscribe(&app.db, reader.id, plan.id)
        .await
        .unwrap();

    let (status, _) = app
        .send("DELETE", &format!("/api/store/products/{}", sold.id), Some(&admin.token), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send("DELETE", &format!("/api/store/plans/{}", plan.id), Some(&admin.token), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send("DELETE", &format!("/api/store/products/{}", unsold.id), Some(&admin.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .get(&format!("/api/store/products/{}", unsold.id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_writes_require_admin() {
    let app = common::setup().await;
    let admin = app.user("Aline", Role::Admin).await;
    let author = app.user("Bruno", Role::Author).await;
    let plan = json!({ "name": "Weekly", "price": 4.90, "duration_days": 7 });

    let (status, _) = app
        .post("/api/store/plans", Some(&author.token), plan.clone())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = app.post("/api/store/plans", Some(&admin.token), plan).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["duration_days"], 7);

    let (status, _) = app
        .post(
            "/api/store/products",
            Some(&admin.token),
            json!({ "name": "  ", "price": 10.0, "kind": "ebook" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/store/products",
            Some(&admin.token),
            json!({ "name": "Ebook", "price": -1.0, "kind": "ebook" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, plans) = app.get("/api/store/plans", None).await;
    assert_eq!(plans.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_finance_summary_and_transactions() {
    let app = common::setup().await;
    let admin = app.user("Aline", Role::Admin).await;
    let reader = app.user("Rita", Role::Reader).await;
    let other = app.user("Otto", Role::Reader).await;
    let product = app.product("Hardcover", 89.90).await;
    let plan = app.plan("Monthly", 14.90, 30).await;

    store_service::create_sale(
        &app.db,
        reader.id,
        vec![store_service::SaleLine {
            product_id: product.id,
            quantity: 1,
            price: None,
        }],
    )
    .await
    .unwrap();
    store_service::subscribe(&app.db, reader.id, plan.id)
        .await
        .unwrap();
    store_service::subscribe(&app.db, other.id, plan.id)
        .await
        .unwrap();

    let (status, summary) = app
        .get("/api/admin/finance/summary", Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["product_revenue"], 89.90);
    assert_eq!(summary["subscription_revenue"], 29.80);
    assert_eq!(summary["total_revenue"], 119.70);
    assert_eq!(summary["active_subscribers"], 2);

    let (status, transactions) = app
        .get("/api/admin/finance/transactions", Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::OK);
    let transactions = transactions.as_array().unwrap();
    assert_eq!(transactions.len(), 3);
    assert_eq!(transactions[0]["kind"], "subscription");
    assert_eq!(transactions[2]["kind"], "sale");

    let (status, subs) = app
        .get("/api/admin/subscriptions", Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subs.as_array().unwrap().len(), 2);
    assert_eq!(subs[0]["is_active"], true);

    let (status, _) = app
        .get("/api/admin/finance/summary", Some(&reader.token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
