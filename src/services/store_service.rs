//! Store Service - subscription plans, user subscriptions, products and sales.

use chrono::{Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::DomainError;
use crate::models::product::{self, ProductKind};
use crate::models::{
    Product, Sale, SubscriptionPlan, UserSubscription, sale, sale_item, subscription_plan,
    user_subscription,
};

/// Prices are kept to the cent.
pub(crate) fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn require_name(name: &str, what: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation(format!("{what} name is required")));
    }
    Ok(name.to_string())
}

fn require_price(price: f64) -> Result<f64, DomainError> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::validation("Price must be a non-negative number"));
    }
    Ok(round_money(price))
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct PlanInput {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub duration_days: i32,
}

fn validate_plan(input: &PlanInput) -> Result<(String, f64), DomainError> {
    let name = require_name(&input.name, "Plan")?;
    let price = require_price(input.price)?;
    if input.duration_days <= 0 {
        return Err(DomainError::validation("Plan duration must be at least one day"));
    }
    Ok((name, price))
}

pub async fn list_plans(db: &DatabaseConnection) -> Result<Vec<SubscriptionPlan>, DomainError> {
    Ok(subscription_plan::Entity::find()
        .order_by_asc(subscription_plan::Column::Price)
        .all(db)
        .await?)
}

pub async fn create_plan(
    db: &DatabaseConnection,
    input: PlanInput,
) -> Result<SubscriptionPlan, DomainError> {
    let (name, price) = validate_plan(&input)?;

    let plan = subscription_plan::ActiveModel {
        name: Set(name),
        price: Set(price),
        description: Set(input.description),
        duration_days: Set(input.duration_days),
        ..Default::default()
    };

    Ok(plan.insert(db).await?)
}

pub async fn update_plan(
    db: &DatabaseConnection,
    id: i32,
    input: PlanInput,
) -> Result<SubscriptionPlan, DomainError> {
    let (name, price) = validate_plan(&input)?;
    let existing = subscription_plan::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Plan"))?;

    let mut plan: subscription_plan::ActiveModel = existing.into();
    plan.name = Set(name);
    plan.price = Set(price);
    plan.description = Set(input.description);
    plan.duration_days = Set(input.duration_days);

    Ok(plan.update(db).await?)
}

/// Plans with subscriptions are kept for revenue reporting.
pub async fn delete_plan(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let used = user_subscription::Entity::find()
        .filter(user_subscription::Column::PlanId.eq(id))
        .count(db)
        .await?;
    if used > 0 {
        return Err(DomainError::Conflict(
            "Plan has subscriptions and cannot be deleted".to_string(),
        ));
    }

    let result = subscription_plan::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::not_found("Plan"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

/// The user's subscription whose `end_date` is still in the future.
pub async fn active_subscription<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Option<UserSubscription>, DomainError> {
    Ok(user_subscription::Entity::find()
        .filter(user_subscription::Column::UserId.eq(user_id))
        .filter(user_subscription::Column::EndDate.gt(Utc::now()))
        .order_by_desc(user_subscription::Column::EndDate)
        .one(db)
        .await?)
}

/// An active subscription together with its plan.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionStatus {
    pub has_active_subscription: bool,
    pub subscription: Option<UserSubscription>,
    pub plan: Option<SubscriptionPlan>,
}

pub async fn subscription_status(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<SubscriptionStatus, DomainError> {
    let Some(subscription) = active_subscription(db, user_id).await? else {
        return Ok(SubscriptionStatus {
            has_active_subscription: false,
            subscription: None,
            plan: None,
        });
    };

    let plan = subscription_plan::Entity::find_by_id(subscription.plan_id)
        .one(db)
        .await?;

    Ok(SubscriptionStatus {
        has_active_subscription: true,
        subscription: Some(subscription),
        plan,
    })
}

/// Start a subscription now, closing any subscription still running so the
/// user never holds more than one active row.
pub async fn subscribe(
    db: &DatabaseConnection,
    user_id: i32,
    plan_id: i32,
) -> Result<UserSubscription, DomainError> {
    let plan = subscription_plan::Entity::find_by_id(plan_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Plan"))?;

    let now = Utc::now();
    let end_date = now + Duration::days(i64::from(plan.duration_days));

    let txn = db.begin().await?;

    let closed = user_subscription::Entity::update_many()
        .col_expr(user_subscription::Column::EndDate, Expr::value(now))
        .filter(user_subscription::Column::UserId.eq(user_id))
        .filter(user_subscription::Column::EndDate.gt(now))
        .exec(&txn)
        .await?;

    let subscription = user_subscription::ActiveModel {
        user_id: Set(user_id),
        plan_id: Set(plan.id),
        start_date: Set(now),
        end_date: Set(end_date),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(
        "User {} subscribed to plan '{}' until {} ({} superseded)",
        user_id,
        plan.name,
        end_date,
        closed.rows_affected
    );

    Ok(subscription)
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub cover_url: Option<String>,
    pub kind: ProductKind,
}

pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<Product>, DomainError> {
    Ok(product::Entity::find()
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?)
}

pub async fn get_product(db: &DatabaseConnection, id: i32) -> Result<Product, DomainError> {
    product::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Product"))
}

pub async fn create_product(
    db: &DatabaseConnection,
    input: ProductInput,
) -> Result<Product, DomainError> {
    let product = product::ActiveModel {
        name: Set(require_name(&input.name, "Product")?),
        description: Set(input.description),
        price: Set(require_price(input.price)?),
        cover_url: Set(input.cover_url),
        kind: Set(input.kind),
        ..Default::default()
    };

    Ok(product.insert(db).await?)
}

/// Updating a price never rewrites past sales: sale items keep their own
/// snapshot.
pub async fn update_product(
    db: &DatabaseConnection,
    id: i32,
    input: ProductInput,
) -> Result<Product, DomainError> {
    let name = require_name(&input.name, "Product")?;
    let price = require_price(input.price)?;
    let existing = get_product(db, id).await?;

    let mut product: product::ActiveModel = existing.into();
    product.name = Set(name);
    product.description = Set(input.description);
    product.price = Set(price);
    product.cover_url = Set(input.cover_url);
    product.kind = Set(input.kind);

    Ok(product.update(db).await?)
}

/// Products that were ever sold stay in the catalog so sale history keeps
/// its line items.
pub async fn delete_product(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let sold = sale_item::Entity::find()
        .filter(sale_item::Column::ProductId.eq(id))
        .count(db)
        .await?;
    if sold > 0 {
        return Err(DomainError::Conflict(
            "Product has sales and cannot be deleted".to_string(),
        ));
    }

    let result = product::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::not_found("Product"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Sales
// ---------------------------------------------------------------------------

/// One cart line. `price` is what the client displayed; when present it must
/// match the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct SaleLine {
    #[serde(alias = "id")]
    pub product_id: i32,
    pub quantity: i32,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaleLineView {
    pub product_id: i32,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleLineView>,
}

/// Record a purchase. Each item stores the catalog price at purchase time.
pub async fn create_sale(
    db: &DatabaseConnection,
    user_id: i32,
    lines: Vec<SaleLine>,
) -> Result<Sale, DomainError> {
    if lines.is_empty() {
        return Err(DomainError::validation("The cart is empty"));
    }
    if lines.iter().any(|l| l.quantity <= 0) {
        return Err(DomainError::validation("Quantity must be at least 1"));
    }

    let product_ids: Vec<i32> = lines.iter().map(|l| l.product_id).collect();
    let catalog: HashMap<i32, Product> = product::Entity::find()
        .filter(product::Column::Id.is_in(product_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut priced = Vec::with_capacity(lines.len());
    for line in &lines {
        let product = catalog
            .get(&line.product_id)
            .ok_or_else(|| DomainError::NotFound(format!("Product {}", line.product_id)))?;

        if let Some(shown) = line.price
            && round_money(shown) != round_money(product.price)
        {
            return Err(DomainError::Conflict(format!(
                "The price of '{}' has changed",
                product.name
            )));
        }

        priced.push((product.id, line.quantity, round_money(product.price)));
    }

    let total = round_money(
        priced
            .iter()
            .map(|(_, quantity, price)| price * f64::from(*quantity))
            .sum(),
    );

    let txn = db.begin().await?;

    let sale = sale::ActiveModel {
        user_id: Set(user_id),
        total: Set(total),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for (product_id, quantity, price) in priced {
        sale_item::ActiveModel {
            sale_id: Set(sale.id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            price: Set(price),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    tracing::info!("Sale {} recorded for user {}: {:.2}", sale.id, user_id, total);
    Ok(sale)
}

/// The user's purchases, newest first, with their line items.
pub async fn sales_for_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<SaleWithItems>, DomainError> {
    let sales = sale::Entity::find()
        .filter(sale::Column::UserId.eq(user_id))
        .order_by_desc(sale::Column::CreatedAt)
        .order_by_desc(sale::Column::Id)
        .find_with_related(sale_item::Entity)
        .all(db)
        .await?;

    let product_names: HashMap<i32, String> = product::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    Ok(sales
        .into_iter()
        .map(|(sale, items)| SaleWithItems {
            sale,
            items: items
                .into_iter()
                .map(|item| SaleLineView {
                    product_id: item.product_id,
                    product_name: product_names.get(&item.product_id).cloned(),
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_rounds_to_cents() {
        assert_eq!(round_money(14.899999), 14.9);
        assert_eq!(round_money(89.90 * 3.0), 269.7);
    }

    #[test]
    fn sale_line_accepts_id_alias() {
        let line: SaleLine =
            serde_json::from_str(r#"{"id": 1, "price": 89.90, "quantity": 1}"#).unwrap();
        assert_eq!(line.product_id, 1);
        assert_eq!(line.price, Some(89.90));
    }
}
