//! Finance Service - revenue figures and subscription records for admins.

use chrono::{DateTime, Utc};
use sea_orm::*;
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::DomainError;
use crate::models::user::UserSummary;
use crate::models::{
    SubscriptionPlan, UserSubscription, sale, subscription_plan, user, user_subscription,
};
use crate::services::store_service::round_money;

const RECENT_TRANSACTIONS: u64 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct FinanceSummary {
    pub total_revenue: f64,
    pub product_revenue: f64,
    pub subscription_revenue: f64,
    pub active_subscribers: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Sale,
    Subscription,
}

#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub kind: TransactionKind,
    pub id: i32,
    pub user: Option<UserSummary>,
    pub amount: f64,
    pub description: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionRecord {
    #[serde(flatten)]
    pub subscription: UserSubscription,
    pub is_active: bool,
    pub user: Option<UserSummary>,
    pub plan: Option<SubscriptionPlan>,
}

async fn plans_by_id(db: &DatabaseConnection) -> Result<HashMap<i32, SubscriptionPlan>, DomainError> {
    Ok(subscription_plan::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect())
}

async fn users_by_id(
    db: &DatabaseConnection,
    ids: Vec<i32>,
) -> Result<HashMap<i32, UserSummary>, DomainError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, UserSummary::from(u)))
        .collect())
}

/// Revenue is the sum of every sale plus the plan price of every
/// subscription ever started.
pub async fn summary(db: &DatabaseConnection) -> Result<FinanceSummary, DomainError> {
    let product_revenue: f64 = sale::Entity::find()
        .all(db)
        .await?
        .iter()
        .map(|s| s.total)
        .sum();

    let plans = plans_by_id(db).await?;
    let subscriptions = user_subscription::Entity::find().all(db).await?;
    let subscription_revenue: f64 = subscriptions
        .iter()
        .filter_map(|s| plans.get(&s.plan_id).map(|p| p.price))
        .sum();

    let now = Utc::now();
    let mut active_users: Vec<i32> = subscriptions
        .iter()
        .filter(|s| s.end_date > now)
        .map(|s| s.user_id)
        .collect();
    active_users.sort_unstable();
    active_users.dedup();

    let product_revenue = round_money(product_revenue);
    let subscription_revenue = round_money(subscription_revenue);

    Ok(FinanceSummary {
        total_revenue: round_money(product_revenue + subscription_revenue),
        product_revenue,
        subscription_revenue,
        active_subscribers: active_users.len() as u64,
    })
}

/// The most recent sales and subscriptions, merged newest first.
pub async fn recent_transactions(db: &DatabaseConnection) -> Result<Vec<Transaction>, DomainError> {
    let sales = sale::Entity::find()
        .order_by_desc(sale::Column::CreatedAt)
        .limit(RECENT_TRANSACTIONS)
        .all(db)
        .await?;
    let subscriptions = user_subscription::Entity::find()
        .order_by_desc(user_subscription::Column::StartDate)
        .limit(RECENT_TRANSACTIONS)
        .all(db)
        .await?;

    let plans = plans_by_id(db).await?;
    let user_ids = sales
        .iter()
        .map(|s| s.user_id)
        .chain(subscriptions.iter().map(|s| s.user_id))
        .collect();
    let users = users_by_id(db, user_ids).await?;

    let mut transactions: Vec<Transaction> = sales
        .into_iter()
        .map(|s| Transaction {
            kind: TransactionKind::Sale,
            id: s.id,
            user: users.get(&s.user_id).cloned(),
            amount: s.total,
            description: format!("Order #{}", s.id),
            date: s.created_at,
        })
        .chain(subscriptions.into_iter().map(|s| {
            let plan = plans.get(&s.plan_id);
            Transaction {
                kind: TransactionKind::Subscription,
                id: s.id,
                user: users.get(&s.user_id).cloned(),
                amount: plan.map(|p| p.price).unwrap_or(0.0),
                description: plan
                    .map(|p| format!("Subscription: {}", p.name))
                    .unwrap_or_else(|| "Subscription".to_string()),
                date: s.start_date,
            }
        }))
        .collect();

    transactions.sort_by(|a, b| b.date.cmp(&a.date));
    transactions.truncate(RECENT_TRANSACTIONS as usize);
    Ok(transactions)
}

/// Every subscription ever started, newest first.
pub async fn all_subscriptions(
    db: &DatabaseConnection,
) -> Result<Vec<SubscriptionRecord>, DomainError> {
    let subscriptions = user_subscription::Entity::find()
        .order_by_desc(user_subscription::Column::StartDate)
        .order_by_desc(user_subscription::Column::Id)
        .all(db)
        .await?;

    let plans = plans_by_id(db).await?;
    let users = users_by_id(db, subscriptions.iter().map(|s| s.user_id).collect()).await?;
    let now = Utc::now();

    Ok(subscriptions
        .into_iter()
        .map(|s| SubscriptionRecord {
            is_active: s.end_date > now,
            user: users.get(&s.user_id).cloned(),
            plan: plans.get(&s.plan_id).cloned(),
            subscription: s,
        })
        .collect())
}
