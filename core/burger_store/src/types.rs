//! # Types
//!
//! Domain data shared by every slice of the store.
//!
//! Field names on the wire follow the remote burger API (`_id`,
//! `createdAt`, flat nutrition fields); the Rust side uses snake_case and
//! groups nutrition facts into [`Nutrition`].
//!
//! ## Identity
//!
//! Two identities coexist in the constructor:
//!
//! - [`IngredientId`] — the catalog identity, shared by every copy of an
//!   ingredient.
//! - [`InstanceId`] — a per-entry identity minted when a filling is added,
//!   so the same sauce added twice can be removed or reordered one copy at
//!   a time.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog identity of an ingredient, as issued by the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientId(String);

impl IngredientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IngredientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IngredientId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Per-entry identity of a filling inside the constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Mint a fresh random identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Catalog category of an ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientType {
    Bun,
    Main,
    Sauce,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: u32,
    pub proteins: u32,
    pub fat: u32,
    pub carbohydrates: u32,
}

/// Immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(rename = "_id")]
    pub id: IngredientId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: IngredientType,
    pub price: u32,
    #[serde(flatten)]
    pub nutrition: Nutrition,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub image_large: String,
    #[serde(default)]
    pub image_mobile: String,
}

impl Ingredient {
    pub fn is_bun(&self) -> bool {
        self.kind == IngredientType::Bun
    }
}

/// Profile of the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
}

/// A filling placed in the constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConstructorItem {
    pub instance_id: InstanceId,
    pub ingredient: IngredientId,
}

impl ConstructorItem {
    pub fn new(ingredient: IngredientId) -> Self {
        Self {
            instance_id: InstanceId::generate(),
            ingredient,
        }
    }
}

/// Kitchen status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Pending,
    Done,
}

/// An order as returned by the feed, history and lookup endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    pub number: u64,
    pub status: OrderStatus,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientId>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Number assigned to a freshly placed order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub number: u64,
}

/// Result of a successful order submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderReceipt {
    pub success: bool,
    pub name: String,
    pub order: PlacedOrder,
}

/// Aggregate counters shown next to the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedTotals {
    pub total: u64,
    #[serde(rename = "totalToday")]
    pub total_today: u64,
}

/// One page of the global feed; applied to the store as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub orders: Vec<Order>,
    #[serde(flatten)]
    pub totals: FeedTotals,
}
