//! Feed stock facts.

use serde::{Deserialize, Serialize};

use crate::notification::payload::FeedItemSummary;

/// A feed item with its current stock and reorder threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Identifier in the stock store.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Stock on hand.
    pub current_stock: f64,
    /// Threshold at or below which the item is low.
    pub minimum_stock_level: f64,
    /// Unit of measure (kg, bags, bales).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl FeedItem {
    /// Stock is at or below the minimum level.
    pub fn is_low(&self) -> bool {
        self.current_stock <= self.minimum_stock_level
    }

    /// Payload form stored in a notification.
    pub fn summary(&self) -> FeedItemSummary {
        FeedItemSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            current_stock: self.current_stock,
            minimum_stock_level: self.minimum_stock_level,
            unit: self.unit.clone(),
        }
    }
}
