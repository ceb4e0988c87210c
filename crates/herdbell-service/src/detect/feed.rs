//! Low feed stock detector.

use herdbell_entity::herd::FeedItem;
use herdbell_entity::notification::NotificationType;

use super::candidate::{AffectedEntity, Candidate};

/// One candidate per item at or below its minimum stock level.
pub fn detect_low_stock(items: &[FeedItem]) -> Vec<Candidate> {
    items
        .iter()
        .filter(|item| item.is_low())
        .map(|item| Candidate {
            kind: NotificationType::LowStock,
            entity: AffectedEntity::Feed(item.summary()),
        })
        .collect()
}
