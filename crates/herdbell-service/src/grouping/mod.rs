//! Grouping and priority resolution.
//!
//! All candidates of one type fold into a single draft, ordered
//! most-urgent-first with ties broken by entity id.

pub mod dedupe;
pub mod formatter;
pub mod priority;

use std::collections::BTreeMap;

use herdbell_core::config::DetectionConfig;
use herdbell_entity::notification::{
    CowSummary, FeedItemSummary, NotificationData, NotificationDraft, NotificationType,
};

use crate::detect::{AffectedEntity, Candidate};

pub use dedupe::dedupe_key;
pub use formatter::{message_for, title_for};
pub use priority::resolve_priority;

/// Fold candidates into one draft per type, in type order.
pub fn group_candidates(candidates: Vec<Candidate>, config: &DetectionConfig) -> Vec<NotificationDraft> {
    let mut by_kind: BTreeMap<NotificationType, Vec<AffectedEntity>> = BTreeMap::new();
    for candidate in candidates {
        by_kind.entry(candidate.kind).or_default().push(candidate.entity);
    }

    by_kind
        .into_iter()
        .filter_map(|(kind, entities)| build_draft(kind, entities, config))
        .collect()
}

fn build_draft(
    kind: NotificationType,
    entities: Vec<AffectedEntity>,
    config: &DetectionConfig,
) -> Option<NotificationDraft> {
    let data = match kind {
        NotificationType::LowStock => {
            let mut items: Vec<FeedItemSummary> = entities
                .into_iter()
                .filter_map(|e| match e {
                    AffectedEntity::Feed(item) => Some(item),
                    AffectedEntity::Cow(_) => None,
                })
                .collect();
            items.sort_by(|a, b| {
                stock_ratio(a)
                    .total_cmp(&stock_ratio(b))
                    .then_with(|| a.id.cmp(&b.id))
            });
            NotificationData::Items { items }
        }
        _ => {
            let mut cows: Vec<CowSummary> = entities
                .into_iter()
                .filter_map(|e| match e {
                    AffectedEntity::Cow(cow) => Some(cow),
                    AffectedEntity::Feed(_) => None,
                })
                .collect();
            cows.sort_by(|a, b| {
                a.days_remaining
                    .cmp(&b.days_remaining)
                    .then_with(|| a.cow_id.cmp(&b.cow_id))
                    .then_with(|| a.vaccine.cmp(&b.vaccine))
            });
            NotificationData::Cows { cows }
        }
    };

    if data.affected_count() == 0 {
        return None;
    }

    Some(NotificationDraft {
        kind,
        title: title_for(kind, &data),
        message: message_for(kind, &data),
        priority: resolve_priority(kind, &data, config),
        dedupe_key: dedupe_key(kind, data.entity_ids()),
        data,
    })
}

/// Share of the minimum still in stock; lower is more urgent.
fn stock_ratio(item: &FeedItemSummary) -> f64 {
    if item.minimum_stock_level > 0.0 {
        item.current_stock / item.minimum_stock_level
    } else {
        0.0
    }
}
