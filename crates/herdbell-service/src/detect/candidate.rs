//! Detector output.

use herdbell_entity::notification::{CowSummary, FeedItemSummary, NotificationType};

/// The entity a candidate is about, carrying its urgency fields.
#[derive(Debug, Clone, PartialEq)]
pub enum AffectedEntity {
    /// A feed item at or below its minimum.
    Feed(FeedItemSummary),
    /// An animal with a due or overdue event.
    Cow(CowSummary),
}

impl AffectedEntity {
    /// Identifier used in dedupe keys.
    pub fn id(&self) -> &str {
        match self {
            Self::Feed(item) => &item.id,
            Self::Cow(cow) => &cow.cow_id,
        }
    }
}

/// One entity that satisfies one detector's condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The detector that produced it.
    pub kind: NotificationType,
    /// The affected entity.
    pub entity: AffectedEntity,
}
