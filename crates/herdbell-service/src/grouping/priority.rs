//! Worst-case priority across a draft's entities.

use herdbell_core::config::DetectionConfig;
use herdbell_entity::notification::{NotificationData, NotificationPriority, NotificationType};

/// Priority for a grouped payload.
///
/// | type | high | otherwise |
/// |---|---|---|
/// | `delivery_due` | any delivery within `delivery_high_priority_days` | medium |
/// | `pd_due`, `vaccination_due` | any overdue | medium |
/// | `low_stock` | any item below half its minimum | medium |
/// | `ai_due` | never (medium if any overdue) | low |
pub fn resolve_priority(
    kind: NotificationType,
    data: &NotificationData,
    config: &DetectionConfig,
) -> NotificationPriority {
    use NotificationPriority::{High, Low, Medium};

    match data {
        NotificationData::Items { items } => {
            if items.iter().any(|i| i.is_critical()) {
                High
            } else {
                Medium
            }
        }
        NotificationData::Cows { cows } => {
            let any_overdue = cows.iter().any(|c| c.overdue);
            match kind {
                NotificationType::DeliveryDue => {
                    if cows
                        .iter()
                        .any(|c| c.days_remaining <= config.delivery_high_priority_days)
                    {
                        High
                    } else {
                        Medium
                    }
                }
                NotificationType::AiDue => {
                    if any_overdue {
                        Medium
                    } else {
                        Low
                    }
                }
                _ => {
                    if any_overdue {
                        High
                    } else {
                        Medium
                    }
                }
            }
        }
    }
}
