//! Title and message generation.
//!
//! Every message starts with the number of affected entities, which
//! always equals the length of the payload.

use herdbell_entity::notification::{CowSummary, FeedItemSummary, NotificationData, NotificationType};

/// Entities named in a message before the remainder is summarised.
const MAX_LISTED: usize = 5;

/// Short heading for a draft.
pub fn title_for(kind: NotificationType, data: &NotificationData) -> String {
    let many = data.affected_count() > 1;
    match (kind, many) {
        (NotificationType::LowStock, false) => "Low feed stock",
        (NotificationType::LowStock, true) => "Low feed stock on several items",
        (NotificationType::PdDue, _) => "Pregnancy diagnosis due",
        (NotificationType::VaccinationDue, false) => "Vaccination due",
        (NotificationType::VaccinationDue, true) => "Vaccinations due",
        (NotificationType::DeliveryDue, false) => "Delivery approaching",
        (NotificationType::DeliveryDue, true) => "Deliveries approaching",
        (NotificationType::AiDue, _) => "Insemination due",
    }
    .to_string()
}

/// Body text for a draft.
pub fn message_for(kind: NotificationType, data: &NotificationData) -> String {
    match data {
        NotificationData::Items { items } => {
            let n = items.len();
            format!(
                "{n} feed {} at or below minimum stock: {}",
                if n == 1 { "item is" } else { "items are" },
                listing(items.iter().map(item_label))
            )
        }
        NotificationData::Cows { cows } => {
            let n = cows.len();
            let noun = if n == 1 { "cow" } else { "cows" };
            let what = match kind {
                NotificationType::PdDue => format!("{}for pregnancy diagnosis", due(n)),
                NotificationType::VaccinationDue => format!("{}for vaccination", due(n)),
                NotificationType::AiDue => format!("{}for insemination", due(n)),
                NotificationType::DeliveryDue | NotificationType::LowStock => {
                    "expected to calve soon".to_string()
                }
            };
            format!("{n} {noun} {what}: {}", listing(cows.iter().map(cow_label)))
        }
    }
}

fn due(n: usize) -> &'static str {
    if n == 1 { "is due " } else { "are due " }
}

fn listing(labels: impl Iterator<Item = String>) -> String {
    let labels: Vec<String> = labels.collect();
    if labels.len() <= MAX_LISTED {
        return labels.join(", ");
    }
    format!(
        "{} and {} more",
        labels[..MAX_LISTED].join(", "),
        labels.len() - MAX_LISTED
    )
}

fn item_label(item: &FeedItemSummary) -> String {
    match &item.unit {
        Some(unit) => format!(
            "{} ({} / {} {unit})",
            item.name, item.current_stock, item.minimum_stock_level
        ),
        None => format!(
            "{} ({} / {})",
            item.name, item.current_stock, item.minimum_stock_level
        ),
    }
}

fn cow_label(cow: &CowSummary) -> String {
    let when = match cow.days_remaining {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "1 day overdue".to_string(),
        d if d < 0 => format!("{} days overdue", -d),
        d => format!("in {d} days"),
    };
    match &cow.vaccine {
        Some(vaccine) => format!("{} {vaccine} ({when})", cow.cow_no),
        None => format!("{} ({when})", cow.cow_no),
    }
}
