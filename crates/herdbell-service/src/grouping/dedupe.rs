//! Deterministic identity of an affected-entity set.

use herdbell_entity::notification::NotificationType;

/// `"<type>:<sorted unique ids joined by ','>"`.
pub fn dedupe_key<S: AsRef<str>>(kind: NotificationType, ids: impl IntoIterator<Item = S>) -> String {
    let owned: Vec<S> = ids.into_iter().collect();
    let mut sorted: Vec<&str> = owned.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    sorted.dedup();
    format!("{}:{}", kind, sorted.join(","))
}
