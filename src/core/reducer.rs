use crate::core::{
    intent::Intent,
    notification::{Notification, NotificationId, QueueConfig},
};

/// Pure queue transition
/// Never mutates `current`; every call returns a fresh, newest-first list.
pub fn apply(current: &[Notification], intent: Intent, config: &QueueConfig) -> Vec<Notification> {
    match intent {
        Intent::Add(mut patch) => {
            if current.len() >= config.max_capacity {
                log::debug!(
                    "add dropped: queue at capacity ({}/{})",
                    current.len(),
                    config.max_capacity
                );
                return current.to_vec();
            }

            let id = match patch.id.take() {
                Some(id) if contains(current, &id) => {
                    log::debug!("add dropped: id {id} already present");
                    return current.to_vec();
                }
                Some(id) => id,
                None => generate_id(current),
            };

            let mut next = Vec::with_capacity(current.len() + 1);
            next.push(Notification::from_patch(id, patch, &config.defaults));
            next.extend_from_slice(current);
            next
        }

        Intent::Update(patch) => {
            let Some(id) = patch.id.clone() else {
                log::debug!("update ignored: payload carries no id");
                return current.to_vec();
            };

            current
                .iter()
                .map(|notification| {
                    if notification.id == id {
                        notification.merged(patch.clone())
                    } else {
                        notification.clone()
                    }
                })
                .collect()
        }

        Intent::Remove(id) => current
            .iter()
            .filter(|notification| notification.id != id)
            .cloned()
            .collect(),
    }
}

fn contains(list: &[Notification], id: &NotificationId) -> bool {
    list.iter().any(|notification| &notification.id == id)
}

/// `toast-<n>` with the smallest `n` not taken in `list`
/// Uniqueness only has to hold within the current queue.
pub fn generate_id(list: &[Notification]) -> NotificationId {
    (0..)
        .map(|n| NotificationId::Text(format!("toast-{n}")))
        .find(|candidate| !contains(list, candidate))
        .unwrap_or(NotificationId::Num(u64::MAX))
}
