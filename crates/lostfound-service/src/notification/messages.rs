//! Title and body text for each notification type.

use lostfound_entity::notification::NotificationType;

/// Heading and body for a notification about `item_title`, sent by
/// `sender_name`.
pub fn compose(kind: NotificationType, sender_name: &str, item_title: &str) -> (String, String) {
    match kind {
        NotificationType::HaveItem => (
            "Someone may have found your item".to_string(),
            format!("{sender_name} reported a found item that looks like your \"{item_title}\"."),
        ),
        NotificationType::ClaimItem => (
            "Someone may be looking for an item you found".to_string(),
            format!("{sender_name} reported losing something that looks like \"{item_title}\"."),
        ),
        NotificationType::MatchRequest => (
            "New match request".to_string(),
            format!("{sender_name} wants to confirm a match for \"{item_title}\"."),
        ),
        NotificationType::MatchApproved => (
            "Match approved".to_string(),
            format!("{sender_name} approved your match for \"{item_title}\"."),
        ),
        NotificationType::MatchRejected => (
            "Match declined".to_string(),
            format!("{sender_name} declined your match for \"{item_title}\"."),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_mentions_sender_and_item() {
        let (title, body) = compose(NotificationType::MatchApproved, "Jo", "Red scarf");
        assert_eq!(title, "Match approved");
        assert!(body.contains("Jo"));
        assert!(body.contains("Red scarf"));
    }
}
