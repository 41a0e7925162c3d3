//! Candidate matcher run once per newly reported item.
//!
//! The matcher scans the opposite source partition for active items of the
//! same category and proposes a match for every candidate whose location
//! matches exactly (ignoring case) or whose title is similar enough.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use lostfound_core::config::matching::MatchingConfig;
use lostfound_core::result::AppResult;
use lostfound_core::types::id::MatchId;
use lostfound_database::store::ItemStore;
use lostfound_entity::item::{Item, ItemReported, ItemStatus, Partition};
use lostfound_entity::notification::NotificationType;

use super::lifecycle::{MatchLifecycleService, MatchRequest};
use crate::similarity::similarity;

/// Outcome of one matcher invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatcherReport {
    /// Active same-category items in the opposite partition.
    pub candidates: usize,
    /// Matches created, in candidate order.
    pub created: Vec<MatchId>,
    /// Candidates that already had an open request from the reporter.
    pub skipped: usize,
    /// Candidates whose match or notification could not be written.
    pub failed: usize,
}

/// Proposes matches between a new report and existing opposite reports.
#[derive(Debug, Clone)]
pub struct CandidateMatcher {
    /// Item store queried for candidates.
    items: Arc<dyn ItemStore>,
    /// Lifecycle service that opens matches.
    lifecycle: Arc<MatchLifecycleService>,
    /// Title similarity must be strictly greater than this.
    threshold: f64,
    /// Skip candidates with an open request from the same reporter.
    dedupe_pending: bool,
}

impl CandidateMatcher {
    /// Creates a new matcher.
    pub fn new(
        items: Arc<dyn ItemStore>,
        lifecycle: Arc<MatchLifecycleService>,
        config: &MatchingConfig,
    ) -> Self {
        Self {
            items,
            lifecycle,
            threshold: config.title_similarity_threshold,
            dedupe_pending: config.dedupe_pending,
        }
    }

    /// Whether `candidate` is a plausible counterpart of `reported`.
    ///
    /// Category equality is a precondition applied by the candidate query.
    pub fn is_candidate(&self, reported: &Item, candidate: &Item) -> bool {
        candidate.normalized_location() == reported.normalized_location()
            || similarity(&candidate.title, &reported.title) > self.threshold
    }

    /// Runs the matcher for one item creation event.
    ///
    /// A failed candidate query aborts the run before anything is written.
    /// After that, each candidate is an independent unit: a failure is
    /// logged and counted, and the remaining candidates are still processed.
    pub async fn on_item_reported(&self, event: &ItemReported) -> AppResult<MatcherReport> {
        let reported = &event.item;
        let opposite = Partition::for_status(reported.status.opposite());

        let candidates = self
            .items
            .find_active(opposite, Some(reported.category))
            .await?;

        let mut report = MatcherReport {
            candidates: candidates.len(),
            ..MatcherReport::default()
        };

        for candidate in &candidates {
            if candidate.id == reported.id || candidate.reporter_id == reported.reporter_id {
                continue;
            }
            if !self.is_candidate(reported, candidate) {
                continue;
            }

            match self.propose(reported, candidate).await {
                Ok(Some(match_id)) => report.created.push(match_id),
                Ok(None) => report.skipped += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        item_id = %reported.id,
                        candidate_id = %candidate.id,
                        error = %e,
                        "Failed to propose match for candidate"
                    );
                }
            }
        }

        info!(
            item_id = %reported.id,
            partition = %event.partition,
            candidates = report.candidates,
            created = report.created.len(),
            skipped = report.skipped,
            failed = report.failed,
            "Candidate matching finished"
        );
        Ok(report)
    }

    /// Opens a match with `candidate` as the subject, requested on behalf of
    /// the new reporter. Returns `None` when an open request already exists.
    async fn propose(&self, reported: &Item, candidate: &Item) -> AppResult<Option<MatchId>> {
        if self.dedupe_pending
            && let Some(existing) = self
                .lifecycle
                .get_pending_match_for_user(candidate.id, reported.reporter_id)
                .await?
        {
            debug!(
                match_id = %existing.id,
                candidate_id = %candidate.id,
                "Pending match already open, skipping"
            );
            return Ok(None);
        }

        let kind = match reported.status {
            ItemStatus::Found => NotificationType::HaveItem,
            ItemStatus::Lost => NotificationType::ClaimItem,
        };

        let request = MatchRequest::new(
            candidate.id,
            candidate.reporter_id,
            reported.reporter_id,
            reported.reporter_id,
            candidate.title.clone(),
            reported.reporter_name.clone(),
        )
        .with_counterpart(reported.id)
        .with_notification(kind);

        let record = self.lifecycle.create_match_request(request).await?;
        Ok(Some(record.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lostfound_core::error::ErrorKind;
    use lostfound_database::MemoryStore;
    use lostfound_database::store::{MatchStore, NotificationStore};
    use lostfound_entity::item::ItemCategory;

    use crate::testing::{FlakyNotifications, Harness, UnqueryableItems};

    #[tokio::test]
    async fn test_same_location_produces_one_match_and_notification() {
        let h = Harness::new();
        let loser = h.user_ctx("Loser");
        let finder = h.user_ctx("Finder");
        let lost = h
            .seed(&loser, ItemStatus::Lost, ItemCategory::Electronics, "Laptop", "Main Library")
            .await;
        let found = h
            .seed(
                &finder,
                ItemStatus::Found,
                ItemCategory::Electronics,
                "Grey computer",
                "  main library",
            )
            .await;

        let report = h
            .matcher
            .on_item_reported(&ItemReported::new(found.clone()))
            .await
            .unwrap();
        assert_eq!(report.candidates, 1);
        assert_eq!(report.created.len(), 1);

        let matches = h.store.find_for_item(lost.id).await.unwrap();
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.item_id, lost.id);
        assert_eq!(m.counterpart_item_id, Some(found.id));
        assert_eq!(m.item_owner_id, loser.user_id);
        assert_eq!(m.claimant_id, finder.user_id);
        assert_eq!(m.requester_id, finder.user_id);
        assert!(m.is_pending());

        let inbox = h.store.list_by_recipient(loser.user_id).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].notification_type, NotificationType::HaveItem);
        assert!(h.store.list_by_recipient(finder.user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lost_report_notifies_finder_with_claim() {
        let h = Harness::new();
        let finder = h.user_ctx("Finder");
        let loser = h.user_ctx("Loser");
        let found = h
            .seed(&finder, ItemStatus::Found, ItemCategory::Bags, "Red backpack", "Gym")
            .await;
        let lost = h
            .seed(&loser, ItemStatus::Lost, ItemCategory::Bags, "Red backpack", "Dorm")
            .await;

        h.matcher
            .on_item_reported(&ItemReported::new(lost))
            .await
            .unwrap();

        let matches = h.store.find_for_item(found.id).await.unwrap();
        assert_eq!(matches.len(), 1);
        let inbox = h.store.list_by_recipient(finder.user_id).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].notification_type, NotificationType::ClaimItem);
    }

    #[tokio::test]
    async fn test_category_mismatch_never_matches() {
        let h = Harness::new();
        let loser = h.user_ctx("Loser");
        let finder = h.user_ctx("Finder");
        let lost = h
            .seed(&loser, ItemStatus::Lost, ItemCategory::Keys, "Keys", "Quad")
            .await;
        let found = h
            .seed(&finder, ItemStatus::Found, ItemCategory::Clothing, "Keys", "Quad")
            .await;

        let report = h
            .matcher
            .on_item_reported(&ItemReported::new(found))
            .await
            .unwrap();
        assert_eq!(report.candidates, 0);
        assert!(h.store.find_for_item(lost.id).await.unwrap().is_empty());
        assert!(h.push.sent().is_empty());
    }

    #[tokio::test]
    async fn test_title_threshold_is_strict() {
        let h = Harness::new();
        let loser = h.user_ctx("Loser");
        let finder = h.user_ctx("Finder");

        let above_title = "a".repeat(100);
        let above_probe = format!("{}{}", "a".repeat(61), "b".repeat(39));
        let above = h
            .seed(&loser, ItemStatus::Lost, ItemCategory::Books, &above_title, "Hall A")
            .await;
        let at_limit = h
            .seed(&loser, ItemStatus::Lost, ItemCategory::Documents, "abcde", "Hall A")
            .await;

        let probe_above = h
            .seed(&finder, ItemStatus::Found, ItemCategory::Books, &above_probe, "Hall B")
            .await;
        let probe_at = h
            .seed(&finder, ItemStatus::Found, ItemCategory::Documents, "abcyz", "Hall B")
            .await;

        assert_eq!(similarity(&above_title, &above_probe), 0.61);
        assert_eq!(similarity("abcde", "abcyz"), 0.6);

        h.matcher
            .on_item_reported(&ItemReported::new(probe_above))
            .await
            .unwrap();
        h.matcher
            .on_item_reported(&ItemReported::new(probe_at))
            .await
            .unwrap();

        assert_eq!(h.store.find_for_item(above.id).await.unwrap().len(), 1);
        assert!(h.store.find_for_item(at_limit.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_each_candidate_gets_its_own_match() {
        let h = Harness::new();
        let finder = h.user_ctx("Finder");
        let first = h.user_ctx("First");
        let second = h.user_ctx("Second");
        h.seed(&first, ItemStatus::Lost, ItemCategory::Keys, "Car keys", "Lot 4")
            .await;
        h.seed(&second, ItemStatus::Lost, ItemCategory::Keys, "Dorm key", "Lot 4")
            .await;
        let found = h
            .seed(&finder, ItemStatus::Found, ItemCategory::Keys, "Keyring", "Lot 4")
            .await;

        let report = h
            .matcher
            .on_item_reported(&ItemReported::new(found))
            .await
            .unwrap();
        assert_eq!(report.created.len(), 2);
        assert_eq!(h.store.list_by_recipient(first.user_id).await.unwrap().len(), 1);
        assert_eq!(h.store.list_by_recipient(second.user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_query_failure_writes_nothing() {
        let store = MemoryStore::new();
        let h = Harness::build(
            store.clone(),
            Arc::new(UnqueryableItems(store.clone())),
            Arc::new(store.clone()),
            MatchingConfig::default(),
        );
        let loser = h.user_ctx("Loser");
        let finder = h.user_ctx("Finder");
        let lost = h
            .seed(&loser, ItemStatus::Lost, ItemCategory::Keys, "Keys", "Quad")
            .await;
        let found = h
            .seed(&finder, ItemStatus::Found, ItemCategory::Keys, "Keys", "Quad")
            .await;

        let err = h
            .matcher
            .on_item_reported(&ItemReported::new(found))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
        assert!(err.kind.is_transient());
        assert!(h.store.find_for_item(lost.id).await.unwrap().is_empty());
        assert!(h.store.list_by_recipient(loser.user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_candidate_failure_does_not_stop_the_rest() {
        let store = MemoryStore::new();
        let flaky = Arc::new(FlakyNotifications::new(store.clone()));
        let h = Harness::build(
            store.clone(),
            Arc::new(store.clone()),
            flaky.clone(),
            MatchingConfig::default(),
        );
        let finder = h.user_ctx("Finder");
        let unlucky = h.user_ctx("Unlucky");
        let lucky = h.user_ctx("Lucky");
        h.seed(&unlucky, ItemStatus::Lost, ItemCategory::Bags, "Tote", "Cafe")
            .await;
        h.seed(&lucky, ItemStatus::Lost, ItemCategory::Bags, "Tote", "Cafe")
            .await;
        flaky.refuse(unlucky.user_id);

        let found = h
            .seed(&finder, ItemStatus::Found, ItemCategory::Bags, "Tote bag", "Cafe")
            .await;
        let report = h
            .matcher
            .on_item_reported(&ItemReported::new(found))
            .await
            .unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.created.len(), 1);
        assert_eq!(flaky.list_by_recipient(lucky.user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_redelivery_is_deduplicated() {
        let h = Harness::new();
        let loser = h.user_ctx("Loser");
        let finder = h.user_ctx("Finder");
        let lost = h
            .seed(&loser, ItemStatus::Lost, ItemCategory::Keys, "Keys", "Quad")
            .await;
        let event = ItemReported::new(
            h.seed(&finder, ItemStatus::Found, ItemCategory::Keys, "Keys", "Quad")
                .await,
        );

        h.matcher.on_item_reported(&event).await.unwrap();
        let again = h.matcher.on_item_reported(&event).await.unwrap();
        assert_eq!(again.skipped, 1);
        assert!(again.created.is_empty());
        assert_eq!(h.store.find_for_item(lost.id).await.unwrap().len(), 1);
        assert_eq!(h.store.list_by_recipient(loser.user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_redelivery_without_dedupe_duplicates() {
        let store = MemoryStore::new();
        let h = Harness::build(
            store.clone(),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            MatchingConfig {
                dedupe_pending: false,
                ..MatchingConfig::default()
            },
        );
        let loser = h.user_ctx("Loser");
        let finder = h.user_ctx("Finder");
        let lost = h
            .seed(&loser, ItemStatus::Lost, ItemCategory::Keys, "Keys", "Quad")
            .await;
        let event = ItemReported::new(
            h.seed(&finder, ItemStatus::Found, ItemCategory::Keys, "Keys", "Quad")
                .await,
        );

        h.matcher.on_item_reported(&event).await.unwrap();
        h.matcher.on_item_reported(&event).await.unwrap();
        assert_eq!(h.store.find_for_item(lost.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_own_reports_are_not_matched() {
        let h = Harness::new();
        let user = h.user_ctx("Same person");
        let lost = h
            .seed(&user, ItemStatus::Lost, ItemCategory::Keys, "Keys", "Quad")
            .await;
        let found = h
            .seed(&user, ItemStatus::Found, ItemCategory::Keys, "Keys", "Quad")
            .await;

        let report = h
            .matcher
            .on_item_reported(&ItemReported::new(found))
            .await
            .unwrap();
        assert_eq!(report.candidates, 1);
        assert!(report.created.is_empty());
        assert!(h.store.find_for_item(lost.id).await.unwrap().is_empty());
    }
}
