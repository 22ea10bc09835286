use std::collections::HashSet;
use tracing::{info, warn};

use crate::config::Settings;
use crate::trends::TrendSource;

/// Topic used whenever the trend source cannot supply one.
pub const FALLBACK_TOPIC: &str = "Cartoon Mishaps";

/// Decide which topics the current batch should cover.
///
/// An explicit topic always wins and yields a single-entry batch, regardless
/// of `desired_count`. Otherwise the trend source is consulted; if it fails
/// the run degrades to the fallback topic rather than aborting. The returned
/// batch always has exactly `desired_count` entries in the non-explicit case,
/// reusing suggestions when fresh ones run out.
pub async fn select_topics<T: TrendSource>(
    trends: &T,
    settings: &Settings,
    explicit_topic: Option<&str>,
    used_topics: &HashSet<String>,
    desired_count: usize,
) -> Vec<String> {
    let desired_count = desired_count.max(1);

    if let Some(topic) = explicit_topic {
        if !topic.is_empty() {
            info!(
                "Using manually supplied topic '{}'; overriding configured count to one video",
                topic
            );
            return vec![topic.to_string()];
        }
    }

    info!("Selecting {} topic(s) for this batch", desired_count);

    let candidate_limit = (desired_count * 3).max(20);
    let candidates = match trends
        .fetch(&settings.trending_region, candidate_limit)
        .await
    {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(
                "Falling back to default topic list because trending fetch failed: {}",
                e
            );
            return vec![FALLBACK_TOPIC.to_string(); desired_count];
        }
    };

    let mut topics: Vec<String> = Vec::with_capacity(desired_count);
    for topic in &candidates {
        if !used_topics.contains(topic) && !topics.contains(topic) {
            topics.push(topic.clone());
        }
        if topics.len() == desired_count {
            break;
        }
    }

    if topics.len() < desired_count {
        info!(
            "Only {} fresh trending topic(s) found; reusing suggestions to reach {}",
            topics.len(),
            desired_count
        );
        let pool: Vec<String> = if candidates.is_empty() {
            vec![FALLBACK_TOPIC.to_string()]
        } else {
            candidates
        };
        while topics.len() < desired_count {
            topics.push(pool[topics.len() % pool.len()].clone());
        }
    }

    info!("Selected topics for run: {}", topics.join(", "));
    topics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trends::TrendFetchError;

    struct FixedTrends(Vec<&'static str>);

    impl TrendSource for FixedTrends {
        async fn fetch(&self, _region: &str, _limit: usize) -> Result<Vec<String>, TrendFetchError> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct FailingTrends;

    impl TrendSource for FailingTrends {
        async fn fetch(&self, _region: &str, _limit: usize) -> Result<Vec<String>, TrendFetchError> {
            Err(TrendFetchError::Empty)
        }
    }

    fn used(topics: &[&str]) -> HashSet<String> {
        topics.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn picks_fresh_topics_in_candidate_order() {
        let trends = FixedTrends(vec!["Cats", "Dogs", "Birds", "Llamas"]);
        let topics =
            select_topics(&trends, &Settings::default(), None, &HashSet::new(), 3).await;
        assert_eq!(topics, vec!["Cats", "Dogs", "Birds"]);
    }

    #[tokio::test]
    async fn skips_previously_used_topics() {
        let trends = FixedTrends(vec!["Cats", "Dogs", "Birds"]);
        let topics =
            select_topics(&trends, &Settings::default(), None, &used(&["Cats"]), 2).await;
        assert_eq!(topics, vec!["Dogs", "Birds"]);
    }

    #[tokio::test]
    async fn fetch_failure_degrades_to_fallback_copies() {
        let topics =
            select_topics(&FailingTrends, &Settings::default(), None, &HashSet::new(), 3).await;
        assert_eq!(
            topics,
            vec![FALLBACK_TOPIC, FALLBACK_TOPIC, FALLBACK_TOPIC]
        );
    }

    #[tokio::test]
    async fn explicit_topic_overrides_count_and_history() {
        let trends = FixedTrends(vec!["Cats", "Dogs"]);
        let topics = select_topics(
            &trends,
            &Settings::default(),
            Some("X"),
            &used(&["X"]),
            5,
        )
        .await;
        assert_eq!(topics, vec!["X"]);
    }

    #[tokio::test]
    async fn empty_explicit_topic_is_ignored() {
        let trends = FixedTrends(vec!["Cats"]);
        let topics =
            select_topics(&trends, &Settings::default(), Some(""), &HashSet::new(), 1).await;
        assert_eq!(topics, vec!["Cats"]);
    }

    #[tokio::test]
    async fn shortfall_backfills_by_cycling_candidates() {
        // every candidate already used: backfill starts at index 0
        let trends = FixedTrends(vec!["Cats", "Dogs", "Birds"]);
        let topics = select_topics(
            &trends,
            &Settings::default(),
            None,
            &used(&["Cats", "Dogs", "Birds"]),
            4,
        )
        .await;
        assert_eq!(topics, vec!["Cats", "Dogs", "Birds", "Cats"]);
    }

    #[tokio::test]
    async fn partial_shortfall_keeps_batch_length_exact() {
        // one fresh topic, deficit filled from the candidate pool by index
        let trends = FixedTrends(vec!["Cats", "Dogs"]);
        let topics = select_topics(
            &trends,
            &Settings::default(),
            None,
            &used(&["Dogs"]),
            3,
        )
        .await;
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[0], "Cats");
        assert_eq!(topics, vec!["Cats", "Dogs", "Cats"]);
    }

    #[tokio::test]
    async fn zero_count_is_coerced_to_one() {
        let trends = FixedTrends(vec!["Cats"]);
        let topics =
            select_topics(&trends, &Settings::default(), None, &HashSet::new(), 0).await;
        assert_eq!(topics, vec!["Cats"]);
    }

    #[tokio::test]
    async fn duplicate_candidates_are_collected_once() {
        let trends = FixedTrends(vec!["Cats", "Cats", "Dogs"]);
        let topics =
            select_topics(&trends, &Settings::default(), None, &HashSet::new(), 2).await;
        assert_eq!(topics, vec!["Cats", "Dogs"]);
    }
}
