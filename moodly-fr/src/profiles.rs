//! Reviewer profile directory
//!
//! Feedback records from older clients often carry no reviewer name or
//! avatar. Reviewers who later created a profile get their display name and
//! avatar filled in from `reviewer_profiles`. Lookups are cached per reviewer,
//! misses included, for the configured TTL.

use std::time::Duration;

use moodly_common::db::{ReviewerProfile, SqliteFeedbackStore};
use moodly_common::feedback::adapter::avatar_uri;
use moodly_common::feedback::{ReviewerFeedback, ANONYMOUS_REVIEWER};
use moodly_common::{Result, TtlCache};
use tracing::debug;

pub struct ProfileDirectory {
    store: SqliteFeedbackStore,
    cache: TtlCache<String, Option<ReviewerProfile>>,
    ttl: Duration,
}

impl ProfileDirectory {
    pub fn new(store: SqliteFeedbackStore, ttl: Duration) -> Self {
        Self {
            store,
            cache: TtlCache::new(),
            ttl,
        }
    }

    pub async fn lookup(&self, reviewer_id: &str) -> Result<Option<ReviewerProfile>> {
        if let Some(cached) = self.cache.get(&reviewer_id.to_string()) {
            return Ok(cached);
        }

        let profile = self.store.reviewer_profile(reviewer_id).await?;
        debug!(reviewer_id, found = profile.is_some(), "Reviewer profile lookup");
        self.cache.put(reviewer_id.to_string(), profile.clone(), self.ttl);
        Ok(profile)
    }

    /// Fill placeholder names and derived avatars from stored profiles
    ///
    /// Names and avatars the reviewer submitted themselves are never replaced.
    pub async fn enrich(&self, reviewers: Vec<ReviewerFeedback>) -> Result<Vec<ReviewerFeedback>> {
        let mut enriched = Vec::with_capacity(reviewers.len());

        for mut reviewer in reviewers {
            let has_placeholder_name = reviewer.reviewer_name == ANONYMOUS_REVIEWER;
            let has_derived_avatar =
                reviewer.reviewer_avatar == avatar_uri(&reviewer.reviewer_id, &reviewer.reviewer_name);

            if has_placeholder_name || has_derived_avatar {
                if let Some(profile) = self.lookup(&reviewer.reviewer_id).await? {
                    apply_profile(&mut reviewer, &profile, has_placeholder_name, has_derived_avatar);
                }
            }
            enriched.push(reviewer);
        }

        Ok(enriched)
    }
}

fn apply_profile(
    reviewer: &mut ReviewerFeedback,
    profile: &ReviewerProfile,
    has_placeholder_name: bool,
    has_derived_avatar: bool,
) {
    if has_placeholder_name {
        if let Some(name) = profile.display_name.as_deref().filter(|n| !n.trim().is_empty()) {
            reviewer.reviewer_name = name.to_string();
        }
    }

    if has_derived_avatar {
        reviewer.reviewer_avatar = match profile.avatar_url.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(url) => url.to_string(),
            // Re-derive so the initials match a newly filled-in name
            None => avatar_uri(&reviewer.reviewer_id, &reviewer.reviewer_name),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn reviewer(id: &str, name: &str, avatar: Option<&str>) -> ReviewerFeedback {
        ReviewerFeedback {
            reviewer_id: id.to_string(),
            reviewer_name: name.to_string(),
            reviewer_avatar: avatar.map(str::to_string).unwrap_or_else(|| avatar_uri(id, name)),
            last_updated: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            responses: BTreeMap::new(),
        }
    }

    fn profile(name: Option<&str>, avatar: Option<&str>) -> ReviewerProfile {
        ReviewerProfile {
            reviewer_id: "r1".to_string(),
            display_name: name.map(str::to_string),
            avatar_url: avatar.map(str::to_string),
        }
    }

    #[test]
    fn test_placeholder_name_gets_profile_name_and_fresh_initials() {
        let mut r = reviewer("r1", ANONYMOUS_REVIEWER, None);
        apply_profile(&mut r, &profile(Some("Mina Park"), None), true, true);

        assert_eq!(r.reviewer_name, "Mina Park");
        assert!(r.reviewer_avatar.contains("name=MP"), "avatar: {}", r.reviewer_avatar);
    }

    #[test]
    fn test_profile_avatar_replaces_derived_avatar() {
        let mut r = reviewer("r1", "Ana", None);
        apply_profile(&mut r, &profile(None, Some("https://cdn/ana.png")), false, true);

        assert_eq!(r.reviewer_name, "Ana");
        assert_eq!(r.reviewer_avatar, "https://cdn/ana.png");
    }

    #[test]
    fn test_submitted_values_are_kept() {
        let mut r = reviewer("r1", "Ana", Some("https://own/avatar.png"));
        apply_profile(&mut r, &profile(Some("Other"), Some("https://cdn/x.png")), false, false);

        assert_eq!(r.reviewer_name, "Ana");
        assert_eq!(r.reviewer_avatar, "https://own/avatar.png");
    }

    #[test]
    fn test_blank_profile_name_is_ignored() {
        let mut r = reviewer("r1", ANONYMOUS_REVIEWER, None);
        apply_profile(&mut r, &profile(Some("   "), None), true, true);
        assert_eq!(r.reviewer_name, ANONYMOUS_REVIEWER);
    }
}
