//! Cross-source deduplication and top-N selection.
//!
//! Two listings are the same deal when they share a normalized lowercase
//! title or a link. Listings are processed in arrival order; an incoming
//! duplicate replaces what it collides with only when its score is strictly
//! higher, so on a tie the first-seen listing stays.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::domain::entities::annotated_listing::AnnotatedListing;

/// Number of listings in the top-stacks view.
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Default)]
struct SeenKeys {
    by_title: HashMap<String, usize>,
    by_link: HashMap<String, usize>,
}

impl SeenKeys {
    fn occupants(&self, title_key: &str, link_key: &str) -> Vec<usize> {
        let mut found = Vec::with_capacity(2);
        if !title_key.is_empty() {
            found.extend(self.by_title.get(title_key).copied());
        }
        if !link_key.is_empty() {
            if let Some(&idx) = self.by_link.get(link_key) {
                if !found.contains(&idx) {
                    found.push(idx);
                }
            }
        }
        found
    }

    fn insert(&mut self, title_key: String, link_key: &str, idx: usize) {
        if !title_key.is_empty() {
            self.by_title.insert(title_key, idx);
        }
        if !link_key.is_empty() {
            self.by_link.insert(link_key.to_string(), idx);
        }
    }

    fn remove(&mut self, listing: &AnnotatedListing) {
        self.by_title.remove(&listing.listing.title_key());
        self.by_link.remove(listing.link());
    }
}

/// Collapses duplicates, keeping the higher-scored listing.
///
/// A survivor that collides with two earlier listings (one by title, one by
/// link) must beat both to replace them. Afterwards no two survivors share a
/// title key or link, so running this again changes nothing.
///
/// Panics if a listing has no score annotation.
pub fn deduplicate(listings: Vec<AnnotatedListing>) -> Vec<AnnotatedListing> {
    let mut slots: Vec<Option<AnnotatedListing>> = Vec::with_capacity(listings.len());
    let mut seen = SeenKeys::default();

    for incoming in listings {
        let score = incoming.score();
        let title_key = incoming.listing.title_key();
        let link_key = incoming.link().to_string();
        let occupants = seen.occupants(&title_key, &link_key);

        let beats_all = occupants.iter().all(|&idx| match &slots[idx] {
            Some(existing) => score > existing.score(),
            None => true,
        });
        if !beats_all {
            debug!(dropped = incoming.id(), "duplicate listing dropped");
            continue;
        }

        for idx in occupants {
            if let Some(existing) = slots[idx].take() {
                debug!(
                    replaced = existing.id(),
                    by = incoming.id(),
                    "duplicate listing replaced by higher score"
                );
                seen.remove(&existing);
            }
        }

        seen.insert(title_key, &link_key, slots.len());
        slots.push(Some(incoming));
    }

    slots.into_iter().flatten().collect()
}

/// Score descending, then lowercase title, for deterministic ranking.
pub fn rank_order(a: &AnnotatedListing, b: &AnnotatedListing) -> Ordering {
    b.score()
        .partial_cmp(&a.score())
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.listing.title_key().cmp(&b.listing.title_key()))
}

/// Deduplicated listings split into the main pool and the excluded side channel.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub main: Vec<AnnotatedListing>,
    pub excluded: Vec<AnnotatedListing>,
}

/// Splits by exclusion flag, preserving order within each group.
pub fn partition(listings: Vec<AnnotatedListing>) -> Partition {
    let (excluded, main): (Vec<_>, Vec<_>) =
        listings.into_iter().partition(|l| l.is_excluded());
    Partition { main, excluded }
}

/// The `n` best non-excluded listings. When every listing is excluded the
/// full pool is ranked instead, so the view is never empty while listings exist.
pub fn select_top(listings: &[AnnotatedListing], n: usize) -> Vec<AnnotatedListing> {
    let mut pool: Vec<&AnnotatedListing> = listings.iter().filter(|l| !l.is_excluded()).collect();
    if pool.is_empty() {
        pool = listings.iter().collect();
    }
    pool.sort_by(|a, b| rank_order(a, b));
    pool.into_iter().take(n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::listing::Listing;
    use crate::domain::values::source::Source;

    fn scored(title: &str, link: &str, score: f64) -> AnnotatedListing {
        AnnotatedListing::new(Listing::new(Source::OzBargain, title, link))
            .with_score(score)
            .with_exclusion(None)
    }

    fn titles(listings: &[AnnotatedListing]) -> Vec<&str> {
        listings.iter().map(|l| l.title()).collect()
    }

    #[test]
    fn test_same_link_higher_score_replaces() {
        let out = deduplicate(vec![
            scored("Deal A", "https://x/1", 5.0),
            scored("Deal B", "https://x/1", 7.0),
        ]);
        assert_eq!(titles(&out), vec!["Deal B"]);
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let out = deduplicate(vec![
            scored("20x Points", "https://a/1", 8.0),
            scored("20x  points ", "https://b/1", 8.0),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].link(), "https://a/1");
    }

    #[test]
    fn test_lower_score_duplicate_dropped() {
        let out = deduplicate(vec![
            scored("Deal", "https://a/1", 9.0),
            scored("deal", "https://b/1", 3.0),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].score(), 9.0);
    }

    #[test]
    fn test_replaced_listing_keys_are_released() {
        // B replaces A by link; C reuses A's title and must be accepted as new.
        let out = deduplicate(vec![
            scored("Old title", "https://x/1", 1.0),
            scored("New title", "https://x/1", 2.0),
            scored("Old title", "https://x/2", 0.5),
        ]);
        assert_eq!(titles(&out), vec!["New title", "Old title"]);
    }

    #[test]
    fn test_must_beat_both_occupants() {
        let out = deduplicate(vec![
            scored("Alpha", "https://x/1", 2.0),
            scored("Beta", "https://x/2", 6.0),
            scored("Alpha", "https://x/2", 4.0),
        ]);
        assert_eq!(titles(&out), vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            scored("Alpha", "https://x/1", 2.0),
            scored("Beta", "https://x/2", 1.0),
            scored("Alpha", "https://x/2", 4.0),
            scored("Gamma", "", 1.0),
            scored("", "https://x/3", 1.0),
            scored("", "https://x/4", 1.0),
        ];
        let once = deduplicate(input);
        let twice = deduplicate(once.clone());
        assert_eq!(titles(&once), titles(&twice));
        assert_eq!(once.len(), 4);
    }

    #[test]
    fn test_select_top_orders_and_truncates() {
        let listings = vec![
            scored("b", "1", 3.0),
            scored("a", "2", 3.0),
            scored("c", "3", 9.0),
            scored("d", "4", 1.0),
        ];
        let top = select_top(&listings, 3);
        assert_eq!(titles(&top), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_select_top_skips_excluded() {
        let listings = vec![
            scored("kept", "1", 1.0),
            scored("chip", "2", 9.0).with_exclusion(Some("no stock".into())),
        ];
        assert_eq!(titles(&select_top(&listings, 5)), vec!["kept"]);
    }

    #[test]
    fn test_select_top_falls_back_when_all_excluded() {
        let listings = vec![
            scored("x", "1", 1.0).with_exclusion(Some("r".into())),
            scored("y", "2", 2.0).with_exclusion(Some("r".into())),
        ];
        assert_eq!(titles(&select_top(&listings, 5)), vec!["y", "x"]);
    }

    #[test]
    fn test_partition_is_disjoint_and_complete() {
        let listings = vec![
            scored("a", "1", 1.0),
            scored("b", "2", 1.0).with_exclusion(Some("r".into())),
            scored("c", "3", 1.0),
        ];
        let p = partition(listings);
        assert_eq!(titles(&p.main), vec!["a", "c"]);
        assert_eq!(titles(&p.excluded), vec!["b"]);
    }

    #[test]
    #[should_panic(expected = "has no score annotation")]
    fn test_unscored_duplicate_panics() {
        let unscored = AnnotatedListing::new(Listing::new(Source::Gcdb, "Deal", "https://x/1"));
        deduplicate(vec![scored("Deal", "https://x/1", 1.0), unscored]);
    }
}
