use serde::{Deserialize, Serialize};

use crate::index::posting::{PostingList, PostingMap};

/// A posting map re-materialized into three disjoint tiers by term
/// frequency, consulted first-to-last by early-termination queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TieredPostings {
    pub first_tier: PostingMap,
    pub second_tier: PostingMap,
    pub third_tier: PostingMap,
}

impl TieredPostings {
    /// Partition `source` by tf: first tier tf >= `high`, second tier
    /// `medium` <= tf < `high`, third tier 1 <= tf < `medium`. The union
    /// over tiers equals the source postings.
    pub fn build(source: &PostingMap, high: u32, medium: u32) -> Self {
        let mut tiered = TieredPostings::default();
        for (term, list) in source {
            for (doc_id, tf) in list.iter() {
                let tier = if tf >= high {
                    &mut tiered.first_tier
                } else if tf >= medium {
                    &mut tiered.second_tier
                } else {
                    &mut tiered.third_tier
                };
                tier.entry(term.clone())
                    .or_insert_with(PostingList::new)
                    .insert(doc_id.to_string(), tf);
            }
        }
        tiered
    }

    /// Tiers in query order
    pub fn tiers(&self) -> [&PostingMap; 3] {
        [&self.first_tier, &self.second_tier, &self.third_tier]
    }
}
