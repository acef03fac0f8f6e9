//! Default scorer: fuzzy matches the ranking key and breaks ties by depth.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::model::Candidate;
use crate::rank::Ranker;

/// A candidate that matched a query. Lower `rank` is better.
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    pub candidate: &'a Candidate,
    pub rank: f64,
}

pub struct FuzzySearcher {
    matcher: SkimMatcherV2,
    ranker: Ranker,
}

impl FuzzySearcher {
    pub fn new(ranker: Ranker) -> Self {
        Self { matcher: SkimMatcherV2::default().ignore_case(), ranker }
    }

    /// `None` when `query` does not match the candidate's key at all.
    pub fn rank(&self, candidate: &Candidate, query: &str) -> Option<f64> {
        let weight = self.ranker.weight(candidate);
        if query.is_empty() {
            return Some(weight);
        }
        let score = self.matcher.fuzzy_match(&self.ranker.key(candidate), query)?;
        Some(weight - score as f64)
    }

    /// Best `limit` matches for `query`, best first. Equal ranks keep input order.
    pub fn search<'a>(&self, candidates: &'a [Candidate], query: &str, limit: usize) -> Vec<Match<'a>> {
        let query = query.to_lowercase();
        let mut matches: Vec<Match<'a>> = candidates
            .iter()
            .filter_map(|candidate| {
                self.rank(candidate, &query).map(|rank| Match { candidate, rank })
            })
            .collect();
        matches.sort_by(|a, b| a.rank.total_cmp(&b.rank));
        matches.truncate(limit);
        tracing::debug!("{} of {} candidates match {:?}", matches.len(), candidates.len(), query);
        matches
    }
}
