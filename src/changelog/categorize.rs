//! Filtering, category assignment and ordering of pull requests
//!
//! Pure functions only: the same input always yields the same buckets in the
//! same order.

use crate::config::{Config, SortBy, SortDirection};
use crate::types::MergedPullRequest;
use std::cmp::Ordering;

/// A non-empty changelog section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    /// Section heading
    pub title: String,
    /// Labels that route pull requests here
    pub labels: Vec<String>,
    /// Pull requests in display order
    pub pull_requests: Vec<MergedPullRequest>,
}

/// Pull requests split into the un-headed top list and titled sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorizedPullRequests {
    /// Pull requests matching no category, in display order
    pub uncategorized: Vec<MergedPullRequest>,
    /// Non-empty categories, in configured order
    pub categories: Vec<CategoryGroup>,
}

impl CategorizedPullRequests {
    /// Number of pull requests listed
    pub fn len(&self) -> usize {
        self.uncategorized.len()
            + self
                .categories
                .iter()
                .map(|c| c.pull_requests.len())
                .sum::<usize>()
    }

    /// Whether nothing will be listed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every listed pull request, in render order
    pub fn iter(&self) -> impl Iterator<Item = &MergedPullRequest> {
        self.uncategorized
            .iter()
            .chain(self.categories.iter().flat_map(|c| c.pull_requests.iter()))
    }
}

/// Whether `exclude-labels` / `include-labels` drop this pull request
pub fn is_excluded(pr: &MergedPullRequest, config: &Config) -> bool {
    if pr.has_any_label(&config.exclude_labels) {
        return true;
    }
    !config.include_labels.is_empty() && !pr.has_any_label(&config.include_labels)
}

/// Total order used for sorting
///
/// The direction flips the key only; ties always fall back to ascending
/// pull request number.
pub fn compare_pull_requests(
    a: &MergedPullRequest,
    b: &MergedPullRequest,
    sort_by: SortBy,
    direction: SortDirection,
) -> Ordering {
    let key = match sort_by {
        SortBy::MergedAt => a.merged_at.cmp(&b.merged_at),
        SortBy::Title => a.title.cmp(&b.title),
    };
    let key = match direction {
        SortDirection::Ascending => key,
        SortDirection::Descending => key.reverse(),
    };
    key.then_with(|| a.number.cmp(&b.number))
}

/// Sort pull requests in place
pub fn sort_pull_requests(
    prs: &mut [MergedPullRequest],
    sort_by: SortBy,
    direction: SortDirection,
) {
    prs.sort_by(|a, b| compare_pull_requests(a, b, sort_by, direction));
}

/// Drop excluded pull requests, then bucket and sort the rest
///
/// Each pull request lands in the first category (configured order) that
/// shares a label with it, or in the uncategorized list.
pub fn categorize(prs: &[MergedPullRequest], config: &Config) -> CategorizedPullRequests {
    let mut uncategorized = Vec::new();
    let mut buckets: Vec<Vec<MergedPullRequest>> = vec![Vec::new(); config.categories.len()];

    for pr in prs.iter().filter(|pr| !is_excluded(pr, config)) {
        match config
            .categories
            .iter()
            .position(|c| pr.has_any_label(&c.labels))
        {
            Some(index) => buckets[index].push(pr.clone()),
            None => uncategorized.push(pr.clone()),
        }
    }

    sort_pull_requests(&mut uncategorized, config.sort_by, config.sort_direction);

    let categories = config
        .categories
        .iter()
        .zip(buckets)
        .filter(|(_, bucket)| !bucket.is_empty())
        .map(|(category, mut bucket)| {
            sort_pull_requests(&mut bucket, config.sort_by, config.sort_direction);
            CategoryGroup {
                title: category.title.clone(),
                labels: category.labels.clone(),
                pull_requests: bucket,
            }
        })
        .collect();

    CategorizedPullRequests {
        uncategorized,
        categories,
    }
}
