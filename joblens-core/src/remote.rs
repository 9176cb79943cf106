//! Remote-work classification of postings.

use crate::types::Posting;

fn mentions_remote(text: &str) -> bool {
    text.to_lowercase().contains("remote")
}

/// True when the posting's title, description, or location mentions "remote"
/// in any letter case.
#[must_use]
pub fn is_remote(posting: &Posting) -> bool {
    mentions_remote(&posting.title)
        || mentions_remote(&posting.description)
        || posting.location.as_deref().is_some_and(mentions_remote)
}

/// Number of remote postings in a sample.
#[must_use]
pub fn count_remote(postings: &[Posting]) -> u64 {
    postings.iter().filter(|p| is_remote(p)).count() as u64
}
