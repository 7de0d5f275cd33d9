//! Searchable, paginated listings shared by the user and ledger screens.

use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};

/// Search text echoed back with a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    /// Case-insensitive substring, absent when the listing is unfiltered.
    pub search: Option<String>,
}

/// Listing query: optional search plus page coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRequest {
    search: Option<String>,
    page: PageRequest,
}

impl ListingRequest {
    /// Build a request; blank search text is treated as no search.
    ///
    /// # Examples
    /// ```
    /// use leaderboard::domain::ListingRequest;
    /// use pagination::PageRequest;
    ///
    /// let request = ListingRequest::new(Some("   ".into()), PageRequest::default());
    /// assert_eq!(request.search(), None);
    /// ```
    #[must_use]
    pub fn new(search: Option<String>, page: PageRequest) -> Self {
        let search = search
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        Self { search, page }
    }

    /// Normalised search text.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Requested page.
    #[must_use]
    pub fn page(&self) -> PageRequest {
        self.page
    }

    /// Filter echo for the response.
    #[must_use]
    pub fn filter(&self) -> SearchFilter {
        SearchFilter {
            search: self.search.clone(),
        }
    }

    /// Case-insensitive substring test used by in-process adapters.
    #[must_use]
    pub fn matches_any(&self, haystacks: &[&str]) -> bool {
        match &self.search {
            None => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                haystacks
                    .iter()
                    .any(|haystack| haystack.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Page of items plus the search that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage<T> {
    /// Items and totals.
    #[serde(flatten)]
    pub items: Page<T>,
    /// Echo of the search.
    pub filters: SearchFilter,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, &["Alice"], true)]
    #[case(Some("ali"), &["ALICE", "x@example.com"], true)]
    #[case(Some("EXAMPLE"), &["Bob", "bob@example.com"], true)]
    #[case(Some("carol"), &["Bob", "bob@example.com"], false)]
    fn search_is_case_insensitive_substring(
        #[case] search: Option<&str>,
        #[case] haystacks: &[&str],
        #[case] expected: bool,
    ) {
        let request = ListingRequest::new(search.map(str::to_owned), PageRequest::default());
        assert_eq!(request.matches_any(haystacks), expected);
    }

    #[rstest]
    fn search_is_trimmed() {
        let request = ListingRequest::new(Some("  bonus ".into()), PageRequest::default());
        assert_eq!(request.search(), Some("bonus"));
        assert_eq!(request.filter().search.as_deref(), Some("bonus"));
    }
}
