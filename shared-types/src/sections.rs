use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::Listing;

/// Sections search results are split into, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataSection {
    Bookmarked,
    Other,
}

impl DataSection {
    pub const ALL: [DataSection; 2] = [DataSection::Bookmarked, DataSection::Other];
}

/// Listings split into bookmarked and other sections.
///
/// `bookmarked` is `None` when there were no bookmarks to match against, so
/// no empty section is materialised for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionedListings {
    pub bookmarked: Option<Vec<Listing>>,
    pub other: Vec<Listing>,
}

impl SectionedListings {
    pub fn section(&self, section: DataSection) -> &[Listing] {
        match section {
            DataSection::Bookmarked => self.bookmarked.as_deref().unwrap_or_default(),
            DataSection::Other => &self.other,
        }
    }

    /// Sections in display order, bookmarked first.
    pub fn iter(&self) -> impl Iterator<Item = (DataSection, &[Listing])> {
        DataSection::ALL
            .into_iter()
            .map(move |section| (section, self.section(section)))
    }

    pub fn len(&self) -> usize {
        self.section(DataSection::Bookmarked).len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Move every listing whose id is bookmarked into the bookmarked section.
///
/// Relative order is kept in both sections and each bookmarked listing leaves
/// `other` exactly once.
pub fn partition_listings(listings: &[Listing], bookmarked_ids: &HashSet<i64>) -> SectionedListings {
    if bookmarked_ids.is_empty() {
        return SectionedListings {
            bookmarked: None,
            other: listings.to_vec(),
        };
    }

    let (bookmarked, other): (Vec<Listing>, Vec<Listing>) = listings
        .iter()
        .cloned()
        .partition(|listing| bookmarked_ids.contains(&listing.job_id));

    SectionedListings {
        bookmarked: Some(bookmarked),
        other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::test_listing;

    fn ids(listings: &[Listing]) -> Vec<i64> {
        listings.iter().map(|l| l.job_id).collect()
    }

    fn page() -> Vec<Listing> {
        vec![
            test_listing(1, "one"),
            test_listing(2, "two"),
            test_listing(3, "three"),
            test_listing(4, "four"),
            test_listing(5, "five"),
        ]
    }

    #[test]
    fn test_no_bookmarks_leaves_input_unchanged() {
        let listings = page();
        let sections = partition_listings(&listings, &HashSet::new());

        assert!(sections.bookmarked.is_none());
        assert!(sections.section(DataSection::Bookmarked).is_empty());
        assert_eq!(sections.other, listings);
        assert_eq!(ids(&sections.other), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_bookmarked_listings_move_to_first_section() {
        let listings = page();
        let bookmarked = HashSet::from([4, 2]);
        let sections = partition_listings(&listings, &bookmarked);

        assert_eq!(ids(sections.section(DataSection::Bookmarked)), vec![2, 4]);
        assert_eq!(ids(&sections.other), vec![1, 3, 5]);
        assert_eq!(sections.len(), listings.len());
        // input untouched
        assert_eq!(ids(&listings), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_unknown_bookmarks_produce_empty_section() {
        let sections = partition_listings(&page(), &HashSet::from([99]));

        assert_eq!(sections.bookmarked, Some(Vec::new()));
        assert_eq!(ids(&sections.other), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_duplicate_listing_ids_are_each_moved_once() {
        let listings = vec![
            test_listing(1, "one"),
            test_listing(2, "two"),
            test_listing(2, "two again"),
            test_listing(3, "three"),
        ];
        let sections = partition_listings(&listings, &HashSet::from([2]));

        assert_eq!(ids(sections.section(DataSection::Bookmarked)), vec![2, 2]);
        assert_eq!(ids(&sections.other), vec![1, 3]);
        assert_eq!(sections.len(), 4);
    }

    #[test]
    fn test_sections_iterate_bookmarked_first() {
        let sections = partition_listings(&page(), &HashSet::from([5]));
        let order: Vec<DataSection> = sections.iter().map(|(section, _)| section).collect();
        assert_eq!(order, vec![DataSection::Bookmarked, DataSection::Other]);
    }
}
