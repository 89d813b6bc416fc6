use std::collections::HashSet;

use crate::structs::Entry;

/// Keeps the first entry seen for every title, preserving order
///
/// Titles are compared exactly: no trimming, case-sensitive.
#[must_use]
pub fn dedupe(entries: Vec<Entry>) -> Vec<Entry> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .into_iter()
        .filter(|e| seen.insert(e.title.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_occurrence_wins() {
        let entries = vec![
            Entry::new("A", "a1"),
            Entry::new("B", "b1"),
            Entry::new("A", "a2"),
            Entry::new("C", "c1"),
            Entry::new("B", "b2"),
        ];

        assert_eq!(
            dedupe(entries),
            vec![
                Entry::new("A", "a1"),
                Entry::new("B", "b1"),
                Entry::new("C", "c1"),
            ]
        );
    }

    #[test]
    fn titles_are_compared_exactly() {
        let entries = vec![
            Entry::new("cctv", "1"),
            Entry::new("CCTV", "2"),
            Entry::new("cctv ", "3"),
            Entry::new("", "4"),
            Entry::new("", "5"),
        ];

        let out = dedupe(entries);
        assert_eq!(out.len(), 4);
        assert_eq!(out[3], Entry::new("", "4"));
    }

    #[test]
    fn empty_input() {
        assert!(dedupe(Vec::new()).is_empty());
    }
}
