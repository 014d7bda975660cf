//! Property-based tests for dependency table merging and remote matching.

#[cfg(test)]
mod proptest_tests {
    use crate::manifest::{merge, DependencyEntry, DependencyTable};
    use crate::pattern::remote_matches;
    use proptest::prelude::*;

    fn table_strategy() -> impl Strategy<Value = DependencyTable> {
        prop::collection::btree_map(
            "[a-z]{1,6}",
            ("[a-z]{1,8}", prop::option::of("v[0-9]\\.[0-9]")).prop_map(|(repo, tag)| {
                DependencyEntry::new(format!("https://example.com/{}.git", repo), tag.as_deref())
            }),
            0..8,
        )
    }

    proptest! {
        /// Property: every entry of the later table survives a merge unchanged
        #[test]
        fn merge_later_entries_win(first in table_strategy(), second in table_strategy()) {
            let mut merged = first.clone();
            merge(&mut merged, second.clone());

            for (name, entry) in &second {
                prop_assert_eq!(merged.get(name), Some(entry));
            }
        }

        /// Property: entries only in the earlier table are kept
        #[test]
        fn merge_keeps_unshadowed_entries(first in table_strategy(), second in table_strategy()) {
            let mut merged = first.clone();
            merge(&mut merged, second.clone());

            for (name, entry) in &first {
                if !second.contains_key(name) {
                    prop_assert_eq!(merged.get(name), Some(entry));
                }
            }
            let expected: std::collections::BTreeSet<_> =
                first.keys().chain(second.keys()).collect();
            prop_assert_eq!(merged.len(), expected.len());
        }

        /// Property: a URL always matches its own last component
        #[test]
        fn remote_matches_own_repository_name(org in "[A-Za-z]{1,10}", repo in "[a-z][a-z-]{0,10}") {
            let url = format!("git@github.com:{}/{}.git", org, repo);
            let pattern = format!("{}.git", repo);
            prop_assert!(remote_matches(&url, &pattern).unwrap());
        }

        /// Property: `*` never matches across a `/`
        #[test]
        fn remote_star_is_single_component(org in "[A-Za-z]{1,10}", repo in "[a-z]{1,10}") {
            let url = format!("https://github.com/{}/{}.git", org, repo);
            prop_assert!(remote_matches(&url, "*/*").unwrap());
            prop_assert!(!remote_matches(&url, "/*").unwrap());
        }
    }
}
