//! Property tests for the catalog cycle invariants.
//!
//! Uses proptest to verify:
//! 1. Closed cycle — following `successor_of` n times from any member
//!    returns to that member, visiting all n members exactly once
//! 2. Non-members never have a successor
//! 3. The first code is always the first source row that survives filtering

use proptest::prelude::*;
use std::collections::BTreeSet;
use stagescan_core::catalog::Catalog;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_codes() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[A-Z][A-Z0-9]{0,5}", 1..40)
        .prop_map(|set| set.into_iter().collect())
}

fn catalog_csv(codes: &[String]) -> String {
    let mut csv = String::from("code,name,category\n");
    for code in codes {
        csv.push_str(&format!("{code},{code} Corp,misc\n"));
    }
    csv
}

// ── 1. Closed Cycle ──────────────────────────────────────────────────

proptest! {
    /// Walking the successor map n times from any member comes back to the
    /// start, having visited every member exactly once.
    #[test]
    fn successor_walk_closes_after_n_steps(
        codes in arb_codes(),
        start_pick in any::<prop::sample::Index>(),
    ) {
        let catalog = Catalog::from_csv(&catalog_csv(&codes), &[]).unwrap();
        let n = catalog.len();
        prop_assert_eq!(n, codes.len());

        let start = &codes[start_pick.index(n)];
        let mut visited = BTreeSet::new();
        let mut current = start.clone();
        for _ in 0..n {
            prop_assert!(visited.insert(current.clone()), "revisited {} early", current);
            current = catalog.successor_of(&current).unwrap().to_string();
        }

        prop_assert_eq!(&current, start);
        prop_assert_eq!(visited.len(), n);
    }

    /// Every member appears exactly once as a successor value.
    #[test]
    fn every_member_is_someones_successor(codes in arb_codes()) {
        let catalog = Catalog::from_csv(&catalog_csv(&codes), &[]).unwrap();
        let mut successors: Vec<String> = codes
            .iter()
            .map(|c| catalog.successor_of(c).unwrap().to_string())
            .collect();
        successors.sort();
        let mut members = codes.clone();
        members.sort();
        prop_assert_eq!(successors, members);
    }
}

// ── 2. Non-Members ───────────────────────────────────────────────────

proptest! {
    /// A code outside the catalog never has a successor.
    #[test]
    fn non_member_has_no_successor(codes in arb_codes()) {
        let catalog = Catalog::from_csv(&catalog_csv(&codes), &[]).unwrap();
        // Lowercase is outside the generated alphabet.
        prop_assert_eq!(catalog.successor_of("zzz"), None);
    }
}

// ── 3. First Code ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn first_code_is_first_source_row(codes in arb_codes()) {
        let catalog = Catalog::from_csv(&catalog_csv(&codes), &[]).unwrap();
        prop_assert_eq!(catalog.first_code(), codes[0].as_str());
    }
}
