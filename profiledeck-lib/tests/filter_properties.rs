mod common;

use common::profile;
use profiledeck_lib::profile::Profile;
use profiledeck_lib::session::filtered;
use proptest::prelude::*;

fn arb_profiles() -> impl Strategy<Value = Vec<Profile>> {
    prop::collection::vec(
        ("[A-Za-z]{1,8}", "[A-Za-z]{1,8}", prop::sample::select(vec!["male", "female"])),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (first, last, gender))| profile(i as u128, &first, &last, gender))
            .collect()
    })
}

fn positions(input: &[Profile], output: &[&Profile]) -> Vec<usize> {
    output
        .iter()
        .map(|p| input.iter().position(|q| q.id() == p.id()).unwrap())
        .collect()
}

proptest! {
    #[test]
    fn filtering_preserves_input_order(
        profiles in arb_profiles(),
        search in "[a-zA-Z ]{0,3}",
        gender in prop::sample::select(vec!["", "male", "female"]),
    ) {
        let out = filtered(&profiles, &search, gender);
        let idx = positions(&profiles, &out);
        prop_assert!(idx.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn filtering_is_repeatable(
        profiles in arb_profiles(),
        search in "[a-zA-Z ]{0,3}",
        gender in prop::sample::select(vec!["", "male", "female"]),
    ) {
        let first = filtered(&profiles, &search, gender);
        let second = filtered(&profiles, &search, gender);
        prop_assert_eq!(&first, &second);

        let owned: Vec<Profile> = first.into_iter().cloned().collect();
        let again = filtered(&owned, &search, gender);
        prop_assert_eq!(again.len(), owned.len());
    }

    #[test]
    fn empty_criteria_return_everything(profiles in arb_profiles()) {
        let out = filtered(&profiles, "", "");
        let expected: Vec<&Profile> = profiles.iter().collect();
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn search_ignores_case(profiles in arb_profiles(), search in "[a-z]{1,2}") {
        let lower = filtered(&profiles, &search, "");
        let upper = filtered(&profiles, &search.to_uppercase(), "");
        prop_assert_eq!(lower, upper);
    }
}

#[test]
fn match_spans_the_combined_name() {
    let profiles = vec![
        profile(1, "Anna", "Lee", "female"),
        profile(2, "Bob", "Mann", "male"),
        profile(3, "Carl", "Smith", "male"),
    ];

    let out = filtered(&profiles, "ann", "");
    let names: Vec<String> = out.iter().map(|p| p.full_name()).collect();
    assert_eq!(names, vec!["Anna Lee", "Bob Mann"]);

    assert_eq!(filtered(&profiles, "b m", "").len(), 1);
}
