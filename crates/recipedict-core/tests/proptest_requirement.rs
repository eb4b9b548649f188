//! Property-based tests for the requirement algebra and batch timing.

use proptest::prelude::*;
use recipedict_core::fixed::percent_to_ratio;
use recipedict_core::id::ItemTypeId;
use recipedict_core::recipe::Recipe;
use recipedict_core::requirement::{ItemComp, NO_CHARGES, RequirementData, ToolComp};
use recipedict_core::test_utils::{comp, tool};
use std::collections::BTreeSet;

const ITEMS: [&str; 6] = ["plank", "log", "nail", "paper", "hammer", "saw"];

// ===========================================================================
// Generators
// ===========================================================================

/// A group of alternatives with distinct items.
fn arb_group() -> impl Strategy<Value = Vec<ItemComp>> {
    proptest::collection::btree_map(0..ITEMS.len(), 1..20i32, 1..4)
        .prop_map(|alts| alts.into_iter().map(|(i, n)| comp(ITEMS[i], n)).collect())
}

fn arb_tool() -> impl Strategy<Value = ToolComp> {
    (0..ITEMS.len(), prop_oneof![Just(NO_CHARGES), 1..50i32])
        .prop_map(|(i, charges)| tool(ITEMS[i], charges))
}

fn arb_requirement() -> impl Strategy<Value = RequirementData> {
    (
        proptest::collection::vec(arb_group(), 0..4),
        proptest::collection::vec(arb_tool(), 0..3),
    )
        .prop_map(|(components, tools)| RequirementData {
            components,
            tools: tools.into_iter().map(|t| vec![t]).collect(),
            ..Default::default()
        })
}

fn items(data: &RequirementData) -> BTreeSet<ItemTypeId> {
    data.component_items().into_iter().cloned().collect()
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn scaling_by_one_is_identity(a in arb_requirement()) {
        prop_assert_eq!(a.scaled(1), a);
    }

    #[test]
    fn scaling_multiplies_components_and_charged_tools(a in arb_requirement(), n in 1..5i32) {
        let scaled = a.scaled(n);
        for (group, scaled_group) in a.components.iter().zip(&scaled.components) {
            for (alt, scaled_alt) in group.iter().zip(scaled_group) {
                prop_assert_eq!(scaled_alt.count, alt.count * n);
            }
        }
        for (group, scaled_group) in a.tools.iter().zip(&scaled.tools) {
            for (alt, scaled_alt) in group.iter().zip(scaled_group) {
                if alt.charges == NO_CHARGES {
                    prop_assert_eq!(scaled_alt.charges, NO_CHARGES);
                } else {
                    prop_assert_eq!(scaled_alt.charges, alt.charges * n);
                }
            }
        }
    }

    #[test]
    fn sum_covers_the_union_of_component_items(a in arb_requirement(), b in arb_requirement()) {
        let sum = a.clone() + &b;
        let expected: BTreeSet<_> = items(&a).union(&items(&b)).cloned().collect();
        prop_assert_eq!(items(&sum), expected);
        prop_assert!(sum.components.len() <= a.components.len() + b.components.len());
    }

    #[test]
    fn adding_a_set_to_itself_doubles_it(a in arb_requirement()) {
        // Only holds when no two groups of `a` share an item set.
        let keys: BTreeSet<BTreeSet<&ItemTypeId>> = a
            .components
            .iter()
            .map(|g| g.iter().map(|c| &c.item).collect())
            .collect();
        prop_assume!(keys.len() == a.components.len());

        let doubled = a.clone() + &a;
        prop_assert_eq!(doubled.components, a.scaled(2).components);
    }

    #[test]
    fn sum_keeps_left_hand_blacklisting(
        a in arb_requirement(),
        b in arb_requirement(),
        banned in proptest::collection::btree_set(0..ITEMS.len(), 0..4),
    ) {
        let blacklist: BTreeSet<ItemTypeId> = banned.into_iter().map(|i| ITEMS[i].into()).collect();
        if a.is_blacklisted_by(&blacklist) {
            prop_assert!((a + &b).is_blacklisted_by(&blacklist));
        }
    }

    #[test]
    fn batch_time_is_between_one_item_and_undiscounted(
        time in 0..10_000u32,
        percent in 0..100i32,
        rsize in 0..10i32,
        batch in 1..50i32,
    ) {
        let mut r = Recipe::new("plank", "plank");
        r.time = time;
        r.batch_rscale = percent_to_ratio(percent);
        r.batch_rsize = rsize;
        let total = r.batch_time(batch);
        prop_assert!(total <= time * batch as u32);
        prop_assert!(total >= time);
    }
}
