//! Property-based tests for CategoryTree roll-ups.

use std::collections::HashMap;

use budgetwise_shared::types::{CategoryId, MonthlyAmounts};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::category::tree::CategoryTree;
use crate::category::types::{Category, CategoryType};

const MAX_DEPTH: usize = 4;

/// A synthetic node: parent selector, monthly amount in cents, active flag.
type NodeSpec = (usize, i64, bool);

fn arb_nodes() -> impl Strategy<Value = Vec<NodeSpec>> {
    prop::collection::vec((0usize..64, 0i64..10_000_000, prop::bool::weighted(0.9)), 1..40)
}

/// Builds categories whose depth never exceeds `MAX_DEPTH` levels. Node `i`
/// attaches to an earlier node, or becomes a root, so the result is acyclic.
fn materialise(specs: &[NodeSpec]) -> (Vec<Category>, HashMap<CategoryId, MonthlyAmounts>) {
    let mut categories: Vec<Category> = Vec::with_capacity(specs.len());
    let mut depths: Vec<usize> = Vec::with_capacity(specs.len());
    let mut values = HashMap::new();

    for (i, &(selector, cents, active)) in specs.iter().enumerate() {
        let parent = (i > 0)
            .then(|| selector % (i + 1))
            .filter(|&p| p < i && depths[p] + 1 < MAX_DEPTH);
        let id = CategoryId::new();
        depths.push(parent.map_or(0, |p| depths[p] + 1));
        categories.push(Category {
            id,
            name: format!("c{i}"),
            category_type: if cents % 2 == 0 {
                CategoryType::Opex
            } else {
                CategoryType::Capex
            },
            parent_id: parent.map(|p| categories[p].id),
            department_id: None,
            // Roots stay active so every tree has at least one live branch.
            is_active: parent.is_none() || active,
        });
        values.insert(id, MonthlyAmounts::uniform(Decimal::new(cents, 2)));
    }

    (categories, values)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A parent's roll-up equals the sum of its active children's roll-ups,
    /// and the sum of the raw values of its descendant leaves.
    #[test]
    fn prop_parent_equals_sum_of_children(specs in arb_nodes()) {
        let (categories, values) = materialise(&specs);
        let tree = CategoryTree::build(categories.clone()).unwrap();
        let rolled = tree.roll_up(&values);

        prop_assert_eq!(rolled.len(), categories.len());

        for category in &categories {
            let id = category.id;
            if tree.is_leaf(id) {
                prop_assert_eq!(rolled[&id], values[&id]);
                continue;
            }

            let mut from_children = MonthlyAmounts::ZERO;
            for child in tree.children(id) {
                if tree.get(child).is_some_and(|c| c.is_active) {
                    from_children += &rolled[&child];
                }
            }
            prop_assert_eq!(rolled[&id], from_children);

            let mut from_leaves = MonthlyAmounts::ZERO;
            for leaf in tree.descendant_leaves(id).iter() {
                from_leaves += &values[leaf];
            }
            prop_assert_eq!(rolled[&id], from_leaves);
        }
    }

    /// Changing a non-leaf's own entry never changes any roll-up.
    #[test]
    fn prop_parent_entry_never_counted(specs in arb_nodes(), bump in 1i64..1_000_000) {
        let (categories, mut values) = materialise(&specs);
        let tree = CategoryTree::build(categories.clone()).unwrap();
        let before = tree.roll_up(&values);

        for category in &categories {
            if !tree.is_leaf(category.id) {
                values.insert(category.id, MonthlyAmounts::uniform(Decimal::from(bump)));
            }
        }
        prop_assert_eq!(tree.roll_up(&values), before);
    }

    /// Roots' roll-ups add up to the sum over all leaves reachable from roots.
    #[test]
    fn prop_grand_total_preserved(specs in arb_nodes()) {
        let (categories, values) = materialise(&specs);
        let tree = CategoryTree::build(categories).unwrap();
        let rolled = tree.roll_up(&values);

        let mut via_roots = Decimal::ZERO;
        let mut via_leaves = Decimal::ZERO;
        for root in tree.roots() {
            via_roots += rolled[&root].total();
            for leaf in tree.descendant_leaves(root).iter() {
                via_leaves += values[leaf].total();
            }
        }
        prop_assert_eq!(via_roots, via_leaves);
    }

    /// Summing leaves on an all-active path agrees with the roots' roll-ups.
    #[test]
    fn prop_active_leaves_match_roots(specs in arb_nodes()) {
        let (categories, values) = materialise(&specs);
        let tree = CategoryTree::build(categories).unwrap();
        let rolled = tree.roll_up(&values);

        let via_roots: Decimal = tree.roots().iter().map(|root| rolled[root].total()).sum();
        let via_leaves: Decimal = tree
            .leaves()
            .into_iter()
            .filter(|&leaf| tree.is_active(leaf))
            .map(|leaf| values[&leaf].total())
            .sum();
        prop_assert_eq!(via_roots, via_leaves);
    }
}
