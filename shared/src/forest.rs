//! Exercise forest operations
//!
//! A forest is an ordered slice of tree roots. Every operation here is
//! immutable: it borrows the input forest and returns a new one. All
//! mutators share [`rewrite`], a depth-first pre-order walk that replaces
//! matching nodes according to a [`MatchPolicy`].
//!
//! Per-operation policies:
//!
//! | operation                        | locator    | policy  |
//! |----------------------------------|------------|---------|
//! | [`add_child_to_parent`]          | `id`       | `First` |
//! | [`replace_exercise_by_position`] | `position` | `All`   |
//! | [`update_exercise_in_tree`]      | `id`       | `All`   |
//! | [`remove_by_id`]                 | `id`       | `All`   |

use tracing::debug;

use crate::exercise::TreeNode;

/// How many matching nodes a rewrite touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Only the first match in pre-order
    First,
    /// Every match
    All,
}

/// Rewrite a forest depth-first in pre-order
///
/// A matching node is replaced by `action(node)` and its original subtree is
/// not visited. Non-matching nodes are cloned and their children rewritten.
pub fn rewrite<T, P, A>(forest: &[T], mut matches: P, mut action: A, policy: MatchPolicy) -> Vec<T>
where
    T: TreeNode + Clone,
    P: FnMut(&T) -> bool,
    A: FnMut(&T) -> T,
{
    let mut hits = 0usize;
    let result = rewrite_level(forest, &mut matches, &mut action, policy, &mut hits);
    if hits == 0 {
        debug!("Forest rewrite matched no exercise");
    }
    result
}

fn rewrite_level<T, P, A>(
    nodes: &[T],
    matches: &mut P,
    action: &mut A,
    policy: MatchPolicy,
    hits: &mut usize,
) -> Vec<T>
where
    T: TreeNode + Clone,
    P: FnMut(&T) -> bool,
    A: FnMut(&T) -> T,
{
    let mut rewritten = Vec::with_capacity(nodes.len());
    for node in nodes {
        let exhausted = policy == MatchPolicy::First && *hits > 0;
        if !exhausted && matches(node) {
            *hits += 1;
            rewritten.push(action(node));
            continue;
        }
        let mut copy = node.clone();
        *copy.children_mut() =
            rewrite_level(node.children(), &mut *matches, &mut *action, policy, &mut *hits);
        rewritten.push(copy);
    }
    rewritten
}

/// Append `child` to the children of the first node whose id is `parent_id`
///
/// Unknown parent ids leave the forest unchanged.
pub fn add_child_to_parent<T>(forest: &[T], parent_id: i64, child: T) -> Vec<T>
where
    T: TreeNode + Clone,
{
    rewrite(
        forest,
        |node| node.id() == Some(parent_id),
        |node| {
            let mut parent = node.clone();
            parent.children_mut().push(child.clone());
            parent
        },
        MatchPolicy::First,
    )
}

/// Replace every node at `position` with a copy of `updated`
pub fn replace_exercise_by_position<T>(forest: &[T], position: i64, updated: &T) -> Vec<T>
where
    T: TreeNode + Clone,
{
    rewrite(
        forest,
        |node| node.position() == Some(position),
        |_| updated.clone(),
        MatchPolicy::All,
    )
}

/// Replace every node sharing `updated`'s id with a copy of `updated`
///
/// An `updated` record without an id matches nothing.
pub fn update_exercise_in_tree<T>(forest: &[T], updated: &T) -> Vec<T>
where
    T: TreeNode + Clone,
{
    let Some(id) = updated.id() else {
        debug!("Update skipped: exercise has no id");
        return forest.to_vec();
    };
    rewrite(
        forest,
        |node| node.id() == Some(id),
        |_| updated.clone(),
        MatchPolicy::All,
    )
}

/// Drop every node with the given id, together with its subtree
pub fn remove_by_id<T>(forest: &[T], id: i64) -> Vec<T>
where
    T: TreeNode + Clone,
{
    forest
        .iter()
        .filter(|node| node.id() != Some(id))
        .map(|node| {
            let mut copy = node.clone();
            *copy.children_mut() = remove_by_id(node.children(), id);
            copy
        })
        .collect()
}

/// First node with the given id, in pre-order
pub fn find_by_id<T: TreeNode>(forest: &[T], id: i64) -> Option<&T> {
    forest.iter().find_map(|node| {
        if node.id() == Some(id) {
            Some(node)
        } else {
            find_by_id(node.children(), id)
        }
    })
}

/// Total number of nodes in the forest
pub fn count_nodes<T: TreeNode>(forest: &[T]) -> usize {
    forest
        .iter()
        .map(|node| 1 + count_nodes(node.children()))
        .sum()
}

/// Pre-order listing of every node with its depth (roots at 0)
pub fn flatten<T: TreeNode>(forest: &[T]) -> Vec<(&T, usize)> {
    fn collect<'a, T: TreeNode>(nodes: &'a [T], depth: usize, out: &mut Vec<(&'a T, usize)>) {
        for node in nodes {
            out.push((node, depth));
            collect(node.children(), depth + 1, out);
        }
    }

    let mut result = Vec::new();
    collect(forest, 0, &mut result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::{Exercise, RawExercise};
    use proptest::prelude::*;

    fn node(id: i64, position: i64, children: Vec<Exercise>) -> Exercise {
        Exercise {
            id: Some(id),
            position: Some(position),
            name: Some(format!("Exercise {}", id)),
            children,
            ..Default::default()
        }
    }

    /// 1 (pos 0)
    /// ├── 3 (pos 0)
    /// │   └── 5 (pos 0)
    /// └── 4 (pos 1)
    /// 2 (pos 1)
    fn sample_forest() -> Vec<Exercise> {
        vec![
            node(1, 0, vec![node(3, 0, vec![node(5, 0, vec![])]), node(4, 1, vec![])]),
            node(2, 1, vec![]),
        ]
    }

    fn ids(forest: &[Exercise]) -> Vec<i64> {
        flatten(forest).iter().filter_map(|(n, _)| n.id).collect()
    }

    #[test]
    fn test_flatten_order_and_depth() {
        let forest = sample_forest();
        let flat: Vec<_> = flatten(&forest).iter().map(|(n, d)| (n.id.unwrap(), *d)).collect();
        assert_eq!(flat, vec![(1, 0), (3, 1), (5, 2), (4, 1), (2, 0)]);
        assert_eq!(count_nodes(&forest), 5);
    }

    #[test]
    fn test_add_child_to_nested_parent() {
        let forest = sample_forest();
        let result = add_child_to_parent(&forest, 3, node(6, 1, vec![]));

        let parent = find_by_id(&result, 3).unwrap();
        let child_ids: Vec<_> = parent.children.iter().filter_map(|c| c.id).collect();
        assert_eq!(child_ids, vec![5, 6]);
        assert_eq!(count_nodes(&result), 6);
        assert_eq!(ids(&forest), vec![1, 3, 5, 4, 2]);
    }

    #[test]
    fn test_add_child_unknown_parent_is_noop() {
        let forest = sample_forest();
        let result = add_child_to_parent(&forest, 99, node(6, 0, vec![]));
        assert_eq!(result, forest);
    }

    #[test]
    fn test_add_child_only_first_duplicate() {
        let forest = vec![node(7, 0, vec![]), node(7, 1, vec![])];
        let result = add_child_to_parent(&forest, 7, node(8, 0, vec![]));
        assert_eq!(result[0].children.len(), 1);
        assert!(result[1].children.is_empty());
    }

    #[test]
    fn test_replace_by_position_replaces_all_matches() {
        let forest = sample_forest();
        let replacement = Exercise {
            id: Some(42),
            position: Some(1),
            ..Default::default()
        };
        let result = replace_exercise_by_position(&forest, 1, &replacement);
        // Node 4 (nested) and node 2 (root) both sit at position 1
        assert_eq!(ids(&result), vec![1, 3, 5, 42, 42]);
    }

    #[test]
    fn test_replace_by_position_does_not_merge() {
        let forest = sample_forest();
        let replacement = Exercise {
            id: Some(9),
            position: Some(0),
            ..Default::default()
        };
        let result = replace_exercise_by_position(&forest, 0, &replacement);
        // Root 1 matches first and its subtree is dropped with it
        assert_eq!(ids(&result), vec![9, 2]);
        assert!(result[0].name.is_none());
    }

    #[test]
    fn test_replace_by_position_no_match() {
        let forest = sample_forest();
        let result = replace_exercise_by_position(&forest, 7, &node(1, 7, vec![]));
        assert_eq!(result, forest);
    }

    #[test]
    fn test_update_in_tree_replaces_nested_node() {
        let forest = sample_forest();
        let updated = Exercise {
            id: Some(5),
            notes: Some("heavier".into()),
            completed: Some(true),
            ..Default::default()
        };
        let result = update_exercise_in_tree(&forest, &updated);
        assert_eq!(find_by_id(&result, 5), Some(&updated));
        assert_eq!(find_by_id(&result, 4), find_by_id(&forest, 4));
    }

    #[test]
    fn test_update_without_id_is_noop() {
        let forest = sample_forest();
        let result = update_exercise_in_tree(&forest, &Exercise::default());
        assert_eq!(result, forest);
    }

    #[test]
    fn test_remove_by_id_drops_subtree() {
        let forest = sample_forest();
        let result = remove_by_id(&forest, 3);
        assert_eq!(ids(&result), vec![1, 4, 2]);
    }

    #[test]
    fn test_mutators_work_on_raw_records() {
        let forest = vec![RawExercise {
            id: Some(1),
            ..Default::default()
        }];
        let child = RawExercise {
            id: Some(2),
            date: Some("2024-06-15".into()),
            ..Default::default()
        };
        let result = add_child_to_parent(&forest, 1, child.clone());
        assert_eq!(result[0].children, vec![child]);
    }

    // =========================================================================
    // Property tests
    // =========================================================================

    fn arb_forest() -> impl Strategy<Value = Vec<Exercise>> {
        let leaf = (0i64..4).prop_map(|position| Exercise {
            position: Some(position),
            ..Default::default()
        });
        let tree = leaf.prop_recursive(3, 24, 4, |inner| {
            ((0i64..4), prop::collection::vec(inner, 0..4)).prop_map(|(position, children)| {
                Exercise {
                    position: Some(position),
                    children,
                    ..Default::default()
                }
            })
        });
        prop::collection::vec(tree, 0..4).prop_map(|mut forest| {
            assign_ids(&mut forest, &mut 1);
            forest
        })
    }

    fn assign_ids(forest: &mut [Exercise], next: &mut i64) {
        for node in forest {
            node.id = Some(*next);
            *next += 1;
            assign_ids(&mut node.children, next);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: updating node X changes only the node at X's position
        #[test]
        fn prop_update_changes_only_target(forest in arb_forest(), pick in any::<prop::sample::Index>()) {
            let total = count_nodes(&forest);
            prop_assume!(total > 0);
            let target = pick.index(total) as i64 + 1;
            let updated = Exercise {
                id: Some(target),
                notes: Some("updated".into()),
                ..Default::default()
            };

            let result = update_exercise_in_tree(&forest, &updated);

            // The target's old subtree is gone; everything else lines up in order
            let descendants: Vec<i64> = flatten(find_by_id(&forest, target).unwrap().children())
                .iter()
                .filter_map(|(n, _)| n.id)
                .collect();
            let expected: Vec<_> = flatten(&forest)
                .into_iter()
                .filter(|(n, _)| !descendants.contains(&n.id.unwrap()))
                .collect();
            let after = flatten(&result);
            prop_assert_eq!(after.len(), expected.len());

            for ((old, old_depth), (new, new_depth)) in expected.iter().zip(after.iter()) {
                prop_assert_eq!(old_depth, new_depth);
                if old.id == Some(target) {
                    prop_assert_eq!(*new, &updated);
                } else {
                    prop_assert_eq!(old.id, new.id);
                    prop_assert_eq!(old.position, new.position);
                    prop_assert_eq!(old.children.len(), new.children.len());
                }
            }
        }

        /// Property: adding under an absent parent returns an equal forest
        #[test]
        fn prop_add_child_absent_parent(forest in arb_forest()) {
            let absent = count_nodes(&forest) as i64 + 100;
            let result = add_child_to_parent(&forest, absent, Exercise::default());
            prop_assert_eq!(result, forest);
        }

        /// Property: adding under a present parent grows the forest by one
        #[test]
        fn prop_add_child_grows_by_one(forest in arb_forest(), pick in any::<prop::sample::Index>()) {
            let total = count_nodes(&forest);
            prop_assume!(total > 0);
            let parent = pick.index(total) as i64 + 1;
            let original = forest.clone();
            let result = add_child_to_parent(&forest, parent, Exercise::default());
            prop_assert_eq!(count_nodes(&result), total + 1);
            prop_assert_eq!(forest, original);
        }

        /// Property: replacing by position is idempotent for a replacement at that position
        #[test]
        fn prop_replace_by_position_idempotent(forest in arb_forest(), position in 0i64..4) {
            let replacement = Exercise {
                id: Some(-1),
                position: Some(position),
                ..Default::default()
            };
            let once = replace_exercise_by_position(&forest, position, &replacement);
            let twice = replace_exercise_by_position(&once, position, &replacement);
            prop_assert_eq!(once, twice);
        }
    }
}
