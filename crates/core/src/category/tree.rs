//! Category tree snapshot.
//!
//! The tree is an arena of nodes indexed by position, with child lists
//! derived once at build time. All queries are pure over the snapshot;
//! rebuild the tree after categories change.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use budgetwise_shared::types::{CategoryId, MonthlyAmounts};
use once_cell::sync::OnceCell;

use super::error::CategoryError;
use super::types::{Category, OutlineEntry};

#[derive(Debug)]
struct Node {
    category: Category,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Immutable snapshot of the category hierarchy.
#[derive(Debug)]
pub struct CategoryTree {
    nodes: Vec<Node>,
    index: HashMap<CategoryId, usize>,
    roots: Vec<usize>,
    leaf_memo: Vec<OnceCell<Arc<BTreeSet<CategoryId>>>>,
}

impl CategoryTree {
    /// Builds a tree from a flat category list in a single pass.
    ///
    /// A parent id that is not part of `categories` places the child at root
    /// level.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::InvalidHierarchy` if an id appears twice or a
    /// category is reachable from itself through parent links.
    pub fn build(categories: impl IntoIterator<Item = Category>) -> Result<Self, CategoryError> {
        let categories: Vec<Category> = categories.into_iter().collect();

        let mut index = HashMap::with_capacity(categories.len());
        for (position, category) in categories.iter().enumerate() {
            if index.insert(category.id, position).is_some() {
                return Err(CategoryError::InvalidHierarchy {
                    category_id: category.id,
                    reason: "duplicate category id".to_string(),
                });
            }
        }

        let parents: Vec<Option<usize>> = categories
            .iter()
            .map(|c| c.parent_id.and_then(|p| index.get(&p).copied()))
            .collect();

        if let Some(position) = find_cycle(&parents) {
            return Err(CategoryError::InvalidHierarchy {
                category_id: categories[position].id,
                reason: "category is its own ancestor".to_string(),
            });
        }

        let mut nodes: Vec<Node> = categories
            .into_iter()
            .zip(parents.iter().copied())
            .map(|(category, parent)| Node {
                category,
                parent,
                children: Vec::new(),
            })
            .collect();

        let mut roots = Vec::new();
        for (position, parent) in parents.iter().enumerate() {
            match parent {
                Some(parent) => nodes[*parent].children.push(position),
                None => roots.push(position),
            }
        }

        roots.sort_by(|&a, &b| by_name(&nodes, a, b));
        for position in 0..nodes.len() {
            let mut children = std::mem::take(&mut nodes[position].children);
            children.sort_by(|&a, &b| by_name(&nodes, a, b));
            nodes[position].children = children;
        }

        let leaf_memo = (0..nodes.len()).map(|_| OnceCell::new()).collect();

        Ok(Self {
            nodes,
            index,
            roots,
            leaf_memo,
        })
    }

    /// Number of categories in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the snapshot holds no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if the category is part of the snapshot.
    #[must_use]
    pub fn contains(&self, id: CategoryId) -> bool {
        self.index.contains_key(&id)
    }

    /// Looks up a category.
    #[must_use]
    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.index.get(&id).map(|&i| &self.nodes[i].category)
    }

    /// Iterates all categories in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.nodes.iter().map(|n| &n.category)
    }

    /// Root categories, sorted by name.
    #[must_use]
    pub fn roots(&self) -> Vec<CategoryId> {
        self.roots.iter().map(|&i| self.nodes[i].category.id).collect()
    }

    /// Direct children (active and inactive), sorted by name.
    #[must_use]
    pub fn children(&self, id: CategoryId) -> Vec<CategoryId> {
        self.index
            .get(&id)
            .map(|&i| {
                self.nodes[i]
                    .children
                    .iter()
                    .map(|&c| self.nodes[c].category.id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolved parent of a category.
    #[must_use]
    pub fn parent(&self, id: CategoryId) -> Option<CategoryId> {
        let &i = self.index.get(&id)?;
        self.nodes[i].parent.map(|p| self.nodes[p].category.id)
    }

    /// Ancestors from the direct parent up to the root.
    #[must_use]
    pub fn ancestors(&self, id: CategoryId) -> Vec<CategoryId> {
        let mut out = Vec::new();
        let mut current = self.index.get(&id).and_then(|&i| self.nodes[i].parent);
        while let Some(i) = current {
            out.push(self.nodes[i].category.id);
            current = self.nodes[i].parent;
        }
        out
    }

    /// True iff the category and every ancestor are active.
    #[must_use]
    pub fn is_active(&self, id: CategoryId) -> bool {
        let mut current = self.index.get(&id).copied();
        while let Some(i) = current {
            if !self.nodes[i].category.is_active {
                return false;
            }
            current = self.nodes[i].parent;
        }
        self.contains(id)
    }

    /// True iff the category exists and no active category declares it as
    /// parent.
    #[must_use]
    pub fn is_leaf(&self, id: CategoryId) -> bool {
        self.index.get(&id).is_some_and(|&i| self.is_leaf_at(i))
    }

    /// All leaf categories.
    #[must_use]
    pub fn leaves(&self) -> Vec<CategoryId> {
        (0..self.nodes.len())
            .filter(|&i| self.is_leaf_at(i))
            .map(|i| self.nodes[i].category.id)
            .collect()
    }

    /// Leaves reachable through active children. A leaf's set is itself;
    /// unknown ids yield an empty set. Memoised per snapshot.
    #[must_use]
    pub fn descendant_leaves(&self, id: CategoryId) -> Arc<BTreeSet<CategoryId>> {
        match self.index.get(&id) {
            Some(&i) => Arc::clone(self.leaf_memo[i].get_or_init(|| self.collect_leaves(i))),
            None => Arc::new(BTreeSet::new()),
        }
    }

    /// Rolls leaf amounts up the hierarchy.
    ///
    /// Every category in the snapshot gets an entry. Leaves report their own
    /// value (zero when absent); every other category reports the sum over
    /// its descendant leaves. Values keyed on non-leaf categories are
    /// ignored, so a parent's own entry is never counted.
    #[must_use]
    pub fn roll_up(
        &self,
        values: &HashMap<CategoryId, MonthlyAmounts>,
    ) -> HashMap<CategoryId, MonthlyAmounts> {
        let mut totals = vec![MonthlyAmounts::ZERO; self.nodes.len()];

        // Reverse pre-order visits every child before its parent.
        for &i in self.pre_order().iter().rev() {
            if self.is_leaf_at(i) {
                if let Some(value) = values.get(&self.nodes[i].category.id) {
                    totals[i] = *value;
                }
            } else {
                let mut sum = MonthlyAmounts::ZERO;
                for child in self.active_children(i) {
                    sum += &totals[child];
                }
                totals[i] = sum;
            }
        }

        self.nodes
            .iter()
            .zip(totals)
            .map(|(node, total)| (node.category.id, total))
            .collect()
    }

    /// Checks that `child` may be re-parented under `new_parent`.
    ///
    /// `child` may be absent from the snapshot (a category being created).
    ///
    /// # Errors
    ///
    /// - `CategoryError::SelfParent` if `new_parent == child`
    /// - `CategoryError::ParentNotFound` if the parent is not in the snapshot
    /// - `CategoryError::InvalidHierarchy` if `child` is an ancestor of the parent
    pub fn validate_parent(
        &self,
        child: CategoryId,
        new_parent: Option<CategoryId>,
    ) -> Result<(), CategoryError> {
        let Some(parent) = new_parent else {
            return Ok(());
        };
        if parent == child {
            return Err(CategoryError::SelfParent(child));
        }
        if !self.contains(parent) {
            return Err(CategoryError::ParentNotFound(parent));
        }
        if self.ancestors(parent).contains(&child) {
            return Err(CategoryError::InvalidHierarchy {
                category_id: child,
                reason: format!("moving under {parent} would make the category its own ancestor"),
            });
        }
        Ok(())
    }

    /// Pre-order listing with depth, roots and siblings sorted by name.
    #[must_use]
    pub fn outline(&self) -> Vec<OutlineEntry> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, usize)> = self.roots.iter().rev().map(|&i| (i, 0)).collect();
        while let Some((i, depth)) = stack.pop() {
            let node = &self.nodes[i];
            out.push(OutlineEntry {
                category_id: node.category.id,
                name: node.category.name.clone(),
                category_type: node.category.category_type,
                parent_id: node.parent.map(|p| self.nodes[p].category.id),
                depth,
                is_leaf: self.is_leaf_at(i),
            });
            stack.extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
        }
        out
    }

    /// Display parent of each category in a report subset.
    ///
    /// A category is nested under its direct parent only when that parent is
    /// also in `present`; otherwise it is placed at root level. Ids unknown to
    /// the snapshot are placed at root level too.
    #[must_use]
    pub fn placement(
        &self,
        present: &HashSet<CategoryId>,
    ) -> HashMap<CategoryId, Option<CategoryId>> {
        present
            .iter()
            .map(|&id| {
                let parent = self.parent(id).filter(|p| present.contains(p));
                (id, parent)
            })
            .collect()
    }

    fn is_leaf_at(&self, i: usize) -> bool {
        self.active_children(i).next().is_none()
    }

    fn active_children(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.nodes[i]
            .children
            .iter()
            .copied()
            .filter(|&c| self.nodes[c].category.is_active)
    }

    fn collect_leaves(&self, start: usize) -> Arc<BTreeSet<CategoryId>> {
        let mut leaves = BTreeSet::new();
        let mut stack = vec![start];
        while let Some(i) = stack.pop() {
            let before = stack.len();
            stack.extend(self.active_children(i));
            if stack.len() == before {
                leaves.insert(self.nodes[i].category.id);
            }
        }
        Arc::new(leaves)
    }

    fn pre_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.roots.clone();
        while let Some(i) = stack.pop() {
            order.push(i);
            stack.extend(self.nodes[i].children.iter().copied());
        }
        order
    }
}

fn by_name(nodes: &[Node], a: usize, b: usize) -> Ordering {
    let (a, b) = (&nodes[a].category, &nodes[b].category);
    a.name.cmp(&b.name).then(a.id.cmp(&b.id))
}

/// Returns a node on a parent-link cycle, if any. Iterative, O(n).
fn find_cycle(parents: &[Option<usize>]) -> Option<usize> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Unvisited,
        OnPath,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; parents.len()];
    let mut path = Vec::new();
    for start in 0..parents.len() {
        let mut current = Some(start);
        while let Some(node) = current {
            match marks[node] {
                Mark::Done => break,
                Mark::OnPath => return Some(node),
                Mark::Unvisited => {
                    marks[node] = Mark::OnPath;
                    path.push(node);
                    current = parents[node];
                }
            }
        }
        for node in path.drain(..) {
            marks[node] = Mark::Done;
        }
    }
    None
}
