//! Composite catalog tree: categories own an ordered sequence of child nodes.

use core::fmt::Write as _;

use stockroom_core::{DomainResult, NodeId};

use crate::item::{Item, validate_name};

/// A node in the catalog tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogNode {
    Category(Category),
    Item(Item),
}

impl CatalogNode {
    pub fn id(&self) -> NodeId {
        match self {
            CatalogNode::Category(c) => c.id(),
            CatalogNode::Item(i) => i.id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CatalogNode::Category(c) => c.name(),
            CatalogNode::Item(i) => i.name(),
        }
    }

    pub fn total_value(&self) -> u64 {
        match self {
            CatalogNode::Category(c) => c.total_value(),
            CatalogNode::Item(i) => i.value(),
        }
    }

    pub fn total_stock(&self) -> u64 {
        match self {
            CatalogNode::Category(c) => c.total_stock(),
            CatalogNode::Item(i) => u64::from(i.quantity()),
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            CatalogNode::Item(i) => Some(i),
            CatalogNode::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&Category> {
        match self {
            CatalogNode::Category(c) => Some(c),
            CatalogNode::Item(_) => None,
        }
    }
}

impl From<Category> for CatalogNode {
    fn from(value: Category) -> Self {
        CatalogNode::Category(value)
    }
}

impl From<Item> for CatalogNode {
    fn from(value: Item) -> Self {
        CatalogNode::Item(value)
    }
}

/// Container node. Child order is significant (undo restores exact positions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: NodeId,
    name: String,
    children: Vec<CatalogNode>,
}

impl Category {
    pub fn new(name: &str) -> DomainResult<Self> {
        Ok(Self {
            id: NodeId::new(),
            name: validate_name(name)?,
            children: Vec::new(),
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[CatalogNode] {
        &self.children
    }

    /// Append a node. Duplicates are a caller policy, not an error.
    pub fn add_child(&mut self, node: impl Into<CatalogNode>) {
        self.children.push(node.into());
    }

    /// Insert at `index`, or append when `index` is past the end. Returns the final position.
    pub fn insert_child(&mut self, index: usize, node: CatalogNode) -> usize {
        if index <= self.children.len() {
            self.children.insert(index, node);
            index
        } else {
            self.children.push(node);
            self.children.len() - 1
        }
    }

    /// Detach the first direct child with `id`, returning its former index.
    ///
    /// Absent children are a no-op (`None`). The detached node itself is untouched.
    pub fn remove_child(&mut self, id: NodeId) -> Option<(usize, CatalogNode)> {
        let index = self.position_of(id)?;
        Some((index, self.children.remove(index)))
    }

    /// Index of a direct child.
    pub fn position_of(&self, id: NodeId) -> Option<usize> {
        self.children.iter().position(|c| c.id() == id)
    }

    /// Sum of `price * quantity` below this category, saturating at `u64::MAX`.
    pub fn total_value(&self) -> u64 {
        self.children
            .iter()
            .map(CatalogNode::total_value)
            .fold(0, u64::saturating_add)
    }

    pub fn total_stock(&self) -> u64 {
        self.children
            .iter()
            .map(CatalogNode::total_stock)
            .fold(0, u64::saturating_add)
    }

    /// Depth-first, case-insensitive item lookup in children order.
    pub fn find_by_name(&self, name: &str) -> Option<&Item> {
        self.find_item_folded(&fold_case(name))
    }

    fn find_item_folded(&self, needle: &str) -> Option<&Item> {
        self.children.iter().find_map(|child| match child {
            CatalogNode::Item(i) if fold_case(i.name()) == needle => Some(i),
            CatalogNode::Item(_) => None,
            CatalogNode::Category(c) => c.find_item_folded(needle),
        })
    }

    /// Depth-first, case-insensitive category lookup (including `self`).
    pub fn find_category_by_name(&self, name: &str) -> Option<&Category> {
        self.find_category_folded(&fold_case(name))
    }

    fn find_category_folded(&self, needle: &str) -> Option<&Category> {
        if fold_case(&self.name) == needle {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            CatalogNode::Category(c) => c.find_category_folded(needle),
            CatalogNode::Item(_) => None,
        })
    }

    pub fn find_item(&self, id: NodeId) -> Option<&Item> {
        self.children.iter().find_map(|child| match child {
            CatalogNode::Item(i) if i.id() == id => Some(i),
            CatalogNode::Item(_) => None,
            CatalogNode::Category(c) => c.find_item(id),
        })
    }

    pub fn find_item_mut(&mut self, id: NodeId) -> Option<&mut Item> {
        self.children.iter_mut().find_map(|child| match child {
            CatalogNode::Item(i) if i.id() == id => Some(i),
            CatalogNode::Item(_) => None,
            CatalogNode::Category(c) => c.find_item_mut(id),
        })
    }

    /// Category lookup by id (including `self`).
    pub fn find_category(&self, id: NodeId) -> Option<&Category> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            CatalogNode::Category(c) => c.find_category(id),
            CatalogNode::Item(_) => None,
        })
    }

    pub fn find_category_mut(&mut self, id: NodeId) -> Option<&mut Category> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| match child {
            CatalogNode::Category(c) => c.find_category_mut(id),
            CatalogNode::Item(_) => None,
        })
    }

    /// Whether `id` is this category or any node below it.
    pub fn contains(&self, id: NodeId) -> bool {
        self.id == id
            || self.children.iter().any(|child| match child {
                CatalogNode::Category(c) => c.contains(id),
                CatalogNode::Item(i) => i.id() == id,
            })
    }

    /// The category whose direct children include `id`.
    pub fn parent_of(&self, id: NodeId) -> Option<&Category> {
        if self.position_of(id).is_some() {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            CatalogNode::Category(c) => c.parent_of(id),
            CatalogNode::Item(_) => None,
        })
    }

    /// Every item in the subtree, in tree order.
    pub fn items(&self) -> Vec<&Item> {
        let mut out = Vec::new();
        self.walk_items(&mut |i| out.push(i));
        out
    }

    /// Items currently `LowStock` or `OutOfStock`, in tree order.
    pub fn collect_low_stock(&self) -> Vec<&Item> {
        let mut out = Vec::new();
        self.walk_items(&mut |i| {
            if i.state().needs_attention() {
                out.push(i);
            }
        });
        out
    }

    /// Number of categories in the subtree, `self` included.
    pub fn category_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .filter_map(CatalogNode::as_category)
            .map(Category::category_count)
            .sum::<usize>()
    }

    /// Indented, read-only rendering of the subtree.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let _ = writeln!(out, "{indent}Category: {}", self.name);
        for child in &self.children {
            match child {
                CatalogNode::Category(c) => c.render_into(out, depth + 1),
                CatalogNode::Item(i) => {
                    let _ = write!(
                        out,
                        "{indent}  Product: {} | Price: {} | Stock: {} | State: {}",
                        i.name(),
                        i.unit_price(),
                        i.quantity(),
                        i.state()
                    );
                    if let Some(detail) = i.kind().detail() {
                        let _ = write!(out, " | {}: {}", i.kind().tag(), detail);
                    }
                    out.push('\n');
                }
            }
        }
    }

    fn walk_items<'a>(&'a self, f: &mut impl FnMut(&'a Item)) {
        for child in &self.children {
            match child {
                CatalogNode::Item(i) => f(i),
                CatalogNode::Category(c) => c.walk_items(f),
            }
        }
    }
}

/// Full Unicode lowercase, the form names are compared in.
fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemKind, ItemSpec};
    use crate::stock::StockState;
    use proptest::prelude::*;

    fn item(name: &str, price: u64, quantity: u32, threshold: u32) -> Item {
        let spec = ItemSpec::new(name, price, quantity, threshold);
        Item::new(spec, ItemKind::Generic).unwrap()
    }

    fn sample_tree() -> Category {
        let mut electronics = Category::new("Electronics").unwrap();
        let mut computers = Category::new("Computers").unwrap();
        let mut audio = Category::new("Audio").unwrap();

        computers.add_child(item("Laptop", 1200, 10, 5));
        computers.add_child(item("Smartphone", 800, 20, 8));
        audio.add_child(item("Headphones", 150, 2, 5));

        electronics.add_child(computers);
        electronics.add_child(audio);
        electronics
    }

    #[test]
    fn empty_category_totals_are_zero() {
        let c = Category::new("Empty").unwrap();
        assert_eq!(c.total_value(), 0);
        assert_eq!(c.total_stock(), 0);
        assert!(c.collect_low_stock().is_empty());
    }

    #[test]
    fn totals_aggregate_recursively() {
        let tree = sample_tree();
        assert_eq!(tree.total_value(), 1200 * 10 + 800 * 20 + 150 * 2);
        assert_eq!(tree.total_stock(), 32);
    }

    #[test]
    fn find_by_name_is_case_insensitive_depth_first() {
        let tree = sample_tree();
        let found = tree.find_by_name("headphones").unwrap();
        assert_eq!(found.name(), "Headphones");
        assert!(tree.find_by_name("Toaster").is_none());
    }

    #[test]
    fn name_lookups_fold_non_ascii_case() {
        let mut root = Category::new("Ürünler").unwrap();
        let mut kitchen = Category::new("Küche").unwrap();
        kitchen.add_child(item("Ürün", 10, 3, 1));
        root.add_child(kitchen);

        assert_eq!(root.find_by_name("ürün").unwrap().name(), "Ürün");
        assert_eq!(root.find_by_name("ÜRÜN").unwrap().name(), "Ürün");
        let kitchen = root.find_category_by_name("KÜCHE").unwrap();
        assert_eq!(kitchen.name(), "Küche");
        let top = root.find_category_by_name("ürünler").unwrap();
        assert_eq!(top.id(), root.id());
        assert!(root.find_by_name("urun").is_none());
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let mut root = Category::new("Vault").unwrap();
        let mut nested = Category::new("Bullion").unwrap();
        nested.add_child(item("Gold", u64::MAX / 2, 3, 0));
        root.add_child(item("Laptop", 1200, 10, 5));
        root.add_child(nested);

        assert_eq!(root.total_value(), u64::MAX);
        assert_eq!(root.total_stock(), 13);
    }

    #[test]
    fn find_by_name_returns_first_match_in_children_order() {
        let mut root = Category::new("Root").unwrap();
        let mut a = Category::new("A").unwrap();
        let first = item("Mug", 5, 1, 0);
        let first_id = first.id();
        a.add_child(first);
        root.add_child(a);
        root.add_child(item("mug", 9, 1, 0));

        assert_eq!(root.find_by_name("MUG").unwrap().id(), first_id);
    }

    #[test]
    fn collect_low_stock_in_tree_order() {
        let mut tree = sample_tree();
        let laptop_id = tree.find_by_name("Laptop").unwrap().id();
        tree.find_item_mut(laptop_id).unwrap().sell(10).unwrap();

        let names: Vec<&str> = tree.collect_low_stock().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["Laptop", "Headphones"]);
        let laptop = tree.find_item(laptop_id).unwrap();
        assert_eq!(laptop.state(), StockState::OutOfStock);
    }

    #[test]
    fn remove_child_reports_index_and_is_noop_when_absent() {
        let mut c = Category::new("C").unwrap();
        let a = item("A", 1, 1, 0);
        let b = item("B", 1, 1, 0);
        let b_id = b.id();
        c.add_child(a);
        c.add_child(b);

        let (index, node) = c.remove_child(b_id).unwrap();
        assert_eq!(index, 1);
        assert_eq!(node.name(), "B");
        assert!(c.remove_child(b_id).is_none());
        assert_eq!(c.children().len(), 1);
    }

    #[test]
    fn insert_child_appends_when_index_is_out_of_range() {
        let mut c = Category::new("C").unwrap();
        c.add_child(item("A", 1, 1, 0));
        let pos = c.insert_child(7, item("B", 1, 1, 0).into());
        assert_eq!(pos, 1);
        let pos = c.insert_child(0, item("Z", 1, 1, 0).into());
        assert_eq!(pos, 0);
        let names: Vec<&str> = c.children().iter().map(CatalogNode::name).collect();
        assert_eq!(names, vec!["Z", "A", "B"]);
    }

    #[test]
    fn parent_and_containment_lookups() {
        let tree = sample_tree();
        let headphones = tree.find_by_name("Headphones").unwrap().id();
        let audio = tree.find_category_by_name("audio").unwrap();
        let computers = tree.find_category_by_name("Computers").unwrap();

        assert_eq!(tree.parent_of(headphones).unwrap().name(), "Audio");
        assert!(audio.contains(headphones));
        assert!(!computers.contains(headphones));
        assert_eq!(tree.category_count(), 3);
    }

    #[test]
    fn render_does_not_mutate() {
        let tree = sample_tree();
        let before = tree.clone();
        let text = tree.render();
        assert!(text.starts_with("Category: Electronics\n"));
        assert!(text.contains("  Category: Audio\n"));
        let line = "Product: Headphones | Price: 150 | Stock: 2 | State: LowStock";
        assert!(text.contains(line));
        assert_eq!(tree, before);
    }

    proptest! {
        /// Property: category value equals the sum of price * quantity over all items.
        #[test]
        fn total_value_is_sum_of_item_values(
            items in prop::collection::vec((0u64..10_000, 0u32..1_000), 0..20),
            split in 0usize..20,
        ) {
            let mut root = Category::new("Root").unwrap();
            let mut nested = Category::new("Nested").unwrap();
            let mut expected = 0u64;

            for (n, (price, qty)) in items.iter().enumerate() {
                expected += price * u64::from(*qty);
                let it = item(&format!("Item {n}"), *price, *qty, 0);
                if n < split {
                    root.add_child(it);
                } else {
                    nested.add_child(it);
                }
            }
            root.add_child(nested);

            prop_assert_eq!(root.total_value(), expected);
        }
    }
}
