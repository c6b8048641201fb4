//! Line-oriented flat record format for a catalog tree.
//!
//! ```text
//! C,<name>,<parentName|null>
//! P,<name>,<price>,<quantity>,<threshold>,<parentName>,<typeTag>[,<detail>]
//! ```
//!
//! Records are written depth-first in child order, so a parent always precedes its
//! children. Names are resolved against categories already seen; when two categories
//! share a name the most recent one wins. The format has no escaping, which is why
//! node names may not contain `,` or line breaks.

use std::collections::HashMap;
use std::fmt::Write as _;

use stockroom_catalog::{
    CatalogNode, Category, FactoryRegistry, GenericFactory, ItemFactory, ItemSpec,
};
use stockroom_core::{DomainError, NodeId};

use crate::store::PersistenceError;

const CATEGORY: &str = "C";
const PRODUCT: &str = "P";
const NO_PARENT: &str = "null";

/// Encode the whole tree rooted at `root`.
pub fn encode(root: &Category) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{CATEGORY},{},{NO_PARENT}", root.name());
    encode_children(root, &mut out);
    out
}

fn encode_children(parent: &Category, out: &mut String) {
    for child in parent.children() {
        match child {
            CatalogNode::Category(c) => {
                let _ = writeln!(out, "{CATEGORY},{},{}", c.name(), parent.name());
                encode_children(c, out);
            }
            CatalogNode::Item(i) => {
                let _ = write!(
                    out,
                    "{PRODUCT},{},{},{},{},{},{}",
                    i.name(),
                    i.unit_price(),
                    i.quantity(),
                    i.reorder_threshold(),
                    parent.name(),
                    i.kind().tag()
                );
                if let Some(detail) = i.kind().detail() {
                    let _ = write!(out, ",{detail}");
                }
                out.push('\n');
            }
        }
    }
}

/// Rebuild a tree from its encoded form.
///
/// Item type tags are looked up in `registry`; unknown tags fall back to a generic
/// item. Records naming a parent that has not been seen yet are skipped.
pub fn decode(text: &str, registry: &FactoryRegistry) -> Result<Category, PersistenceError> {
    let mut root: Option<Category> = None;
    let mut categories: HashMap<String, NodeId> = HashMap::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let record = raw.trim();
        if record.is_empty() {
            continue;
        }
        let fields: Vec<&str> = record.split(',').map(str::trim).collect();

        match fields[0] {
            CATEGORY => {
                if fields.len() < 3 {
                    return Err(malformed(line, "category record needs 3 fields"));
                }
                let category = Category::new(fields[1]).map_err(|e| domain(line, e))?;
                let (name, id) = (category.name().to_string(), category.id());

                if fields[2] == NO_PARENT {
                    if root.is_some() {
                        return Err(malformed(line, "second root category"));
                    }
                    root = Some(category);
                } else {
                    let Some(parent) = parent_mut(&mut root, &categories, fields[2]) else {
                        tracing::warn!(
                            line,
                            parent = fields[2],
                            "skipping category with unknown parent"
                        );
                        continue;
                    };
                    parent.add_child(category);
                }
                categories.insert(name, id);
            }
            PRODUCT => {
                if fields.len() < 7 {
                    return Err(malformed(line, "product record needs at least 7 fields"));
                }
                let spec = ItemSpec::new(
                    fields[1],
                    number(line, "price", fields[2])?,
                    number(line, "quantity", fields[3])?,
                    number(line, "threshold", fields[4])?,
                );
                let detail = fields.get(7).copied();
                let tag = fields[6];

                let item = match registry.get(tag) {
                    Some(factory) => factory.create(spec, detail),
                    None => {
                        tracing::warn!(line, tag, "unknown item type; loading as generic");
                        GenericFactory.create(spec, None)
                    }
                }
                .map_err(|e| domain(line, e))?;

                let Some(parent) = parent_mut(&mut root, &categories, fields[5]) else {
                    tracing::warn!(
                        line,
                        parent = fields[5],
                        "skipping product with unknown parent"
                    );
                    continue;
                };
                parent.add_child(item);
            }
            other => return Err(malformed(line, format!("unknown record type '{other}'"))),
        }
    }

    root.ok_or(PersistenceError::MissingRoot)
}

fn parent_mut<'a>(
    root: &'a mut Option<Category>,
    categories: &HashMap<String, NodeId>,
    name: &str,
) -> Option<&'a mut Category> {
    let id = *categories.get(name)?;
    root.as_mut()?.find_category_mut(id)
}

fn number<T: std::str::FromStr>(
    line: usize,
    field: &str,
    value: &str,
) -> Result<T, PersistenceError> {
    value.parse().map_err(|_| {
        let reason = format!("{field} '{value}' is not a non-negative integer");
        malformed(line, reason)
    })
}

fn malformed(line: usize, reason: impl Into<String>) -> PersistenceError {
    PersistenceError::Malformed {
        line,
        reason: reason.into(),
    }
}

fn domain(line: usize, err: DomainError) -> PersistenceError {
    malformed(line, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_catalog::{ItemKind, StockState};

    fn sample() -> Category {
        let registry = FactoryRegistry::with_defaults();
        let mut root = Category::new("Global Inventory").unwrap();
        let mut electronics = Category::new("Electronics").unwrap();
        let mut audio = Category::new("Audio").unwrap();
        let mut apparel = Category::new("Apparel").unwrap();

        let laptop = ItemSpec::new("Laptop", 1200, 10, 5);
        let laptop = registry.create("electronic", laptop, Some("24")).unwrap();
        let headphones = ItemSpec::new("Headphones", 150, 2, 5);
        let headphones = registry.create("electronic", headphones, None).unwrap();
        let shirt = ItemSpec::new("T-Shirt", 30, 15, 5);
        let shirt = registry.create("apparel", shirt, Some("M")).unwrap();
        let card = ItemSpec::new("Gift Card", 25, 0, 0);
        let card = registry.create("generic", card, None).unwrap();

        electronics.add_child(laptop);
        audio.add_child(headphones);
        electronics.add_child(audio);
        apparel.add_child(shirt);
        apparel.add_child(card);
        root.add_child(electronics);
        root.add_child(apparel);
        root
    }

    #[test]
    fn encodes_parents_before_children() {
        let text = encode(&sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "C,Global Inventory,null",
                "C,Electronics,Global Inventory",
                "P,Laptop,1200,10,5,Electronics,electronic,24",
                "C,Audio,Electronics",
                "P,Headphones,150,2,5,Audio,electronic,0",
                "C,Apparel,Global Inventory",
                "P,T-Shirt,30,15,5,Apparel,apparel,M",
                "P,Gift Card,25,0,0,Apparel,generic",
            ]
        );
    }

    #[test]
    fn save_then_load_reproduces_the_tree() {
        let original = sample();
        let registry = FactoryRegistry::with_defaults();
        let loaded = decode(&encode(&original), &registry).unwrap();

        assert_eq!(loaded.render(), original.render());
        assert_eq!(loaded.total_value(), original.total_value());
        let laptop = loaded.find_by_name("laptop").unwrap();
        let warranty_months = 24;
        assert_eq!(laptop.kind(), &ItemKind::Electronic { warranty_months });
        let card = loaded.find_by_name("Gift Card").unwrap();
        assert_eq!(card.state(), StockState::OutOfStock);
    }

    #[test]
    fn unknown_type_tag_falls_back_to_generic() {
        let text = "C,Root,null\nP,Chair,40,3,1,Root,furniture,oak\n";
        let root = decode(text, &FactoryRegistry::with_defaults()).unwrap();
        let chair = root.find_by_name("Chair").unwrap();
        assert_eq!(chair.kind(), &ItemKind::Generic);
        assert_eq!(chair.quantity(), 3);
    }

    #[test]
    fn blank_lines_and_crlf_are_tolerated() {
        let text = "C,Root,null\r\n\r\nC,Tools,Root\r\nP,Hammer,12,4,2,Tools,generic\r\n";
        let root = decode(text, &FactoryRegistry::with_defaults()).unwrap();
        let tools = root.find_category_by_name("Tools").unwrap();
        assert_eq!(tools.children().len(), 1);
    }

    #[test]
    fn unknown_parent_is_skipped() {
        let text = "C,Root,null\n\
                    P,Orphan,1,1,1,Nowhere,generic\n\
                    C,Lost,Missing\n\
                    P,Kept,1,1,1,Root,generic\n";
        let root = decode(text, &FactoryRegistry::with_defaults()).unwrap();
        let names: Vec<&str> = root.children().iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["Kept"]);
    }

    #[test]
    fn bad_numbers_are_malformed_with_line() {
        let text = "C,Root,null\nP,Lamp,ten,1,1,Root,generic\n";
        match decode(text, &FactoryRegistry::with_defaults()).unwrap_err() {
            PersistenceError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("Expected Malformed, got {other:?}"),
        }

        let negative = "C,Root,null\nP,Lamp,10,-1,1,Root,generic\n";
        assert!(matches!(
            decode(negative, &FactoryRegistry::with_defaults()),
            Err(PersistenceError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn short_records_and_unknown_kinds_are_malformed() {
        let registry = FactoryRegistry::with_defaults();
        assert!(matches!(
            decode("C,Root\n", &registry),
            Err(PersistenceError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            decode("C,Root,null\nP,Lamp,1,1\n", &registry),
            Err(PersistenceError::Malformed { line: 2, .. })
        ));
        assert!(matches!(
            decode("C,Root,null\nX,what\n", &registry),
            Err(PersistenceError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn second_root_and_missing_root() {
        let registry = FactoryRegistry::with_defaults();
        assert!(matches!(
            decode("C,A,null\nC,B,null\n", &registry),
            Err(PersistenceError::Malformed { line: 2, .. })
        ));
        let empty = decode("", &registry);
        assert!(matches!(empty, Err(PersistenceError::MissingRoot)));
        assert!(matches!(
            decode("C,Child,Parent\n", &registry),
            Err(PersistenceError::MissingRoot)
        ));
    }

    #[test]
    fn duplicate_category_names_resolve_to_latest() {
        let text = "C,Root,null\nC,Misc,Root\nC,Misc,Root\nP,Tape,2,9,1,Misc,generic\n";
        let root = decode(text, &FactoryRegistry::with_defaults()).unwrap();
        let stocked: Vec<usize> = root
            .children()
            .iter()
            .filter_map(|n| n.as_category())
            .map(|c| c.children().len())
            .collect();
        assert_eq!(stocked, vec![0, 1]);
    }
}
