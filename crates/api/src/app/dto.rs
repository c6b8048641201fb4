use serde::{Deserialize, Serialize};

use stockroom_catalog::{CatalogNode, Category, Item, StockState};
use stockroom_core::{DomainError, DomainResult};

// -------------------------
// Request DTOs
// -------------------------

/// Form body of `POST /api/action`. Every field is optional at the wire level;
/// each action checks the ones it needs.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    #[serde(rename = "type")]
    pub action: Option<String>,
    pub product: Option<String>,
    pub amount: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
    pub stock: Option<String>,
    pub threshold: Option<String>,
    pub product_type: Option<String>,
    pub parent_category: Option<String>,
    pub specific_param: Option<String>,
    pub category: Option<String>,
    pub type_name: Option<String>,
    pub base_type: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Buy,
    Restock,
    CreateProduct,
    CreateCategory,
    RegisterProductType,
    RemoveProduct,
    RemoveCategory,
    RemoveProductType,
    Undo,
}

impl Action {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        Ok(match raw.trim() {
            "buy" => Action::Buy,
            "restock" => Action::Restock,
            "create_product" => Action::CreateProduct,
            "create_category" => Action::CreateCategory,
            "register_product_type" => Action::RegisterProductType,
            "remove_product" => Action::RemoveProduct,
            "remove_category" => Action::RemoveCategory,
            "remove_product_type" => Action::RemoveProductType,
            "undo" => Action::Undo,
            other => return Err(DomainError::validation(format!("unknown action '{other}'"))),
        })
    }
}

impl ActionRequest {
    pub fn action(&self) -> DomainResult<Action> {
        Action::parse(self.action.as_deref().unwrap_or_default())
    }

    /// `amount`, defaulting to 1 when absent.
    pub fn amount(&self) -> DomainResult<u32> {
        match non_blank(&self.amount) {
            Some(raw) => parse_number("amount", raw),
            None => Ok(1),
        }
    }

    /// `specificParam`, if given and non-blank.
    pub fn detail(&self) -> Option<&str> {
        non_blank(&self.specific_param)
    }
}

/// A non-blank text field.
pub fn required<'a>(field: &str, value: &'a Option<String>) -> DomainResult<&'a str> {
    non_blank(value)
        .ok_or_else(|| DomainError::validation(format!("missing field '{field}'")))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// A required non-negative integer field.
pub fn number<T: std::str::FromStr>(field: &str, value: &Option<String>) -> DomainResult<T> {
    parse_number(field, required(field, value)?)
}

fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> DomainResult<T> {
    raw.parse().map_err(|_| {
        let message = format!("{field} must be a non-negative integer, got '{raw}'");
        DomainError::validation(message)
    })
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub status: &'static str,
    pub persisted: bool,
}

impl ActionResponse {
    pub fn success(persisted: bool) -> Self {
        Self {
            status: "success",
            persisted,
        }
    }
}

/// One node of the catalog tree as rendered by `GET /api/inventory`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeDto {
    Category {
        id: String,
        name: String,
        children: Vec<NodeDto>,
    },
    #[serde(rename = "product")]
    Product {
        id: String,
        name: String,
        price: u64,
        quantity: u32,
        threshold: u32,
        state: StockState,
        kind: &'static str,
        detail: Option<String>,
    },
}

impl NodeDto {
    pub fn from_category(category: &Category) -> Self {
        NodeDto::Category {
            id: category.id().to_string(),
            name: category.name().to_string(),
            children: category
                .children()
                .iter()
                .map(NodeDto::from_node)
                .collect(),
        }
    }

    pub fn from_item(item: &Item) -> Self {
        NodeDto::Product {
            id: item.id().to_string(),
            name: item.name().to_string(),
            price: item.unit_price(),
            quantity: item.quantity(),
            threshold: item.reorder_threshold(),
            state: item.state(),
            kind: item.kind().tag(),
            detail: item.kind().detail(),
        }
    }

    fn from_node(node: &CatalogNode) -> Self {
        match node {
            CatalogNode::Category(c) => NodeDto::from_category(c),
            CatalogNode::Item(i) => NodeDto::from_item(i),
        }
    }
}
