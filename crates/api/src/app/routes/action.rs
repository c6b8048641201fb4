//! `POST /api/action`: every catalog mutation exposed over HTTP.

use std::sync::Arc;

use axum::{Form, Json, extract::Extension, response::IntoResponse};

use stockroom_catalog::{
    AddCategory, AddItem, AddItemType, AdjustStock, CatalogManager, ItemSpec, RemoveItemType,
};
use stockroom_core::{DomainError, DomainResult, NodeId};

use crate::app::dto::{self, Action, ActionRequest, ActionResponse};
use crate::app::errors;
use crate::app::services::AppServices;

pub async fn perform(
    Extension(services): Extension<Arc<AppServices>>,
    Form(req): Form<ActionRequest>,
) -> axum::response::Response {
    let action = match req.action() {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };
    tracing::debug!(?action, "catalog action");

    match services.mutate(|m| apply(m, action, &req)) {
        Ok(applied) => Json(ActionResponse::success(applied.persisted)).into_response(),
        Err(e) => e.into_response(),
    }
}

fn apply(m: &mut CatalogManager, action: Action, req: &ActionRequest) -> DomainResult<()> {
    match action {
        Action::Buy => {
            let id = product_id(m, req)?;
            m.execute_command(AdjustStock::sell(id, req.amount()?))
        }
        Action::Restock => {
            let id = product_id(m, req)?;
            m.execute_command(AdjustStock::restock(id, req.amount()?))
        }
        Action::CreateProduct => {
            let spec = ItemSpec::new(
                dto::required("name", &req.name)?,
                dto::number("price", &req.price)?,
                dto::number("stock", &req.stock)?,
                dto::number("threshold", &req.threshold)?,
            );
            let type_name = dto::required("productType", &req.product_type)?;
            let parent = category_id(m, "parentCategory", &req.parent_category)?;
            let item = m.build_item(type_name, spec, req.detail())?;
            m.execute_command(AddItem::new(parent, item))
        }
        Action::CreateCategory => {
            let name = dto::required("name", &req.name)?;
            let parent = category_id(m, "parentCategory", &req.parent_category)?;
            m.execute_command(AddCategory::new(parent, name))
        }
        Action::RegisterProductType => {
            let type_name = dto::required("typeName", &req.type_name)?;
            let base = dto::required("baseType", &req.base_type)?;
            let factory = m
                .registry()
                .get(base)
                .ok_or_else(|| DomainError::not_found(format!("item type '{base}'")))?;
            m.execute_command(AddItemType::new(type_name, factory))
        }
        Action::RemoveProduct => {
            let id = product_id(m, req)?;
            let command = m.remove_node_command(id)?;
            m.execute_command(command)
        }
        Action::RemoveCategory => {
            let id = category_id(m, "category", &req.category)?;
            let command = m.remove_node_command(id)?;
            m.execute_command(command)
        }
        Action::RemoveProductType => {
            let type_name = dto::required("typeName", &req.type_name)?;
            m.execute_command(RemoveItemType::new(type_name))
        }
        Action::Undo => m.undo_last_command().map(|_| ()),
    }
}

fn product_id(m: &CatalogManager, req: &ActionRequest) -> DomainResult<NodeId> {
    let name = dto::required("product", &req.product)?;
    Ok(m.find_item_by_name(name)?.id())
}

fn category_id(m: &CatalogManager, field: &str, value: &Option<String>) -> DomainResult<NodeId> {
    let name = dto::required(field, value)?;
    Ok(m.find_category_by_name(name)?.id())
}
