use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{FormRejection, PathRejection},
        Path, State,
    },
    Form, Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::RequestContext;
use crate::database::models::ItemView;
use crate::error::ApiError;
use crate::services::NewItem;

#[derive(Debug, Deserialize)]
pub struct CreateItemForm {
    #[serde(rename = "itemSlug", default)]
    pub item_slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub b64data: String,
    pub uploader: Option<String>,
}

/// GET /channel/:slug/item - item slug -> title
pub async fn list(
    State(state): State<AppState>,
    ctx: RequestContext,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<BTreeMap<String, String>>, ApiError> {
    ctx.force_auth()?;
    let Path(slug) = path?;
    Ok(Json(state.channels.list_items(&slug).await?))
}

/// POST /channel/:slug/item - append an item uploaded by the caller.
/// Responds with the new item's path as plain text.
pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    path: Result<Path<String>, PathRejection>,
    form: Result<Form<CreateItemForm>, FormRejection>,
) -> Result<String, ApiError> {
    let identity = ctx.force_auth()?;
    let Path(slug) = path?;
    let Form(form) = form?;

    let new_item = NewItem {
        slug: form.item_slug,
        title: form.title,
        data: form.b64data,
        uploader: form.uploader,
    };
    Ok(state.channels.append_item(&slug, new_item, identity).await?)
}

/// GET /channel/:slug/item/:item_slug - item metadata without payload
pub async fn get(
    State(state): State<AppState>,
    ctx: RequestContext,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<ItemView>, ApiError> {
    ctx.force_auth()?;
    let Path((slug, item_slug)) = path?;
    let item = state.channels.get_item(&slug, &item_slug).await?;
    Ok(Json(item.to_view()))
}

/// GET /channel/:slug/item/:item_slug/data - raw base64 payload as text
pub async fn data(
    State(state): State<AppState>,
    ctx: RequestContext,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<String, ApiError> {
    ctx.force_auth()?;
    let Path((slug, item_slug)) = path?;
    Ok(state.channels.get_item_data(&slug, &item_slug).await?)
}
