use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{FormRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Form, Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::RequestContext;
use crate::database::models::ChannelView;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateChannelForm {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
}

/// GET /channel - slug -> title for every channel
pub async fn list(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<BTreeMap<String, String>>, ApiError> {
    ctx.force_auth()?;
    Ok(Json(state.channels.list_channels().await?))
}

/// POST /channel - create an empty channel owned by the caller
pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    form: Result<Form<CreateChannelForm>, FormRejection>,
) -> Result<StatusCode, ApiError> {
    let identity = ctx.force_auth()?;
    let Form(form) = form?;

    state
        .channels
        .create_channel(&form.slug, &form.title, Some(identity))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /channel/:slug - channel record with item summaries
pub async fn get(
    State(state): State<AppState>,
    ctx: RequestContext,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ChannelView>, ApiError> {
    ctx.force_auth()?;
    let Path(slug) = path?;
    let channel = state.channels.get_channel(&slug).await?;
    Ok(Json(channel.to_view()))
}
