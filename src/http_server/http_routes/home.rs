use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::http_server::{error::PageError, state::AppState};
use crate::services::{artist::ArtistService, show::ShowService, venue::VenueService};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomePage {
    pub name: String,
    pub venues: u64,
    pub artists: u64,
    pub shows: u64,
}

pub async fn home(State(app_state): State<Arc<AppState>>) -> Result<Json<HomePage>, PageError> {
    let db = app_state.db.clone();

    Ok(Json(HomePage {
        name: env!("CARGO_PKG_NAME").to_string(),
        venues: VenueService::new(db.clone()).count().await?,
        artists: ArtistService::new(db.clone()).count().await?,
        shows: ShowService::new(db).count().await?,
    }))
}
