use std::sync::Arc;

use axum::{Json, extract::State};

use crate::http_server::{
    error::PageError, forms::ShowForm, http_routes::SubmittedForm, outcome::Mutation,
    state::AppState,
};
use crate::services::show::{NewShow, ShowListing, ShowService};

pub async fn list_shows(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<ShowListing>>, PageError> {
    Ok(Json(ShowService::new(app_state.db.clone()).list().await?))
}

pub async fn create_show_form(State(app_state): State<Arc<AppState>>) -> Json<ShowForm> {
    Json(ShowForm::starting_at(app_state.clock.now()))
}

pub async fn create_show(
    State(app_state): State<Arc<AppState>>,
    SubmittedForm(form): SubmittedForm<ShowForm>,
) -> Mutation {
    let notice = || "Something went wrong! Show could not be submitted!".to_string();

    let new_show = match NewShow::try_from(form) {
        Ok(new_show) => new_show,
        Err(e) => return Mutation::failed(e, notice()),
    };

    match ShowService::new(app_state.db.clone()).create(new_show).await {
        Ok(show) => Mutation::created("Show was successfully listed!".to_string(), show.id, "/"),
        Err(e) => Mutation::failed(e, notice()),
    }
}
