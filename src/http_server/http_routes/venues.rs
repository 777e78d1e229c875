use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::http_server::{
    error::PageError,
    forms::{EditPage, SearchForm, VenueForm},
    http_routes::{RecordId, SubmittedForm},
    outcome::Mutation,
    state::AppState,
};
use crate::services::{
    SearchResults,
    venue::{VenueArea, VenueDetail, VenueInput, VenueService},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueSearchPage {
    pub search_term: String,
    pub results: SearchResults,
}

fn venue_service(app_state: &AppState) -> VenueService {
    VenueService::new(app_state.db.clone())
}

pub async fn list_venues(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<VenueArea>>, PageError> {
    Ok(Json(venue_service(&app_state).list_by_area().await?))
}

pub async fn search_venues(
    State(app_state): State<Arc<AppState>>,
    SubmittedForm(form): SubmittedForm<SearchForm>,
) -> Result<Json<VenueSearchPage>, PageError> {
    let results = venue_service(&app_state)
        .search(&form.search_term, app_state.clock.now())
        .await?;

    Ok(Json(VenueSearchPage {
        search_term: form.search_term,
        results,
    }))
}

pub async fn show_venue(
    State(app_state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<VenueDetail>, PageError> {
    Ok(Json(
        venue_service(&app_state)
            .detail(id, app_state.clock.now())
            .await?,
    ))
}

pub async fn create_venue_form() -> Json<VenueForm> {
    Json(VenueForm::default())
}

pub async fn create_venue(
    State(app_state): State<Arc<AppState>>,
    SubmittedForm(form): SubmittedForm<VenueForm>,
) -> Mutation {
    let input = VenueInput::from(form);
    let name = input.name.clone();

    match venue_service(&app_state).create(input).await {
        Ok(venue) => Mutation::created(
            format!("Venue {} was successfully listed!", venue.name),
            venue.id,
            "/",
        ),
        Err(e) => Mutation::failed(
            e,
            format!("An error occured while listing Venue: {name}. Please try again!"),
        ),
    }
}

pub async fn edit_venue_form(
    State(app_state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<EditPage<VenueForm>>, PageError> {
    let venue = venue_service(&app_state).get(id).await?;

    Ok(Json(EditPage {
        id,
        form: venue.into(),
    }))
}

pub async fn edit_venue(
    State(app_state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    SubmittedForm(form): SubmittedForm<VenueForm>,
) -> Mutation {
    match venue_service(&app_state).update(id, form.into()).await {
        Ok(venue) => Mutation::ok(
            "Venue was successfully updated!".to_string(),
            venue.id,
            format!("/venues/{id}"),
        ),
        Err(e) => Mutation::failed(e, "Venue could not be updated!".to_string()),
    }
}

pub async fn delete_venue(
    State(app_state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Mutation {
    match venue_service(&app_state).delete(id).await {
        Ok(()) => Mutation::ok(
            format!("Venue with ID:{id} was successfully deleted!"),
            id,
            "/venues",
        ),
        Err(e) => Mutation::failed(
            e,
            format!("An error occured. Venue with ID:{id} could not be deleted. Please try again!"),
        ),
    }
}
