use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::http_server::{
    error::PageError,
    forms::{ArtistForm, EditPage, SearchForm},
    http_routes::{RecordId, SubmittedForm},
    outcome::Mutation,
    state::AppState,
};
use crate::services::{
    SearchResults, Summary,
    artist::{ArtistDetail, ArtistInput, ArtistService},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistSearchPage {
    pub search_term: String,
    pub results: SearchResults,
}

fn artist_service(app_state: &AppState) -> ArtistService {
    ArtistService::new(app_state.db.clone())
}

pub async fn list_artists(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Summary>>, PageError> {
    Ok(Json(artist_service(&app_state).list().await?))
}

pub async fn search_artists(
    State(app_state): State<Arc<AppState>>,
    SubmittedForm(form): SubmittedForm<SearchForm>,
) -> Result<Json<ArtistSearchPage>, PageError> {
    let results = artist_service(&app_state)
        .search(&form.search_term, app_state.clock.now())
        .await?;

    Ok(Json(ArtistSearchPage {
        search_term: form.search_term,
        results,
    }))
}

pub async fn show_artist(
    State(app_state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<ArtistDetail>, PageError> {
    Ok(Json(
        artist_service(&app_state)
            .detail(id, app_state.clock.now())
            .await?,
    ))
}

pub async fn create_artist_form() -> Json<ArtistForm> {
    Json(ArtistForm::default())
}

pub async fn create_artist(
    State(app_state): State<Arc<AppState>>,
    SubmittedForm(form): SubmittedForm<ArtistForm>,
) -> Mutation {
    let input = ArtistInput::from(form);
    let name = input.name.clone();

    match artist_service(&app_state).create(input).await {
        Ok(artist) => Mutation::created(
            format!("Artist {} was successfully listed!", artist.name),
            artist.id,
            "/",
        ),
        Err(e) => Mutation::failed(
            e,
            format!("An error occured while listing Artist: {name}. Please try again!"),
        ),
    }
}

pub async fn edit_artist_form(
    State(app_state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<EditPage<ArtistForm>>, PageError> {
    let artist = artist_service(&app_state).get(id).await?;

    Ok(Json(EditPage {
        id,
        form: artist.into(),
    }))
}

pub async fn edit_artist(
    State(app_state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    SubmittedForm(form): SubmittedForm<ArtistForm>,
) -> Mutation {
    match artist_service(&app_state).update(id, form.into()).await {
        Ok(artist) => Mutation::ok(
            "Artist was successfully updated!".to_string(),
            artist.id,
            format!("/artists/{id}"),
        ),
        Err(e) => Mutation::failed(e, "Artist could not be updated!".to_string()),
    }
}

pub async fn delete_artist(
    State(app_state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Mutation {
    match artist_service(&app_state).delete(id).await {
        Ok(()) => Mutation::ok(
            format!("Artist with ID:{id} was successfully deleted!"),
            id,
            "/artists",
        ),
        Err(e) => Mutation::failed(
            e,
            format!(
                "An error occured. Artist with ID:{id} could not be deleted. Please try again!"
            ),
        ),
    }
}
