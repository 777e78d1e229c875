use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::entities;
use crate::error::{BookingError, BookingResult};
use crate::services::query::matches_search;
use crate::services::schedule::{format_start_time, partition};
use crate::services::{
    SearchHit, SearchResults, Summary, decode_genres, encode_genres, require_name,
};

const ENTITY: &str = "Venue";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_talent_description: Option<String>,
    pub facebook_link: Option<String>,
}

impl From<entities::venue::Model> for Venue {
    fn from(model: entities::venue::Model) -> Self {
        Self {
            genres: decode_genres(&model.genres),
            id: model.id,
            name: model.name,
            city: model.city,
            state: model.state,
            address: model.address,
            phone: model.phone,
            image_link: model.image_link,
            website: model.website,
            seeking_talent: model.seeking_talent,
            seeking_talent_description: model.seeking_talent_description,
            facebook_link: model.facebook_link,
        }
    }
}

/// Every mutable venue field, as submitted on create and edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueInput {
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_talent_description: Option<String>,
    pub facebook_link: Option<String>,
}

impl VenueInput {
    fn write_to(self, active: &mut entities::venue::ActiveModel) {
        active.name = Set(self.name);
        active.city = Set(self.city);
        active.state = Set(self.state);
        active.address = Set(self.address);
        active.phone = Set(self.phone);
        active.genres = Set(encode_genres(&self.genres));
        active.image_link = Set(self.image_link);
        active.website = Set(self.website);
        active.seeking_talent = Set(self.seeking_talent);
        active.seeking_talent_description = Set(self.seeking_talent_description);
        active.facebook_link = Set(self.facebook_link);
    }
}

/// Venues sharing one (city, state) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueArea {
    pub city: Option<String>,
    pub state: Option<String>,
    pub venues: Vec<Summary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueShow {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<VenueShow>,
    pub upcoming_shows: Vec<VenueShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub struct VenueService {
    db: Arc<Database>,
}

impl VenueService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn count(&self) -> BookingResult<u64> {
        Ok(entities::venue::Entity::find().count(&self.db.conn).await?)
    }

    /// Groups every venue by its (city, state) pair. Groups come back ordered by
    /// state then city, venues within a group by name.
    pub async fn list_by_area(&self) -> BookingResult<Vec<VenueArea>> {
        let venues = entities::venue::Entity::find()
            .order_by_asc(entities::venue::Column::State)
            .order_by_asc(entities::venue::Column::City)
            .order_by_asc(entities::venue::Column::Name)
            .order_by_asc(entities::venue::Column::Id)
            .all(&self.db.conn)
            .await?;

        let mut areas: Vec<VenueArea> = Vec::new();
        for venue in venues {
            let summary = Summary {
                id: venue.id,
                name: venue.name,
            };
            match areas.last_mut() {
                Some(area) if area.city == venue.city && area.state == venue.state => {
                    area.venues.push(summary);
                }
                _ => areas.push(VenueArea {
                    city: venue.city,
                    state: venue.state,
                    venues: vec![summary],
                }),
            }
        }

        log::debug!("Listed venues in {} areas", areas.len());
        Ok(areas)
    }

    pub async fn search(
        &self,
        search_term: &str,
        now: DateTime<Utc>,
    ) -> BookingResult<SearchResults> {
        log::debug!("Searching venues for '{}'", search_term);

        let venues: Vec<(i64, String)> = entities::venue::Entity::find()
            .select_only()
            .column(entities::venue::Column::Id)
            .column(entities::venue::Column::Name)
            .order_by_asc(entities::venue::Column::Name)
            .order_by_asc(entities::venue::Column::Id)
            .into_tuple()
            .all(&self.db.conn)
            .await?;

        let upcoming: HashMap<i64, i64> = entities::show::Entity::find()
            .select_only()
            .column(entities::show::Column::VenueId)
            .column_as(entities::show::Column::Id.count(), "upcoming")
            .filter(entities::show::Column::ShowDate.gt(now))
            .group_by(entities::show::Column::VenueId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db.conn)
            .await?
            .into_iter()
            .collect();

        let hits = venues
            .into_iter()
            .filter(|(_, name)| matches_search(name, search_term))
            .map(|(id, name)| SearchHit {
                num_upcoming_shows: upcoming.get(&id).map_or(0, |count| *count as u64),
                id,
                name,
            })
            .collect();

        Ok(SearchResults::new(hits))
    }

    pub async fn get(&self, id: i64) -> BookingResult<Venue> {
        entities::venue::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .map(Venue::from)
            .ok_or_else(|| BookingError::not_found(ENTITY, id))
    }

    pub async fn detail(&self, id: i64, now: DateTime<Utc>) -> BookingResult<VenueDetail> {
        let venue = self.get(id).await?;

        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::VenueId.eq(id))
            .order_by_asc(entities::show::Column::ShowDate)
            .find_also_related(entities::artist::Entity)
            .all(&self.db.conn)
            .await?;

        let entries = shows.into_iter().filter_map(|(show, artist)| {
            let artist = artist?;
            Some((
                show.show_date,
                VenueShow {
                    artist_id: artist.id,
                    artist_name: artist.name,
                    artist_image_link: artist.image_link,
                    start_time: format_start_time(&show.show_date),
                },
            ))
        });
        let (past_shows, upcoming_shows) = partition(entries, &now);

        Ok(VenueDetail {
            id: venue.id,
            name: venue.name,
            genres: venue.genres,
            address: venue.address,
            city: venue.city,
            state: venue.state,
            phone: venue.phone,
            website: venue.website,
            facebook_link: venue.facebook_link,
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_talent_description,
            image_link: venue.image_link,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        })
    }

    pub async fn create(&self, input: VenueInput) -> BookingResult<Venue> {
        require_name(&input.name)?;
        log::debug!("Creating venue: '{}'", input.name);

        let mut venue: entities::venue::ActiveModel = ActiveModelTrait::default();
        input.write_to(&mut venue);

        let txn = self.db.conn.begin().await?;
        let model = venue.insert(&txn).await?;
        txn.commit().await?;

        log::info!("Venue created: '{}' (ID: {})", model.name, model.id);
        Ok(model.into())
    }

    /// Overwrites every mutable field of venue `id`.
    pub async fn update(&self, id: i64, input: VenueInput) -> BookingResult<Venue> {
        require_name(&input.name)?;

        let txn = self.db.conn.begin().await?;
        let existing = entities::venue::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| BookingError::not_found(ENTITY, id))?;

        let mut venue: entities::venue::ActiveModel = existing.into();
        input.write_to(&mut venue);
        let model = venue.update(&txn).await?;
        txn.commit().await?;

        log::info!("Venue updated: '{}' (ID: {})", model.name, id);
        Ok(model.into())
    }

    /// Deletes venue `id` together with its shows.
    pub async fn delete(&self, id: i64) -> BookingResult<()> {
        let txn = self.db.conn.begin().await?;
        let result = entities::venue::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(BookingError::not_found(ENTITY, id));
        }
        txn.commit().await?;

        log::info!("Venue deleted (ID: {})", id);
        Ok(())
    }
}
