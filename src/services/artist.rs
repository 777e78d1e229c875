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

const ENTITY: &str = "Artist";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_venue_description: Option<String>,
}

impl From<entities::artist::Model> for Artist {
    fn from(model: entities::artist::Model) -> Self {
        Self {
            genres: decode_genres(&model.genres),
            id: model.id,
            name: model.name,
            city: model.city,
            state: model.state,
            phone: model.phone,
            image_link: model.image_link,
            website: model.website,
            facebook_link: model.facebook_link,
            seeking_venue: model.seeking_venue,
            seeking_venue_description: model.seeking_venue_description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistInput {
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_venue_description: Option<String>,
}

impl ArtistInput {
    fn write_to(self, active: &mut entities::artist::ActiveModel) {
        active.name = Set(self.name);
        active.city = Set(self.city);
        active.state = Set(self.state);
        active.phone = Set(self.phone);
        active.genres = Set(encode_genres(&self.genres));
        active.image_link = Set(self.image_link);
        active.website = Set(self.website);
        active.facebook_link = Set(self.facebook_link);
        active.seeking_venue = Set(self.seeking_venue);
        active.seeking_venue_description = Set(self.seeking_venue_description);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistShow {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<ArtistShow>,
    pub upcoming_shows: Vec<ArtistShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub struct ArtistService {
    db: Arc<Database>,
}

impl ArtistService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn count(&self) -> BookingResult<u64> {
        Ok(entities::artist::Entity::find().count(&self.db.conn).await?)
    }

    pub async fn list(&self) -> BookingResult<Vec<Summary>> {
        let artists = entities::artist::Entity::find()
            .order_by_asc(entities::artist::Column::Name)
            .order_by_asc(entities::artist::Column::Id)
            .all(&self.db.conn)
            .await?;

        Ok(artists
            .into_iter()
            .map(|a| Summary {
                id: a.id,
                name: a.name,
            })
            .collect())
    }

    pub async fn search(
        &self,
        search_term: &str,
        now: DateTime<Utc>,
    ) -> BookingResult<SearchResults> {
        log::debug!("Searching artists for '{}'", search_term);

        let artists: Vec<(i64, String)> = entities::artist::Entity::find()
            .select_only()
            .column(entities::artist::Column::Id)
            .column(entities::artist::Column::Name)
            .order_by_asc(entities::artist::Column::Name)
            .order_by_asc(entities::artist::Column::Id)
            .into_tuple()
            .all(&self.db.conn)
            .await?;

        let upcoming: HashMap<i64, i64> = entities::show::Entity::find()
            .select_only()
            .column(entities::show::Column::ArtistId)
            .column_as(entities::show::Column::Id.count(), "upcoming")
            .filter(entities::show::Column::ShowDate.gt(now))
            .group_by(entities::show::Column::ArtistId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db.conn)
            .await?
            .into_iter()
            .collect();

        let hits = artists
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

    pub async fn get(&self, id: i64) -> BookingResult<Artist> {
        entities::artist::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .map(Artist::from)
            .ok_or_else(|| BookingError::not_found(ENTITY, id))
    }

    pub async fn detail(&self, id: i64, now: DateTime<Utc>) -> BookingResult<ArtistDetail> {
        let artist = self.get(id).await?;

        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::ArtistId.eq(id))
            .order_by_asc(entities::show::Column::ShowDate)
            .find_also_related(entities::venue::Entity)
            .all(&self.db.conn)
            .await?;

        let entries = shows.into_iter().filter_map(|(show, venue)| {
            let venue = venue?;
            Some((
                show.show_date,
                ArtistShow {
                    venue_id: venue.id,
                    venue_name: venue.name,
                    venue_image_link: venue.image_link,
                    start_time: format_start_time(&show.show_date),
                },
            ))
        });
        let (past_shows, upcoming_shows) = partition(entries, &now);

        Ok(ArtistDetail {
            id: artist.id,
            name: artist.name,
            genres: artist.genres,
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            website: artist.website,
            facebook_link: artist.facebook_link,
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_venue_description,
            image_link: artist.image_link,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        })
    }

    pub async fn create(&self, input: ArtistInput) -> BookingResult<Artist> {
        require_name(&input.name)?;
        log::debug!("Creating artist: '{}'", input.name);

        let mut artist: entities::artist::ActiveModel = ActiveModelTrait::default();
        input.write_to(&mut artist);

        let txn = self.db.conn.begin().await?;
        let model = artist.insert(&txn).await?;
        txn.commit().await?;

        log::info!("Artist created: '{}' (ID: {})", model.name, model.id);
        Ok(model.into())
    }

    pub async fn update(&self, id: i64, input: ArtistInput) -> BookingResult<Artist> {
        require_name(&input.name)?;

        let txn = self.db.conn.begin().await?;
        let existing = entities::artist::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| BookingError::not_found(ENTITY, id))?;

        let mut artist: entities::artist::ActiveModel = existing.into();
        input.write_to(&mut artist);
        let model = artist.update(&txn).await?;
        txn.commit().await?;

        log::info!("Artist updated: '{}' (ID: {})", model.name, id);
        Ok(model.into())
    }

    /// Deletes artist `id` together with its shows.
    pub async fn delete(&self, id: i64) -> BookingResult<()> {
        let txn = self.db.conn.begin().await?;
        let result = entities::artist::Entity::delete_by_id(id)
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(BookingError::not_found(ENTITY, id));
        }
        txn.commit().await?;

        log::info!("Artist deleted (ID: {})", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::show::{NewShow, ShowService};
    use crate::services::venue::{VenueInput, VenueService};
    use crate::test_utils::test_db;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 15, 18, 0, 0).unwrap()
    }

    fn input(name: &str) -> ArtistInput {
        ArtistInput {
            name: name.into(),
            city: Some("San Francisco".into()),
            state: Some("CA".into()),
            phone: Some("326-123-5000".into()),
            genres: vec!["Rock n Roll".into()],
            image_link: Some("https://example.com/artist.png".into()),
            website: Some("https://www.gunsnpetalsband.com".into()),
            facebook_link: Some("https://www.facebook.com/GunsNPetals".into()),
            seeking_venue: true,
            seeking_venue_description: Some("Looking for shows in the Bay Area".into()),
        }
    }

    async fn insert_venue(db: &Arc<Database>, name: &str) -> i64 {
        VenueService::new(db.clone())
            .create(VenueInput {
                name: name.into(),
                image_link: Some("https://example.com/venue.png".into()),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = test_db().await;
        let service = ArtistService::new(db);

        let created = service.create(input("Guns N Petals")).await.unwrap();
        let fetched = service.get(created.id).await.unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.genres, vec!["Rock n Roll"]);
        assert!(fetched.seeking_venue);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let db = test_db().await;
        let service = ArtistService::new(db);

        service.create(input("The Wild Sax Band")).await.unwrap();
        service.create(input("Guns N Petals")).await.unwrap();
        service.create(input("Matt Quevedo")).await.unwrap();

        let names: Vec<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Guns N Petals", "Matt Quevedo", "The Wild Sax Band"]);
    }

    #[tokio::test]
    async fn test_update_only_touches_target() {
        let db = test_db().await;
        let service = ArtistService::new(db);

        let first = service.create(input("Guns N Petals")).await.unwrap();
        let second = service.create(input("Matt Quevedo")).await.unwrap();

        let mut changes = input("Guns N Roses");
        changes.seeking_venue = false;
        changes.seeking_venue_description = None;
        let updated = service.update(first.id, changes).await.unwrap();

        assert_eq!(updated.name, "Guns N Roses");
        assert!(!updated.seeking_venue);
        assert!(updated.seeking_venue_description.is_none());
        assert_eq!(service.get(second.id).await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_name() {
        let db = test_db().await;
        let service = ArtistService::new(db);

        let artist = service.create(input("Guns N Petals")).await.unwrap();
        let result = service.update(artist.id, input("")).await;

        assert!(matches!(result, Err(BookingError::Validation(_))));
        assert_eq!(service.get(artist.id).await.unwrap(), artist);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let service = ArtistService::new(db);

        let artist = service.create(input("Guns N Petals")).await.unwrap();
        service.delete(artist.id).await.unwrap();

        assert!(matches!(
            service.get(artist.id).await,
            Err(BookingError::NotFound { entity: "Artist", .. })
        ));
    }

    #[tokio::test]
    async fn test_search_folds_accented_letters() {
        let db = test_db().await;
        let service = ArtistService::new(db);

        let artist = service.create(input("Édith Piaf")).await.unwrap();
        service.create(input("Matt Quevedo")).await.unwrap();

        let results = service.search("ÉDITH", now()).await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].id, artist.id);

        let results = service.search("édith", now()).await.unwrap();
        assert_eq!(results.count, 1);
    }

    #[tokio::test]
    async fn test_search_counts_only_own_upcoming_shows() {
        let db = test_db().await;
        let service = ArtistService::new(db.clone());
        let shows = ShowService::new(db.clone());

        let petals = service.create(input("Guns N Petals")).await.unwrap();
        let other = service.create(input("Matt Quevedo")).await.unwrap();
        let venue_id = insert_venue(&db, "The Musical Hop").await;

        shows
            .create(NewShow {
                venue_id,
                artist_id: petals.id,
                show_date: now() + Duration::days(1),
            })
            .await
            .unwrap();
        shows
            .create(NewShow {
                venue_id,
                artist_id: other.id,
                show_date: now() + Duration::days(2),
            })
            .await
            .unwrap();
        shows
            .create(NewShow {
                venue_id,
                artist_id: petals.id,
                show_date: now() - Duration::days(2),
            })
            .await
            .unwrap();

        let results = service.search("petals", now()).await.unwrap();

        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].id, petals.id);
        assert_eq!(results.data[0].num_upcoming_shows, 1);
    }

    #[tokio::test]
    async fn test_detail_uses_show_venue() {
        let db = test_db().await;
        let service = ArtistService::new(db.clone());
        let shows = ShowService::new(db.clone());

        let artist = service.create(input("Guns N Petals")).await.unwrap();
        let hop = insert_venue(&db, "The Musical Hop").await;
        let park = insert_venue(&db, "Park Square Live").await;

        shows
            .create(NewShow {
                venue_id: hop,
                artist_id: artist.id,
                show_date: now() - Duration::days(30),
            })
            .await
            .unwrap();
        shows
            .create(NewShow {
                venue_id: park,
                artist_id: artist.id,
                show_date: now() + Duration::days(30),
            })
            .await
            .unwrap();

        let detail = service.detail(artist.id, now()).await.unwrap();

        assert_eq!(detail.past_shows_count, 1);
        assert_eq!(detail.past_shows[0].venue_id, hop);
        assert_eq!(detail.past_shows[0].venue_name, "The Musical Hop");
        assert_eq!(detail.upcoming_shows_count, 1);
        assert_eq!(detail.upcoming_shows[0].venue_id, park);
        assert_eq!(
            detail.upcoming_shows[0].venue_image_link.as_deref(),
            Some("https://example.com/venue.png")
        );
    }

    #[tokio::test]
    async fn test_detail_not_found() {
        let db = test_db().await;
        let service = ArtistService::new(db);

        assert!(matches!(
            service.detail(3, now()).await,
            Err(BookingError::NotFound { .. })
        ));
    }
}
