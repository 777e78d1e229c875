use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::entities;
use crate::error::BookingResult;
use crate::services::schedule::format_start_time;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub id: i64,
    pub venue_id: i64,
    pub artist_id: i64,
    pub show_date: DateTime<Utc>,
}

impl From<entities::show::Model> for Show {
    fn from(model: entities::show::Model) -> Self {
        Self {
            id: model.id,
            venue_id: model.venue_id,
            artist_id: model.artist_id,
            show_date: model.show_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShow {
    pub venue_id: i64,
    pub artist_id: i64,
    pub show_date: DateTime<Utc>,
}

/// A show joined with the names needed to display it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, FromQueryResult)]
struct ShowRow {
    show_date: DateTime<Utc>,
    venue_id: i64,
    artist_id: i64,
    venue_name: String,
    artist_name: String,
    artist_image_link: Option<String>,
}

impl From<ShowRow> for ShowListing {
    fn from(row: ShowRow) -> Self {
        Self {
            venue_id: row.venue_id,
            venue_name: row.venue_name,
            artist_id: row.artist_id,
            artist_name: row.artist_name,
            artist_image_link: row.artist_image_link,
            start_time: format_start_time(&row.show_date),
        }
    }
}

pub struct ShowService {
    db: Arc<Database>,
}

impl ShowService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn count(&self) -> BookingResult<u64> {
        Ok(entities::show::Entity::find().count(&self.db.conn).await?)
    }

    /// Every show in date order, with venue and artist names resolved in a
    /// single joined query.
    pub async fn list(&self) -> BookingResult<Vec<ShowListing>> {
        let rows = entities::show::Entity::find()
            .select_only()
            .column(entities::show::Column::ShowDate)
            .column(entities::show::Column::VenueId)
            .column(entities::show::Column::ArtistId)
            .column_as(entities::venue::Column::Name, "venue_name")
            .column_as(entities::artist::Column::Name, "artist_name")
            .column_as(entities::artist::Column::ImageLink, "artist_image_link")
            .inner_join(entities::venue::Entity)
            .inner_join(entities::artist::Entity)
            .order_by_asc(entities::show::Column::ShowDate)
            .order_by_asc(entities::show::Column::Id)
            .into_model::<ShowRow>()
            .all(&self.db.conn)
            .await?;

        Ok(rows.into_iter().map(ShowListing::from).collect())
    }

    /// Books an artist at a venue. Unknown venue or artist ids are rejected by the
    /// foreign keys and surface as a constraint violation.
    pub async fn create(&self, new_show: NewShow) -> BookingResult<Show> {
        log::debug!(
            "Creating show: venue_id={}, artist_id={}, show_date={}",
            new_show.venue_id,
            new_show.artist_id,
            new_show.show_date
        );

        let show = entities::show::ActiveModel {
            venue_id: Set(new_show.venue_id),
            artist_id: Set(new_show.artist_id),
            show_date: Set(new_show.show_date),
            ..ActiveModelTrait::default()
        };

        let txn = self.db.conn.begin().await?;
        let model = show.insert(&txn).await?;
        txn.commit().await?;

        log::info!("Show created (ID: {})", model.id);
        Ok(model.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BookingError;
    use crate::services::artist::{ArtistInput, ArtistService};
    use crate::services::venue::{VenueInput, VenueService};
    use crate::test_utils::test_db;
    use chrono::{Duration, TimeZone};

    async fn seed(db: &Arc<Database>) -> (i64, i64) {
        let venue = VenueService::new(db.clone())
            .create(VenueInput {
                name: "The Musical Hop".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let artist = ArtistService::new(db.clone())
            .create(ArtistInput {
                name: "Guns N Petals".into(),
                image_link: Some("https://example.com/petals.png".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        (venue.id, artist.id)
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let db = test_db().await;
        let (venue_id, artist_id) = seed(&db).await;
        let service = ShowService::new(db);

        let show_date = Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap();
        let show = service
            .create(NewShow {
                venue_id,
                artist_id,
                show_date,
            })
            .await
            .unwrap();

        assert_eq!(show.venue_id, venue_id);
        assert_eq!(show.artist_id, artist_id);
        assert_eq!(show.show_date, show_date);

        let listings = service.list().await.unwrap();
        assert_eq!(
            listings,
            vec![ShowListing {
                venue_id,
                venue_name: "The Musical Hop".into(),
                artist_id,
                artist_name: "Guns N Petals".into(),
                artist_image_link: Some("https://example.com/petals.png".into()),
                start_time: "01-04-2035 (20:00)".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_list_is_date_ordered() {
        let db = test_db().await;
        let (venue_id, artist_id) = seed(&db).await;
        let service = ShowService::new(db);

        for day in [20, 5, 12] {
            service
                .create(NewShow {
                    venue_id,
                    artist_id,
                    show_date: Utc.with_ymd_and_hms(2035, 1, day, 19, 0, 0).unwrap(),
                })
                .await
                .unwrap();
        }

        let times: Vec<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.start_time)
            .collect();
        assert_eq!(
            times,
            vec!["05-01-2035 (19:00)", "12-01-2035 (19:00)", "20-01-2035 (19:00)"]
        );
    }

    #[tokio::test]
    async fn test_list_handles_more_shows_than_bind_limit() {
        let db = test_db().await;
        let (venue_id, artist_id) = seed(&db).await;
        let start = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();

        let shows: Vec<entities::show::ActiveModel> = (0..33_000)
            .map(|n| entities::show::ActiveModel {
                venue_id: Set(venue_id),
                artist_id: Set(artist_id),
                show_date: Set(start + Duration::minutes(n)),
                ..ActiveModelTrait::default()
            })
            .collect();
        for batch in shows.chunks(1_000) {
            entities::show::Entity::insert_many(batch.to_vec())
                .exec(&db.conn)
                .await
                .unwrap();
        }

        let listings = ShowService::new(db).list().await.unwrap();

        assert_eq!(listings.len(), 33_000);
        assert_eq!(listings[0].start_time, "01-01-2030 (00:00)");
        assert_eq!(listings[0].artist_name, "Guns N Petals");
    }

    #[tokio::test]
    async fn test_create_with_unknown_venue_fails() {
        let db = test_db().await;
        let (_, artist_id) = seed(&db).await;
        let service = ShowService::new(db);

        let result = service
            .create(NewShow {
                venue_id: 9999,
                artist_id,
                show_date: Utc::now(),
            })
            .await;

        assert!(matches!(result, Err(BookingError::ConstraintViolation(_))));
        assert_eq!(service.count().await.unwrap(), 0);
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_unknown_artist_fails() {
        let db = test_db().await;
        let (venue_id, _) = seed(&db).await;
        let service = ShowService::new(db.clone());

        let result = service
            .create(NewShow {
                venue_id,
                artist_id: 9999,
                show_date: Utc::now(),
            })
            .await;

        assert!(matches!(result, Err(BookingError::ConstraintViolation(_))));
        assert_eq!(service.count().await.unwrap(), 0);

        let detail = VenueService::new(db)
            .detail(venue_id, Utc::now())
            .await
            .unwrap();
        assert_eq!(detail.past_shows_count + detail.upcoming_shows_count, 0);
    }
}
