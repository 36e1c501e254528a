use crate::{
    auth::AdminOnly,
    error::{AppError, AppResult},
    models::{Event, EventPhotoAlbum},
    schema::*,
    DbPool,
};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventRequest {
    title: String,
    description: Option<String>,
    venue: Option<String>,
    starts_on: NaiveDate,
    ends_on: Option<NaiveDate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventResponse {
    id: i32,
    title: String,
    description: Option<String>,
    venue: Option<String>,
    starts_on: NaiveDate,
    ends_on: Option<NaiveDate>,
    album_ids: Vec<i32>,
}

impl EventResponse {
    fn from_event(event: Event, albums: Vec<EventPhotoAlbum>) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            venue: event.venue,
            starts_on: event.starts_on,
            ends_on: event.ends_on,
            album_ids: albums.into_iter().map(|a| a.album_id).collect(),
        }
    }
}

async fn list(Extension(pool): Extension<DbPool>) -> AppResult<Json<Vec<EventResponse>>> {
    let conn = &mut pool.get().await?;

    let events = events::table
        .order(events::starts_on.desc())
        .load::<Event>(conn)
        .await?;

    let albums = event_photo_albums::table
        .filter(event_photo_albums::event_id.eq_any(events.iter().map(|e| e.id)))
        .load::<EventPhotoAlbum>(conn)
        .await?
        .grouped_by(&events);

    Ok(Json(
        events
            .into_iter()
            .zip(albums)
            .map(|(event, albums)| EventResponse::from_event(event, albums))
            .collect(),
    ))
}

async fn info(
    Extension(pool): Extension<DbPool>,
    Path(event_id): Path<i32>,
) -> AppResult<Json<EventResponse>> {
    let conn = &mut pool.get().await?;

    let event = events::table
        .find(event_id)
        .first::<Event>(conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the event does not exist"))?;

    let albums = event_photo_albums::table
        .filter(event_photo_albums::event_id.eq(event.id))
        .load::<EventPhotoAlbum>(conn)
        .await?;

    Ok(Json(EventResponse::from_event(event, albums)))
}

async fn create(
    Extension(pool): Extension<DbPool>,
    AdminOnly: AdminOnly,
    Json(req): Json<EventRequest>,
) -> AppResult<(StatusCode, Json<EventResponse>)> {
    #[derive(Insertable)]
    #[diesel(table_name = events)]
    struct NewEvent {
        title: String,
        description: Option<String>,
        venue: Option<String>,
        starts_on: NaiveDate,
        ends_on: Option<NaiveDate>,
    }

    if req.title.trim().is_empty() {
        return Err(AppError::from(StatusCode::BAD_REQUEST, "title is required"));
    }

    let conn = &mut pool.get().await?;

    let event = diesel::insert_into(events::table)
        .values(NewEvent {
            title: req.title,
            description: req.description,
            venue: req.venue,
            starts_on: req.starts_on,
            ends_on: req.ends_on,
        })
        .get_result::<Event>(conn)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(EventResponse::from_event(event, vec![])),
    ))
}

async fn edit(
    Extension(pool): Extension<DbPool>,
    Path(event_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<EventRequest>,
) -> AppResult<Json<EventResponse>> {
    #[derive(AsChangeset)]
    #[diesel(table_name = events)]
    struct EventEdit {
        title: String,
        description: Option<Option<String>>,
        venue: Option<Option<String>>,
        starts_on: NaiveDate,
        ends_on: Option<Option<NaiveDate>>,
    }

    if req.title.trim().is_empty() {
        return Err(AppError::from(StatusCode::BAD_REQUEST, "title is required"));
    }

    let conn = &mut pool.get().await?;

    let event = diesel::update(events::table.find(event_id))
        .set(EventEdit {
            title: req.title,
            description: Some(req.description),
            venue: Some(req.venue),
            starts_on: req.starts_on,
            ends_on: Some(req.ends_on),
        })
        .get_result::<Event>(conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the event does not exist"))?;

    let albums = event_photo_albums::table
        .filter(event_photo_albums::event_id.eq(event.id))
        .load::<EventPhotoAlbum>(conn)
        .await?;

    Ok(Json(EventResponse::from_event(event, albums)))
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path(event_id): Path<i32>,
    AdminOnly: AdminOnly,
) -> AppResult<Json<()>> {
    let conn = &mut pool.get().await?;

    diesel::delete(event_photo_albums::table)
        .filter(event_photo_albums::event_id.eq(event_id))
        .execute(conn)
        .await?;

    let deleted = diesel::delete(events::table.find(event_id))
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the event does not exist",
        ));
    }

    Ok(Json(()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetAlbumsRequest {
    album_ids: Vec<i32>,
}

async fn set_albums(
    Extension(pool): Extension<DbPool>,
    Path(event_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<SetAlbumsRequest>,
) -> AppResult<Json<()>> {
    #[derive(Insertable)]
    #[diesel(table_name = event_photo_albums)]
    struct NewLink {
        event_id: i32,
        album_id: i32,
    }

    let conn = &mut pool.get().await?;

    let exists = events::table
        .find(event_id)
        .first::<Event>(conn)
        .await
        .optional()?;
    if exists.is_none() {
        return Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the event does not exist",
        ));
    }

    let album_ids: HashSet<i32> = req.album_ids.into_iter().collect();

    let known: HashSet<i32> = photo_albums::table
        .select(photo_albums::id)
        .filter(photo_albums::id.eq_any(&album_ids))
        .load::<i32>(conn)
        .await?
        .into_iter()
        .collect();

    for album_id in &album_ids {
        if !known.contains(album_id) {
            return Err(AppError::from(StatusCode::BAD_REQUEST, "invalid album id"));
        }
    }

    diesel::delete(event_photo_albums::table)
        .filter(event_photo_albums::event_id.eq(event_id))
        .execute(conn)
        .await?;

    diesel::insert_into(event_photo_albums::table)
        .values(
            album_ids
                .into_iter()
                .map(|album_id| NewLink { event_id, album_id })
                .collect::<Vec<_>>(),
        )
        .execute(conn)
        .await?;

    Ok(Json(()))
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(info).put(edit).delete(remove))
        .route("/:id/albums", put(set_albums))
}
