use crate::{
    auth::AdminOnly,
    error::{AppError, AppResult},
    models::{IndustrialTour, IndustrialTourAlbum, IndustrialTourPhoto},
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
struct TourRequest {
    title: String,
    company: String,
    description: Option<String>,
    tour_date: NaiveDate,
}

fn validate(req: &TourRequest) -> AppResult<()> {
    if req.title.trim().is_empty() || req.company.trim().is_empty() {
        return Err(AppError::from(
            StatusCode::BAD_REQUEST,
            "title and company are required",
        ));
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TourDetailResponse {
    #[serde(flatten)]
    tour: IndustrialTour,
    photos: Vec<IndustrialTourPhoto>,
    album_ids: Vec<i32>,
}

async fn list(Extension(pool): Extension<DbPool>) -> AppResult<Json<Vec<IndustrialTour>>> {
    let conn = &mut pool.get().await?;

    Ok(Json(
        industrial_tours::table
            .order(industrial_tours::tour_date.desc())
            .load::<IndustrialTour>(conn)
            .await?,
    ))
}

async fn info(
    Extension(pool): Extension<DbPool>,
    Path(tour_id): Path<i32>,
) -> AppResult<Json<TourDetailResponse>> {
    let conn = &mut pool.get().await?;

    let tour = industrial_tours::table
        .find(tour_id)
        .first::<IndustrialTour>(conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the tour does not exist"))?;

    let photos = IndustrialTourPhoto::belonging_to(&tour)
        .load::<IndustrialTourPhoto>(conn)
        .await?;
    let album_ids = IndustrialTourAlbum::belonging_to(&tour)
        .load::<IndustrialTourAlbum>(conn)
        .await?
        .into_iter()
        .map(|link| link.album_id)
        .collect();

    Ok(Json(TourDetailResponse {
        tour,
        photos,
        album_ids,
    }))
}

async fn create(
    Extension(pool): Extension<DbPool>,
    AdminOnly: AdminOnly,
    Json(req): Json<TourRequest>,
) -> AppResult<(StatusCode, Json<IndustrialTour>)> {
    #[derive(Insertable)]
    #[diesel(table_name = industrial_tours)]
    struct NewTour {
        title: String,
        company: String,
        description: Option<String>,
        tour_date: NaiveDate,
    }

    validate(&req)?;

    let conn = &mut pool.get().await?;

    let tour = diesel::insert_into(industrial_tours::table)
        .values(NewTour {
            title: req.title,
            company: req.company,
            description: req.description,
            tour_date: req.tour_date,
        })
        .get_result::<IndustrialTour>(conn)
        .await?;

    Ok((StatusCode::CREATED, Json(tour)))
}

async fn edit(
    Extension(pool): Extension<DbPool>,
    Path(tour_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<TourRequest>,
) -> AppResult<Json<IndustrialTour>> {
    #[derive(AsChangeset)]
    #[diesel(table_name = industrial_tours)]
    struct TourEdit {
        title: String,
        company: String,
        description: Option<Option<String>>,
        tour_date: NaiveDate,
    }

    validate(&req)?;

    let conn = &mut pool.get().await?;

    diesel::update(industrial_tours::table.find(tour_id))
        .set(TourEdit {
            title: req.title,
            company: req.company,
            description: Some(req.description),
            tour_date: req.tour_date,
        })
        .get_result::<IndustrialTour>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the tour does not exist"))
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path(tour_id): Path<i32>,
    AdminOnly: AdminOnly,
) -> AppResult<Json<()>> {
    let conn = &mut pool.get().await?;

    diesel::delete(industrial_tour_photos::table)
        .filter(industrial_tour_photos::tour_id.eq(tour_id))
        .execute(conn)
        .await?;
    diesel::delete(industrial_tour_albums::table)
        .filter(industrial_tour_albums::tour_id.eq(tour_id))
        .execute(conn)
        .await?;

    let deleted = diesel::delete(industrial_tours::table.find(tour_id))
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the tour does not exist",
        ));
    }

    Ok(Json(()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TourPhotoRequest {
    url: String,
    caption: Option<String>,
}

async fn add_photo(
    Extension(pool): Extension<DbPool>,
    Path(tour_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<TourPhotoRequest>,
) -> AppResult<(StatusCode, Json<IndustrialTourPhoto>)> {
    #[derive(Insertable)]
    #[diesel(table_name = industrial_tour_photos)]
    struct NewTourPhoto {
        tour_id: i32,
        url: String,
        caption: Option<String>,
    }

    if req.url.trim().is_empty() {
        return Err(AppError::from(
            StatusCode::BAD_REQUEST,
            "photo url is required",
        ));
    }

    let conn = &mut pool.get().await?;

    let tour = industrial_tours::table
        .find(tour_id)
        .first::<IndustrialTour>(conn)
        .await
        .optional()?;
    if tour.is_none() {
        return Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the tour does not exist",
        ));
    }

    let photo = diesel::insert_into(industrial_tour_photos::table)
        .values(NewTourPhoto {
            tour_id,
            url: req.url,
            caption: req.caption,
        })
        .get_result::<IndustrialTourPhoto>(conn)
        .await?;

    Ok((StatusCode::CREATED, Json(photo)))
}

async fn remove_photo(
    Extension(pool): Extension<DbPool>,
    Path((tour_id, photo_id)): Path<(i32, i32)>,
    AdminOnly: AdminOnly,
) -> AppResult<Json<()>> {
    let conn = &mut pool.get().await?;

    let deleted = diesel::delete(industrial_tour_photos::table)
        .filter(industrial_tour_photos::id.eq(photo_id))
        .filter(industrial_tour_photos::tour_id.eq(tour_id))
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the photo does not exist",
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
    Path(tour_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<SetAlbumsRequest>,
) -> AppResult<Json<()>> {
    #[derive(Insertable)]
    #[diesel(table_name = industrial_tour_albums)]
    struct NewLink {
        tour_id: i32,
        album_id: i32,
    }

    let conn = &mut pool.get().await?;

    let tour = industrial_tours::table
        .find(tour_id)
        .first::<IndustrialTour>(conn)
        .await
        .optional()?;
    if tour.is_none() {
        return Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the tour does not exist",
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

    diesel::delete(industrial_tour_albums::table)
        .filter(industrial_tour_albums::tour_id.eq(tour_id))
        .execute(conn)
        .await?;

    diesel::insert_into(industrial_tour_albums::table)
        .values(
            album_ids
                .into_iter()
                .map(|album_id| NewLink { tour_id, album_id })
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
        .route("/:id/photos", axum::routing::post(add_photo))
        .route("/:id/photos/:photo_id", axum::routing::delete(remove_photo))
        .route("/:id/albums", put(set_albums))
}
