use crate::{
    auth::AdminOnly,
    error::{AppError, AppResult},
    models::{Photo, PhotoAlbum},
    schema::*,
    DbPool,
};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlbumRequest {
    title: String,
    description: Option<String>,
    cover_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AlbumDetailResponse {
    #[serde(flatten)]
    album: PhotoAlbum,
    photos: Vec<Photo>,
}

async fn list(Extension(pool): Extension<DbPool>) -> AppResult<Json<Vec<PhotoAlbum>>> {
    let conn = &mut pool.get().await?;

    Ok(Json(
        photo_albums::table
            .order(photo_albums::created_at.desc())
            .load::<PhotoAlbum>(conn)
            .await?,
    ))
}

async fn info(
    Extension(pool): Extension<DbPool>,
    Path(album_id): Path<i32>,
) -> AppResult<Json<AlbumDetailResponse>> {
    let conn = &mut pool.get().await?;

    let album = photo_albums::table
        .find(album_id)
        .first::<PhotoAlbum>(conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the album does not exist"))?;

    let photos = Photo::belonging_to(&album).load::<Photo>(conn).await?;

    Ok(Json(AlbumDetailResponse { album, photos }))
}

async fn create(
    Extension(pool): Extension<DbPool>,
    AdminOnly: AdminOnly,
    Json(req): Json<AlbumRequest>,
) -> AppResult<(StatusCode, Json<PhotoAlbum>)> {
    #[derive(Insertable)]
    #[diesel(table_name = photo_albums)]
    struct NewAlbum {
        title: String,
        description: Option<String>,
        cover_url: Option<String>,
    }

    if req.title.trim().is_empty() {
        return Err(AppError::from(StatusCode::BAD_REQUEST, "title is required"));
    }

    let conn = &mut pool.get().await?;

    let album = diesel::insert_into(photo_albums::table)
        .values(NewAlbum {
            title: req.title,
            description: req.description,
            cover_url: req.cover_url,
        })
        .get_result::<PhotoAlbum>(conn)
        .await?;

    Ok((StatusCode::CREATED, Json(album)))
}

async fn edit(
    Extension(pool): Extension<DbPool>,
    Path(album_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<AlbumRequest>,
) -> AppResult<Json<PhotoAlbum>> {
    #[derive(AsChangeset)]
    #[diesel(table_name = photo_albums)]
    struct AlbumEdit {
        title: String,
        description: Option<Option<String>>,
        cover_url: Option<Option<String>>,
    }

    if req.title.trim().is_empty() {
        return Err(AppError::from(StatusCode::BAD_REQUEST, "title is required"));
    }

    let conn = &mut pool.get().await?;

    diesel::update(photo_albums::table.find(album_id))
        .set(AlbumEdit {
            title: req.title,
            description: Some(req.description),
            cover_url: Some(req.cover_url),
        })
        .get_result::<PhotoAlbum>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the album does not exist"))
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path(album_id): Path<i32>,
    AdminOnly: AdminOnly,
) -> AppResult<Json<()>> {
    let conn = &mut pool.get().await?;

    // drop photos and event/tour links before the album itself
    diesel::delete(photos::table)
        .filter(photos::album_id.eq(album_id))
        .execute(conn)
        .await?;
    diesel::delete(event_photo_albums::table)
        .filter(event_photo_albums::album_id.eq(album_id))
        .execute(conn)
        .await?;
    diesel::delete(industrial_tour_albums::table)
        .filter(industrial_tour_albums::album_id.eq(album_id))
        .execute(conn)
        .await?;

    let deleted = diesel::delete(photo_albums::table.find(album_id))
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the album does not exist",
        ));
    }

    Ok(Json(()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhotoRequest {
    url: String,
    caption: Option<String>,
}

async fn list_photos(
    Extension(pool): Extension<DbPool>,
    Path(album_id): Path<i32>,
) -> AppResult<Json<Vec<Photo>>> {
    let conn = &mut pool.get().await?;

    Ok(Json(
        photos::table
            .filter(photos::album_id.eq(album_id))
            .load::<Photo>(conn)
            .await?,
    ))
}

async fn add_photo(
    Extension(pool): Extension<DbPool>,
    Path(album_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<PhotoRequest>,
) -> AppResult<(StatusCode, Json<Photo>)> {
    #[derive(Insertable)]
    #[diesel(table_name = photos)]
    struct NewPhoto {
        album_id: i32,
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

    let album = photo_albums::table
        .find(album_id)
        .first::<PhotoAlbum>(conn)
        .await
        .optional()?;
    if album.is_none() {
        return Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the album does not exist",
        ));
    }

    let photo = diesel::insert_into(photos::table)
        .values(NewPhoto {
            album_id,
            url: req.url,
            caption: req.caption,
        })
        .get_result::<Photo>(conn)
        .await?;

    Ok((StatusCode::CREATED, Json(photo)))
}

async fn remove_photo(
    Extension(pool): Extension<DbPool>,
    Path((album_id, photo_id)): Path<(i32, i32)>,
    AdminOnly: AdminOnly,
) -> AppResult<Json<()>> {
    let conn = &mut pool.get().await?;

    let deleted = diesel::delete(photos::table)
        .filter(photos::id.eq(photo_id))
        .filter(photos::album_id.eq(album_id))
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

pub fn app() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(info).put(edit).delete(remove))
        .route("/:id/photos", get(list_photos).post(add_photo))
        .route("/:id/photos/:photo_id", axum::routing::delete(remove_photo))
}
