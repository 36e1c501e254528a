use crate::{
    auth::AdminOnly,
    error::{AppError, AppResult},
    models::Video,
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
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoRequest {
    title: String,
    url: String,
    description: Option<String>,
    recorded_on: Option<NaiveDate>,
}

fn validate(req: &VideoRequest) -> AppResult<()> {
    if req.title.trim().is_empty() || req.url.trim().is_empty() {
        return Err(AppError::from(
            StatusCode::BAD_REQUEST,
            "title and url are required",
        ));
    }
    Ok(())
}

async fn list(Extension(pool): Extension<DbPool>) -> AppResult<Json<Vec<Video>>> {
    let conn = &mut pool.get().await?;

    Ok(Json(
        videos::table
            .order(videos::id.desc())
            .load::<Video>(conn)
            .await?,
    ))
}

async fn info(
    Extension(pool): Extension<DbPool>,
    Path(video_id): Path<i32>,
) -> AppResult<Json<Video>> {
    let conn = &mut pool.get().await?;

    videos::table
        .find(video_id)
        .first::<Video>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the video does not exist"))
}

async fn create(
    Extension(pool): Extension<DbPool>,
    AdminOnly: AdminOnly,
    Json(req): Json<VideoRequest>,
) -> AppResult<(StatusCode, Json<Video>)> {
    #[derive(Insertable)]
    #[diesel(table_name = videos)]
    struct NewVideo {
        title: String,
        url: String,
        description: Option<String>,
        recorded_on: Option<NaiveDate>,
    }

    validate(&req)?;

    let conn = &mut pool.get().await?;

    let video = diesel::insert_into(videos::table)
        .values(NewVideo {
            title: req.title,
            url: req.url,
            description: req.description,
            recorded_on: req.recorded_on,
        })
        .get_result::<Video>(conn)
        .await?;

    Ok((StatusCode::CREATED, Json(video)))
}

async fn edit(
    Extension(pool): Extension<DbPool>,
    Path(video_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<VideoRequest>,
) -> AppResult<Json<Video>> {
    #[derive(AsChangeset)]
    #[diesel(table_name = videos)]
    struct VideoEdit {
        title: String,
        url: String,
        description: Option<Option<String>>,
        recorded_on: Option<Option<NaiveDate>>,
    }

    validate(&req)?;

    let conn = &mut pool.get().await?;

    diesel::update(videos::table.find(video_id))
        .set(VideoEdit {
            title: req.title,
            url: req.url,
            description: Some(req.description),
            recorded_on: Some(req.recorded_on),
        })
        .get_result::<Video>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the video does not exist"))
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path(video_id): Path<i32>,
    AdminOnly: AdminOnly,
) -> AppResult<Json<()>> {
    let conn = &mut pool.get().await?;

    let deleted = diesel::delete(videos::table.find(video_id))
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the video does not exist",
        ));
    }

    Ok(Json(()))
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(info).put(edit).delete(remove))
}
