use crate::{
    auth::AdminOnly,
    error::{AppError, AppResult},
    models::NewspaperClipping,
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
struct ClippingRequest {
    title: String,
    image_url: String,
    published_on: Option<NaiveDate>,
    source: Option<String>,
}

fn validate(req: &ClippingRequest) -> AppResult<()> {
    if req.title.trim().is_empty() || req.image_url.trim().is_empty() {
        return Err(AppError::from(
            StatusCode::BAD_REQUEST,
            "title and image url are required",
        ));
    }
    Ok(())
}

async fn list(Extension(pool): Extension<DbPool>) -> AppResult<Json<Vec<NewspaperClipping>>> {
    let conn = &mut pool.get().await?;

    Ok(Json(
        newspaper_clippings::table
            .order(newspaper_clippings::published_on.desc())
            .load::<NewspaperClipping>(conn)
            .await?,
    ))
}

async fn info(
    Extension(pool): Extension<DbPool>,
    Path(clipping_id): Path<i32>,
) -> AppResult<Json<NewspaperClipping>> {
    let conn = &mut pool.get().await?;

    newspaper_clippings::table
        .find(clipping_id)
        .first::<NewspaperClipping>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the clipping does not exist"))
}

async fn create(
    Extension(pool): Extension<DbPool>,
    AdminOnly: AdminOnly,
    Json(req): Json<ClippingRequest>,
) -> AppResult<(StatusCode, Json<NewspaperClipping>)> {
    #[derive(Insertable)]
    #[diesel(table_name = newspaper_clippings)]
    struct NewClipping {
        title: String,
        image_url: String,
        published_on: Option<NaiveDate>,
        source: Option<String>,
    }

    validate(&req)?;

    let conn = &mut pool.get().await?;

    let clipping = diesel::insert_into(newspaper_clippings::table)
        .values(NewClipping {
            title: req.title,
            image_url: req.image_url,
            published_on: req.published_on,
            source: req.source,
        })
        .get_result::<NewspaperClipping>(conn)
        .await?;

    Ok((StatusCode::CREATED, Json(clipping)))
}

async fn edit(
    Extension(pool): Extension<DbPool>,
    Path(clipping_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<ClippingRequest>,
) -> AppResult<Json<NewspaperClipping>> {
    #[derive(AsChangeset)]
    #[diesel(table_name = newspaper_clippings)]
    struct ClippingEdit {
        title: String,
        image_url: String,
        published_on: Option<Option<NaiveDate>>,
        source: Option<Option<String>>,
    }

    validate(&req)?;

    let conn = &mut pool.get().await?;

    diesel::update(newspaper_clippings::table.find(clipping_id))
        .set(ClippingEdit {
            title: req.title,
            image_url: req.image_url,
            published_on: Some(req.published_on),
            source: Some(req.source),
        })
        .get_result::<NewspaperClipping>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the clipping does not exist"))
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path(clipping_id): Path<i32>,
    AdminOnly: AdminOnly,
) -> AppResult<Json<()>> {
    let conn = &mut pool.get().await?;

    let deleted = diesel::delete(newspaper_clippings::table.find(clipping_id))
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the clipping does not exist",
        ));
    }

    Ok(Json(()))
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(info).put(edit).delete(remove))
}
