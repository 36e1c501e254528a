use crate::{
    auth::AdminOnly,
    error::{AppError, AppResult},
    models::Visitor,
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
struct VisitorRequest {
    full_name: String,
    affiliation: Option<String>,
    purpose: Option<String>,
    visited_on: NaiveDate,
    photo_url: Option<String>,
}

async fn list(Extension(pool): Extension<DbPool>) -> AppResult<Json<Vec<Visitor>>> {
    let conn = &mut pool.get().await?;

    Ok(Json(
        visitors::table
            .order(visitors::visited_on.desc())
            .load::<Visitor>(conn)
            .await?,
    ))
}

async fn info(
    Extension(pool): Extension<DbPool>,
    Path(visitor_id): Path<i32>,
) -> AppResult<Json<Visitor>> {
    let conn = &mut pool.get().await?;

    visitors::table
        .find(visitor_id)
        .first::<Visitor>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the visitor does not exist"))
}

async fn create(
    Extension(pool): Extension<DbPool>,
    AdminOnly: AdminOnly,
    Json(req): Json<VisitorRequest>,
) -> AppResult<(StatusCode, Json<Visitor>)> {
    #[derive(Insertable)]
    #[diesel(table_name = visitors)]
    struct NewVisitor {
        full_name: String,
        affiliation: Option<String>,
        purpose: Option<String>,
        visited_on: NaiveDate,
        photo_url: Option<String>,
    }

    if req.full_name.trim().is_empty() {
        return Err(AppError::from(StatusCode::BAD_REQUEST, "name is required"));
    }

    let conn = &mut pool.get().await?;

    let visitor = diesel::insert_into(visitors::table)
        .values(NewVisitor {
            full_name: req.full_name,
            affiliation: req.affiliation,
            purpose: req.purpose,
            visited_on: req.visited_on,
            photo_url: req.photo_url,
        })
        .get_result::<Visitor>(conn)
        .await?;

    Ok((StatusCode::CREATED, Json(visitor)))
}

async fn edit(
    Extension(pool): Extension<DbPool>,
    Path(visitor_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<VisitorRequest>,
) -> AppResult<Json<Visitor>> {
    #[derive(AsChangeset)]
    #[diesel(table_name = visitors)]
    struct VisitorEdit {
        full_name: String,
        affiliation: Option<Option<String>>,
        purpose: Option<Option<String>>,
        visited_on: NaiveDate,
        photo_url: Option<Option<String>>,
    }

    if req.full_name.trim().is_empty() {
        return Err(AppError::from(StatusCode::BAD_REQUEST, "name is required"));
    }

    let conn = &mut pool.get().await?;

    diesel::update(visitors::table.find(visitor_id))
        .set(VisitorEdit {
            full_name: req.full_name,
            affiliation: Some(req.affiliation),
            purpose: Some(req.purpose),
            visited_on: req.visited_on,
            photo_url: Some(req.photo_url),
        })
        .get_result::<Visitor>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the visitor does not exist"))
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path(visitor_id): Path<i32>,
    AdminOnly: AdminOnly,
) -> AppResult<Json<()>> {
    let conn = &mut pool.get().await?;

    let deleted = diesel::delete(visitors::table.find(visitor_id))
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the visitor does not exist",
        ));
    }

    Ok(Json(()))
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(info).put(edit).delete(remove))
}
