use crate::{
    auth::AdminOnly,
    error::{AppError, AppResult},
    models::Publication,
    schema::*,
    DbPool,
};
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;

/// Newsletters live here too, as publications of kind "newsletter".
const DEFAULT_KIND: &str = "newsletter";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicationRequest {
    title: String,
    file_url: String,
    published_on: NaiveDate,
    kind: Option<String>,
}

fn validate(req: &PublicationRequest) -> AppResult<()> {
    if req.title.trim().is_empty() || req.file_url.trim().is_empty() {
        return Err(AppError::from(
            StatusCode::BAD_REQUEST,
            "title and file url are required",
        ));
    }
    Ok(())
}

#[derive(Deserialize)]
struct ListParams {
    kind: Option<String>,
}

async fn list(
    Extension(pool): Extension<DbPool>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Publication>>> {
    let conn = &mut pool.get().await?;

    let mut query = publications::table
        .order(publications::published_on.desc())
        .into_boxed();
    if let Some(kind) = params.kind {
        query = query.filter(publications::kind.eq(kind));
    }

    Ok(Json(query.load::<Publication>(conn).await?))
}

async fn info(
    Extension(pool): Extension<DbPool>,
    Path(publication_id): Path<i32>,
) -> AppResult<Json<Publication>> {
    let conn = &mut pool.get().await?;

    publications::table
        .find(publication_id)
        .first::<Publication>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the publication does not exist"))
}

async fn create(
    Extension(pool): Extension<DbPool>,
    AdminOnly: AdminOnly,
    Json(req): Json<PublicationRequest>,
) -> AppResult<(StatusCode, Json<Publication>)> {
    #[derive(Insertable)]
    #[diesel(table_name = publications)]
    struct NewPublication {
        title: String,
        file_url: String,
        published_on: NaiveDate,
        kind: String,
    }

    validate(&req)?;

    let conn = &mut pool.get().await?;

    let publication = diesel::insert_into(publications::table)
        .values(NewPublication {
            title: req.title,
            file_url: req.file_url,
            published_on: req.published_on,
            kind: req.kind.unwrap_or_else(|| DEFAULT_KIND.to_string()),
        })
        .get_result::<Publication>(conn)
        .await?;

    Ok((StatusCode::CREATED, Json(publication)))
}

async fn edit(
    Extension(pool): Extension<DbPool>,
    Path(publication_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<PublicationRequest>,
) -> AppResult<Json<Publication>> {
    #[derive(AsChangeset)]
    #[diesel(table_name = publications)]
    struct PublicationEdit {
        title: String,
        file_url: String,
        published_on: NaiveDate,
        kind: Option<String>,
    }

    validate(&req)?;

    let conn = &mut pool.get().await?;

    diesel::update(publications::table.find(publication_id))
        .set(PublicationEdit {
            title: req.title,
            file_url: req.file_url,
            published_on: req.published_on,
            kind: req.kind,
        })
        .get_result::<Publication>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the publication does not exist"))
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path(publication_id): Path<i32>,
    AdminOnly: AdminOnly,
) -> AppResult<Json<()>> {
    let conn = &mut pool.get().await?;

    let deleted = diesel::delete(publications::table.find(publication_id))
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the publication does not exist",
        ));
    }

    Ok(Json(()))
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(info).put(edit).delete(remove))
}
