use crate::{
    auth::AdminOnly,
    error::{AppError, AppResult},
    models::Conference,
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
struct ConferenceRequest {
    title: String,
    theme: Option<String>,
    venue: Option<String>,
    starts_on: NaiveDate,
    ends_on: Option<NaiveDate>,
    brochure_url: Option<String>,
}

async fn list(Extension(pool): Extension<DbPool>) -> AppResult<Json<Vec<Conference>>> {
    let conn = &mut pool.get().await?;

    Ok(Json(
        conferences::table
            .order(conferences::starts_on.desc())
            .load::<Conference>(conn)
            .await?,
    ))
}

async fn info(
    Extension(pool): Extension<DbPool>,
    Path(conference_id): Path<i32>,
) -> AppResult<Json<Conference>> {
    let conn = &mut pool.get().await?;

    conferences::table
        .find(conference_id)
        .first::<Conference>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the conference does not exist"))
}

async fn create(
    Extension(pool): Extension<DbPool>,
    AdminOnly: AdminOnly,
    Json(req): Json<ConferenceRequest>,
) -> AppResult<(StatusCode, Json<Conference>)> {
    #[derive(Insertable)]
    #[diesel(table_name = conferences)]
    struct NewConference {
        title: String,
        theme: Option<String>,
        venue: Option<String>,
        starts_on: NaiveDate,
        ends_on: Option<NaiveDate>,
        brochure_url: Option<String>,
    }

    if req.title.trim().is_empty() {
        return Err(AppError::from(StatusCode::BAD_REQUEST, "title is required"));
    }

    let conn = &mut pool.get().await?;

    let conference = diesel::insert_into(conferences::table)
        .values(NewConference {
            title: req.title,
            theme: req.theme,
            venue: req.venue,
            starts_on: req.starts_on,
            ends_on: req.ends_on,
            brochure_url: req.brochure_url,
        })
        .get_result::<Conference>(conn)
        .await?;

    Ok((StatusCode::CREATED, Json(conference)))
}

async fn edit(
    Extension(pool): Extension<DbPool>,
    Path(conference_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<ConferenceRequest>,
) -> AppResult<Json<Conference>> {
    #[derive(AsChangeset)]
    #[diesel(table_name = conferences)]
    struct ConferenceEdit {
        title: String,
        theme: Option<Option<String>>,
        venue: Option<Option<String>>,
        starts_on: NaiveDate,
        ends_on: Option<Option<NaiveDate>>,
        brochure_url: Option<Option<String>>,
    }

    if req.title.trim().is_empty() {
        return Err(AppError::from(StatusCode::BAD_REQUEST, "title is required"));
    }

    let conn = &mut pool.get().await?;

    diesel::update(conferences::table.find(conference_id))
        .set(ConferenceEdit {
            title: req.title,
            theme: Some(req.theme),
            venue: Some(req.venue),
            starts_on: req.starts_on,
            ends_on: Some(req.ends_on),
            brochure_url: Some(req.brochure_url),
        })
        .get_result::<Conference>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the conference does not exist"))
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path(conference_id): Path<i32>,
    AdminOnly: AdminOnly,
) -> AppResult<Json<()>> {
    let conn = &mut pool.get().await?;

    let deleted = diesel::delete(conferences::table.find(conference_id))
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the conference does not exist",
        ));
    }

    Ok(Json(()))
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(info).put(edit).delete(remove))
}
