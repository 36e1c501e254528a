use crate::{
    auth::AdminOnly,
    error::{AppError, AppResult},
    models::NotableAlumnus,
    schema::*,
    DbPool,
};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotableAlumnusRequest {
    full_name: String,
    graduation_year: Option<i32>,
    achievements: String,
    photo_url: Option<String>,
}

fn validate(req: &NotableAlumnusRequest) -> AppResult<()> {
    if req.full_name.trim().is_empty() || req.achievements.trim().is_empty() {
        return Err(AppError::from(
            StatusCode::BAD_REQUEST,
            "name and achievements are required",
        ));
    }
    Ok(())
}

async fn list(Extension(pool): Extension<DbPool>) -> AppResult<Json<Vec<NotableAlumnus>>> {
    let conn = &mut pool.get().await?;

    Ok(Json(
        notable_alumni::table
            .order(notable_alumni::graduation_year.desc())
            .load::<NotableAlumnus>(conn)
            .await?,
    ))
}

async fn info(
    Extension(pool): Extension<DbPool>,
    Path(alumnus_id): Path<i32>,
) -> AppResult<Json<NotableAlumnus>> {
    let conn = &mut pool.get().await?;

    notable_alumni::table
        .find(alumnus_id)
        .first::<NotableAlumnus>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the notable alumnus does not exist"))
}

async fn create(
    Extension(pool): Extension<DbPool>,
    AdminOnly: AdminOnly,
    Json(req): Json<NotableAlumnusRequest>,
) -> AppResult<(StatusCode, Json<NotableAlumnus>)> {
    #[derive(Insertable)]
    #[diesel(table_name = notable_alumni)]
    struct NewNotableAlumnus {
        full_name: String,
        graduation_year: Option<i32>,
        achievements: String,
        photo_url: Option<String>,
    }

    validate(&req)?;

    let conn = &mut pool.get().await?;

    let alumnus = diesel::insert_into(notable_alumni::table)
        .values(NewNotableAlumnus {
            full_name: req.full_name,
            graduation_year: req.graduation_year,
            achievements: req.achievements,
            photo_url: req.photo_url,
        })
        .get_result::<NotableAlumnus>(conn)
        .await?;

    Ok((StatusCode::CREATED, Json(alumnus)))
}

async fn edit(
    Extension(pool): Extension<DbPool>,
    Path(alumnus_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<NotableAlumnusRequest>,
) -> AppResult<Json<NotableAlumnus>> {
    #[derive(AsChangeset)]
    #[diesel(table_name = notable_alumni)]
    struct NotableAlumnusEdit {
        full_name: String,
        graduation_year: Option<Option<i32>>,
        achievements: String,
        photo_url: Option<Option<String>>,
    }

    validate(&req)?;

    let conn = &mut pool.get().await?;

    diesel::update(notable_alumni::table.find(alumnus_id))
        .set(NotableAlumnusEdit {
            full_name: req.full_name,
            graduation_year: Some(req.graduation_year),
            achievements: req.achievements,
            photo_url: Some(req.photo_url),
        })
        .get_result::<NotableAlumnus>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the notable alumnus does not exist"))
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path(alumnus_id): Path<i32>,
    AdminOnly: AdminOnly,
) -> AppResult<Json<()>> {
    let conn = &mut pool.get().await?;

    let deleted = diesel::delete(notable_alumni::table.find(alumnus_id))
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the notable alumnus does not exist",
        ));
    }

    Ok(Json(()))
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(info).put(edit).delete(remove))
}
