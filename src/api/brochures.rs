use crate::{
    auth::AdminOnly,
    error::{AppError, AppResult},
    models::PlacementBrochure,
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
struct BrochureRequest {
    title: String,
    file_url: String,
    academic_year: String,
}

fn validate(req: &BrochureRequest) -> AppResult<()> {
    if req.title.trim().is_empty() || req.file_url.trim().is_empty() {
        return Err(AppError::from(
            StatusCode::BAD_REQUEST,
            "title and file url are required",
        ));
    }
    Ok(())
}

async fn list(Extension(pool): Extension<DbPool>) -> AppResult<Json<Vec<PlacementBrochure>>> {
    let conn = &mut pool.get().await?;

    Ok(Json(
        placement_brochures::table
            .order(placement_brochures::academic_year.desc())
            .load::<PlacementBrochure>(conn)
            .await?,
    ))
}

async fn info(
    Extension(pool): Extension<DbPool>,
    Path(brochure_id): Path<i32>,
) -> AppResult<Json<PlacementBrochure>> {
    let conn = &mut pool.get().await?;

    placement_brochures::table
        .find(brochure_id)
        .first::<PlacementBrochure>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the brochure does not exist"))
}

async fn create(
    Extension(pool): Extension<DbPool>,
    AdminOnly: AdminOnly,
    Json(req): Json<BrochureRequest>,
) -> AppResult<(StatusCode, Json<PlacementBrochure>)> {
    #[derive(Insertable)]
    #[diesel(table_name = placement_brochures)]
    struct NewBrochure {
        title: String,
        file_url: String,
        academic_year: String,
    }

    validate(&req)?;

    let conn = &mut pool.get().await?;

    let brochure = diesel::insert_into(placement_brochures::table)
        .values(NewBrochure {
            title: req.title,
            file_url: req.file_url,
            academic_year: req.academic_year,
        })
        .get_result::<PlacementBrochure>(conn)
        .await?;

    Ok((StatusCode::CREATED, Json(brochure)))
}

async fn edit(
    Extension(pool): Extension<DbPool>,
    Path(brochure_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<BrochureRequest>,
) -> AppResult<Json<PlacementBrochure>> {
    #[derive(AsChangeset)]
    #[diesel(table_name = placement_brochures)]
    struct BrochureEdit {
        title: String,
        file_url: String,
        academic_year: String,
    }

    validate(&req)?;

    let conn = &mut pool.get().await?;

    diesel::update(placement_brochures::table.find(brochure_id))
        .set(BrochureEdit {
            title: req.title,
            file_url: req.file_url,
            academic_year: req.academic_year,
        })
        .get_result::<PlacementBrochure>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the brochure does not exist"))
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path(brochure_id): Path<i32>,
    AdminOnly: AdminOnly,
) -> AppResult<Json<()>> {
    let conn = &mut pool.get().await?;

    let deleted = diesel::delete(placement_brochures::table.find(brochure_id))
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the brochure does not exist",
        ));
    }

    Ok(Json(()))
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(info).put(edit).delete(remove))
}
