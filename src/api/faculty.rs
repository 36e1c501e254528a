use crate::{
    auth::AdminOnly,
    error::{AppError, AppResult},
    models::FacultyMember,
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
struct FacultyRequest {
    full_name: String,
    designation: String,
    department: String,
    photo_url: Option<String>,
    email: Option<String>,
}

fn validate(req: &FacultyRequest) -> AppResult<()> {
    if req.full_name.trim().is_empty() || req.department.trim().is_empty() {
        return Err(AppError::from(
            StatusCode::BAD_REQUEST,
            "name and department are required",
        ));
    }
    Ok(())
}

async fn list(Extension(pool): Extension<DbPool>) -> AppResult<Json<Vec<FacultyMember>>> {
    let conn = &mut pool.get().await?;

    Ok(Json(
        faculty_members::table
            .order(faculty_members::full_name.asc())
            .load::<FacultyMember>(conn)
            .await?,
    ))
}

async fn info(
    Extension(pool): Extension<DbPool>,
    Path(member_id): Path<i32>,
) -> AppResult<Json<FacultyMember>> {
    let conn = &mut pool.get().await?;

    faculty_members::table
        .find(member_id)
        .first::<FacultyMember>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the faculty member does not exist"))
}

async fn create(
    Extension(pool): Extension<DbPool>,
    AdminOnly: AdminOnly,
    Json(req): Json<FacultyRequest>,
) -> AppResult<(StatusCode, Json<FacultyMember>)> {
    #[derive(Insertable)]
    #[diesel(table_name = faculty_members)]
    struct NewFacultyMember {
        full_name: String,
        designation: String,
        department: String,
        photo_url: Option<String>,
        email: Option<String>,
    }

    validate(&req)?;

    let conn = &mut pool.get().await?;

    let member = diesel::insert_into(faculty_members::table)
        .values(NewFacultyMember {
            full_name: req.full_name,
            designation: req.designation,
            department: req.department,
            photo_url: req.photo_url,
            email: req.email,
        })
        .get_result::<FacultyMember>(conn)
        .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

async fn edit(
    Extension(pool): Extension<DbPool>,
    Path(member_id): Path<i32>,
    AdminOnly: AdminOnly,
    Json(req): Json<FacultyRequest>,
) -> AppResult<Json<FacultyMember>> {
    #[derive(AsChangeset)]
    #[diesel(table_name = faculty_members)]
    struct FacultyEdit {
        full_name: String,
        designation: String,
        department: String,
        photo_url: Option<Option<String>>,
        email: Option<Option<String>>,
    }

    validate(&req)?;

    let conn = &mut pool.get().await?;

    diesel::update(faculty_members::table.find(member_id))
        .set(FacultyEdit {
            full_name: req.full_name,
            designation: req.designation,
            department: req.department,
            photo_url: Some(req.photo_url),
            email: Some(req.email),
        })
        .get_result::<FacultyMember>(conn)
        .await
        .optional()?
        .map(Json)
        .ok_or_else(|| AppError::from(StatusCode::NOT_FOUND, "the faculty member does not exist"))
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path(member_id): Path<i32>,
    AdminOnly: AdminOnly,
) -> AppResult<Json<()>> {
    let conn = &mut pool.get().await?;

    let deleted = diesel::delete(faculty_members::table.find(member_id))
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(AppError::from(
            StatusCode::NOT_FOUND,
            "the faculty member does not exist",
        ));
    }

    Ok(Json(()))
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(info).put(edit).delete(remove))
}
