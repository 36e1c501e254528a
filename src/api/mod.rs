use axum::Router;

pub mod albums;
pub mod auth;
pub mod brochures;
pub mod clippings;
pub mod conferences;
pub mod events;
pub mod faculty;
pub mod notable;
pub mod publications;
pub mod registrations;
pub mod tiers;
pub mod tours;
pub mod videos;
pub mod visitors;

pub fn app() -> Router {
    Router::new()
        .nest("/auth", auth::app())
        .nest("/registrations", registrations::app())
        .nest("/tiers", tiers::app())
        .nest("/events", events::app())
        .nest("/albums", albums::app())
        .nest("/videos", videos::app())
        .nest("/conferences", conferences::app())
        .nest("/brochures", brochures::app())
        .nest("/publications", publications::app())
        .nest("/faculty", faculty::app())
        .nest("/notable", notable::app())
        .nest("/visitors", visitors::app())
        .nest("/clippings", clippings::app())
        .nest("/tours", tours::app())
        .nest("/upload", crate::upload::app())
}
