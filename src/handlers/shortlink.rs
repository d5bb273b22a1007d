use actix_web::{http::header::LOCATION, web, HttpResponse, Responder};
use log::{debug, info};
use validator::Validate;

use crate::{
    models::{ShortenRequestDto, ShortlinkInfoQuery, ShortlinkResponseDto},
    services::ShortlinkServiceTrait,
    types::Result,
};

pub type ShortlinkServiceType = dyn ShortlinkServiceTrait;

/// Create shortlink route handler
pub async fn create_handler(
    dto: web::Json<ShortenRequestDto>,
    service: web::Data<ShortlinkServiceType>,
) -> Result<impl Responder> {
    let dto = dto.into_inner();
    dto.validate()?;

    let shortlink = service
        .shorten(&dto.url, dto.expiration_minutes())
        .await?;
    info!("Shortened '{}' to '{}'", dto.url, shortlink);

    Ok(HttpResponse::Created().json(ShortlinkResponseDto { shortlink }))
}

/// Shortlink detail route handler
pub async fn info_handler(
    query: web::Query<ShortlinkInfoQuery>,
    service: web::Data<ShortlinkServiceType>,
) -> Result<impl Responder> {
    let query = query.into_inner();
    query.validate()?;

    let detail = service.shortlink_info(&query.shortlink).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// Redirect route handler
pub async fn redirect_handler(
    path: web::Path<String>,
    service: web::Data<ShortlinkServiceType>,
) -> Result<impl Responder> {
    let shortlink = path.into_inner();
    debug!("Redirect requested for shortlink: {}", shortlink);

    let url = service.unshorten(&shortlink).await.inspect_err(|e| {
        if e.is_not_found() {
            info!("No live shortlink '{}'", shortlink);
        }
    })?;
    info!("Redirecting '{}' to '{}'", shortlink, url);

    Ok(HttpResponse::TemporaryRedirect()
        .insert_header((LOCATION, url))
        .finish())
}
