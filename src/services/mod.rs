use std::sync::Arc;
use std::time::Duration;

use actix_web::web;

mod shortlink;

pub use shortlink::{ShortlinkServiceTrait, ShortlinkStore};

use crate::repositories::KeyValueStore;

/// Build the shortlink engine over whichever backend was opened at startup
pub fn build(
    store: Arc<dyn KeyValueStore>,
    deadline: Option<Duration>,
) -> Arc<dyn ShortlinkServiceTrait> {
    Arc::new(ShortlinkStore::new(store).with_deadline(deadline))
}

/// Service Register
pub fn register(service: Arc<dyn ShortlinkServiceTrait>, cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::Data::from(service));
}
