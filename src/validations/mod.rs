mod shortlink;

pub use shortlink::{validate_shortlink, validate_url};
