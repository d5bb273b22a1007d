mod shortlink;

pub use shortlink::{create_handler, info_handler, redirect_handler};
