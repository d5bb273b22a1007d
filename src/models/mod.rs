mod shortlink;

pub use shortlink::{ShortenRequestDto, ShortlinkInfoQuery, ShortlinkResponseDto, UrlDetail};
