pub mod droid;
pub mod field_extractor;
pub mod news_site;
pub mod paginator;
pub mod picture_downloader;
pub mod search_controller;
pub mod site_session;
pub mod work_item_source;

pub use droid::*;
pub use field_extractor::*;
pub use news_site::*;
pub use paginator::*;
pub use picture_downloader::*;
pub use search_controller::*;
pub use site_session::*;
pub use work_item_source::*;
