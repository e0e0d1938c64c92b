pub mod asset_service;
pub mod page_service;
pub mod render_service;

pub use asset_service::{Asset, AssetService, CachePolicy};
pub use page_service::PageService;
pub use render_service::RenderService;
