//! Reusable page widgets

pub mod cookie_banner;
pub mod footer;
pub mod header;
pub mod search;

pub use cookie_banner::CookieBannerComponent;
pub use footer::FooterComponent;
pub use header::HeaderComponent;
pub use search::SearchComponent;
