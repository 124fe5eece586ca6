//! Page objects
//!
//! Each page owns the locators for its own markup and composes the shared
//! widgets from `components`. Methods record steps on the page; nothing
//! touches a browser until the fixture runs.

pub mod base;
pub mod home;
pub mod sports;

pub use base::BasePage;
pub use home::HomePage;
pub use sports::SportsPage;
