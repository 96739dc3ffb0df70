mod navbar;
mod status_bar;

pub use navbar::Navbar;
pub use status_bar::StatusBar;
