//! Application services for the administrative surface.

pub mod popups;
pub mod posts;

pub use popups::{AdminPopupError, AdminPopupService, PopupInput};
pub use posts::AdminPostService;
