mod health;
mod url;

pub use health::{health_handler, root_handler};
pub use url::{echo_handler, recent_handler, redirect_handler, shorten_handler};
