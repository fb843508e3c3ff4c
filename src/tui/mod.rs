mod handler;
mod ui;

pub use handler::{handle_key_event, AppAction, View};
pub use ui::draw;
