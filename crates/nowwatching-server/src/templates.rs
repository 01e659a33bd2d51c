//! Markup rendering for the widget and the login confirmation page.

mod callback;
mod widget;

pub use callback::render_callback;
pub use widget::render_widget;
