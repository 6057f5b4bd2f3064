mod entry;
pub mod payload;
pub mod todos;

pub use entry::{API_PREFIX, app, router};
