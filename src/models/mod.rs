//! Data models shared by the store, the form and the HTTP client.

mod notification;
mod record;
mod resource;

pub use notification::*;
pub use record::*;
pub use resource::*;
