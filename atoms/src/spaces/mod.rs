pub mod model;
pub mod service;
pub mod http;

pub use model::{CreateSpacePayload, Space, UpdateSpacePayload};
pub use service::*;
