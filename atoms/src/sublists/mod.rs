pub mod model;
pub mod service;
pub mod http;

pub use model::{
    CreateItemPayload, CreateSubListPayload, SubList, SubListItem, UpdateItemPayload,
    UpdateSubListPayload,
};
pub use service::*;
