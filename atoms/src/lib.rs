pub mod arrange;
pub mod dynamo;
pub mod error;
pub mod lifecycle;
pub mod priority;
pub mod respond;
pub mod spaces;
pub mod sublists;
pub mod tasks;
pub mod view;

pub use error::TodoError;
