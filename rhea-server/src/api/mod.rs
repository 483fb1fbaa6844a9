pub mod characters;
pub mod chat;
pub mod config;
pub mod context;
pub mod events;
pub mod profiles;
pub mod response;
pub mod session;
pub mod state;

pub use response::{ApiError, ApiResult, MessageBody};
pub use state::{AppState, SessionQuery};
