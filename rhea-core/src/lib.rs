//! # rhea-core
//!
//! Core types shared by the chat runtime and its transports: [`ChatEvent`] payloads, the
//! [`ChatSink`] transport capability, [`RheaError`], environment-level [`AppConfig`], and tracing
//! initialization. Transport-agnostic; used by chat-runtime, rhea-server and rhea-cli.

pub mod config;
pub mod error;
pub mod logger;
pub mod sink;
pub mod types;

pub use config::AppConfig;
pub use error::{Result, RheaError};
pub use logger::init_tracing;
pub use sink::{ChannelSink, ChatSink};
pub use types::{ChatEvent, ClientFrame, DEFAULT_SESSION_ID};
