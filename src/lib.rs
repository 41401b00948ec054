pub mod cache;
pub mod chat;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod recommend;
pub mod retry;
pub mod service;
pub mod storage;
pub mod transport;
pub mod validation;

pub use crate::config::Config;
pub use crate::error::{Result, WayfarerError};
pub use crate::service::AdvisorService;
