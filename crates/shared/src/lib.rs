//! Shared types, errors, and configuration for BudgetMate.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - JWT service and claims
//! - API request/response payload types
//! - Email service for password-reset delivery
//! - Configuration management

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;

pub use auth::Claims;
pub use config::AppConfig;
pub use email::EmailService;
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
