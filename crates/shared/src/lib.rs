//! Shared types, errors, identity and configuration for Stipend.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token validation for caller identity

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, Role};
pub use config::{AllowanceConfig, AppConfig, DatabaseConfig, JwtConfig, ServerConfig};
pub use error::AppError;
pub use jwt::{JwtError, JwtService};
