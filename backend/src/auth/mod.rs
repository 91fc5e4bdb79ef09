//! Authentication module for managing sessions and access control.
//!
//! This module provides the public interface for login, token management,
//! the request authorization gate, and the static route policy it enforces.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod routes;
pub mod service;
