//! HTTP transport for the Model Context Protocol
//!
//! Provides the `/mcp/v1` endpoint plus read-only informational routes.

pub mod handlers;
