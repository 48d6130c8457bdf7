//! Model Context Protocol (MCP) dispatch and JSON-RPC representations
//!
//! Provides message classification, method routing, and error-code mapping.

pub mod rpc;
pub mod server;
