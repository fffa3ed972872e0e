//! MCP tool implementations.
//!
//! This module contains all tools exposed by the binp server.

pub mod snippet;
