//! IETF RFC Document MCP Service
//!
//! This crate provides an MCP service for fetching and reading IETF RFC
//! documents from the RFC Editor. It downloads and caches the master RFC
//! index, parses it into a number→title map, fetches individual RFC bodies
//! on demand, and serves paginated slices of document content with
//! lightweight metadata (page markers, truncation state).
//!
//! # Features
//!
//! - Download-once filesystem cache for the index and each document
//! - Title keyword search over the parsed index
//! - Line-based pagination with truncation/continuation metadata
//! - MCP server implementation over SSE or stdio transports
//!
//! # Modules
//!
//! - [`cache`]: Filesystem cache for the RFC index and document bodies
//! - [`index`]: RFC index parsing and title search
//! - [`document`]: Document pagination and page-marker extraction
//! - [`mcp`]: MCP server implementation and tool definitions

pub mod cache;
pub mod document;
pub mod index;
pub mod mcp;
