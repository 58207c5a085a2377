//! Error handling utilities for MCP server

use rmcp::ErrorData;
use wayfarer_core::WayfarerError;

/// Helper to convert cache errors to MCP errors
pub fn to_mcp_error(message: &str, error: &WayfarerError) -> ErrorData {
    match error {
        WayfarerError::InvalidInput { .. } => {
            ErrorData::invalid_params(format!("{message}: {error}"), None)
        }
        _ => ErrorData::internal_error(format!("{message}: {error}"), None),
    }
}
