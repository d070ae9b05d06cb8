//! Request and response bodies for the HTTP API

use serde::{Deserialize, Serialize};

/// Body of `POST /restyle`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestyleRequest {
    /// Art direction, e.g. "make it look like a 90s terminal"
    pub prompt: String,
    /// Serialized page markup captured by the extension
    pub html_structure: String,
}

/// Successful `POST /restyle` response; the CSS is passed through verbatim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestyleResponse {
    pub generated_style: String,
}

/// Error body, the `{"detail": ...}` shape the extension already parses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
