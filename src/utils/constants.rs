//! Shared configuration constants for restyle
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Default bind host: all interfaces, so the browser extension can reach a
/// server running in a container or VM
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default bind port
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Maximum accepted `html_structure` size: 10 MB
///
/// Large pages serialize to a few MB of markup:
/// - Very large pages: ~2-3 MB
/// - Typical app shells: 100 KB - 1 MB
///
/// The reduction engine itself has no size limit; this is enforced at the
/// HTTP boundary to prevent memory exhaustion.
pub const DEFAULT_MAX_HTML_BYTES: usize = 10 * 1024 * 1024;

/// Extra body allowance on top of `max_html_bytes` for the JSON envelope
/// and the prompt
pub const REQUEST_ENVELOPE_SLACK_BYTES: usize = 64 * 1024;

/// Default completion request timeout: 60 seconds
///
/// Long CSS generations with large output caps routinely take 20-40 s.
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 60;

/// Placeholder value shipped in `.env` templates; treated as "no key"
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";

/// Default directory for saved request HTML
pub const DEFAULT_HTML_LOG_DIR: &str = "requests";

/// Default directory for saved generated CSS
pub const DEFAULT_CSS_LOG_DIR: &str = "css";

/// Number of prompt characters used in artifact file names
pub const PROMPT_SLUG_CHARS: usize = 30;

/// Number of CSS characters shown in the debug log preview
pub const CSS_PREVIEW_CHARS: usize = 500;
