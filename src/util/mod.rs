//! Text helpers shared by the renderers and the terminal host.
//!
//! - **HTML**: lenient entity decoding, escaping, markup → plain text
//! - **Text**: Unicode-aware width calculation, truncation and wrapping
//! - **URL validation**: scheme checks before opening external links

mod html;
mod text;
mod url_validator;

pub use html::{decode_entities, escape_html, to_plain_text};
pub use text::{display_width, strip_control_chars, truncate_to_width, wrap_to_width};
pub use url_validator::{validate_url_for_open, UrlValidationError};

/// Maximum length of a search term typed into the terminal host.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
