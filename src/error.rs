//! Error types for the browser binding

use portfolio_core::PageError;
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum BindError {
    /// Controller refused the page or its config
    #[error(transparent)]
    Page(#[from] PageError),

    /// No global `window` (not running in a browser main thread)
    #[error("No window available")]
    NoWindow,

    /// Window has no document
    #[error("No document available")]
    NoDocument,

    /// Log subscriber could not be installed
    #[error("Logging error: {0}")]
    Logging(String),

    /// A browser API call threw
    #[error("Host error: {0}")]
    Host(String),
}

impl BindError {
    /// Wrap a thrown JS value.
    pub fn host(value: JsValue) -> Self {
        BindError::Host(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }
}

impl From<BindError> for JsValue {
    fn from(err: BindError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

pub type BindResult<T> = Result<T, BindError>;

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_core::Landmark;

    #[test]
    fn test_page_error_is_transparent() {
        let err: BindError = PageError::MissingLandmark(Landmark::Header).into();
        assert_eq!(err.to_string(), "Required landmark missing: header");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(BindError::NoWindow.to_string(), "No window available");
    }
}
