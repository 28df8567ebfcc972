//! Portfolio page browser binding.
//!
//! Compiled to WebAssembly and loaded by the static portfolio page. On start
//! it reads the optional `#portfolio-config` JSON document, installs the
//! console log sink, and binds the [`portfolio_core::Controller`] to the live
//! DOM as soon as the document has been parsed.

mod app;
mod debug;
mod dom;
mod error;
mod logging;

use portfolio_core::PortfolioConfig;
use wasm_bindgen::prelude::*;

pub use debug::PortfolioDebug;
pub use error::{BindError, BindResult};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let config = match app::load_config() {
        Ok(config) => config,
        Err(err) => {
            let _ = logging::init(&PortfolioConfig::default().log_filter);
            tracing::error!(%err, "invalid portfolio config");
            return Err(err.into());
        }
    };

    logging::init(&config.log_filter)?;
    tracing::debug!(?config, "starting portfolio");

    app::boot(config).map_err(|err| {
        tracing::error!(%err, "portfolio failed to start");
        JsValue::from(err)
    })
}
