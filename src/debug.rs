//! `window.portfolio`: manual access to the controller from DevTools.

use portfolio_core::DebugCommand;
use wasm_bindgen::prelude::*;

use crate::app::{self, Dispatcher};
use crate::error::{BindError, BindResult};

/// Global the handle is published under.
const GLOBAL_NAME: &str = "portfolio";

#[wasm_bindgen]
pub struct PortfolioDebug {
    dispatcher: Dispatcher,
}

#[wasm_bindgen]
impl PortfolioDebug {
    #[wasm_bindgen(js_name = toggleMobileMenu)]
    pub fn toggle_mobile_menu(&self) -> Result<(), JsValue> {
        self.invoke(DebugCommand::ToggleMobileMenu)
    }

    #[wasm_bindgen(js_name = updateActiveNav)]
    pub fn update_active_nav(&self) -> Result<(), JsValue> {
        self.invoke(DebugCommand::UpdateActiveNav)
    }

    #[wasm_bindgen(js_name = closeMobileMenu)]
    pub fn close_mobile_menu(&self) -> Result<(), JsValue> {
        self.invoke(DebugCommand::CloseMobileMenu)
    }

    pub fn init(&self) -> Result<(), JsValue> {
        self.invoke(DebugCommand::Init)
    }

    /// Run a command by name, e.g. `portfolio.run("updateActiveNav")`.
    pub fn run(&self, name: &str) -> Result<(), JsValue> {
        let command: DebugCommand = name.parse().map_err(BindError::from)?;
        self.invoke(command)
    }

    /// Id of the section whose nav link is active.
    #[wasm_bindgen(js_name = activeSection)]
    pub fn active_section(&self) -> Option<String> {
        self.dispatcher
            .with_controller(|c| c.active_section().map(str::to_string))
            .flatten()
    }

    #[wasm_bindgen(js_name = isMenuOpen)]
    pub fn is_menu_open(&self) -> bool {
        self.dispatcher
            .with_controller(|c| c.is_menu_open())
            .unwrap_or(false)
    }
}

impl PortfolioDebug {
    fn invoke(&self, command: DebugCommand) -> Result<(), JsValue> {
        self.dispatcher
            .with_controller(|c| c.run_debug(command))
            .ok_or_else(|| BindError::Host(format!("controller busy, {} skipped", command)).into())
    }
}

/// Publish the debug handle on `window`.
pub fn expose(dispatcher: Dispatcher) -> BindResult<()> {
    let window = app::window()?;
    let handle = JsValue::from(PortfolioDebug { dispatcher });
    js_sys::Reflect::set(&window, &JsValue::from_str(GLOBAL_NAME), &handle)
        .map_err(BindError::host)?;
    Ok(())
}
