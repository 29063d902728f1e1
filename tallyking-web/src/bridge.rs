//! JavaScript-facing handle around the engine
use tallyking_game::ScoreKeeper;
use wasm_bindgen::prelude::*;

use crate::clock::JsClock;
use crate::intent::{self, Intent};
use crate::storage::WebStorage;

/// One engine per page, restored from `localStorage` on construction.
#[wasm_bindgen]
pub struct ScoreKeeperHandle {
    keeper: ScoreKeeper<WebStorage, JsClock>,
}

#[wasm_bindgen]
impl ScoreKeeperHandle {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            keeper: ScoreKeeper::load(WebStorage, JsClock),
        }
    }

    /// Apply a user intent (`{type: "addScore", ...}`) and return the view to render.
    ///
    /// # Errors
    /// Returns a message string when the intent is malformed or rejected.
    pub fn dispatch(&mut self, intent: JsValue) -> Result<JsValue, JsValue> {
        let intent: Intent = serde_wasm_bindgen::from_value(intent)
            .map_err(|e| JsValue::from_str(&format!("malformed intent: {e}")))?;
        let response = intent::dispatch(&mut self.keeper, intent)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_wasm_bindgen::to_value(&response).map_err(Into::into)
    }

    /// Catalog for the game picker.
    ///
    /// # Errors
    /// Returns an error if the catalog cannot be converted to a JS value.
    pub fn games(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.keeper.catalog().as_slice()).map_err(Into::into)
    }

    /// Names from the last game, for prefilling the setup form.
    #[wasm_bindgen(js_name = lastPlayers)]
    #[must_use]
    pub fn last_players(&self) -> Vec<String> {
        self.keeper.last_players().to_vec()
    }
}

impl Default for ScoreKeeperHandle {
    fn default() -> Self {
        Self::new()
    }
}
