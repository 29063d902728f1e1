#![forbid(unsafe_code)]
//! Browser shell for the Tallyking engine: `localStorage` persistence, a JS
//! clock, console logging and a `wasm_bindgen` handle that takes user intents.
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod bridge;
pub mod clock;
pub mod dom;
pub mod intent;
pub mod logging;
pub mod storage;

pub use bridge::ScoreKeeperHandle;
pub use clock::JsClock;
pub use intent::{Intent, PointsInput, Response, dispatch};
pub use storage::{WebStorage, WebStorageError};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}
