//! WASM bindings for nametag-sheets
//!
//! This crate provides JavaScript-friendly API for:
//! - Registering fonts fetched by the page
//! - Validating roster rows before upload
//! - Generating a ZIP of name tags or A4 print sheets
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { NametagGenerator } from 'nametag-wasm';
//!
//! await init();
//!
//! const generator = new NametagGenerator();
//! generator.loadBundledFont(new Uint8Array(await (await fetch('/fonts/NotoSansKR-Regular.ttf')).arrayBuffer()));
//!
//! const problems = generator.validateRoster(rows);
//! if (problems.length === 0) {
//!   const zip = generator.generate({ personData: rows, smallNametagFiles, bigNametagFiles, useArrangedLayout: true });
//!   saveAs(new Blob([zip]), 'nametags.zip');
//! }
//! ```

use nametag::{GenerationRequest, Generator, RandomPicker, SheetConfig};
use roster::{validate_rows, RawRow, RosterError};
use sheet_core::FontLibrary;
use wasm_bindgen::prelude::*;

/// Forwards `log` records to the browser console
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&message),
            log::Level::Warn => web_sys::console::warn_1(&message),
            _ => web_sys::console::log_1(&message),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Warn);
    }
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// One message per invalid row; empty when every row is usable
fn roster_problems(rows: &[RawRow]) -> Vec<String> {
    match validate_rows(rows) {
        Ok(_) => Vec::new(),
        Err(RosterError::Validation(errors)) => errors.iter().map(|e| e.to_string()).collect(),
        Err(other) => vec![other.to_string()],
    }
}

/// Name tag generator
#[wasm_bindgen]
pub struct NametagGenerator {
    fonts: FontLibrary,
    config: SheetConfig,
    seed: Option<u64>,
}

#[wasm_bindgen]
impl NametagGenerator {
    /// Create a generator with no fonts loaded
    #[wasm_bindgen(constructor)]
    pub fn new() -> NametagGenerator {
        NametagGenerator {
            fonts: FontLibrary::empty(),
            config: SheetConfig::default(),
            seed: None,
        }
    }

    /// Load the bundled Korean font
    ///
    /// Replaces any fonts loaded so far; the bundled face comes first in
    /// the fallback order.
    ///
    /// @param data - TTF/OTF file bytes (Uint8Array)
    #[wasm_bindgen(js_name = loadBundledFont)]
    pub fn load_bundled_font(&mut self, data: &[u8]) -> Result<(), JsValue> {
        self.fonts = FontLibrary::with_bundled(data).map_err(js_error)?;
        Ok(())
    }

    /// Load an additional fallback font
    ///
    /// @param name - Font identifier (for error messages)
    /// @param data - TTF/OTF/TTC file bytes (Uint8Array)
    #[wasm_bindgen(js_name = loadFont)]
    pub fn load_font(&mut self, name: &str, data: &[u8]) -> Result<(), JsValue> {
        self.fonts
            .add_font(data)
            .map_err(|e| JsValue::from_str(&format!("{name}: {e}")))
    }

    /// Whether the bundled font was loaded
    #[wasm_bindgen(getter, js_name = bundledFontAvailable)]
    pub fn bundled_font_available(&self) -> bool {
        self.fonts.is_bundled_available()
    }

    /// Fix the template choice sequence
    ///
    /// @param seed - Any integer (BigInt)
    #[wasm_bindgen(js_name = setSeed)]
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    /// Override sheet geometry, spares or colours
    ///
    /// @param json - Partial SheetConfig JSON
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, json: &str) -> Result<(), JsValue> {
        self.config = SheetConfig::from_json(json).map_err(js_error)?;
        Ok(())
    }

    /// Validate roster rows
    ///
    /// @param rows - Array of row objects (sheet_to_json output)
    /// @returns Array of messages, empty when valid
    #[wasm_bindgen(js_name = validateRoster)]
    pub fn validate_roster(&self, rows: JsValue) -> Result<js_sys::Array, JsValue> {
        let rows: Vec<RawRow> = serde_wasm_bindgen::from_value(rows)?;
        Ok(roster_problems(&rows)
            .into_iter()
            .map(|m| JsValue::from_str(&m))
            .collect())
    }

    /// Generate name tags
    ///
    /// @param request - Request object (personData, templates, layout options)
    /// @returns ZIP bytes (Uint8Array)
    pub fn generate(&self, request: JsValue) -> Result<Vec<u8>, JsValue> {
        let request: GenerationRequest = serde_wasm_bindgen::from_value(request)?;
        self.run(&request)
    }

    /// Generate name tags from a JSON string
    ///
    /// @param json - Request JSON
    /// @returns ZIP bytes (Uint8Array)
    #[wasm_bindgen(js_name = generateFromJson)]
    pub fn generate_from_json(&self, json: &str) -> Result<Vec<u8>, JsValue> {
        let request = GenerationRequest::from_json(json).map_err(js_error)?;
        self.run(&request)
    }

    fn run(&self, request: &GenerationRequest) -> Result<Vec<u8>, JsValue> {
        let mut picker = match self.seed {
            Some(seed) => RandomPicker::seeded(seed),
            None => RandomPicker::from_entropy(),
        };
        let (_, bytes) = Generator::with_config(&self.fonts, self.config.clone())
            .generate_archive(request, &mut picker)
            .map_err(js_error)?;
        Ok(bytes)
    }
}

impl Default for NametagGenerator {
    fn default() -> Self {
        Self::new()
    }
}
