// Browser console logging
// console_log! / console_error! forward to console.log / console.error.
// Native builds (unit tests) have no console, so they print to stderr.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn error(s: &str);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log(s: &str) {
    eprintln!("{}", s);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn error(s: &str) {
    eprintln!("error: {}", s);
}

macro_rules! console_log {
    ($($t:tt)*) => ($crate::console::log(&format_args!($($t)*).to_string()))
}

macro_rules! console_error {
    ($($t:tt)*) => ($crate::console::error(&format_args!($($t)*).to_string()))
}
