// Formatting and console helpers shared by the components.

use wasm_bindgen::{JsCast, JsValue};

/// Elapsed milliseconds as seconds with one decimal, e.g. `12345` -> `"12.3"`.
pub fn format_time(ms: u64) -> String {
    // Rounds half away from zero on the tenths digit.
    let tenths = (ms + 50) / 100;
    format!("{}.{}", tenths / 10, tenths % 10)
}

pub fn clog(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&JsValue::from_str(msg));
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{msg}");
}

pub fn cwarn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(msg));
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("warning: {msg}");
}

/// Best-effort message for a thrown JS value (storage quota errors, security errors, ...).
pub fn describe_js_error(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_tenths_of_seconds() {
        assert_eq!(format_time(0), "0.0");
        assert_eq!(format_time(100), "0.1");
        assert_eq!(format_time(12_345), "12.3");
        assert_eq!(format_time(59_950), "60.0");
        assert_eq!(format_time(61_000), "61.0");
    }
}
