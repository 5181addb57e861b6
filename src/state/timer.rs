// Repeating window interval that owns its callback.
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::error::TimerError;
use crate::util::describe_js_error;

#[derive(Default)]
pub struct Ticker {
    active: Option<(i32, Closure<dyn FnMut()>)>,
}

impl Ticker {
    /// Starts firing `on_tick` every `interval_ms`. An already running interval is replaced.
    pub fn start(&mut self, interval_ms: u32, on_tick: impl FnMut() + 'static) -> Result<(), TimerError> {
        self.stop();
        let window = web_sys::window().ok_or(TimerError::NoWindow)?;
        let closure = Closure::wrap(Box::new(on_tick) as Box<dyn FnMut()>);
        let id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                interval_ms.min(i32::MAX as u32) as i32,
            )
            .map_err(|e| TimerError::Schedule(describe_js_error(&e)))?;
        self.active = Some((id, closure));
        Ok(())
    }

    /// Clears the interval. Stopping a stopped ticker does nothing.
    pub fn stop(&mut self) {
        if let Some((id, _closure)) = self.active.take() {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(id);
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
