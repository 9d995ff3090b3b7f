use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;

/// Monotonic request counter used to ignore stale responses.
///
/// Each request takes a ticket; only the holder of the latest ticket may apply
/// its result.
#[derive(Clone, Debug, Default)]
pub(crate) struct RequestSeq(Rc<Cell<u64>>);

impl RequestSeq {
    pub fn next(&self) -> u64 {
        let id = self.0.get().wrapping_add(1);
        self.0.set(id);
        id
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.0.get() == ticket
    }
}

/// Trailing-edge debounce on top of `window.setTimeout`.
#[derive(Clone)]
pub(crate) struct Debouncer {
    delay_ms: i32,
    timer_id: Rc<Cell<Option<i32>>>,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms: i32::try_from(delay_ms).unwrap_or(i32::MAX),
            timer_id: Rc::new(Cell::new(None)),
        }
    }

    /// Run `f` once `delay_ms` have passed without another call.
    pub fn schedule(&self, f: impl FnOnce() + 'static) {
        let Some(win) = web_sys::window() else {
            return;
        };

        self.cancel();

        let timer_id = self.timer_id.clone();
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
            timer_id.set(None);
            f();
        });

        let tid = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                self.delay_ms,
            )
            .unwrap_or(0);
        self.timer_id.set(Some(tid));
    }

    pub fn cancel(&self) {
        if let Some(tid) = self.timer_id.take() {
            if let Some(win) = web_sys::window() {
                win.clear_timeout_with_handle(tid);
            }
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.timer_id.get().is_some()
    }
}
