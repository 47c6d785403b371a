//! Viewport-width breakpoint as a signal.
//!
//! SYSTEM CONTEXT
//! ==============
//! The width is checked synchronously when the hook runs and again on every
//! window `resize`. The signal only changes when the result crosses the
//! breakpoint, so resizes within one side of it do not re-render readers.

use leptos::prelude::*;

#[cfg(test)]
#[path = "responsive_display_test.rs"]
mod responsive_display_test;

/// Breakpoint used by most layouts to switch to the compact display.
pub const DEFAULT_BREAKPOINT_PX: f64 = 768.0;

/// `true` while the viewport is narrower than `breakpoint` pixels.
pub fn use_responsive_display(breakpoint: f64) -> ReadSignal<bool> {
    let (smaller, set_smaller) = signal(viewport_width().is_some_and(|w| is_below_breakpoint(w, breakpoint)));

    #[cfg(feature = "hydrate")]
    {
        let on_resize = window_event_listener(leptos::ev::resize, move |_| {
            let next = viewport_width().is_some_and(|w| is_below_breakpoint(w, breakpoint));
            if smaller.get_untracked() != next {
                set_smaller.set(next);
            }
        });
        on_cleanup(move || on_resize.remove());
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = set_smaller;
    }

    smaller
}

/// Whether a viewport `width` counts as smaller than `breakpoint`.
pub fn is_below_breakpoint(width: f64, breakpoint: f64) -> bool {
    width < breakpoint
}

/// `window.innerWidth` in CSS pixels, if known.
pub fn viewport_width() -> Option<f64> {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()?.inner_width().ok()?.as_f64()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}
