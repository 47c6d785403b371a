//! Network connectivity as a signal.
//!
//! Starts from `navigator.onLine` and follows the window `online`/`offline`
//! events. Outside the browser the status is a constant `true`.

use leptos::prelude::*;

#[cfg(test)]
#[path = "online_status_test.rs"]
mod online_status_test;

/// Whether the browser currently reports a network connection.
pub fn use_online_status() -> ReadSignal<bool> {
    let (online, set_online) = signal(initial_online_status());

    #[cfg(feature = "hydrate")]
    {
        let on_online = window_event_listener(leptos::ev::online, move |_| set_online.set(true));
        let on_offline = window_event_listener(leptos::ev::offline, move |_| set_online.set(false));
        on_cleanup(move || {
            on_online.remove();
            on_offline.remove();
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = set_online;
    }

    online
}

/// `navigator.onLine`, or `true` when there is no navigator to ask.
pub fn initial_online_status() -> bool {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window().is_none_or(|w| w.navigator().on_line())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        true
    }
}
