//! Leptos hooks over browser state.
//!
//! Each hook returns plain Leptos signals and releases its browser listeners
//! or store subscriptions through `on_cleanup` when the owning scope is
//! disposed.

pub mod online_status;
pub mod responsive_display;
pub mod storage_state;

pub use online_status::use_online_status;
pub use responsive_display::{DEFAULT_BREAKPOINT_PX, use_responsive_display};
pub use storage_state::{use_local_storage, use_storage_state};
