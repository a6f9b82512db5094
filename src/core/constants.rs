//! Engine-wide defaults.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// Default tick interval of a timeline, in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 5;

/// Smallest tick budget any tween, group or driver run can have.
pub const MIN_TICKS: u64 = 1;

/// Margin kept between a placed pop-up and the screen edge, in pixels.
pub const DEFAULT_SCREEN_PADDING: i32 = 12;

/// Default pop-up window size in pixels (width, height).
pub const DEFAULT_WINDOW_SIZE: (i32, i32) = (280, 400);

/// Longest duration a plan instruction may ask for (one day), in milliseconds.
pub const MAX_PLAN_DURATION_MS: u64 = 24 * 60 * 60 * 1000;
