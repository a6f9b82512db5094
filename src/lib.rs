//! # Prate
//!
//! A small tween engine for animating pop-up notifications.
//!
//! Tweens interpolate opacity and position through caller-supplied setters,
//! compose into parallel groups and sequential timelines, and can be
//! described by a compact textual plan:
//!
//! ```no_run
//! use prate::prelude::*;
//! use std::rc::Rc;
//!
//! let plan = Plan::new()
//!     .parallel(["alpha;0.5s;linear;(0,1)", "offset_from;0.5s;outexpo;(0,-100)"])
//!     .then("wait;4s")
//!     .parallel(["alpha;0.45s;linear;(1,0)", "offset;0.6s;linear;(0,100)"]);
//!
//! let scheduler = Rc::new(ManualScheduler::new());
//! let props = Properties::new().with_opacity(|alpha| println!("opacity {alpha:.2}"));
//! let timeline = build_timeline(&props, &plan, scheduler.clone(), &EngineConfig::default());
//! timeline.play(|| println!("done"));
//! scheduler.run_until_idle(10_000);
//! ```
//!
//! Everything runs on one thread. A [`Scheduler`](animation::driver::Scheduler)
//! supplies the periodic tick; [`ManualScheduler`](animation::driver::ManualScheduler)
//! is a virtual clock and, with the `tokio-runtime` feature,
//! [`TokioScheduler`](runtime::TokioScheduler) uses real timers.

pub mod animation;
pub mod core;
pub mod prelude;
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{AnimationProfile, EngineConfig, MoveSemantics, ToastTimings},
    geo::{Position, Size},
    placement::ScreenCorner,
};

pub use crate::animation::{
    driver::{ManualScheduler, Scheduler, TickDriver},
    group::{Step, TweenGroup},
    interpolation::EaseFunction,
    plan::{build_timeline, InstructionError, Plan, PlanDocument},
    timeline::{PlaybackState, Timeline},
    tweening::{Properties, Tween, Tweenable},
};

/// Install `env_logger`, honouring `RUST_LOG` and defaulting to `info`.
///
/// Returns `false` when a logger was already installed.
#[cfg(feature = "debug")]
pub fn init_logging() -> bool {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, PrateError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum PrateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = PrateError;
