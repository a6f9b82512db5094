//! Prelude module for common prate types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use prate::prelude::*;`

pub use crate::core::{
    config::{AnimationProfile, EngineConfig, MoveSemantics, ToastTimings},
    geo::{Position, Size},
    placement::{place_by_name, ScreenCorner},
};

pub use crate::animation::{
    driver::{CancelHandle, ManualScheduler, Scheduler, TickDriver},
    group::{Step, TweenGroup},
    interpolation::{lerp, EaseFunction},
    plan::{
        build_timeline, parse_instruction, InstructionError, Plan, PlanDocument, PlanEntry,
        PlanToken, TokenKind,
    },
    presets::{move_down, move_down_here, move_up, move_up_here, toast_timeline},
    timeline::{PlaybackState, Timeline},
    tweening::{Motion, Properties, Tween, Tweenable},
};

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::TokioScheduler;

pub use crate::{Error as PrateError, Result};
