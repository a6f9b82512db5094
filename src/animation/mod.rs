pub mod driver;
pub mod group;
pub mod interpolation;
pub mod plan;
pub mod presets;
pub mod timeline;
pub mod tweening;

// Re-export commonly used types and functions for convenience
pub use driver::{CancelHandle, ManualScheduler, Scheduler, TickDriver};
pub use group::{Step, TweenGroup};
pub use interpolation::{lerp, EaseFunction};
pub use timeline::{PlaybackState, Timeline};
pub use tweening::{Properties, Tween, Tweenable};
