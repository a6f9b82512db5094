use anyhow::Context;
use prate::{
    constants::DEFAULT_WINDOW_SIZE,
    prelude::*,
    runtime::{self, TokioScheduler},
};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

const SCREEN_SIZE: (i32, i32) = (1920, 1080);

/// Plays a pop-up animation against a window that only exists in the log.
///
/// Usage: `prate-app [PLAN.json] [CONFIG.json] [SCREEN-POSITION]`
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    prate::init_logging();

    let mut args = std::env::args().skip(1);
    let plan_path = args.next().map(PathBuf::from);
    let config = match args.next() {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => EngineConfig::default(),
    };
    let corner = match args.next() {
        Some(name) => name.parse::<ScreenCorner>()?,
        None => ScreenCorner::RightBottom,
    };

    let window = SimulatedWindow::new(corner);
    let properties = window.properties();

    tokio::task::LocalSet::new()
        .run_until(async move {
            let scheduler = Rc::new(TokioScheduler::new());
            let timeline = match &plan_path {
                Some(path) => PlanDocument::load(path)
                    .with_context(|| format!("failed to load plan from {}", path.display()))?
                    .build_timeline(&properties, scheduler, &config),
                None => toast_timeline(&properties, scheduler, &config),
            };

            if timeline.is_empty() {
                log::warn!("plan produced no steps, nothing to play");
                return anyhow::Ok(());
            }

            println!("{}", timeline.dump());
            let started = Instant::now();
            let finished = runtime::play(&timeline).await;
            let state = window.state.borrow();
            log::info!(
                "{} in {:?}: opacity {:.2}, position {}",
                if finished { "finished" } else { "stopped" },
                started.elapsed(),
                state.opacity,
                state.position
            );
            anyhow::Ok(())
        })
        .await
}

#[derive(Debug)]
struct WindowState {
    opacity: f64,
    position: Position,
}

/// A stand-in pop-up placed on a fixed-size virtual screen
struct SimulatedWindow {
    state: Rc<RefCell<WindowState>>,
}

impl SimulatedWindow {
    fn new(corner: ScreenCorner) -> Self {
        let position =
            corner.place_default(Size::from(SCREEN_SIZE), Size::from(DEFAULT_WINDOW_SIZE));
        log::info!("window placed at {} ({})", position, corner);
        Self {
            state: Rc::new(RefCell::new(WindowState {
                opacity: 0.0,
                position,
            })),
        }
    }

    fn properties(&self) -> Properties {
        let opacity = self.state.clone();
        let moved = self.state.clone();
        let source = self.state.clone();

        Properties::new()
            .with_opacity(move |alpha| {
                opacity.borrow_mut().opacity = alpha;
                log::debug!("opacity {:.3}", alpha);
            })
            .with_position(move |x, y| {
                moved.borrow_mut().position = Position::new(x, y);
                log::debug!("position ({},{})", x, y);
            })
            .with_position_source(move || {
                let position = source.borrow().position;
                (position.x, position.y)
            })
    }
}
