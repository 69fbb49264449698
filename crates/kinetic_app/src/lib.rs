//! Kinetic Showcase
//!
//! The motion showcase page plus a headless scenario runner that drives it
//! frame by frame and checks its behavior.
//!
//! # Example
//!
//! ```ignore
//! use kinetic_app::prelude::*;
//!
//! let config = AppConfig::load_or_default(Path::new("."))?;
//! let outcome = run_loaded_scenario(&HeadlessScenario::acceptance()?, config.run_config())?;
//! assert!(!outcome.is_failed());
//! ```

pub mod config;
mod error;
pub mod headless_assert;
pub mod headless_report;
pub mod headless_runner;
pub mod headless_runtime;
pub mod headless_scenario;
pub mod page;

pub use config::{AppConfig, HeadlessConfig, LogConfig, ViewportConfig, CONFIG_FILE};
pub use error::{AppError, Result};
pub use headless_report::{HeadlessReport, ReportStatus, StepFailure};
pub use headless_runner::{run_loaded_scenario, run_scenario, HeadlessRunner, RunOutcome};
pub use headless_runtime::{HeadlessContext, HeadlessRunConfig, HeadlessRuntime};
pub use headless_scenario::{ExpectedValue, HeadlessScenario, ScenarioStep, ACCEPTANCE_SCENARIO};
pub use page::{build_page, ids, mount_page, Page};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::error::{AppError, Result};
    pub use crate::headless_runner::{run_loaded_scenario, run_scenario, HeadlessRunner, RunOutcome};
    pub use crate::headless_runtime::HeadlessRunConfig;
    pub use crate::headless_scenario::HeadlessScenario;
    pub use crate::page::{ids, mount_page};

    pub use kinetic_core::{Point, Rect, Size};
    pub use kinetic_motion::{MotionScene, Property};
}
