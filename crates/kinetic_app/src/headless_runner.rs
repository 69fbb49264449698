//! Scenario runner that drives a motion scene headlessly.

use crate::headless_assert::{
    evaluate_assert_animating, evaluate_assert_exists, evaluate_assert_gesture,
    evaluate_assert_in_view, evaluate_assert_range, evaluate_assert_scroll_binding,
    evaluate_assert_scroll_progress, evaluate_assert_text_contains, evaluate_assert_value,
    AssertionResult,
};
use crate::headless_report::{HeadlessReport, StepFailure};
use crate::headless_runtime::{HeadlessRunConfig, HeadlessRuntime};
use crate::headless_scenario::{HeadlessScenario, ScenarioStep};
use crate::page::mount_page;
use anyhow::Result;
use kinetic_core::events::event_types::*;
use kinetic_core::{Event, EventType, Point, Size};
use kinetic_motion::{MotionScene, Property};

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn into_report(self) -> HeadlessReport {
        match self {
            RunOutcome::Passed { report } | RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// A range that must hold on every probe after it is registered.
#[derive(Debug, Clone)]
struct Watch {
    step_index: usize,
    id: String,
    property: Property,
    min: f32,
    max: f32,
}

/// Execute scenario JSON against a freshly mounted page.
pub fn run_scenario(input: &str, cfg: HeadlessRunConfig) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    run_loaded_scenario(&scenario, cfg)
}

/// Execute a pre-loaded scenario against a freshly mounted page.
pub fn run_loaded_scenario(scenario: &HeadlessScenario, cfg: HeadlessRunConfig) -> Result<RunOutcome> {
    let mut runner = HeadlessRunner::for_page(cfg)?;
    runner.run(scenario)
}

/// Drives one scene through scenario steps.
pub struct HeadlessRunner {
    scene: MotionScene,
    cfg: HeadlessRunConfig,
    elapsed_frames: u64,
    elapsed_ms: u64,
    watches: Vec<Watch>,
}

impl HeadlessRunner {
    pub fn new(scene: MotionScene, cfg: HeadlessRunConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            scene,
            cfg,
            elapsed_frames: 0,
            elapsed_ms: 0,
            watches: Vec::new(),
        })
    }

    /// Mount the showcase page at the configured viewport.
    pub fn for_page(cfg: HeadlessRunConfig) -> Result<Self> {
        cfg.validate()?;
        let scene = mount_page(Size::new(cfg.width as f32, cfg.height as f32))?;
        Self::new(scene, cfg)
    }

    pub fn scene(&self) -> &MotionScene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut MotionScene {
        &mut self.scene
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Run every step; stops at the first failed assertion.
    pub fn run(&mut self, scenario: &HeadlessScenario) -> Result<RunOutcome> {
        tracing::info!(
            scenario = scenario.name.as_deref().unwrap_or("<unnamed>"),
            steps = scenario.steps.len(),
            "running scenario"
        );

        for (step_index, step) in scenario.steps.iter().enumerate() {
            tracing::debug!(step_index, step = step.name(), elapsed_ms = self.elapsed_ms, "step");
            if let Some((assertion, message)) = self.run_step(step_index, step)? {
                tracing::info!(step_index, assertion, %message, "scenario failed");
                let report = HeadlessReport::failed(
                    StepFailure::new(step_index, assertion, message),
                    self.elapsed_frames,
                    self.elapsed_ms,
                )
                .with_scenario(scenario.name.clone());
                return Ok(RunOutcome::Failed { report });
            }
        }

        tracing::info!(
            frames = self.elapsed_frames,
            elapsed_ms = self.elapsed_ms,
            "scenario passed"
        );
        let report = HeadlessReport::passed(scenario.steps.len(), self.elapsed_frames, self.elapsed_ms)
            .with_scenario(scenario.name.clone());
        Ok(RunOutcome::Passed { report })
    }

    /// Returns the failed assertion name and message, if any.
    fn run_step(
        &mut self,
        step_index: usize,
        step: &ScenarioStep,
    ) -> Result<Option<(&'static str, String)>> {
        let tick_ms = self.cfg.tick_ms;
        let outcome = match step {
            ScenarioStep::Wait { ms } => {
                let mut remaining_ms = *ms;
                let frames = wait_frames(*ms, tick_ms);
                return Ok(self.advance(frames, || {
                    let step_ms = remaining_ms.min(tick_ms);
                    remaining_ms = remaining_ms.saturating_sub(step_ms);
                    step_ms
                })?);
            }
            ScenarioStep::Tick { frames } => {
                return Ok(self.advance(*frames, || tick_ms)?);
            }
            ScenarioStep::ScrollTo { y } => {
                self.scene.scroll_to(*y);
                return Ok(self.check_watches());
            }
            ScenarioStep::ScrollBy { dy } => {
                let event = Event::scroll(0.0, *dy, self.elapsed_ms);
                self.scene.handle_event(&event)?;
                return Ok(self.check_watches());
            }
            ScenarioStep::PointerMove { x, y } => {
                self.pointer(POINTER_MOVE, Point::new(*x, *y))?;
                return Ok(self.check_watches());
            }
            ScenarioStep::PointerDown { x, y } => {
                self.pointer(POINTER_DOWN, Point::new(*x, *y))?;
                return Ok(self.check_watches());
            }
            ScenarioStep::PointerUp { x, y } => {
                self.pointer(POINTER_UP, Point::new(*x, *y))?;
                return Ok(self.check_watches());
            }
            ScenarioStep::Hover { id } => {
                let center = self.element_center(id)?;
                self.pointer(POINTER_MOVE, center)?;
                return Ok(self.check_watches());
            }
            ScenarioStep::Unhover => {
                let event = Event::pointer(POINTER_LEAVE, -1.0, -1.0, self.elapsed_ms);
                self.scene.handle_event(&event)?;
                return Ok(self.check_watches());
            }
            ScenarioStep::Drag { id, dx, dy, steps } => {
                return self.drag(id, *dx, *dy, *steps);
            }
            ScenarioStep::Resize { width, height } => {
                let event = Event::resize(*width, *height, self.elapsed_ms);
                self.scene.handle_event(&event)?;
                return Ok(self.check_watches());
            }
            ScenarioStep::WatchRange { id, property, min, max } => {
                self.watches.push(Watch {
                    step_index,
                    id: id.clone(),
                    property: *property,
                    min: *min,
                    max: *max,
                });
                return Ok(self.check_watches());
            }
            ScenarioStep::AssertExists { id } => {
                evaluate_assert_exists(id, &self.scene.snapshot())
            }
            ScenarioStep::AssertTextContains { id, value } => {
                evaluate_assert_text_contains(id, value, &self.scene.snapshot())
            }
            ScenarioStep::AssertValue {
                id,
                property,
                value,
                tolerance,
            } => evaluate_assert_value(id, *property, value, *tolerance, &self.scene.snapshot()),
            ScenarioStep::AssertRange { id, property, min, max } => {
                evaluate_assert_range(id, *property, *min, *max, &self.scene.snapshot())
            }
            ScenarioStep::AssertGesture { id, state } => {
                evaluate_assert_gesture(id, *state, &self.scene.snapshot())
            }
            ScenarioStep::AssertInView { id, value } => {
                evaluate_assert_in_view(id, *value, &self.scene.snapshot())
            }
            ScenarioStep::AssertScrollProgress { value, tolerance } => {
                evaluate_assert_scroll_progress(*value, *tolerance, &self.scene.snapshot())
            }
            ScenarioStep::AssertScrollBinding {
                id,
                property,
                tolerance,
            } => evaluate_assert_scroll_binding(id, *property, *tolerance, &self.scene.snapshot()),
            ScenarioStep::AssertAnimating { id, value } => {
                evaluate_assert_animating(id, *value, &self.scene.snapshot())
            }
        };

        Ok(match outcome {
            AssertionResult::Passed => None,
            AssertionResult::Failed { code, message } => {
                tracing::debug!(%code, "assertion failed");
                Some((step.name(), message))
            }
        })
    }

    fn pointer(&mut self, event_type: EventType, at: Point) -> Result<()> {
        let event = Event::pointer(event_type, at.x, at.y, self.elapsed_ms);
        self.scene.handle_event(&event)?;
        Ok(())
    }

    /// Element center in viewport coordinates
    fn element_center(&self, id: &str) -> Result<Point> {
        let bounds = self.scene.bounds(id)?;
        let center = bounds.center();
        Ok(Point::new(center.x, center.y - self.scene.scroll().offset()))
    }

    fn drag(
        &mut self,
        id: &str,
        dx: f32,
        dy: f32,
        steps: u32,
    ) -> Result<Option<(&'static str, String)>> {
        let start = self.element_center(id)?;
        let steps = steps.max(1);
        self.pointer(POINTER_DOWN, start)?;

        let tick_ms = self.cfg.tick_ms;
        let mut last = start;
        for i in 1..=steps {
            if let Some(failure) = self.advance(1, || tick_ms)? {
                return Ok(Some(failure));
            }
            let t = i as f32 / steps as f32;
            last = Point::new(start.x + dx * t, start.y + dy * t);
            self.pointer(POINTER_MOVE, last)?;
            if let Some(failure) = self.check_watches() {
                return Ok(Some(failure));
            }
        }

        self.pointer(POINTER_UP, last)?;
        Ok(self.check_watches())
    }

    /// Advance `frames` frames, checking watches every probe interval
    fn advance<A>(&mut self, frames: u32, mut advance_ms: A) -> Result<Option<(&'static str, String)>>
    where
        A: FnMut() -> u64,
    {
        if frames == 0 {
            return Ok(self.check_watches());
        }

        let probe_every = self.cfg.probe_every_frames.max(1);
        let mut cfg = self.cfg;
        cfg.max_frames = frames;

        let Self {
            scene,
            elapsed_frames,
            elapsed_ms,
            watches,
            ..
        } = self;
        let mut failure = None;
        let mut sampled_frames = 0u32;
        HeadlessRuntime::run(cfg, |_| {
            let dt = advance_ms();
            scene.tick(dt as f32);
            *elapsed_frames = (*elapsed_frames).saturating_add(1);
            *elapsed_ms = (*elapsed_ms).saturating_add(dt);
            sampled_frames = sampled_frames.saturating_add(1);

            if sampled_frames % probe_every == 0 || sampled_frames == frames {
                failure = first_watch_failure(scene, watches);
            }
            failure.is_none()
        })?;

        Ok(failure)
    }

    fn check_watches(&self) -> Option<(&'static str, String)> {
        first_watch_failure(&self.scene, &self.watches)
    }
}

fn first_watch_failure(scene: &MotionScene, watches: &[Watch]) -> Option<(&'static str, String)> {
    watches.iter().find_map(|watch| {
        let message = match scene.number(&watch.id, watch.property) {
            Ok(value) if (watch.min..=watch.max).contains(&value) => return None,
            Ok(value) => format!(
                "{}: {} = {value} left [{}, {}] at {:.0} ms (watch from step {})",
                watch.id,
                watch.property,
                watch.min,
                watch.max,
                scene.time_ms(),
                watch.step_index
            ),
            Err(err) => format!("watch from step {}: {err}", watch.step_index),
        };
        Some(("watch_range", message))
    })
}

fn wait_frames(wait_ms: u64, tick_ms: u64) -> u32 {
    if wait_ms == 0 {
        return 0;
    }
    let tick = tick_ms.max(1);
    let frames = wait_ms.saturating_add(tick.saturating_sub(1)) / tick;
    frames.min(u32::MAX as u64) as u32
}
