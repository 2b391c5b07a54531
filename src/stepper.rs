// src/stepper.rs
//! The per-frame loop: measure a delta, step the world once, then sync every
//! tracked body into its render mesh node.
//!
//! Pausing stops simulation time only: frames keep running, the step is
//! invoked with a zero delta (a legal no-op), and rendering/camera concerns
//! outside this crate are unaffected. Resuming measures the next delta from
//! the resume point — elapsed paused time is never replayed.

use std::time::Instant;

use crate::registry::Registry;
use crate::scene::Scene;
use crate::world::PhysicsWorld;

/// Whether simulation time is advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Running,
    Paused,
}

/// Drives the frame loop clock and owns the Running/Paused state.
#[derive(Debug)]
pub struct FrameStepper {
    last_frame: Instant,
    state: StepState,
    /// Clamp for wall-clock deltas, so a long stall (debugger, tab-out)
    /// cannot inject a huge step.
    max_delta: f32,
    frame: u64,
}

impl Default for FrameStepper {
    fn default() -> Self {
        Self {
            last_frame: Instant::now(),
            state: StepState::Running,
            max_delta: 0.25,
            frame: 0,
        }
    }
}

impl FrameStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measure the delta since the previous frame. Returns 0 while paused.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        match self.state {
            StepState::Paused => 0.0,
            StepState::Running => raw.min(self.max_delta),
        }
    }

    pub fn pause(&mut self) {
        if self.state == StepState::Running {
            log::info!("simulation paused at frame {}", self.frame);
            self.state = StepState::Paused;
        }
    }

    /// Resume simulation time. The next delta is measured from this point.
    pub fn resume(&mut self) {
        if self.state == StepState::Paused {
            log::info!("simulation resumed at frame {}", self.frame);
            self.state = StepState::Running;
            self.last_frame = Instant::now();
        }
    }

    pub fn toggle(&mut self) {
        match self.state {
            StepState::Running => self.pause(),
            StepState::Paused => self.resume(),
        }
    }

    pub fn state(&self) -> StepState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == StepState::Paused
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Run one frame with a measured wall-clock delta.
    pub fn advance(&mut self, world: &mut PhysicsWorld, registry: &Registry, scene: &mut Scene) {
        let dt = self.tick();
        self.run_frame(dt, world, registry, scene);
    }

    /// Run one frame with an explicit delta — deterministic stepping for
    /// tests and headless runs. Pause still forces the delta to zero.
    pub fn advance_fixed(
        &mut self,
        dt: f32,
        world: &mut PhysicsWorld,
        registry: &Registry,
        scene: &mut Scene,
    ) {
        let dt = if self.is_paused() { 0.0 } else { dt };
        self.run_frame(dt, world, registry, scene);
    }

    // All bodies sync only after the step completes; never mid-step.
    fn run_frame(&mut self, dt: f32, world: &mut PhysicsWorld, registry: &Registry, scene: &mut Scene) {
        world.step(dt);
        registry.sync_to_scene(world, scene);
        self.frame += 1;
    }
}
