//! Simulation engine: steps a static script and tracks the derived highlight
//! state (active node, active edge, inspector payload) plus the console log.
//!
//! The engine is a small state machine — `Idle` → `Running` → `Completed` —
//! with defensive guards instead of errors: `start()` while running and
//! `advance()` outside of a run are no-ops.

use std::collections::VecDeque;

use tracing::debug;

use crate::model::{EdgeRef, SimulationStep, StepPayload};
use crate::script::build_script;

// ────────────────────────────────────────────────────────────────────────────
// Console log
// ────────────────────────────────────────────────────────────────────────────

/// Default number of console lines kept.
pub const CONSOLE_CAPACITY: usize = 9;

/// Bounded, newest-first log of recent simulation messages. The oldest entry
/// is evicted when the capacity is exceeded.
#[derive(Debug, Clone)]
pub struct ConsoleLog {
    capacity: usize,
    entries: VecDeque<String>,
}

impl ConsoleLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    /// Prepend a message, evicting the oldest entry on overflow.
    pub fn push(&mut self, msg: impl Into<String>) {
        self.entries.push_front(msg.into());
        self.entries.truncate(self.capacity);
    }

    /// Entries newest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Most recent entry, if any.
    pub fn newest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::new(CONSOLE_CAPACITY)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

/// Where the engine is within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    /// No run started (cursor −1).
    Idle,
    /// Run in progress; the value is the current step index.
    Running(usize),
    /// Run finished (cursor N). Re-enterable only via `start()`/`reset()`.
    Completed,
}

/// Console line appended when a run finishes.
pub const COMPLETION_LOG: &str = "Simulação concluída — fluxo de ponta a ponta finalizado";

/// Steps through the scripted walkthrough and owns the console log.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    region: String,
    steps: Vec<SimulationStep>,
    phase: SimPhase,
    active_node: Option<String>,
    active_edge: Option<EdgeRef>,
    payload: Option<StepPayload>,
    console: ConsoleLog,
}

impl SimulationEngine {
    /// Create an idle engine with the built-in script for `region`.
    pub fn new(region: &str) -> Self {
        Self::from_steps(region, build_script(region))
    }

    /// Create an idle engine over an explicit step list.
    pub fn from_steps(region: &str, steps: Vec<SimulationStep>) -> Self {
        Self {
            region: region.to_string(),
            steps,
            phase: SimPhase::Idle,
            active_node: None,
            active_edge: None,
            payload: None,
            console: ConsoleLog::default(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, SimPhase::Running(_))
    }

    /// Current step index while running.
    pub fn cursor(&self) -> Option<usize> {
        match self.phase {
            SimPhase::Running(i) => Some(i),
            _ => None,
        }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[SimulationStep] {
        &self.steps
    }

    pub fn current_step(&self) -> Option<&SimulationStep> {
        self.cursor().and_then(|i| self.steps.get(i))
    }

    pub fn active_node(&self) -> Option<&str> {
        self.active_node.as_deref()
    }

    pub fn active_edge(&self) -> Option<&EdgeRef> {
        self.active_edge.as_ref()
    }

    pub fn payload(&self) -> Option<&StepPayload> {
        self.payload.as_ref()
    }

    pub fn console(&self) -> &ConsoleLog {
        &self.console
    }

    /// Push a line into the console from outside the script, e.g. a media
    /// generation status message.
    pub fn log(&mut self, msg: impl Into<String>) {
        self.console.push(msg);
    }

    /// Begin a run from `Idle` or `Completed`: clears the console and the
    /// inspector payload, then applies step 0. A no-op while `Running` —
    /// a run must not restart mid-flight.
    pub fn start(&mut self) {
        if self.is_running() {
            debug!("start() ignored: run already in progress");
            return;
        }
        self.console.clear();
        self.payload = None;
        self.active_node = None;
        self.active_edge = None;
        if self.steps.is_empty() {
            self.console.push(COMPLETION_LOG);
            self.phase = SimPhase::Completed;
            return;
        }
        self.phase = SimPhase::Running(0);
        self.apply_step(0);
    }

    /// Advance one step. Only valid while `Running`; stepping past the last
    /// step completes the run, clears the highlight and logs a completion
    /// line. From `Idle` or `Completed` this is a no-op.
    pub fn advance(&mut self) {
        let SimPhase::Running(i) = self.phase else {
            debug!("advance() ignored outside of a run");
            return;
        };
        let next = i + 1;
        if next < self.steps.len() {
            self.phase = SimPhase::Running(next);
            self.apply_step(next);
        } else {
            self.phase = SimPhase::Completed;
            self.active_node = None;
            self.active_edge = None;
            self.console.push(COMPLETION_LOG);
            debug!("run completed after {} steps", self.steps.len());
        }
    }

    /// Return to `Idle` from any state, clearing highlight state and the
    /// inspector payload. The console keeps its history until the next
    /// `start()`.
    pub fn reset(&mut self) {
        self.phase = SimPhase::Idle;
        self.active_node = None;
        self.active_edge = None;
        self.payload = None;
    }

    /// Switch the region. The script is rebuilt wholesale and any run in
    /// progress is reset — a mid-run region switch never splices scripts.
    pub fn set_region(&mut self, region: &str) {
        if region == self.region {
            return;
        }
        self.region = region.to_string();
        self.steps = build_script(region);
        self.reset();
    }

    fn apply_step(&mut self, idx: usize) {
        let step = &self.steps[idx];
        debug!(step = idx, node = %step.node, "applying step");
        self.active_node = Some(step.node.clone());
        self.active_edge = step.edge.clone();
        self.console.push(step.log.clone());
        self.payload = step.payload.clone();
    }
}
