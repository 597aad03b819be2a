use std::collections::VecDeque;
use std::sync::Arc;

use crate::controller::{SceneController, Transition};
use crate::scenes::{SceneRegistry, StoryParams};
use crate::session::Session;
use crate::surface::SceneCanvas;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
    Failed(String),
}

/// Messages from the loader thread to the UI loop.
#[derive(Debug, Clone)]
pub enum Delta {
    Log(String),
    Loaded(Arc<Session>),
    LoadFailed(String),
}

#[derive(Debug)]
pub struct AppState {
    pub phase: LoadPhase,
    pub session: Option<Arc<Session>>,
    pub controller: SceneController,
    pub canvas: SceneCanvas,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(params: StoryParams) -> Self {
        let mut state = Self {
            phase: LoadPhase::Loading,
            session: None,
            controller: SceneController::new(SceneRegistry::story(), params),
            canvas: SceneCanvas::new(),
            logs: VecDeque::new(),
            help_overlay: false,
        };
        // First scene is queued until the loader reports back.
        state.controller.activate(None, &mut state.canvas);
        state
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.phase, LoadPhase::Failed(_))
    }

    pub fn advance(&mut self) -> Transition {
        if self.is_failed() {
            return Transition::Unchanged;
        }
        self.controller
            .advance(self.session.as_deref(), &mut self.canvas)
    }

    pub fn retreat(&mut self) -> Transition {
        if self.is_failed() {
            return Transition::Unchanged;
        }
        self.controller
            .retreat(self.session.as_deref(), &mut self.canvas)
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Log(msg) => state.push_log(msg),
        Delta::Loaded(session) => {
            if state.phase != LoadPhase::Loading {
                state.push_log("[WARN] Ignoring a second data load");
                return;
            }
            state.phase = LoadPhase::Ready;
            state.controller.resume(&session, &mut state.canvas);
            state.session = Some(session);
        }
        Delta::LoadFailed(msg) => {
            state.push_log(format!("[ERROR] {msg}"));
            state.phase = LoadPhase::Failed(msg);
            state.session = None;
            state.canvas = SceneCanvas::new();
        }
    }
}
