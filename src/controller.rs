use tracing::{debug, info};

use crate::scenes::{Scene, SceneRegistry, StoryParams};
use crate::session::Session;
use crate::surface::{NavState, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Index changed and the new scene was drawn.
    Moved,
    /// Already at the boundary; nothing was drawn.
    Unchanged,
    /// Index changed (or first activation requested) but data is not loaded
    /// yet; drawing waits for [`SceneController::resume`].
    Deferred,
}

/// Steps through the registered scenes. Holds no data of its own: the
/// session is handed in on every call so nothing renders before it exists.
#[derive(Debug, Clone)]
pub struct SceneController {
    registry: SceneRegistry,
    params: StoryParams,
    index: usize,
    pending: bool,
}

impl SceneController {
    pub fn new(registry: SceneRegistry, params: StoryParams) -> Self {
        Self {
            registry,
            params,
            index: 0,
            pending: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn params(&self) -> &StoryParams {
        &self.params
    }

    pub fn current(&self) -> Option<&Scene> {
        self.registry.get(self.index)
    }

    pub fn nav(&self) -> NavState {
        let last = self.registry.len().saturating_sub(1);
        NavState {
            position: self.index,
            total: self.registry.len(),
            can_retreat: self.index > 0,
            can_advance: self.index < last,
        }
    }

    /// Draws the current scene, or queues it until data arrives.
    pub fn activate(&mut self, session: Option<&Session>, surface: &mut dyn Surface) -> Transition {
        match session {
            Some(session) => {
                self.render(session, surface);
                Transition::Moved
            }
            None => {
                self.pending = true;
                debug!(index = self.index, "scene activation queued until data loads");
                surface.navigation(self.nav());
                Transition::Deferred
            }
        }
    }

    pub fn advance(&mut self, session: Option<&Session>, surface: &mut dyn Surface) -> Transition {
        if self.index + 1 >= self.registry.len() {
            return Transition::Unchanged;
        }
        self.index += 1;
        self.activate(session, surface)
    }

    pub fn retreat(&mut self, session: Option<&Session>, surface: &mut dyn Surface) -> Transition {
        if self.index == 0 {
            return Transition::Unchanged;
        }
        self.index -= 1;
        self.activate(session, surface)
    }

    /// Runs the queued activation, if any. Returns whether a scene was drawn.
    pub fn resume(&mut self, session: &Session, surface: &mut dyn Surface) -> bool {
        if !self.pending {
            return false;
        }
        self.render(session, surface);
        true
    }

    fn render(&mut self, session: &Session, surface: &mut dyn Surface) {
        self.pending = false;
        surface.clear();
        let nav = self.nav();
        let Some(scene) = self.registry.get(self.index) else {
            surface.navigation(nav);
            return;
        };
        info!(scene = scene.id.slug(), index = self.index, "activating scene");
        surface.heading(scene.title);
        let data = (scene.aggregate)(session, &self.params);
        (scene.render)(&data, surface);
        surface.navigation(nav);
    }
}

#[cfg(test)]
mod tests {
    use super::{SceneController, Transition};
    use crate::scenes::{SceneRegistry, StoryParams};
    use crate::session::Session;
    use crate::surface::SceneCanvas;

    fn controller() -> SceneController {
        SceneController::new(SceneRegistry::story(), StoryParams::default())
    }

    #[test]
    fn boundaries_are_no_ops() {
        let session = Session::default();
        let mut canvas = SceneCanvas::new();
        let mut c = controller();
        assert_eq!(c.activate(Some(&session), &mut canvas), Transition::Moved);
        assert_eq!(c.retreat(Some(&session), &mut canvas), Transition::Unchanged);
        assert_eq!(c.index(), 0);
        assert!(!c.nav().can_retreat);

        for _ in 0..c.len() + 3 {
            c.advance(Some(&session), &mut canvas);
        }
        assert_eq!(c.index(), c.len() - 1);
        let clears = canvas.clears;
        assert_eq!(c.advance(Some(&session), &mut canvas), Transition::Unchanged);
        assert_eq!(canvas.clears, clears);
        assert!(!c.nav().can_advance);
        assert!(c.nav().can_retreat);
    }

    #[test]
    fn activation_waits_for_data() {
        let mut canvas = SceneCanvas::new();
        let mut c = controller();
        assert_eq!(c.activate(None, &mut canvas), Transition::Deferred);
        assert_eq!(c.advance(None, &mut canvas), Transition::Deferred);
        assert!(c.is_pending());
        assert!(canvas.title().is_none());

        let session = Session::default();
        assert!(c.resume(&session, &mut canvas));
        assert_eq!(canvas.title(), Some("Goal Scoring Trends"));
        assert!(!c.resume(&session, &mut canvas));
    }
}
