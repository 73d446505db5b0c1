//! Heads-up display
//!
//! The HUD is plain text derived from the session every frame and redrawn from
//! scratch onto a [`HudSurface`].

use crate::sim::GameSession;

/// Horizontal anchor of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// 2D text surface the HUD is drawn on
pub trait HudSurface {
    fn clear(&mut self);
    fn draw_text(&mut self, x: f32, y: f32, text: &str, align: TextAlign);
}

/// What the HUD shows this frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HudState {
    pub score: u64,
    pub lives: u32,
    pub message: Option<String>,
}

impl HudState {
    pub fn from_session(session: &GameSession) -> Self {
        Self {
            score: session.score,
            lives: session.lives,
            message: session.phase.message().map(str::to_owned),
        }
    }

    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn lives_text(&self) -> String {
        format!("Lives: {}", self.lives)
    }
}

/// Text anchors for the current viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudLayout {
    pub width: f32,
    pub height: f32,
}

impl HudLayout {
    /// Corner padding as a fraction of the viewport
    pub const PADDING: f32 = 0.05;

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn lives_anchor(&self) -> (f32, f32) {
        (self.width * Self::PADDING, self.height * Self::PADDING)
    }

    pub fn score_anchor(&self) -> (f32, f32) {
        (
            self.width * (1.0 - Self::PADDING),
            self.height * Self::PADDING,
        )
    }

    pub fn message_anchor(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Redraw the whole HUD
    pub fn draw(&self, state: &HudState, surface: &mut impl HudSurface) {
        surface.clear();

        let (x, y) = self.lives_anchor();
        surface.draw_text(x, y, &state.lives_text(), TextAlign::Left);

        let (x, y) = self.score_anchor();
        surface.draw_text(x, y, &state.score_text(), TextAlign::Right);

        if let Some(message) = &state.message {
            let (x, y) = self.message_anchor();
            surface.draw_text(x, y, message, TextAlign::Center);
        }
    }
}

impl Default for HudLayout {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Surface that records draw calls, for tests and the native demo
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub clears: u32,
    pub texts: Vec<(f32, f32, String, TextAlign)>,
}

impl HudSurface for RecordingSurface {
    fn clear(&mut self) {
        self.clears += 1;
        self.texts.clear();
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, align: TextAlign) {
        self.texts.push((x, y, text.to_owned(), align));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DebugConfig, Tuning};
    use crate::sim::{GamePhase, SeedPolicy};

    fn session() -> GameSession {
        GameSession::new(Tuning::default(), DebugConfig::default(), SeedPolicy::Fixed(1))
    }

    #[test]
    fn test_state_follows_session() {
        let mut session = session();
        session.score = 12;
        session.phase = GamePhase::Running;
        let state = HudState::from_session(&session);
        assert_eq!(state.score_text(), "Score: 12");
        assert_eq!(state.lives_text(), "Lives: 3");
        assert_eq!(state.message, None);

        session.phase = GamePhase::AwaitingRestart;
        let state = HudState::from_session(&session);
        assert_eq!(state.message.as_deref(), Some("Tap or press any key to replay"));
    }

    #[test]
    fn test_layout_anchors() {
        let layout = HudLayout::new(1000.0, 500.0);
        let state = HudState {
            score: 7,
            lives: 3,
            message: Some("Go!".to_owned()),
        };
        let mut surface = RecordingSurface::default();
        layout.draw(&state, &mut surface);

        assert_eq!(surface.clears, 1);
        assert_eq!(
            surface.texts,
            vec![
                (50.0, 25.0, "Lives: 3".to_owned(), TextAlign::Left),
                (950.0, 25.0, "Score: 7".to_owned(), TextAlign::Right),
                (500.0, 250.0, "Go!".to_owned(), TextAlign::Center),
            ]
        );
    }

    #[test]
    fn test_redraw_starts_from_scratch() {
        let layout = HudLayout::default();
        let mut surface = RecordingSurface::default();
        layout.draw(&HudState::default(), &mut surface);
        layout.draw(&HudState::default(), &mut surface);
        assert_eq!(surface.clears, 2);
        assert_eq!(surface.texts.len(), 2);
    }

    #[test]
    fn test_resize_moves_anchors() {
        let mut layout = HudLayout::default();
        layout.resize(200.0, 100.0);
        assert_eq!(layout.score_anchor(), (190.0, 5.0));
        assert_eq!(layout.message_anchor(), (100.0, 50.0));
    }
}
