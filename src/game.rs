//! Frame driver
//!
//! [`Game`] owns the session and everything around it. The host calls
//! [`Game::frame`] once per display refresh and forwards raw input events in
//! between.

use crate::assets::Resources;
use crate::config::{DebugConfig, Tuning};
use crate::error::GameError;
use crate::hud::{HudLayout, HudState, HudSurface};
use crate::platform::ActionMapper;
use crate::scene::{AnimationClock, SceneBackend};
use crate::sim::{GamePhase, GameSession, SeedPolicy, TickReport, begin, tick};

pub struct Game<B: SceneBackend, S: HudSurface> {
    session: GameSession,
    input: ActionMapper,
    backend: B,
    surface: S,
    handles: Vec<B::Handle>,
    layout: HudLayout,
    hud: HudState,
    animation: Option<Box<dyn AnimationClock>>,
}

impl<B: SceneBackend, S: HudSurface> Game<B, S> {
    pub fn new(
        tuning: Tuning,
        debug: DebugConfig,
        seed_policy: SeedPolicy,
        backend: B,
        surface: S,
    ) -> Result<Self, GameError> {
        tuning.validate()?;
        let input = ActionMapper::new(&debug);
        let session = GameSession::new(tuning, debug, seed_policy);
        log::info!("Session created (seed {})", session.seed());
        Ok(Self {
            session,
            input,
            backend,
            surface,
            handles: Vec::new(),
            layout: HudLayout::default(),
            hud: HudState::default(),
            animation: None,
        })
    }

    /// Bind the loaded resources and leave the loading phase
    pub fn start(&mut self, mut resources: Resources) -> Result<(), GameError> {
        if self.session.phase != GamePhase::Loading {
            log::warn!("Game already started");
            return Ok(());
        }

        self.handles = (0..self.session.world.platforms().len())
            .map(|i| self.backend.create_platform(i))
            .collect();
        self.session.world.sync_platforms(&mut self.handles);

        match resources.take_running_clip() {
            Some(clip) => self.animation = Some(Box::new(clip)),
            None if self.animation.is_none() => {
                log::warn!("No running animation, character animation disabled")
            }
            None => {}
        }

        begin(&mut self.session);
        Ok(())
    }

    /// Run one frame of `dt` seconds
    pub fn frame(&mut self, dt: f32) -> Result<TickReport, GameError> {
        let input = self.input.sample();
        let result = tick(&mut self.session, &input, dt);
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                self.input.consume_pulses();
                return Err(e);
            }
        };

        if report.reset {
            self.input.clear_all();
        }
        if report.advanced {
            if let Some(animation) = &mut self.animation {
                animation.advance(dt);
            }
        }

        self.session.world.sync_platforms(&mut self.handles);
        self.hud = HudState::from_session(&self.session);
        self.layout.draw(&self.hud, &mut self.surface);
        self.backend.render(&self.session);

        self.input.consume_pulses();
        self.input.set_touch_jump_enabled(
            !self.session.paused && !self.session.phase.is_game_over(),
        );
        Ok(report)
    }

    pub fn key_down(&mut self, code: &str) {
        self.input.on_key_down(code);
    }

    pub fn key_up(&mut self, code: &str) {
        self.input.on_key_up(code);
    }

    pub fn touch_start(&mut self) {
        self.input.on_touch_start();
    }

    pub fn touch_end(&mut self) {
        self.input.on_touch_end();
    }

    /// Keys released while the page had no focus never report a key-up
    pub fn focus_lost(&mut self) {
        self.input.clear_all();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.layout.resize(width as f32, height as f32);
        self.backend.resize(width, height);
    }

    /// Replace the character animation (a host may load it separately)
    pub fn set_animation_clock(&mut self, clock: Box<dyn AnimationClock>) {
        self.animation = Some(clock);
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn hud(&self) -> &HudState {
        &self.hud
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_halted(&self) -> bool {
        self.session.phase == GamePhase::Halted
    }
}
