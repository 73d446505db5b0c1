//! Session state and core simulation types
//!
//! Everything a run needs to be replayed from its seed lives in [`GameSession`].

use serde::{Deserialize, Serialize};

use super::difficulty;
use super::rng::{RunRng, SeedPolicy};
use super::world::World;
use crate::config::{DebugConfig, Tuning};
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the asset collaborators
    Loading,
    /// Countdown messages, world frozen
    Intro { stage: IntroStage, remaining: f32 },
    /// Active gameplay
    Running,
    /// Run ended, showing the game over message
    GameOver { remaining: f32 },
    /// Waiting for any input before replaying
    AwaitingRestart,
    /// Replay limit reached, nothing more happens
    Halted,
}

/// The two intro messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntroStage {
    GetReady,
    Go,
}

impl GamePhase {
    pub fn intro() -> Self {
        GamePhase::Intro {
            stage: IntroStage::GetReady,
            remaining: GET_READY_SECS,
        }
    }

    pub fn game_over() -> Self {
        GamePhase::GameOver {
            remaining: GAME_OVER_SECS,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Running)
    }

    pub fn is_game_over(&self) -> bool {
        matches!(
            self,
            GamePhase::GameOver { .. } | GamePhase::AwaitingRestart | GamePhase::Halted
        )
    }

    /// Centred HUD message for this phase
    pub fn message(&self) -> Option<&'static str> {
        match self {
            GamePhase::Loading => Some("Loading..."),
            GamePhase::Intro {
                stage: IntroStage::GetReady,
                ..
            } => Some("Get Ready..."),
            GamePhase::Intro {
                stage: IntroStage::Go,
                ..
            } => Some("Go!"),
            GamePhase::Running => None,
            GamePhase::GameOver { .. } => Some("GAMEOVER"),
            GamePhase::AwaitingRestart => Some("Tap or press any key to replay"),
            GamePhase::Halted => Some("Reload the page to play again"),
        }
    }
}

/// The runner. Only its height changes; x and z stay at the origin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Height of the feet
    pub y: f32,
    /// Vertical velocity (up is positive)
    pub vel_y: f32,
    /// Platform the last collision check landed on
    pub grounded: Option<usize>,
}

impl Player {
    pub fn is_grounded(&self) -> bool {
        self.grounded.is_some()
    }
}

/// Debug camera offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::for_debug(&DebugConfig::default())
    }
}

impl Camera {
    /// Rest position, pulled back when the far view is on
    pub fn for_debug(debug: &DebugConfig) -> Self {
        Self {
            x: 0.0,
            y: CAMERA_OFFSET_Y,
            z: if debug.far_view {
                CAMERA_FAR_VIEW_Z
            } else {
                CAMERA_OFFSET_Z
            },
        }
    }
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub tuning: Tuning,
    pub debug: DebugConfig,
    pub seed_policy: SeedPolicy,
    pub phase: GamePhase,
    /// Pause is orthogonal to the phase and only toggles while running
    pub paused: bool,
    /// Distinct platforms landed on
    pub score: u64,
    /// Display only
    pub lives: u32,
    /// Seconds spent running this life
    pub elapsed: f32,
    pub ground_speed: f32,
    pub bg_speed: f32,
    /// Platform the collision scan starts from
    pub next_collision_index: usize,
    /// How many times the session was reset
    pub replays: u32,
    /// Resets allowed before the session halts
    pub max_replays: u32,
    pub player: Player,
    pub world: World,
    pub camera: Camera,
    rng: RunRng,
}

impl GameSession {
    /// Build a session in the Loading phase with its opening layout
    pub fn new(tuning: Tuning, debug: DebugConfig, seed_policy: SeedPolicy) -> Self {
        let mut rng = RunRng::seeded(seed_policy.pick());
        let world = World::generate(&tuning, &mut rng);
        let ground_speed = tuning.base_speed;
        Self {
            tuning,
            debug,
            seed_policy,
            phase: GamePhase::Loading,
            paused: false,
            score: 0,
            lives: START_LIVES,
            elapsed: 0.0,
            ground_speed,
            bg_speed: difficulty::background_speed(ground_speed),
            next_collision_index: 0,
            replays: 0,
            max_replays: MAX_REPLAYS,
            player: Player::default(),
            world,
            camera: Camera::for_debug(&debug),
            rng,
        }
    }

    /// Seed of the current layout
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Scroll the platforms with the session's generator
    pub(crate) fn scroll_world(&mut self, dt: f32) {
        let dx = self.ground_speed * dt;
        self.world.scroll_platforms(&self.tuning, &mut self.rng, dx);
        self.world.scroll_background(&self.tuning, self.bg_speed * dt);
    }

    /// Restore the initial invariants for a new life
    ///
    /// Re-rolls the layout according to the seed policy; a fixed seed gives the
    /// exact same layout as the first run.
    pub fn reset(&mut self) {
        self.rng.reseed(self.seed_policy.pick());
        self.world.regenerate(&self.tuning, &mut self.rng);
        self.paused = false;
        self.score = 0;
        self.lives = START_LIVES;
        self.elapsed = 0.0;
        self.ground_speed = self.tuning.base_speed;
        self.bg_speed = difficulty::background_speed(self.ground_speed);
        self.next_collision_index = 0;
        self.player = Player::default();
        self.camera = Camera::for_debug(&self.debug);
        self.phase = GamePhase::intro();
        log::info!("Session reset (seed {})", self.rng.seed());
    }

    /// Recompute the scroll speeds from the current score
    pub fn update_difficulty(&mut self) {
        self.ground_speed = difficulty::ground_speed(self.score, &self.tuning);
        self.bg_speed = difficulty::background_speed(self.ground_speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = GameSession::new(Tuning::default(), DebugConfig::default(), SeedPolicy::Fixed(1));
        assert_eq!(session.phase, GamePhase::Loading);
        assert_eq!(session.score, 0);
        assert_eq!(session.lives, 3);
        assert_eq!(session.ground_speed, 9.0);
        assert_eq!(session.bg_speed, 6.75);
        assert_eq!(session.world.platforms().len(), 8);
        assert_eq!(session.seed(), 1);
    }

    #[test]
    fn test_reset_restores_initial_layout() {
        let mut session =
            GameSession::new(Tuning::default(), DebugConfig::default(), SeedPolicy::Fixed(77));
        let initial = session.world.platforms().to_vec();
        let initial_bg = session.world.backgrounds().to_vec();

        session.phase = GamePhase::Running;
        session.score = 40;
        session.player.y = -12.0;
        session.next_collision_index = 5;
        session.update_difficulty();
        for _ in 0..200 {
            session.scroll_world(1.0 / 60.0);
        }
        assert_ne!(session.world.platforms(), initial.as_slice());

        let slots = session.world.platforms().as_ptr();
        session.reset();
        assert_eq!(session.world.platforms().as_ptr(), slots);
        assert_eq!(session.world.platforms(), initial.as_slice());
        assert_eq!(session.world.backgrounds(), initial_bg.as_slice());
        assert_eq!(session.score, 0);
        assert_eq!(session.lives, 3);
        assert_eq!(session.ground_speed, session.tuning.base_speed);
        assert_eq!(session.next_collision_index, 0);
        assert_eq!(session.player, Player::default());
        assert_eq!(session.phase, GamePhase::intro());
    }

    #[test]
    fn test_far_view_pulls_camera_back() {
        assert_eq!(Camera::default().z, 15.0);
        let debug = DebugConfig {
            far_view: true,
            ..Default::default()
        };
        let mut session = GameSession::new(Tuning::default(), debug, SeedPolicy::Fixed(1));
        assert_eq!(session.camera.z, 150.0);
        session.camera.x = 4.0;
        session.reset();
        assert_eq!(session.camera, Camera::for_debug(&debug));
    }

    #[test]
    fn test_phase_messages() {
        assert_eq!(GamePhase::intro().message(), Some("Get Ready..."));
        assert_eq!(GamePhase::Running.message(), None);
        assert_eq!(GamePhase::game_over().message(), Some("GAMEOVER"));
        assert!(GamePhase::AwaitingRestart.is_game_over());
        assert!(!GamePhase::Running.is_game_over());
    }

    #[test]
    fn test_session_snapshot_roundtrips_through_json() {
        let mut session =
            GameSession::new(Tuning::default(), DebugConfig::default(), SeedPolicy::Fixed(77));
        for _ in 0..120 {
            session.scroll_world(1.0 / 60.0);
        }
        let json = serde_json::to_string(&session).expect("serialize");
        let mut restored: GameSession = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored.seed(), 77);
        assert_eq!(restored.world.platforms(), session.world.platforms());
        assert_eq!(restored.score, session.score);

        // Both keep re-rolling the same recycled platforms
        for _ in 0..300 {
            session.scroll_world(1.0 / 60.0);
            restored.scroll_world(1.0 / 60.0);
        }
        assert_eq!(restored.world.platforms(), session.world.platforms());
    }
}
