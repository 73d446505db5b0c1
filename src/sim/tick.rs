//! Per-frame simulation tick
//!
//! Drives the session phases and, while running, the kinematics and world
//! scroll. Frames use the wall-clock delta directly (no fixed step), so the
//! physics is frame-rate dependent within the clamp applied by the frame clock.

use glam::Vec3;

use super::collision::{GroundHit, find_ground_collision, player_box};
use super::state::{GamePhase, GameSession, IntroStage};
use crate::consts::*;
use crate::error::GameError;

/// Actions sampled for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Jump (space / tap)
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
    /// Advance one step while paused (debug)
    pub single_step: bool,
    /// End the run immediately (debug)
    pub force_game_over: bool,
    /// Free-cam pan direction (debug)
    pub pan: Vec3,
    /// Any key or touch edge since the previous frame
    pub any_input: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// The world moved this frame (animations should advance)
    pub advanced: bool,
    /// Platform landed on this frame
    pub landed: Option<usize>,
    /// The session was reset for a replay
    pub reset: bool,
}

/// Leave the loading phase and start the intro countdown
pub fn begin(session: &mut GameSession) {
    if session.phase == GamePhase::Loading {
        session.phase = GamePhase::intro();
        log::info!("Assets ready, starting intro");
    }
}

/// Advance the session by one frame of `dt` seconds
pub fn tick(
    session: &mut GameSession,
    input: &TickInput,
    dt: f32,
) -> Result<TickReport, GameError> {
    let mut report = TickReport::default();

    if session.debug.free_cam && input.pan != Vec3::ZERO {
        let step = input.pan * CAMERA_PAN_SPEED * dt;
        session.camera.x += step.x;
        session.camera.y += step.y;
        session.camera.z += step.z;
    }

    match session.phase {
        GamePhase::Loading => {}

        GamePhase::Intro { stage, remaining } => {
            let remaining = remaining - dt;
            session.phase = match (stage, remaining > 0.0) {
                (_, true) => GamePhase::Intro { stage, remaining },
                (IntroStage::GetReady, false) => GamePhase::Intro {
                    stage: IntroStage::Go,
                    remaining: GO_SECS,
                },
                (IntroStage::Go, false) => {
                    log::info!("Run started");
                    GamePhase::Running
                }
            };
        }

        GamePhase::Running => {
            if input.pause {
                session.paused = !session.paused;
                log::info!("{}", if session.paused { "Paused" } else { "Resumed" });
            }

            if session.debug.debug_keys && input.force_game_over {
                log::info!("Forced game over at score {}", session.score);
                session.paused = false;
                session.phase = GamePhase::game_over();
                return Ok(report);
            }

            let single_step = session.debug.debug_keys && input.single_step;
            if session.paused && !single_step {
                return Ok(report);
            }

            report.landed = step_player(session, input.jump, dt).map(|hit| hit.index);
            if !session.phase.is_running() {
                return Ok(report);
            }

            session.scroll_world(dt);
            session.update_difficulty();
            session.elapsed += dt;
            report.advanced = true;
        }

        GamePhase::GameOver { remaining } => {
            let remaining = remaining - dt;
            session.phase = if remaining > 0.0 {
                GamePhase::GameOver { remaining }
            } else {
                GamePhase::AwaitingRestart
            };
        }

        GamePhase::AwaitingRestart => {
            if input.any_input {
                replay(session)?;
                report.reset = true;
            }
        }

        GamePhase::Halted => {
            return Err(GameError::ReplayLimitExceeded {
                limit: session.max_replays,
            });
        }
    }

    Ok(report)
}

/// Reset for another run, or halt once the replay cap is reached
fn replay(session: &mut GameSession) -> Result<(), GameError> {
    if session.replays >= session.max_replays {
        log::error!("Replay limit ({}) reached", session.max_replays);
        session.phase = GamePhase::Halted;
        return Err(GameError::ReplayLimitExceeded {
            limit: session.max_replays,
        });
    }
    session.replays += 1;
    session.reset();
    Ok(())
}

/// Vertical kinematics and ground snapping for one step
///
/// Returns the platform the player stands on after the step, if any. Ends the
/// run when the player reaches the death plane.
pub fn step_player(session: &mut GameSession, jump: bool, dt: f32) -> Option<GroundHit> {
    let tuning = &session.tuning;
    let player = &mut session.player;

    if jump && player.is_grounded() {
        player.vel_y += tuning.jump_impulse;
        log::debug!("Jump from platform {:?}", player.grounded);
    }

    player.y += player.vel_y * dt;

    let hit = find_ground_collision(
        &player_box(player.y),
        session.world.platforms(),
        session.next_collision_index,
    );

    match hit {
        Some(hit) => {
            player.y = hit.top_y;
            player.vel_y = 0.0;
            player.grounded = Some(hit.index);
            if hit.index != session.next_collision_index {
                session.score += 1;
                log::debug!("Landed on platform {} (score {})", hit.index, session.score);
            }
            session.next_collision_index = hit.index;
        }
        None => {
            player.vel_y -= tuning.gravity * dt;
            player.grounded = None;
        }
    }

    if player.y <= tuning.death_plane_y {
        log::info!("Fell off the skyline at score {}", session.score);
        session.phase = GamePhase::game_over();
    }

    hit
}
