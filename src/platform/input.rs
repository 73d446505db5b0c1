//! Raw key state to semantic actions
//!
//! Keys are identified by their DOM `KeyboardEvent.code` string. A static
//! binding table turns raw transitions into actions:
//!
//! - **Hold:** active every frame the key is physically down (camera pan).
//! - **OnPress / OnRelease:** pulses raised on the down or up transition. They
//!   stay active until [`ActionMapper::consume_pulses`], which the frame driver
//!   calls once the tick has sampled them.

use std::collections::HashSet;

use glam::Vec3;

use crate::config::DebugConfig;
use crate::sim::TickInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Jump,
    Pause,
    SingleStep,
    ForceGameOver,
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    PanForward,
    PanBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Hold,
    OnPress,
    OnRelease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub code: &'static str,
    pub action: Action,
    pub trigger: Trigger,
}

const fn bind(code: &'static str, action: Action, trigger: Trigger) -> Binding {
    Binding {
        code,
        action,
        trigger,
    }
}

pub const GAMEPLAY_BINDINGS: [Binding; 2] = [
    bind("Space", Action::Jump, Trigger::OnPress),
    bind("KeyP", Action::Pause, Trigger::OnRelease),
];

pub const DEBUG_BINDINGS: [Binding; 2] = [
    bind("KeyO", Action::SingleStep, Trigger::OnPress),
    bind("KeyG", Action::ForceGameOver, Trigger::OnPress),
];

pub const FREE_CAM_BINDINGS: [Binding; 6] = [
    bind("ArrowLeft", Action::PanLeft, Trigger::Hold),
    bind("ArrowRight", Action::PanRight, Trigger::Hold),
    bind("ArrowUp", Action::PanForward, Trigger::Hold),
    bind("ArrowDown", Action::PanBack, Trigger::Hold),
    bind("KeyZ", Action::PanUp, Trigger::Hold),
    bind("KeyX", Action::PanDown, Trigger::Hold),
];

pub struct ActionMapper {
    bindings: Vec<Binding>,
    held: HashSet<String>,
    pulses: HashSet<Action>,
    any_input: bool,
    touch_jump_enabled: bool,
}

impl ActionMapper {
    /// Install the gameplay bindings plus whichever debug sets are enabled
    pub fn new(debug: &DebugConfig) -> Self {
        let mut bindings = GAMEPLAY_BINDINGS.to_vec();
        if debug.debug_keys {
            bindings.extend_from_slice(&DEBUG_BINDINGS);
        }
        if debug.free_cam {
            bindings.extend_from_slice(&FREE_CAM_BINDINGS);
        }
        Self {
            bindings,
            held: HashSet::new(),
            pulses: HashSet::new(),
            any_input: false,
            touch_jump_enabled: true,
        }
    }

    pub fn on_key_down(&mut self, code: &str) {
        // Auto-repeat reports the same key down again and is not an edge
        if !self.held.insert(code.to_owned()) {
            return;
        }
        self.any_input = true;
        self.raise(code, Trigger::OnPress);
    }

    pub fn on_key_up(&mut self, code: &str) {
        self.any_input = true;
        if self.held.remove(code) {
            self.raise(code, Trigger::OnRelease);
        }
    }

    /// A tap jumps when the gate allows it
    pub fn on_touch_start(&mut self) {
        self.any_input = true;
        if self.touch_jump_enabled {
            self.pulses.insert(Action::Jump);
        }
    }

    /// Touch end and touch cancel; jump is a pulse so nothing is held
    pub fn on_touch_end(&mut self) {}

    /// The session closes the touch gate while paused or after game over
    pub fn set_touch_jump_enabled(&mut self, enabled: bool) {
        self.touch_jump_enabled = enabled;
    }

    pub fn is_action_active(&self, action: Action) -> bool {
        if self.pulses.contains(&action) {
            return true;
        }
        self.bindings
            .iter()
            .any(|b| b.action == action && b.trigger == Trigger::Hold && self.held.contains(b.code))
    }

    /// Returns and clears the "something was pressed" edge
    pub fn take_any_input(&mut self) -> bool {
        std::mem::take(&mut self.any_input)
    }

    /// Drop pulses once the tick has seen them
    pub fn consume_pulses(&mut self) {
        self.pulses.clear();
    }

    /// Forget every key and action, used when keys may have been released
    /// while the page could not observe them
    pub fn clear_all(&mut self) {
        self.held.clear();
        self.pulses.clear();
        self.any_input = false;
    }

    /// Sample the current actions for one tick
    ///
    /// Consumes the any-input edge but leaves pulses in place until
    /// [`consume_pulses`](Self::consume_pulses).
    pub fn sample(&mut self) -> TickInput {
        let axis = |pos: Action, neg: Action| -> f32 {
            self.is_action_active(pos) as i32 as f32 - self.is_action_active(neg) as i32 as f32
        };
        let pan = Vec3::new(
            axis(Action::PanRight, Action::PanLeft),
            axis(Action::PanUp, Action::PanDown),
            axis(Action::PanBack, Action::PanForward),
        );
        TickInput {
            jump: self.is_action_active(Action::Jump),
            pause: self.is_action_active(Action::Pause),
            single_step: self.is_action_active(Action::SingleStep),
            force_game_over: self.is_action_active(Action::ForceGameOver),
            pan,
            any_input: self.take_any_input(),
        }
    }

    fn raise(&mut self, code: &str, trigger: Trigger) {
        for binding in &self.bindings {
            if binding.code == code && binding.trigger == trigger {
                self.pulses.insert(binding.action);
            }
        }
    }
}

impl Default for ActionMapper {
    fn default() -> Self {
        Self::new(&DebugConfig::default())
    }
}
