use std::f64::consts::FRAC_PI_2;

use crate::geo::wrap_angle;

/// Below this residual (radians) smoothing snaps onto its target.
const SNAP_EPSILON: f64 = 1e-9;

/// Below this angular velocity (radians/tick) inertial spin stops.
const MIN_VELOCITY: f64 = 1e-5;

/// Globe orientation. Owned by the render loop and passed by value into
/// the projector and the update functions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationState {
    /// Tilt about the horizontal screen axis (radians)
    pub angle_x: f64,
    /// Spin about the polar axis (radians)
    pub angle_y: f64,
}

impl RotationState {
    pub fn new(angle_x: f64, angle_y: f64) -> Self {
        Self { angle_x, angle_y }
    }

    /// Orientation that puts (lat, lon) at the center of the disk.
    pub fn facing(lat: f64, lon: f64) -> Self {
        Self {
            angle_x: lat.to_radians(),
            angle_y: FRAC_PI_2 - lon.to_radians(),
        }
    }

    /// Geographic point currently under the disk center, in degrees.
    pub fn center_lat_lon(&self) -> (f64, f64) {
        let lat = self.angle_x.to_degrees();
        let lon = wrap_angle(FRAC_PI_2 - self.angle_y).to_degrees();
        (lat, lon)
    }
}

/// Tunables for how input drives rotation.
#[derive(Clone, Debug, PartialEq)]
pub struct RotationParams {
    /// Idle spin rate in radians per second
    pub auto_speed: f64,
    /// Radians of rotation per pixel of pointer drag
    pub sensitivity: f64,
    /// Tilt clamp for `angle_x`; `None` leaves tilt unclamped
    pub tilt_limit: Option<f64>,
    /// Fraction of the remaining distance covered per smoothing step, in (0, 1]
    pub damping: f64,
    /// Per-tick decay of inertial spin after a drag is released, in [0, 1)
    pub friction: f64,
}

impl Default for RotationParams {
    fn default() -> Self {
        Self {
            auto_speed: 0.25,
            sensitivity: 0.01,
            tilt_limit: Some(FRAC_PI_2),
            damping: 0.15,
            friction: 0.92,
        }
    }
}

/// One rotation driver for a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RotationInput {
    /// Autonomous spin for `dt` seconds of elapsed time
    Tick { dt: f64 },
    /// Pointer drag by a screen-space delta in pixels
    Drag { dx: f64, dy: f64 },
}

/// Apply an input directly, without smoothing.
pub fn advance(rotation: RotationState, input: RotationInput, params: &RotationParams) -> RotationState {
    match input {
        RotationInput::Tick { dt } => RotationState {
            angle_x: rotation.angle_x,
            angle_y: rotation.angle_y + params.auto_speed * dt,
        },
        RotationInput::Drag { dx, dy } => RotationState {
            angle_x: clamp_tilt(rotation.angle_x + dy * params.sensitivity, params.tilt_limit),
            angle_y: rotation.angle_y + dx * params.sensitivity,
        },
    }
}

/// Move `current` toward `target` by `damping` of the remaining distance.
pub fn approach(current: RotationState, target: RotationState, damping: f64) -> RotationState {
    RotationState {
        angle_x: approach_angle(current.angle_x, target.angle_x, damping),
        angle_y: approach_angle(current.angle_y, target.angle_y, damping),
    }
}

#[inline(always)]
fn approach_angle(current: f64, target: f64, damping: f64) -> f64 {
    let diff = target - current;
    if diff.abs() < SNAP_EPSILON {
        target
    } else {
        current + diff * damping
    }
}

#[inline(always)]
fn clamp_tilt(angle: f64, limit: Option<f64>) -> f64 {
    match limit {
        Some(limit) => angle.clamp(-limit, limit),
        None => angle,
    }
}

/// Blends autonomous spin, pointer drag and post-release inertia.
///
/// Inputs only ever move the target; the displayed orientation eases
/// toward it every tick, which hides jitter from coarse pointer deltas
/// (terminal mouse reports arrive in whole character cells).
#[derive(Clone, Debug)]
pub struct SmoothRotation {
    current: RotationState,
    target: RotationState,
    initial: RotationState,
    /// Inertial spin (angle_x, angle_y) in radians per tick
    velocity: (f64, f64),
    dragging: bool,
    pub auto_rotate: bool,
}

impl SmoothRotation {
    /// Start at `initial`, with its tilt held inside `params.tilt_limit`.
    pub fn new(initial: RotationState, auto_rotate: bool, params: &RotationParams) -> Self {
        let initial = RotationState {
            angle_x: clamp_tilt(initial.angle_x, params.tilt_limit),
            angle_y: initial.angle_y,
        };
        Self {
            current: initial,
            target: initial,
            initial,
            velocity: (0.0, 0.0),
            dragging: false,
            auto_rotate,
        }
    }

    /// Orientation to render this frame.
    pub fn current(&self) -> RotationState {
        self.current
    }

    pub fn target(&self) -> RotationState {
        self.target
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
        self.velocity = (0.0, 0.0);
    }

    /// Move the target by a drag delta and remember it as fling velocity.
    pub fn drag(&mut self, dx: f64, dy: f64, params: &RotationParams) {
        self.target = advance(self.target, RotationInput::Drag { dx, dy }, params);
        self.velocity = (dy * params.sensitivity, dx * params.sensitivity);
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Keyboard-style rotation: moves the target with no inertia.
    pub fn nudge(&mut self, dx: f64, dy: f64, params: &RotationParams) {
        self.target = advance(self.target, RotationInput::Drag { dx, dy }, params);
    }

    /// Advance one frame of `dt` seconds and return the new orientation.
    pub fn tick(&mut self, dt: f64, params: &RotationParams) -> RotationState {
        if self.dragging {
            // Holding still mid-drag should not fling on release
            self.velocity.0 *= params.friction;
            self.velocity.1 *= params.friction;
        } else {
            if self.auto_rotate {
                self.target = advance(self.target, RotationInput::Tick { dt }, params);
            }
            self.apply_inertia(params);
        }

        self.current = approach(self.current, self.target, params.damping);
        self.current
    }

    fn apply_inertia(&mut self, params: &RotationParams) {
        let (vx, vy) = self.velocity;
        if vx.abs() < MIN_VELOCITY && vy.abs() < MIN_VELOCITY {
            self.velocity = (0.0, 0.0);
            return;
        }
        self.target.angle_x = clamp_tilt(self.target.angle_x + vx, params.tilt_limit);
        self.target.angle_y += vy;
        self.velocity = (vx * params.friction, vy * params.friction);
    }

    /// Jump back to the starting orientation.
    pub fn reset(&mut self) {
        self.current = self.initial;
        self.target = self.initial;
        self.velocity = (0.0, 0.0);
        self.dragging = false;
    }

    /// Ease toward a new orientation, e.g. to bring a selected marker to the front.
    /// Tilt stays inside `params.tilt_limit` like a drag would.
    pub fn look_at(&mut self, rotation: RotationState, params: &RotationParams) {
        // Spin the short way round
        let dy = wrap_angle(rotation.angle_y - self.target.angle_y);
        self.target = RotationState {
            angle_x: clamp_tilt(rotation.angle_x, params.tilt_limit),
            angle_y: self.target.angle_y + dy,
        };
        self.velocity = (0.0, 0.0);
    }
}
