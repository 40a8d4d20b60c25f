// Edge autoscroll
//
// While a gesture is active and the pointer sits inside the edge margin of the
// viewport, the host advances this task once per frame. The task owns no
// timer; it is a flag plus a velocity, so stopping it is immediate and it can
// never be scheduled twice for the same gesture.

use crate::models::settings::AutoScrollConfig;

/// Horizontal scroll velocity (pixels per frame) for a pointer at viewport
/// x-coordinate `pointer_x`. Negative scrolls left, positive right, zero means
/// the pointer is outside both edge zones.
pub fn edge_velocity(pointer_x: f32, viewport_width: f32, config: &AutoScrollConfig) -> f32 {
    if !pointer_x.is_finite() || viewport_width <= 0.0 || config.max_speed <= 0.0 {
        return 0.0;
    }
    let margin = config.edge_margin.min(viewport_width / 2.0).max(1.0);

    let ramp = |distance: f32| -> f32 {
        let closeness = ((margin - distance) / margin).clamp(0.0, 1.0);
        (config.max_speed * closeness).max(1.0)
    };

    if pointer_x < margin {
        -ramp(pointer_x)
    } else if pointer_x > viewport_width - margin {
        ramp(viewport_width - pointer_x)
    } else {
        0.0
    }
}

/// Per-gesture repeating scroll task.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AutoScrollTask {
    velocity: f32,
    running: bool,
    frames: u32,
}

impl AutoScrollTask {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Frames stepped since the task last started.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Update the velocity from the latest pointer position. Starts the task
    /// when the pointer enters an edge zone and stops it when it leaves.
    /// Returns true if the task went from stopped to running.
    pub fn steer(&mut self, velocity: f32) -> bool {
        self.velocity = velocity;
        if velocity == 0.0 {
            self.stop();
            return false;
        }
        if self.running {
            return false;
        }
        self.running = true;
        self.frames = 0;
        true
    }

    /// Advance one frame. Returns the new scroll offset, or `None` when the
    /// task is stopped or the scroll bound was reached (which stops it).
    pub fn step(&mut self, left: f32, max_left: f32) -> Option<f32> {
        if !self.running {
            return None;
        }
        let next = (left + self.velocity).clamp(0.0, max_left.max(0.0));
        if (next - left).abs() < f32::EPSILON {
            self.stop();
            return None;
        }
        self.frames += 1;
        Some(next)
    }

    pub fn stop(&mut self) {
        if self.running {
            log::trace!("Autoscroll stopped after {} frames", self.frames);
        }
        self.running = false;
        self.velocity = 0.0;
    }
}
