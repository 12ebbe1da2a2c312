//! Time-driven animation: the falling coffee stream and the optional auto-rotation.

use instant::Duration;

use crate::input::Controls;

/// Vertical offset of the coffee stream at `time` seconds.
///
/// A sawtooth: the stream sinks linearly and jumps back to 0 every
/// `fall_distance` units, so the result lies in `(-fall_distance, 0]`.
///
/// The clock stays `f64` until after the wrap; an `f32` clock stops advancing by
/// frame-sized steps after a few days.
pub fn drop_offset(time: f64, fall_distance: f32) -> f32 {
    -(time.rem_euclid(fall_distance as f64) as f32)
}

/// Accumulates elapsed time and advances the auto-rotation.
#[derive(Clone, Debug)]
pub struct Animator {
    coffee_time: f64,
    fall_speed: f32,
    rotate_speed: f32,
}

impl Animator {
    /// `fall_speed` scales real time for the coffee clock; `rotate_speed` is the
    /// auto-rotation in degrees per second.
    pub fn new(fall_speed: f32, rotate_speed: f32) -> Self {
        Self {
            coffee_time: 0.0,
            fall_speed,
            rotate_speed,
        }
    }

    pub fn coffee_time(&self) -> f64 {
        self.coffee_time
    }

    /**
     * Advances by one frame.
     *
     * The coffee clock always runs. The root's Y rotation only moves while
     * `controls.auto_rotate` is set and wraps at 360 degrees.
     */
    pub fn update(&mut self, controls: &mut Controls, dt: Duration) {
        if controls.auto_rotate {
            let y = &mut controls.root.rotation.y;
            *y = (*y + self.rotate_speed * dt.as_secs_f32()) % 360.0;
        }
        self.coffee_time += dt.as_secs_f64() * self.fall_speed as f64;
    }
}
