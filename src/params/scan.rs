//! Press-and-hold scanner timing and geometry.

use std::time::Duration;

/// Scanner accumulation parameters
#[derive(Debug, Clone)]
pub struct ScanTiming {
    /// Fill tick period while the pointer is held
    /// 16 ms ≈ one tick per 60 Hz frame
    pub fill_period: Duration,

    /// Progress added per fill tick (percent)
    /// 1.2 → 100% after 84 ticks (1344 ms)
    pub fill_step: f32,

    /// Decay tick period after release
    pub decay_period: Duration,

    /// Progress removed per decay tick (percent)
    pub decay_step: f32,

    /// Hum cue repetition period while held
    pub hum_period: Duration,

    /// Haptic tap on press (milliseconds on)
    pub press_pulse_ms: Vec<u32>,

    /// Haptic pattern on success (on/off/on milliseconds)
    pub success_pulse_ms: Vec<u32>,
}

impl Default for ScanTiming {
    fn default() -> Self {
        Self {
            fill_period: Duration::from_millis(16),
            fill_step: 1.2,
            decay_period: Duration::from_millis(16),
            decay_step: 6.0,
            hum_period: Duration::from_millis(350),
            press_pulse_ms: vec![20],
            success_pulse_ms: vec![100, 50, 200],
        }
    }
}

impl ScanTiming {
    /// Number of held fill ticks needed to reach 100%
    pub fn ticks_to_complete(&self) -> u32 {
        (100.0 / self.fill_step).ceil() as u32
    }
}

/// Scanner layout in logical pixels (relative to the scanner center)
#[derive(Debug, Clone)]
pub struct ScanGeometry {
    /// Radius of the pressable button (w-36 → 144 px diameter)
    pub button_radius_px: f32,

    /// Radius of the progress ring
    pub ring_radius_px: f32,

    /// Progress ring stroke width
    pub ring_stroke_px: f32,

    /// Radii of the rotating dashed outer rings
    pub outer_ring_radii_px: [f32; 2],

    /// Period of one full outer ring rotation (seconds)
    pub outer_ring_rotation_s: f32,

    /// Period of the sweeping scan line (seconds, top → bottom)
    pub scan_line_period_s: f32,
}

impl Default for ScanGeometry {
    fn default() -> Self {
        Self {
            button_radius_px: 72.0,
            ring_radius_px: 75.0,
            ring_stroke_px: 2.0,
            outer_ring_radii_px: [110.0, 120.0],
            outer_ring_rotation_s: 20.0,
            scan_line_period_s: 1.0,
        }
    }
}
