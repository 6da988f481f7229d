//! Background particle field parameters.

/// Particle seeding and motion parameters
#[derive(Debug, Clone)]
pub struct ParticleParams {
    /// Number of particles (constant for the field's lifetime)
    pub count: usize,

    /// Velocity component range (pixels per reference frame, symmetric around 0)
    /// 0.25 → speeds in [-0.25, 0.25)
    pub max_speed_px: f32,

    /// Radius range (pixels)
    pub radius_range_px: (f32, f32),

    /// Maximum particle opacity (0..1)
    pub max_opacity: f32,

    /// Velocity multiplier while authorized
    pub accelerated_factor: f32,

    /// Link particles closer than this (pixels), only while idle
    pub link_distance_px: f32,

    /// Link line opacity
    pub link_opacity: f32,

    /// Link line width (pixels)
    pub link_width_px: f32,

    /// Reference frame duration (seconds) that velocities are expressed in
    pub reference_frame_s: f32,

    /// Opacity of the whole field layer (canvas opacity-40)
    pub layer_opacity: f32,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            count: 60,
            max_speed_px: 0.25,
            radius_range_px: (0.5, 2.0),
            max_opacity: 0.5,
            accelerated_factor: 10.0,
            link_distance_px: 150.0,
            link_opacity: 0.05,
            link_width_px: 0.5,
            reference_frame_s: 1.0 / 60.0,
            layer_opacity: 0.4,
        }
    }
}
