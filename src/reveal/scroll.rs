//! Bottom-tracking scroll offset with smooth easing.

/// Keeps the newest line in view
#[derive(Debug, Clone)]
pub struct ScrollFollow {
    offset_px: f32,
    target_px: f32,
    viewport_px: f32,
    follow_rate: f32,
}

impl ScrollFollow {
    pub fn new(viewport_px: f32, follow_rate: f32) -> Self {
        Self {
            offset_px: 0.0,
            target_px: 0.0,
            viewport_px,
            follow_rate,
        }
    }

    pub fn set_viewport(&mut self, viewport_px: f32) {
        self.viewport_px = viewport_px.max(0.0);
    }

    /// Retarget to the bottom of `content_px` of content
    pub fn track(&mut self, content_px: f32) {
        self.target_px = (content_px - self.viewport_px).max(0.0);
    }

    /// Ease toward the target; exponential approach, snaps when close
    pub fn update(&mut self, dt_s: f32) {
        let blend = 1.0 - (-self.follow_rate * dt_s).exp();
        self.offset_px += (self.target_px - self.offset_px) * blend;
        if (self.target_px - self.offset_px).abs() < 0.5 {
            self.offset_px = self.target_px;
        }
    }

    pub fn offset_px(&self) -> f32 {
        self.offset_px
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_scroll_while_content_fits() {
        let mut scroll = ScrollFollow::new(400.0, 12.0);
        scroll.track(300.0);
        scroll.update(1.0);
        assert_eq!(scroll.offset_px(), 0.0);
    }

    #[test]
    fn test_converges_to_bottom() {
        let mut scroll = ScrollFollow::new(400.0, 12.0);
        scroll.track(1000.0);
        assert_eq!(scroll.target_px, 600.0);

        let mut last = scroll.offset_px();
        for _ in 0..120 {
            scroll.update(1.0 / 60.0);
            assert!(scroll.offset_px() >= last);
            assert!(scroll.offset_px() <= 600.0);
            last = scroll.offset_px();
        }
        assert_eq!(scroll.offset_px(), 600.0);
    }
}
