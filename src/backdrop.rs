/// Crossfade between two background media layers. Independent of the 3D
/// engine; the host only reads the two opacities each frame.
#[derive(Debug, Clone)]
pub struct BackdropFader {
    current: Option<String>,
    previous: Option<String>,
    progress: f32,
    rate: f32,
}

impl BackdropFader {
    pub fn new(rate: f32) -> Self {
        Self {
            current: None,
            previous: None,
            progress: 1.0,
            rate,
        }
    }

    /// Starts a crossfade when the URL actually changes.
    pub fn set_url(&mut self, url: &str) -> bool {
        if url.is_empty() || self.current.as_deref() == Some(url) {
            return false;
        }
        self.previous = self.current.replace(url.to_owned());
        self.progress = 0.0;
        true
    }

    pub fn update(&mut self, delta: f32) {
        if self.progress < 1.0 {
            self.progress = (self.progress + delta.max(0.0) * self.rate).min(1.0);
            if self.progress >= 1.0 {
                self.previous = None;
            }
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    pub fn current_opacity(&self) -> f32 {
        if self.current.is_some() {
            self.progress
        } else {
            0.0
        }
    }

    pub fn previous_opacity(&self) -> f32 {
        if self.previous.is_some() {
            1.0 - self.progress
        } else {
            0.0
        }
    }

    pub fn is_fading(&self) -> bool {
        self.progress < 1.0
    }
}
