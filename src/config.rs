//! Startup configuration of the scene.

/// Fixed settings chosen before the window opens. Everything the user can change
/// while the scene runs lives in [`crate::input::Controls`] instead.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub title: String,
    pub clear_colour: wgpu::Color,
    /// File name of the image texture, resolved below `assets/`.
    pub image_asset: String,
    pub checker_size: u32,
    pub checker_squares: u32,
    pub near: f32,
    pub far: f32,
    /// Half height of the orthographic view volume; the width is scaled by the
    /// aspect ratio.
    pub ortho_half_extent: f32,
    /// The orthographic volume spans `-ortho_depth..ortho_depth` in view z.
    pub ortho_depth: f32,
    pub fall_distance: f32,
    pub fall_speed: f32,
    /// Degrees per second while auto-rotation is on.
    pub rotate_speed: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            title: "coffee-scene".to_string(),
            clear_colour: wgpu::Color {
                r: 0.95,
                g: 0.95,
                b: 0.95,
                a: 1.0,
            },
            image_asset: "images.webp".to_string(),
            checker_size: 64,
            checker_squares: 8,
            near: 0.1,
            far: 100.0,
            ortho_half_extent: 3.0,
            ortho_depth: 100.0,
            fall_distance: 0.2,
            fall_speed: 1.0,
            rotate_speed: 20.0,
        }
    }
}

impl SceneConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_clear_colour(mut self, clear_colour: wgpu::Color) -> Self {
        self.clear_colour = clear_colour;
        self
    }

    pub fn with_image_asset(mut self, image_asset: impl Into<String>) -> Self {
        self.image_asset = image_asset.into();
        self
    }

    pub fn with_checker(mut self, size: u32, squares: u32) -> Self {
        self.checker_size = size;
        self.checker_squares = squares;
        self
    }

    pub fn with_fall(mut self, distance: f32, speed: f32) -> Self {
        self.fall_distance = distance;
        self.fall_speed = speed;
        self
    }

    pub fn with_rotate_speed(mut self, degrees_per_second: f32) -> Self {
        self.rotate_speed = degrees_per_second;
        self
    }
}
