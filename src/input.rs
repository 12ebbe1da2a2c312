//! User-controlled scene parameters.
//!
//! Input arrives as [`InputEvent`]s at arbitrary times between frames and is
//! applied to [`Controls`] with last-write-wins semantics. Once per frame the
//! renderer takes an immutable [`InputSnapshot`] and works only from that.
//!
//! Shells translate their own widgets into events: [`InputEvent::parse`] accepts
//! control names and string values (what a web form delivers), and
//! [`key_binding`] maps keyboard keys for the native window.

use std::str::FromStr;

use anyhow::{Context as _, anyhow, bail};
use cgmath::{Point3, Vector3};
use winit::keyboard::KeyCode;

use crate::{
    data_structures::transform::Transform,
    pipelines::light::{HexColor, LightSettings},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectionKind {
    Perspective,
    Orthographic,
}

impl FromStr for ProjectionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "perspective" => Ok(Self::Perspective),
            "orthographic" | "ortho" => Ok(Self::Orthographic),
            other => bail!("unknown projection type '{other}'"),
        }
    }
}

/// A scalar parameter that input can set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Param {
    RotateX,
    RotateY,
    RotateZ,
    Scale,
    TranslateY,
    CameraX,
    CameraY,
    CameraZ,
    Fovy,
    LightX,
    LightY,
    LightZ,
    StandX,
    StandY,
    StandZ,
    MachineX,
    MachineY,
    MachineZ,
    CupX,
    CupY,
    CupZ,
}

const PARAM_NAMES: [(Param, &str); 21] = [
    (Param::RotateX, "rx"),
    (Param::RotateY, "ry"),
    (Param::RotateZ, "rz"),
    (Param::Scale, "scale"),
    (Param::TranslateY, "ty"),
    (Param::CameraX, "camX"),
    (Param::CameraY, "camY"),
    (Param::CameraZ, "camZ"),
    (Param::Fovy, "fovy"),
    (Param::LightX, "lightX"),
    (Param::LightY, "lightY"),
    (Param::LightZ, "lightZ"),
    (Param::StandX, "standX"),
    (Param::StandY, "standY"),
    (Param::StandZ, "standZ"),
    (Param::MachineX, "machX"),
    (Param::MachineY, "machY"),
    (Param::MachineZ, "machZ"),
    (Param::CupX, "cupX"),
    (Param::CupY, "cupY"),
    (Param::CupZ, "cupZ"),
];

impl Param {
    pub fn from_name(name: &str) -> Option<Self> {
        PARAM_NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(param, _)| *param)
    }

    pub fn name(&self) -> &'static str {
        PARAM_NAMES
            .iter()
            .find(|(param, _)| param == self)
            .map(|(_, name)| *name)
            .unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightColor {
    Ambient,
    Diffuse,
    Specular,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Set(Param, f32),
    Color(LightColor, HexColor),
    Projection(ProjectionKind),
    UseImageTexture(bool),
    ToggleAnimation,
}

impl InputEvent {
    /**
     * Builds an event from a control name and its raw string value.
     *
     * Scalars parse as `f32`, colours as `#rrggbb`, `projType` as
     * `perspective`/`orthographic`, `useImageTex` as a boolean. `toggle-anim`
     * ignores its value.
     */
    pub fn parse(name: &str, value: &str) -> anyhow::Result<Self> {
        let value = value.trim();
        let event = match name {
            "ambientColor" => Self::Color(LightColor::Ambient, value.parse()?),
            "diffuseColor" => Self::Color(LightColor::Diffuse, value.parse()?),
            "specularColor" => Self::Color(LightColor::Specular, value.parse()?),
            "projType" => Self::Projection(value.parse()?),
            "useImageTex" => Self::UseImageTexture(
                value
                    .parse()
                    .with_context(|| format!("'{value}' is not a boolean"))?,
            ),
            "toggle-anim" => Self::ToggleAnimation,
            _ => {
                let param =
                    Param::from_name(name).ok_or_else(|| anyhow!("unknown control '{name}'"))?;
                let scalar = value
                    .parse::<f32>()
                    .with_context(|| format!("'{value}' for '{name}' is not a number"))?;
                Self::Set(param, scalar)
            }
        };
        Ok(event)
    }
}

/// The mutable parameter state that input events write into.
#[derive(Clone, Debug, PartialEq)]
pub struct Controls {
    pub root: Transform,
    pub camera: Point3<f32>,
    pub projection: ProjectionKind,
    pub fovy: f32,
    pub light: LightSettings,
    pub stand_offset: Vector3<f32>,
    pub machine_offset: Vector3<f32>,
    pub cup_offset: Vector3<f32>,
    pub use_image_texture: bool,
    pub auto_rotate: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            root: Transform {
                rotation: Vector3::new(20.0, -20.0, 0.0),
                ..Transform::new()
            },
            camera: Point3::new(0.0, 2.0, 5.0),
            projection: ProjectionKind::Perspective,
            fovy: 45.0,
            light: LightSettings::default(),
            stand_offset: Vector3::new(0.0, 0.0, 0.0),
            machine_offset: Vector3::new(0.0, 0.0, 0.0),
            // sits right below the nozzle
            cup_offset: Vector3::new(0.0, -0.20, 0.0),
            use_image_texture: true,
            auto_rotate: false,
        }
    }
}

impl Controls {
    pub fn apply(&mut self, event: InputEvent) {
        log::debug!("input: {:?}", event);
        match event {
            InputEvent::Set(param, value) => *self.scalar_mut(param) = value,
            InputEvent::Color(LightColor::Ambient, color) => self.light.ambient = color,
            InputEvent::Color(LightColor::Diffuse, color) => self.light.diffuse = color,
            InputEvent::Color(LightColor::Specular, color) => self.light.specular = color,
            InputEvent::Projection(kind) => self.projection = kind,
            InputEvent::UseImageTexture(on) => self.use_image_texture = on,
            InputEvent::ToggleAnimation => self.auto_rotate = !self.auto_rotate,
        }
    }

    /// Parses and applies a named update; rejected input leaves the state as is.
    pub fn apply_named(&mut self, name: &str, value: &str) {
        match InputEvent::parse(name, value) {
            Ok(event) => self.apply(event),
            Err(e) => log::warn!("ignoring input {name}={value}: {e:#}"),
        }
    }

    pub fn scalar(&self, param: Param) -> f32 {
        match param {
            Param::RotateX => self.root.rotation.x,
            Param::RotateY => self.root.rotation.y,
            Param::RotateZ => self.root.rotation.z,
            Param::Scale => self.root.scale,
            Param::TranslateY => self.root.translation.y,
            Param::CameraX => self.camera.x,
            Param::CameraY => self.camera.y,
            Param::CameraZ => self.camera.z,
            Param::Fovy => self.fovy,
            Param::LightX => self.light.position.x,
            Param::LightY => self.light.position.y,
            Param::LightZ => self.light.position.z,
            Param::StandX => self.stand_offset.x,
            Param::StandY => self.stand_offset.y,
            Param::StandZ => self.stand_offset.z,
            Param::MachineX => self.machine_offset.x,
            Param::MachineY => self.machine_offset.y,
            Param::MachineZ => self.machine_offset.z,
            Param::CupX => self.cup_offset.x,
            Param::CupY => self.cup_offset.y,
            Param::CupZ => self.cup_offset.z,
        }
    }

    fn scalar_mut(&mut self, param: Param) -> &mut f32 {
        match param {
            Param::RotateX => &mut self.root.rotation.x,
            Param::RotateY => &mut self.root.rotation.y,
            Param::RotateZ => &mut self.root.rotation.z,
            Param::Scale => &mut self.root.scale,
            Param::TranslateY => &mut self.root.translation.y,
            Param::CameraX => &mut self.camera.x,
            Param::CameraY => &mut self.camera.y,
            Param::CameraZ => &mut self.camera.z,
            Param::Fovy => &mut self.fovy,
            Param::LightX => &mut self.light.position.x,
            Param::LightY => &mut self.light.position.y,
            Param::LightZ => &mut self.light.position.z,
            Param::StandX => &mut self.stand_offset.x,
            Param::StandY => &mut self.stand_offset.y,
            Param::StandZ => &mut self.stand_offset.z,
            Param::MachineX => &mut self.machine_offset.x,
            Param::MachineY => &mut self.machine_offset.y,
            Param::MachineZ => &mut self.machine_offset.z,
            Param::CupX => &mut self.cup_offset.x,
            Param::CupY => &mut self.cup_offset.y,
            Param::CupZ => &mut self.cup_offset.z,
        }
    }

    pub fn snapshot(&self, coffee_time: f64) -> InputSnapshot {
        InputSnapshot {
            root: self.root,
            camera: self.camera,
            projection: self.projection,
            fovy: self.fovy,
            light: self.light,
            stand_offset: self.stand_offset,
            machine_offset: self.machine_offset,
            cup_offset: self.cup_offset,
            use_image_texture: self.use_image_texture,
            coffee_time,
        }
    }
}

/// Everything a frame depends on, frozen at the start of the frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputSnapshot {
    pub root: Transform,
    pub camera: Point3<f32>,
    pub projection: ProjectionKind,
    pub fovy: f32,
    pub light: LightSettings,
    pub stand_offset: Vector3<f32>,
    pub machine_offset: Vector3<f32>,
    pub cup_offset: Vector3<f32>,
    pub use_image_texture: bool,
    pub coffee_time: f64,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Controls::default().snapshot(0.0)
    }
}

const ROTATION_STEP: f32 = 5.0;
const SCALE_STEP: f32 = 0.05;
const MOVE_STEP: f32 = 0.05;
const CAMERA_STEP: f32 = 0.25;
const LIGHT_STEP: f32 = 0.5;

/// Colours the light keys cycle through, in order.
pub const LIGHT_PALETTE: [HexColor; 6] = [
    HexColor::new(0x20, 0x20, 0x20),
    HexColor::new(0xff, 0xff, 0xff),
    HexColor::new(0xff, 0xd8, 0xa0),
    HexColor::new(0xa0, 0xc8, 0xff),
    HexColor::new(0xff, 0x80, 0x80),
    HexColor::new(0x00, 0x00, 0x00),
];

/// The palette entry after `current`; colours outside the palette restart it.
pub fn next_light_color(current: HexColor) -> HexColor {
    let next = LIGHT_PALETTE
        .iter()
        .position(|color| *color == current)
        .map_or(0, |i| (i + 1) % LIGHT_PALETTE.len());
    LIGHT_PALETTE[next]
}

/**
 * Keyboard bindings of the native window.
 *
 * Steps are relative to the current value, so the binding needs the current
 * controls to produce an absolute [`InputEvent::Set`].
 */
pub fn key_binding(key: KeyCode, controls: &Controls) -> Option<InputEvent> {
    let step = |param: Param, delta: f32| InputEvent::Set(param, controls.scalar(param) + delta);
    let cycle = |which: LightColor| {
        let light = &controls.light;
        let current = match which {
            LightColor::Ambient => light.ambient,
            LightColor::Diffuse => light.diffuse,
            LightColor::Specular => light.specular,
        };
        InputEvent::Color(which, next_light_color(current))
    };
    let event = match key {
        KeyCode::ArrowLeft => step(Param::RotateY, -ROTATION_STEP),
        KeyCode::ArrowRight => step(Param::RotateY, ROTATION_STEP),
        KeyCode::ArrowUp => step(Param::RotateX, -ROTATION_STEP),
        KeyCode::ArrowDown => step(Param::RotateX, ROTATION_STEP),
        KeyCode::KeyQ => step(Param::RotateZ, -ROTATION_STEP),
        KeyCode::KeyE => step(Param::RotateZ, ROTATION_STEP),
        KeyCode::Equal => step(Param::Scale, SCALE_STEP),
        KeyCode::Minus => step(Param::Scale, -SCALE_STEP),
        KeyCode::PageUp => step(Param::TranslateY, MOVE_STEP),
        KeyCode::PageDown => step(Param::TranslateY, -MOVE_STEP),
        KeyCode::KeyA => step(Param::CameraX, -CAMERA_STEP),
        KeyCode::KeyD => step(Param::CameraX, CAMERA_STEP),
        KeyCode::KeyR => step(Param::CameraY, CAMERA_STEP),
        KeyCode::KeyF => step(Param::CameraY, -CAMERA_STEP),
        KeyCode::KeyW => step(Param::CameraZ, -CAMERA_STEP),
        KeyCode::KeyS => step(Param::CameraZ, CAMERA_STEP),
        KeyCode::BracketLeft => step(Param::Fovy, -ROTATION_STEP),
        KeyCode::BracketRight => step(Param::Fovy, ROTATION_STEP),
        KeyCode::KeyN => step(Param::StandX, -MOVE_STEP),
        KeyCode::KeyM => step(Param::StandX, MOVE_STEP),
        KeyCode::KeyH => step(Param::StandY, -MOVE_STEP),
        KeyCode::KeyY => step(Param::StandY, MOVE_STEP),
        KeyCode::KeyG => step(Param::StandZ, -MOVE_STEP),
        KeyCode::KeyB => step(Param::StandZ, MOVE_STEP),
        KeyCode::KeyU => step(Param::MachineX, -MOVE_STEP),
        KeyCode::KeyO => step(Param::MachineX, MOVE_STEP),
        KeyCode::KeyZ => step(Param::MachineY, -MOVE_STEP),
        KeyCode::KeyX => step(Param::MachineY, MOVE_STEP),
        KeyCode::KeyC => step(Param::MachineZ, -MOVE_STEP),
        KeyCode::KeyV => step(Param::MachineZ, MOVE_STEP),
        KeyCode::KeyJ => step(Param::CupX, -MOVE_STEP),
        KeyCode::KeyL => step(Param::CupX, MOVE_STEP),
        KeyCode::KeyI => step(Param::CupY, MOVE_STEP),
        KeyCode::KeyK => step(Param::CupY, -MOVE_STEP),
        KeyCode::Comma => step(Param::CupZ, -MOVE_STEP),
        KeyCode::Period => step(Param::CupZ, MOVE_STEP),
        KeyCode::Digit1 => step(Param::LightX, -LIGHT_STEP),
        KeyCode::Digit2 => step(Param::LightX, LIGHT_STEP),
        KeyCode::Digit3 => step(Param::LightY, -LIGHT_STEP),
        KeyCode::Digit4 => step(Param::LightY, LIGHT_STEP),
        KeyCode::Digit5 => step(Param::LightZ, -LIGHT_STEP),
        KeyCode::Digit6 => step(Param::LightZ, LIGHT_STEP),
        KeyCode::Digit7 => cycle(LightColor::Ambient),
        KeyCode::Digit8 => cycle(LightColor::Diffuse),
        KeyCode::Digit9 => cycle(LightColor::Specular),
        KeyCode::KeyP => InputEvent::Projection(match controls.projection {
            ProjectionKind::Perspective => ProjectionKind::Orthographic,
            ProjectionKind::Orthographic => ProjectionKind::Perspective,
        }),
        KeyCode::KeyT => InputEvent::UseImageTexture(!controls.use_image_texture),
        KeyCode::Space => InputEvent::ToggleAnimation,
        _ => return None,
    };
    Some(event)
}
