mod common;

use coffee_scene::{
    input::{
        Controls, InputEvent, LIGHT_PALETTE, LightColor, Param, ProjectionKind, key_binding,
        next_light_color,
    },
    pipelines::light::{HexColor, hex_to_rgb},
};
use winit::keyboard::KeyCode;

use crate::common::test_utils::assert_near;

#[test]
fn defaults_match_the_initial_scene() {
    let controls = Controls::default();
    assert_eq!(controls.scalar(Param::RotateX), 20.0);
    assert_eq!(controls.scalar(Param::RotateY), -20.0);
    assert_eq!(controls.scalar(Param::RotateZ), 0.0);
    assert_eq!(controls.scalar(Param::Scale), 1.0);
    assert_eq!(controls.scalar(Param::CameraZ), 5.0);
    assert_eq!(controls.scalar(Param::Fovy), 45.0);
    assert_eq!(controls.projection, ProjectionKind::Perspective);
    assert_eq!(controls.light.ambient.to_string(), "#202020");
    assert!(controls.use_image_texture);
    assert!(!controls.auto_rotate);
}

#[test]
fn every_control_name_round_trips() {
    let names = [
        "rx", "ry", "rz", "scale", "ty", "camX", "camY", "camZ", "fovy", "lightX", "lightY",
        "lightZ", "standX", "standY", "standZ", "machX", "machY", "machZ", "cupX", "cupY",
        "cupZ",
    ];
    for name in names {
        let param = Param::from_name(name).expect(name);
        assert_eq!(param.name(), name);
    }
    assert_eq!(Param::from_name("camx"), None);
}

#[test]
fn named_scalars_set_their_parameter() {
    let mut controls = Controls::default();
    controls.apply_named("camX", "1.5");
    controls.apply_named("machY", " -0.25 ");
    controls.apply_named("lightZ", "7");

    assert_eq!(controls.camera.x, 1.5);
    assert_eq!(controls.machine_offset.y, -0.25);
    assert_eq!(controls.light.position.z, 7.0);
}

#[test]
fn named_options_parse() {
    assert_eq!(
        InputEvent::parse("projType", "orthographic").unwrap(),
        InputEvent::Projection(ProjectionKind::Orthographic)
    );
    assert_eq!(
        InputEvent::parse("useImageTex", "false").unwrap(),
        InputEvent::UseImageTexture(false)
    );
    assert_eq!(
        InputEvent::parse("toggle-anim", "").unwrap(),
        InputEvent::ToggleAnimation
    );
    assert_eq!(
        InputEvent::parse("specularColor", "#ff8000").unwrap(),
        InputEvent::Color(LightColor::Specular, HexColor::new(0xff, 0x80, 0x00))
    );
}

#[test]
fn rejected_input_leaves_the_controls_unchanged() {
    let mut controls = Controls::default();
    let before = controls.clone();

    controls.apply_named("fovy", "wide");
    controls.apply_named("zoom", "2");
    controls.apply_named("ambientColor", "red");
    controls.apply_named("diffuseColor", "#12345");
    controls.apply_named("specularColor", "#12345g");
    controls.apply_named("projType", "fisheye");
    controls.apply_named("useImageTex", "maybe");

    assert_eq!(controls, before);
}

#[test]
fn last_write_wins() {
    let mut controls = Controls::default();
    controls.apply(InputEvent::Set(Param::Scale, 2.0));
    controls.apply(InputEvent::Set(Param::Scale, 0.5));
    assert_eq!(controls.root.scale, 0.5);
}

#[test]
fn toggle_animation_flips_auto_rotation() {
    let mut controls = Controls::default();
    controls.apply(InputEvent::ToggleAnimation);
    assert!(controls.auto_rotate);
    controls.apply(InputEvent::ToggleAnimation);
    assert!(!controls.auto_rotate);
}

#[test]
fn hex_colours_normalize_each_byte() {
    let [r, g, b] = hex_to_rgb("#202020").unwrap();
    assert_near(r, 32.0 / 255.0);
    assert_near(g, 0.1255);
    assert_near(b, 0.1255);
    assert_eq!(hex_to_rgb("#ffffff").unwrap(), [1.0, 1.0, 1.0]);
    assert_eq!(hex_to_rgb("#000000").unwrap(), [0.0, 0.0, 0.0]);
    assert_eq!(hex_to_rgb("#FF0000").unwrap(), [1.0, 0.0, 0.0]);
    assert!(hex_to_rgb("202020").is_err());
    assert!(hex_to_rgb("#2020").is_err());
}

#[test]
fn snapshot_freezes_the_current_values() {
    let mut controls = Controls::default();
    let snapshot = controls.snapshot(1.25);
    controls.apply(InputEvent::Set(Param::CupX, 0.4));

    assert_eq!(snapshot.cup_offset.x, 0.0);
    assert_eq!(snapshot.coffee_time, 1.25);
    assert_eq!(controls.snapshot(0.0).cup_offset.x, 0.4);
}

#[test]
fn keys_step_from_the_current_value() {
    let mut controls = Controls::default();

    let event = key_binding(KeyCode::ArrowRight, &controls).unwrap();
    assert_eq!(event, InputEvent::Set(Param::RotateY, -15.0));
    controls.apply(event);
    let event = key_binding(KeyCode::ArrowRight, &controls).unwrap();
    assert_eq!(event, InputEvent::Set(Param::RotateY, -10.0));

    assert_eq!(
        key_binding(KeyCode::KeyP, &controls),
        Some(InputEvent::Projection(ProjectionKind::Orthographic))
    );
    assert_eq!(
        key_binding(KeyCode::KeyT, &controls),
        Some(InputEvent::UseImageTexture(false))
    );
    assert_eq!(
        key_binding(KeyCode::Space, &controls),
        Some(InputEvent::ToggleAnimation)
    );
    assert_eq!(key_binding(KeyCode::F12, &controls), None);
}

#[test]
fn every_scalar_control_has_keys_both_ways() {
    let controls = Controls::default();
    let keys = [
        KeyCode::ArrowLeft, KeyCode::ArrowRight, KeyCode::ArrowUp, KeyCode::ArrowDown,
        KeyCode::KeyQ, KeyCode::KeyE, KeyCode::Equal, KeyCode::Minus, KeyCode::PageUp,
        KeyCode::PageDown, KeyCode::KeyA, KeyCode::KeyD, KeyCode::KeyR, KeyCode::KeyF,
        KeyCode::KeyW, KeyCode::KeyS, KeyCode::BracketLeft, KeyCode::BracketRight,
        KeyCode::KeyN, KeyCode::KeyM, KeyCode::KeyH, KeyCode::KeyY, KeyCode::KeyG,
        KeyCode::KeyB, KeyCode::KeyU, KeyCode::KeyO, KeyCode::KeyZ, KeyCode::KeyX,
        KeyCode::KeyC, KeyCode::KeyV, KeyCode::KeyJ, KeyCode::KeyL, KeyCode::KeyI,
        KeyCode::KeyK, KeyCode::Comma, KeyCode::Period, KeyCode::Digit1, KeyCode::Digit2,
        KeyCode::Digit3, KeyCode::Digit4, KeyCode::Digit5, KeyCode::Digit6,
    ];

    let mut raised = Vec::new();
    let mut lowered = Vec::new();
    for key in keys {
        match key_binding(key, &controls) {
            Some(InputEvent::Set(param, value)) => {
                if value > controls.scalar(param) {
                    raised.push(param);
                } else {
                    lowered.push(param);
                }
            }
            other => panic!("{key:?} produced {other:?}"),
        }
    }

    for name in [
        "rx", "ry", "rz", "scale", "ty", "camX", "camY", "camZ", "fovy", "lightX", "lightY",
        "lightZ", "standX", "standY", "standZ", "machX", "machY", "machZ", "cupX", "cupY",
        "cupZ",
    ] {
        let param = Param::from_name(name).unwrap();
        assert!(raised.contains(&param), "no key raises {name}");
        assert!(lowered.contains(&param), "no key lowers {name}");
    }
}

#[test]
fn light_keys_move_the_light_and_cycle_its_colours() {
    let mut controls = Controls::default();

    let event = key_binding(KeyCode::Digit2, &controls).unwrap();
    assert_eq!(event, InputEvent::Set(Param::LightX, 3.5));

    let event = key_binding(KeyCode::Digit7, &controls).unwrap();
    assert_eq!(
        event,
        InputEvent::Color(LightColor::Ambient, HexColor::new(0xff, 0xff, 0xff))
    );
    controls.apply(event);
    assert_eq!(controls.light.ambient.to_string(), "#ffffff");

    for _ in 0..LIGHT_PALETTE.len() {
        let event = key_binding(KeyCode::Digit9, &controls).unwrap();
        controls.apply(event);
    }
    // a full cycle comes back to the starting colour
    assert_eq!(controls.light.specular, HexColor::new(0xff, 0xff, 0xff));
}

#[test]
fn colours_outside_the_palette_restart_it() {
    let odd: HexColor = "#123456".parse().unwrap();
    assert_eq!(next_light_color(odd), LIGHT_PALETTE[0]);
    let last = LIGHT_PALETTE[LIGHT_PALETTE.len() - 1];
    assert_eq!(next_light_color(last), LIGHT_PALETTE[0]);
}
