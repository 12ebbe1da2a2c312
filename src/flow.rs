//! Application event loop.
//!
//! The loop owns the scene: the GPU [`Context`], the scene graph, the user
//! [`Controls`] and the [`Animator`]. Every redraw runs the same steps:
//!
//! 1. Advance the animation by the wall-clock delta
//! 2. Freeze the controls into an [`InputSnapshot`](crate::input::InputSnapshot)
//! 3. Poll the image texture load
//! 4. Copy the snapshot into the scene graph and plan the frame
//! 5. Upload the plan, draw every node and present
//!
//! Input arrives between redraws, either as keyboard events of the window or as
//! [`InputEvent`]s sent through an [`InputProxy`], and is applied immediately.

use std::sync::Arc;

use anyhow::anyhow;
use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    animation::Animator,
    config::SceneConfig,
    context::Context,
    data_structures::{
        machine::CoffeeMachine,
        scene_graph::{CoffeeNodes, SceneGraph, mk_coffee_scene_graph},
        texture::Texture,
    },
    input::{Controls, InputEvent, key_binding},
    render::plan_frame,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Events delivered to the loop from outside the window.
pub enum SceneEvent {
    #[allow(dead_code)]
    Initialized(Box<AppState>),
    #[allow(dead_code)]
    InitFailed(String),
    Input(InputEvent),
    Exit,
}

/// Sends input into a running scene from any shell (web widgets, tests, other
/// threads on native).
#[derive(Clone)]
pub struct InputProxy(EventLoopProxy<SceneEvent>);

impl InputProxy {
    pub fn send(&self, event: InputEvent) -> anyhow::Result<()> {
        self.0
            .send_event(SceneEvent::Input(event))
            .map_err(|_| anyhow!("the scene event loop has already closed"))
    }

    /// Parses a named control update (see [`InputEvent::parse`]) and sends it.
    pub fn send_named(&self, name: &str, value: &str) -> anyhow::Result<()> {
        self.send(InputEvent::parse(name, value)?)
    }

    pub fn exit(&self) -> anyhow::Result<()> {
        self.0
            .send_event(SceneEvent::Exit)
            .map_err(|_| anyhow!("the scene event loop has already closed"))
    }
}

/// GPU context plus the scene it draws.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    graph: SceneGraph,
    nodes: CoffeeNodes,
    controls: Controls,
    animator: Animator,
    config: SceneConfig,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, config: SceneConfig) -> anyhow::Result<Self> {
        let model = CoffeeMachine::build();
        let (graph, nodes) = mk_coffee_scene_graph(&model)?;
        let ctx = Context::new(window, &config, &model.geometry, graph.len()).await?;
        let animator = Animator::new(config.fall_speed, config.rotate_speed);
        log::info!("scene ready with {} nodes", graph.len());
        Ok(Self {
            ctx,
            graph,
            nodes,
            controls: Controls::default(),
            animator,
            config,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    fn apply(&mut self, event: InputEvent) {
        self.controls.apply(event);
    }

    fn render(&mut self, dt: Duration) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        self.animator.update(&mut self.controls, dt);

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let snapshot = self.controls.snapshot(self.animator.coffee_time());
        self.ctx.poll_image();
        self.nodes
            .apply(&mut self.graph, &snapshot, self.config.fall_distance);
        let plan = plan_frame(
            &snapshot,
            &self.graph,
            self.ctx.aspect(),
            self.ctx.image_state(),
            &self.config,
        );
        self.ctx.submit(&plan)
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: EventLoopProxy<SceneEvent>,
    // Taken on the first `resumed`.
    config: Option<SceneConfig>,
    state: Option<AppState>,
    // Input that arrived before the scene finished initializing.
    pending: Vec<InputEvent>,
    last_time: Instant,
    init_error: Option<anyhow::Error>,
}

impl App {
    fn new(event_loop: &EventLoop<SceneEvent>, config: SceneConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config: Some(config),
            state: None,
            pending: Vec::new(),
            last_time: Instant::now(),
            init_error: None,
        })
    }

    fn initialized(&mut self, mut state: AppState) {
        let size = state.ctx.window.inner_size();
        state.resize(size.width, size.height);
        self.pending.drain(..).for_each(|event| state.apply(event));
        state.ctx.window.request_redraw();
        self.last_time = Instant::now();
        self.state = Some(state);
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        report_fatal(&error);
        self.init_error = Some(error);
        event_loop.exit();
    }
}

/// Tells the user that the scene cannot run.
fn report_fatal(error: &anyhow::Error) {
    log::error!("App initialization failed: {error:#}");
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("coffee-scene cannot start: {error:#}");
    #[cfg(target_arch = "wasm32")]
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(&format!("coffee-scene cannot start: {error:#}"));
    }
}

impl ApplicationHandler<SceneEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(config) = self.config.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title(config.title.clone());

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(CANVAS_ID));
            match canvas {
                Some(canvas) => {
                    window_attributes =
                        window_attributes.with_canvas(Some(canvas.unchecked_into()));
                }
                None => {
                    let error = anyhow!("no <canvas id=\"{CANVAS_ID}\"> on the page");
                    return self.fail(event_loop, error);
                }
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(AppState::new(window, config)) {
                Ok(state) => self.initialized(state),
                Err(e) => self.fail(event_loop, e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match AppState::new(window, config).await {
                    Ok(state) => SceneEvent::Initialized(Box::new(state)),
                    Err(e) => SceneEvent::InitFailed(format!("{e:#}")),
                };
                if proxy.send_event(event).is_err() {
                    log::error!("the event loop closed before the scene was initialized");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: SceneEvent) {
        match event {
            SceneEvent::Initialized(state) => self.initialized(*state),
            SceneEvent::InitFailed(message) => self.fail(event_loop, anyhow!(message)),
            SceneEvent::Input(input) => match &mut self.state {
                Some(state) => state.apply(input),
                None => self.pending.push(input),
            },
            SceneEvent::Exit => event_loop.exit(),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => event_loop.exit(),
                code => {
                    if let Some(input) = key_binding(code, &state.controls) {
                        state.apply(input);
                    }
                }
            },
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                match state.render(dt) {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Opens a window and runs the scene until it is closed.
pub fn run(config: SceneConfig) -> anyhow::Result<()> {
    run_with(config, |_| {})
}

/**
 * Like [`run`], but hands an [`InputProxy`] to `connect` before the loop starts
 * so a shell can wire its own widgets to the scene.
 *
 * Fails if the event loop cannot be created or the rendering context cannot be
 * set up.
 */
pub fn run_with(config: SceneConfig, connect: impl FnOnce(InputProxy)) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            log::warn!("Could not initialize logger: {}", e);
        }
    }

    let event_loop: EventLoop<SceneEvent> = EventLoop::with_user_event().build()?;
    connect(InputProxy(event_loop.create_proxy()));

    let mut app = App::new(&event_loop, config)?;
    event_loop.run_app(&mut app)?;

    match app.init_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(target_arch = "wasm32")]
thread_local! {
    // Set once the web entry has built the event loop.
    static WEB_INPUT: std::cell::RefCell<Option<InputProxy>> =
        const { std::cell::RefCell::new(None) };
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), JsValue> {
    run_with(SceneConfig::default(), |proxy| {
        WEB_INPUT.with(|slot| *slot.borrow_mut() = Some(proxy));
    })
    .map_err(|e| JsValue::from_str(&format!("{e:#}")))
}

/// Page widgets call this with a control name and its raw value, e.g.
/// `send_input("lightX", "2.5")` or `send_input("ambientColor", "#303030")`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn send_input(name: &str, value: &str) -> Result<(), JsValue> {
    WEB_INPUT
        .with(|slot| match slot.borrow().as_ref() {
            Some(proxy) => proxy.send_named(name, value),
            None => Err(anyhow!("the scene is not running")),
        })
        .map_err(|e| {
            log::warn!("ignoring input {name}={value}: {e:#}");
            JsValue::from_str(&format!("{e:#}"))
        })
}
