extern crate nannou;
use std::{fs::File, io::BufReader, process, sync::OnceLock};

use clap_serde_derive::{clap::Parser, ClapSerde};
use nannou::color::Srgb;
use nannou::prelude::*;
use nannou_egui::{egui, Egui};
use tracing::{error, info, warn};

use flock3d_lib::{
    birdwatcher::Birdwatcher,
    boid::BoidKind,
    geometry::{FrameGeometry, Renderer},
    options::{RunOptions, SaveOptions, SimulationParameters, UpdateMode},
    simulation::Simulation,
};

mod camera;
mod cliargs;
use camera::Camera;
use cliargs::{Args, Config};

#[derive(Clone)]
struct Startup {
    run_options: RunOptions,
    width: u32,
    height: u32,
}

// nannou builds the model from a plain fn, so the validated startup
// configuration is handed over through here
static STARTUP: OnceLock<Startup> = OnceLock::new();

fn main() {
    init_tracing();

    let startup = load_startup();
    info!(
        prey = startup.run_options.prey_count,
        predators = startup.run_options.predator_count,
        fov = startup.run_options.field_of_vision_deg,
        boundary = startup.run_options.boundary,
        follow_radius = startup.run_options.follow_radius,
        "starting flock"
    );
    let _ = STARTUP.set(startup);

    nannou::app(model).update(update).run();
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Reads the parameter file and the optional config file. Any problem with
/// either ends the process before a window is opened.
fn load_startup() -> Startup {
    let mut args = Args::parse();

    // Get config file
    let config = if let Ok(f) = File::open(&args.config_path) {
        // Parse config with serde
        match serde_yaml::from_reader::<_, <Config as ClapSerde>::Opt>(BufReader::new(f)) {
            // merge config already parsed from clap
            Ok(config) => Config::from(config).merge(&mut args.config),
            Err(err) => {
                error!(path = %args.config_path.display(), "error in configuration file: {}", err);
                process::exit(1);
            }
        }
    } else {
        // If there is not config file return only config parsed from clap
        Config::from(&mut args.config)
    };

    let parameters = match SimulationParameters::from_path(&args.parameters_path) {
        Ok(parameters) => parameters,
        Err(err) => {
            error!("{}", err);
            if let Some(source) = std::error::Error::source(&err) {
                error!("caused by: {}", source);
            }
            process::exit(1);
        }
    };

    let mut run_options = RunOptions::from_parameters(&parameters);

    run_options.seed = (config.seed != 0).then_some(config.seed);
    run_options.update_mode = if config.sequential {
        UpdateMode::Sequential
    } else {
        UpdateMode::Simultaneous
    };
    run_options.sample_rate = config.sample_rate;

    let save_locations_path = run_options.save_options.save_locations_path.take();
    run_options.save_options = SaveOptions {
        save_locations: config.save,
        save_locations_timestamp: config.save_timestamp,

        // default
        save_locations_path,
    };

    Startup {
        run_options,
        width: config.init_width,
        height: config.init_height,
    }
}

struct ControlsState {
    controls_open: bool,
    cursor_locked: bool,
    last_cursor: Point2,
    panning_speed: f32,
    rotation_speed: f32,
}

struct Model {
    egui: Egui,
    simulation: Simulation,
    camera: Camera,
    control_state: ControlsState,
    bird_watcher: Birdwatcher,
}

fn model(app: &App) -> Model {
    let Startup {
        run_options,
        width,
        height,
    } = match STARTUP.get() {
        Some(startup) => startup.clone(),
        None => {
            warn!("no startup configuration, using defaults");
            Startup {
                run_options: RunOptions::default(),
                width: 800,
                height: 600,
            }
        }
    };

    let main_window = match app
        .new_window()
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_moved(mouse_moved)
        .closed(window_closed)
        .size(width, height)
        .title("predator & prey flocking")
        .raw_event(raw_window_event)
        .view(view)
        .build()
    {
        Ok(id) => id,
        Err(err) => {
            error!("can't build window: {:?}", err);
            process::exit(1);
        }
    };

    let egui = match app.window(main_window) {
        Some(window) => Egui::from_window(&window),
        None => {
            error!("main window closed before it could be used");
            process::exit(1);
        }
    };

    let bird_watcher = Birdwatcher::new(run_options.sample_rate);

    Model {
        egui,
        simulation: Simulation::new(run_options),
        camera: Camera::new(
            glam::Vec3::new(0., 0., 500.),
            glam::Vec3::new(0., 0., -1.),
            glam::Vec3::new(0., 1., 0.),
        ),
        control_state: ControlsState {
            controls_open: false,
            cursor_locked: false,
            last_cursor: pt2(0., 0.),
            panning_speed: 2.,
            rotation_speed: 0.015625,
        },
        bird_watcher,
    }
}

fn update(app: &App, model: &mut Model, update: Update) {
    let Model {
        ref mut egui,
        ref mut simulation,
        ref mut camera,
        ref mut control_state,
        ref mut bird_watcher,
    } = *model;

    // update controls UI
    egui.set_elapsed_time(update.since_start);
    let ctx = egui.begin_frame();
    egui::Window::new("controls")
        .default_size(egui::vec2(0.0, 200.0))
        .open(&mut control_state.controls_open)
        .show(&ctx, |ui| {
            ui.horizontal(|ui| {
                ui.checkbox(&mut simulation.controls.playing, "play");
                ui.checkbox(&mut simulation.controls.follow_target, "follow cursor");
            });

            ui.separator();

            let run_options = &mut simulation.run_options;

            ui.horizontal(|ui| {
                egui::ComboBox::from_label("update")
                    .selected_text(format!("{:?}", run_options.update_mode))
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut run_options.update_mode, UpdateMode::Simultaneous, "Simultaneous");
                        ui.selectable_value(&mut run_options.update_mode, UpdateMode::Sequential, "Sequential");
                    });
            });

            ui.horizontal(|ui| {
                ui.label("field of vision (deg)");
                if ui
                    .add(egui::Slider::new(&mut run_options.field_of_vision_deg, 0.0..=360.))
                    .changed()
                {
                    run_options.update_fov();
                }
            });

            ui.horizontal(|ui| {
                ui.label("follow radius");
                ui.add(egui::Slider::new(&mut run_options.follow_radius, 1.0..=400.))
            });

            ui.horizontal(|ui| {
                ui.label("avoidance radius");
                ui.add(egui::Slider::new(&mut run_options.avoidance_radius, 1.0..=100.))
            });

            ui.separator();

            let flock = simulation.flock();
            ui.label(format!(
                "prey: {p}, predators: {d}, walls: {w}",
                p = flock.count(BoidKind::Prey),
                d = flock.count(BoidKind::Predator),
                w = flock.count(BoidKind::Wall),
            ));
            ui.label(format!("No. ticks: {t}", t = flock.ticks()));
        });

    move_camera(app, camera, control_state);

    // the cursor in window coordinates, taken as a point on the z = 0 plane
    simulation.set_target(glam::Vec3::new(app.mouse.x, app.mouse.y, 0.));

    if simulation.step() {
        bird_watcher.watch(simulation.flock());
    }
}

fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}

/// Keyboard driven camera movement, applied every frame the keys are held.
fn move_camera(app: &App, camera: &mut Camera, control_state: &ControlsState) {
    let down = |key: Key| app.keys.down.contains(&key);
    let axis = |positive: Key, negative: Key| down(positive) as i32 as f32 - down(negative) as i32 as f32;
    let shift = app.keys.mods.shift();

    let pan = glam::Vec3::new(axis(Key::D, Key::A), axis(Key::E, Key::Q), axis(Key::W, Key::S));
    if pan != glam::Vec3::ZERO {
        camera.pan(pan * control_state.panning_speed);
    }

    let turn = axis(Key::Left, Key::Right) * control_state.rotation_speed;
    if turn != 0. {
        if shift {
            camera.rotate_roll(turn);
        } else {
            camera.rotate_left_right(turn);
        }
    }

    let tilt = axis(Key::Up, Key::Down) * control_state.rotation_speed;
    if tilt != 0. {
        camera.rotate_up_down(tilt);
    }
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    let shift = app.keys.mods.shift();

    match key {
        // pause the whole simulation
        Key::Space => model.simulation.toggle_play(),
        // follow the cursor
        Key::F => model.simulation.toggle_follow(),
        // show/hide controls
        Key::C => model.control_state.controls_open = !model.control_state.controls_open,
        // restart the flock, not the simulation
        Key::R => {
            model.simulation.restart();
            model.bird_watcher.restart();
        }
        Key::LBracket => {
            if shift {
                model.control_state.rotation_speed *= 0.5;
            } else {
                model.control_state.panning_speed *= 0.5;
            }
        }
        Key::RBracket => {
            if shift {
                model.control_state.rotation_speed *= 1.5;
            } else {
                model.control_state.panning_speed *= 1.5;
            }
        }
        _ => {}
    }
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if model.control_state.controls_open || button != MouseButton::Left {
        return;
    }

    model.control_state.cursor_locked = true;
    model.control_state.last_cursor = app.mouse.position();
}

fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.control_state.cursor_locked = false;
    }
}

fn mouse_moved(_app: &App, model: &mut Model, position: Point2) {
    let control_state = &mut model.control_state;

    if control_state.cursor_locked {
        let delta = (position - control_state.last_cursor) * 0.01;
        model.camera.rotate_around_focus(delta.x, -delta.y);
    }

    control_state.last_cursor = position;
}

fn window_closed(_app: &App, model: &mut Model) {
    let save_options = &model.simulation.run_options.save_options;

    if let Err(err) = model.bird_watcher.pop_data_save(save_options) {
        error!("can't save boid data: {}", err);
    }
}

/// Draws projected flock geometry with nannou.
struct NannouRenderer<'a> {
    draw: &'a Draw,
    camera: &'a Camera,
    window_size: glam::Vec2,
}

impl NannouRenderer<'_> {
    fn project(&self, point: glam::Vec3) -> Option<Point2> {
        self.camera
            .project(point, self.window_size)
            .map(|p| pt2(p.x, p.y))
    }
}

impl Renderer for NannouRenderer<'_> {
    fn render(&mut self, geometry: &FrameGeometry) {
        for boid in geometry.boids.iter() {
            let color = kind_color(boid.kind);

            for triangle in boid.triangles.iter() {
                let points: Option<Vec<Point2>> = triangle.iter().map(|p| self.project(*p)).collect();

                if let Some(points) = points {
                    self.draw.polygon().points(points).color(color);
                }
            }

            if let Some([start, end]) = boid.heading_line {
                if let (Some(start), Some(end)) = (self.project(start), self.project(end)) {
                    self.draw.line().start(start).end(end).color(CYAN).weight(1.0);
                }
            }
        }
    }
}

fn kind_color(kind: BoidKind) -> Srgb<u8> {
    match kind {
        BoidKind::Prey => MAGENTA,
        BoidKind::Predator => ORANGERED,
        BoidKind::Wall => DIMGRAY,
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let window = app.window_rect();
    let mut renderer = NannouRenderer {
        draw: &draw,
        camera: &model.camera,
        window_size: glam::Vec2::new(window.w(), window.h()),
    };
    model.simulation.render(&mut renderer);

    if let Err(err) = draw.to_frame(app, &frame) {
        warn!("can't draw frame: {:?}", err);
    }
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        warn!("can't draw controls: {:?}", err);
    }
}
