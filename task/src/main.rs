use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use engine::app::{run_app, AppConfig, WindowApp};
use engine::raster::{Raster, RasterSize};
use log::{error, info};
use winit::event::VirtualKeyCode;

use task::config::{AxisBinding, ConfigStore, InputConfig, TaskConfig};
use task::input::{AnalogSource, InputMapper};
use task::state::TaskState;
use task::view::TaskView;

const BACKGROUND: [u8; 4] = [12, 12, 16, 255];
const TARGET_RED: [u8; 4] = [214, 48, 48, 255];
const SHAPE_GREEN: [u8; 4] = [52, 199, 89, 255];
const LOCKED_GREEN: [u8; 4] = [140, 235, 170, 255];
const TEXT_COLOR: [u8; 4] = [235, 235, 245, 255];

#[derive(Debug, Default, Clone)]
struct TaskCli {
    help: bool,
    fine: bool,
    seed: Option<u64>,
    out: Option<PathBuf>,
}

fn print_help() {
    println!(
        r#"Reach Task

Usage:
  task [--fine] [--seed N] [--out PATH]

Flags:
  --fine       Use the low-gain fine-motor input preset instead of the default.
  --seed N     Fix the layout RNG seed (default: derived from the wall clock).
  --out PATH   Where to write the per-trial CSV on exit.
               Default: target/runs/reach_<nanos>.csv
  --help, -h   Show this help.

Controls:
  WASD         Move the green circle
  Q / E        Shrink / grow the green circle
  Arrow keys   Move the green square
  Enter        Start the run / leave the rest screen
  Esc          Quit (the CSV is written on exit)
"#
    );
}

fn parse_cli() -> io::Result<TaskCli> {
    let mut cli = TaskCli::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                cli.help = true;
            }
            "--fine" => {
                cli.fine = true;
            }
            "--seed" => {
                let Some(value) = args.next() else {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "--seed requires a number",
                    ));
                };
                let seed = value.parse::<u64>().map_err(|_| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("invalid seed: {value}"),
                    )
                })?;
                cli.seed = Some(seed);
            }
            "--out" => {
                let Some(path) = args.next() else {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "--out requires a path",
                    ));
                };
                cli.out = Some(PathBuf::from(path));
            }
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("unknown argument: {other} (try --help)"),
                ));
            }
        }
    }

    Ok(cli)
}

fn default_output_path() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    PathBuf::from("target")
        .join("runs")
        .join(format!("reach_{nanos}.csv"))
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

#[derive(Debug, Clone, Copy, Default)]
struct HeldPair {
    neg: bool,
    pos: bool,
}

impl HeldPair {
    fn direction(self) -> f32 {
        (self.pos as i32 - self.neg as i32) as f32
    }
}

/// Keyboard stand-in for an analog stick: each degree of freedom reads full
/// deflection while its key is held. Raw values are pre-flipped against the
/// binding's inversion so a given key always moves the shape the same way on
/// screen regardless of preset.
#[derive(Debug, Clone, Default)]
struct KeyboardAxes {
    config: InputConfig,
    circle_x: HeldPair,
    circle_y: HeldPair,
    circle_size: HeldPair,
    square_x: HeldPair,
    square_y: HeldPair,
}

impl KeyboardAxes {
    fn new(config: InputConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns true when the key is one of ours.
    fn handle_key(&mut self, key: VirtualKeyCode, pressed: bool) -> bool {
        let slot = match key {
            VirtualKeyCode::A => &mut self.circle_x.neg,
            VirtualKeyCode::D => &mut self.circle_x.pos,
            VirtualKeyCode::W => &mut self.circle_y.neg,
            VirtualKeyCode::S => &mut self.circle_y.pos,
            VirtualKeyCode::Q => &mut self.circle_size.neg,
            VirtualKeyCode::E => &mut self.circle_size.pos,
            VirtualKeyCode::Left => &mut self.square_x.neg,
            VirtualKeyCode::Right => &mut self.square_x.pos,
            VirtualKeyCode::Up => &mut self.square_y.neg,
            VirtualKeyCode::Down => &mut self.square_y.pos,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    fn release_all(&mut self) {
        let config = self.config;
        *self = Self::new(config);
    }

    fn raw_for(binding: &AxisBinding, held: HeldPair) -> f32 {
        let direction = held.direction();
        if binding.invert {
            -direction
        } else {
            direction
        }
    }
}

impl AnalogSource for KeyboardAxes {
    fn axis(&self, index: usize) -> f32 {
        let c = &self.config;
        let slots = [
            (&c.circle_x, self.circle_x),
            (&c.circle_y, self.circle_y),
            (&c.circle_size, self.circle_size),
            (&c.square_x, self.square_x),
            (&c.square_y, self.square_y),
        ];
        for (binding, held) in slots {
            if binding.axis == index {
                return Self::raw_for(binding, held);
            }
        }
        0.0
    }
}

struct ReachApp {
    state: TaskState,
    mapper: InputMapper,
    axes: KeyboardAxes,
    out_path: PathBuf,
    csv_written: bool,
}

impl ReachApp {
    fn new(config: TaskConfig, seed: u64, out_path: PathBuf) -> Self {
        let mapper = InputMapper::new(config.input);
        let axes = KeyboardAxes::new(config.input);
        Self {
            state: TaskState::new(config, seed),
            mapper,
            axes,
            out_path,
            csv_written: false,
        }
    }

    fn draw_running(&self, raster: &mut Raster<'_>) {
        let controller = self.state.controller();
        let layout = controller.layout();
        let shapes = controller.shapes();

        // A locked shape sits on its target, so the red marker disappears
        // with the lock.
        if !shapes.circle_locked {
            raster.fill_circle(
                layout.red_circle.center.x as i32,
                layout.red_circle.center.y as i32,
                layout.red_circle.radius as i32,
                TARGET_RED,
            );
        }
        if !shapes.square_locked {
            let half = layout.red_square.half_side() as i32;
            raster.fill_rect(
                layout.red_square.center.x as i32 - half,
                layout.red_square.center.y as i32 - half,
                half * 2,
                half * 2,
                TARGET_RED,
            );
        }

        let circle_color = if shapes.circle_locked {
            LOCKED_GREEN
        } else {
            SHAPE_GREEN
        };
        raster.fill_circle(
            shapes.circle.center.x as i32,
            shapes.circle.center.y as i32,
            shapes.circle.radius as i32,
            circle_color,
        );

        let square_color = if shapes.square_locked {
            LOCKED_GREEN
        } else {
            SHAPE_GREEN
        };
        let half = shapes.square.half_side() as i32;
        raster.fill_rect(
            shapes.square.center.x as i32 - half,
            shapes.square.center.y as i32 - half,
            half * 2,
            half * 2,
            square_color,
        );

        let hud = format!(
            "TRIAL {}  TIME {:.1}",
            controller.trial(),
            controller.elapsed().as_secs_f32()
        );
        raster.draw_text(20, 20, &hud, TEXT_COLOR, 4);
    }

    fn draw_centered(&self, raster: &mut Raster<'_>, lines: &[String], scale: i32) {
        let size = raster.size();
        let line_height = scale * 8;
        let total = lines.len() as i32 * line_height;
        let mut y = (size.height as i32 - total) / 2;
        for line in lines {
            let x = (size.width as i32 - Raster::text_width(line, scale)) / 2;
            raster.draw_text(x, y, line, TEXT_COLOR, scale);
            y += line_height;
        }
    }

    fn write_csv_once(&mut self) {
        if self.csv_written {
            return;
        }
        self.csv_written = true;

        let session = self.state.session();
        if session.is_empty() {
            info!("no completed trials, skipping CSV");
            return;
        }
        match session.write_csv(&self.out_path) {
            Ok(()) => info!(
                "{} trials written to {}",
                session.len(),
                self.out_path.display()
            ),
            Err(e) => error!("failed writing {}: {e}", self.out_path.display()),
        }
    }
}

impl WindowApp for ReachApp {
    fn handle_key(&mut self, key: VirtualKeyCode, pressed: bool) -> bool {
        if pressed && key == VirtualKeyCode::Escape {
            return false;
        }

        if self.axes.handle_key(key, pressed) {
            return true;
        }

        if pressed && key == VirtualKeyCode::Return {
            match self.state.view() {
                TaskView::Intro => {
                    self.axes.release_all();
                    self.state.begin();
                }
                TaskView::Rest { .. } => {
                    self.axes.release_all();
                    self.state.resume();
                }
                TaskView::Running => {}
            }
        }
        true
    }

    fn tick(&mut self, dt: Duration) -> bool {
        if self.state.view().is_running() {
            let input = self.mapper.sample(&self.axes);
            self.state.frame(&input, dt);
        }
        true
    }

    fn draw(&mut self, raster: &mut Raster<'_>) {
        raster.clear(BACKGROUND);
        match self.state.view() {
            TaskView::Intro => {
                self.draw_centered(
                    raster,
                    &[
                        "REACH TASK".to_string(),
                        String::new(),
                        "STEER THE GREEN SHAPES ONTO THE RED TARGETS".to_string(),
                        "MATCH THE CIRCLE SIZE WITH Q AND E".to_string(),
                        String::new(),
                        "PRESS ENTER TO START".to_string(),
                    ],
                    4,
                );
            }
            TaskView::Running => self.draw_running(raster),
            TaskView::Rest { completed } => {
                let average = self
                    .state
                    .recent_average_score()
                    .map(|avg| format!("LAST BLOCK AVERAGE SCORE: {avg:.2}"))
                    .unwrap_or_default();
                self.draw_centered(
                    raster,
                    &[
                        "REST".to_string(),
                        String::new(),
                        format!("{completed} TRIALS DONE"),
                        average,
                        String::new(),
                        "PRESS ENTER TO CONTINUE".to_string(),
                    ],
                    4,
                );
            }
        }
    }

    fn on_exit(&mut self) {
        self.write_csv_once();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = parse_cli()?;
    if cli.help {
        print_help();
        return Ok(());
    }

    let preset = if cli.fine {
        TaskConfig::fine()
    } else {
        TaskConfig::coarse()
    };
    let config = ConfigStore::from_env().load_or(preset).sanitized();
    let seed = cli.seed.unwrap_or_else(wall_clock_seed);
    let out_path = cli.out.unwrap_or_else(default_output_path);
    info!("seed {seed}, output {}", out_path.display());

    let screen = RasterSize::new(config.screen.width, config.screen.height);
    let app = ReachApp::new(config, seed, out_path);
    run_app(AppConfig::new("Reach Task", screen), app)
}
