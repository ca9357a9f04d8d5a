use clap::*;

use radiance_session::core::buffers::*;
use radiance_session::core::device::*;
use radiance_session::core::display::*;
use radiance_session::core::error::*;
use radiance_session::core::misc::ProgressReporter;
use radiance_session::core::options::*;
use radiance_session::core::progress::Progress;
use radiance_session::core::scene::*;
use radiance_session::core::session::*;
use radiance_session::displays::SequentialDisplay;

use log::*;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::sync::{Arc, RwLock};
use std::thread::{self, available_parallelism};
use std::time::{Duration, Instant};

const INTERACTIVE_HELP: &str = "Commands:
  r        reset and restart the render
  p        pause / resume
  s W H    resize to W x H pixels (0 0 uses the camera size)
  h        show this help
  q        cancel and quit";

#[derive(Debug, Parser)]
#[clap(author, about, version, disable_help_flag = true)]
struct CommandOptions {
    /// Device to use: cpu, cuda, opencl, network, multi.
    #[arg(long, env = "RADIANCE_DEVICE", default_value = "cpu", value_name = "name")]
    pub device: String,

    /// Shading system to use: svm, osl.
    #[arg(long, default_value = "svm", value_name = "name")]
    pub shadingsys: String,

    /// Render in background, without user interaction.
    #[arg(long, default_value = "false")]
    pub background: bool,

    /// In background mode, don't print progress messages.
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Number of samples to render, 0 renders until cancelled.
    #[arg(long, default_value = "16", allow_negative_numbers = true, value_name = "num")]
    pub samples: i32,

    /// File path to write the output image to.
    #[arg(long, value_name = "filename")]
    pub output: Option<PathBuf>,

    /// CPU rendering threads, 0 uses every core.
    #[arg(long, env = "RADIANCE_THREADS", default_value = "0", value_name = "num")]
    pub threads: usize,

    /// Image width in pixels, 0 uses the camera width.
    #[arg(long, default_value = "0", value_name = "num")]
    pub width: u32,

    /// Image height in pixels, 0 uses the camera height.
    #[arg(long, default_value = "0", value_name = "num")]
    pub height: u32,

    /// List information about all available devices.
    #[arg(long = "list-devices", default_value = "false")]
    pub list_devices: bool,

    /// Print this help text.
    #[arg(short, long, action = clap::ArgAction::HelpLong)]
    pub help: Option<bool>,

    /// Tile edge length in pixels.
    #[arg(long = "tile-size", default_value = "64", value_name = "num")]
    pub tile_size: u32,

    /// Samples per progressive pass.
    #[arg(long = "samples-per-pass", default_value = "1", value_name = "num")]
    pub samples_per_pass: u32,

    /// Specify an image crop window.
    #[arg(long, value_delimiter = ',', value_name = "x0,x1,y0,y1")]
    pub cropwindow: Option<Vec<f32>>,

    /// Exposure adjustment in stops.
    #[arg(long, default_value = "0", allow_negative_numbers = true, value_name = "stops")]
    pub exposure: f32,

    /// Tone mapping applied to displayed and written images.
    #[arg(long, default_value = "linear", value_parser = ["linear", "reinhard"])]
    pub tonemap: String,

    /// Interactive mode: write every drawn frame into this directory.
    /// May be given more than once.
    #[arg(long = "display-dir", value_name = "dir")]
    pub display_dir: Vec<PathBuf>,

    /// Log messages at or above this level (0 -> INFO,
    /// 1 -> WARNING, 2 -> ERROR, 3-> FATAL).
    #[arg(long, value_name = "num")]
    pub minloglevel: Option<i32>,

    #[arg(value_name = "scene.json")]
    pub file: Option<PathBuf>,
}

fn init_logger(opts: &CommandOptions) {
    if let Some(minloglevel) = opts.minloglevel {
        const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
        let log_level = LOG_LEVELS[(minloglevel + 2).clamp(0, 4) as usize];
        env::set_var("RUST_LOG", log_level);
    } else {
        //default log level : warn
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_owned());
        env::set_var("RUST_LOG", log_level);
    }

    env_logger::Builder::from_default_env()
        .format_target(false)
        .format_module_path(false)
        .init();
}

fn render_options(opts: &CommandOptions) -> Result<RenderOptions, RenderError> {
    let crop_window = match opts.cropwindow.as_ref() {
        Some(v) if v.len() == 4 => Some([v[0], v[1], v[2], v[3]]),
        Some(v) => {
            let msg = format!("Crop window needs 4 values x0,x1,y0,y1, got {}", v.len());
            return Err(RenderError::Config(msg));
        }
        None => None,
    };
    return Ok(RenderOptions {
        filepath: opts.file.clone(),
        width: opts.width,
        height: opts.height,
        device_name: opts.device.clone(),
        shading_system: opts.shadingsys.clone(),
        samples: opts.samples,
        threads: opts.threads,
        background: opts.background,
        quiet: opts.quiet,
        output_path: opts.output.clone(),
        tile_size: opts.tile_size,
        samples_per_pass: opts.samples_per_pass,
        crop_window,
        exposure: opts.exposure,
        tone_mapping: opts.tonemap.clone(),
    });
}

fn print_devices() {
    println!("Devices:");
    for info in available_devices() {
        let display = if info.display_device { " (display)" } else { "" };
        println!("    {}{}", info.description, display);
    }
}

/// Overwrites the current terminal line.
struct StatusLine {
    maxlen: usize,
}

impl StatusLine {
    fn new() -> Self {
        StatusLine { maxlen: 0 }
    }

    fn print(&mut self, s: &str) {
        let len = s.chars().count();
        self.maxlen = usize::max(self.maxlen, len);
        print!("\r{}{}", s, " ".repeat(self.maxlen - len));
        let _ = io::stdout().flush();
    }
}

fn status_string(progress: &Progress) -> String {
    let (status, substatus) = progress.get_status();
    if substatus.is_empty() {
        return status;
    }
    return format!("{}: {}", status, substatus);
}

fn run_background(session: &Session, buffer_params: &BufferParams, opts: &RenderOptions) -> i32 {
    let samples = opts.samples as u32;
    let progress = session.progress();
    let reporter = if opts.quiet {
        None
    } else {
        Some(Arc::new(ProgressReporter::new(samples as usize, "Rendering")))
    };
    if let Some(reporter) = reporter.as_ref() {
        let reporter = reporter.clone();
        let weak = Arc::downgrade(&progress);
        progress.set_update_callback(move || {
            if let Some(progress) = weak.upgrade() {
                let sample = progress.get_sample();
                reporter.set_position(sample as usize);
                reporter.set_message(&format!(
                    "Sample {}   {}",
                    sample,
                    status_string(&progress)
                ));
            }
        });
    }

    session.reset(buffer_params, samples);
    if let Err(e) = session.start() {
        error!("{}", e);
        return 1;
    }
    session.wait();
    progress.clear_update_callback();

    if let Some(reporter) = reporter.as_ref() {
        reporter.done();
        println!("Finished Rendering.");
    }
    if progress.get_error() {
        error!("{}", progress.get_error_message());
        return 1;
    }
    return 0;
}

enum Event {
    Redraw,
    Command(String),
    InputClosed,
}

fn spawn_input_reader(tx: mpsc::Sender<Event>) {
    let spawned = thread::Builder::new()
        .name(String::from("stdin"))
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(Event::Command(line)).is_err() {
                            return;
                        }
                    }
                    Err(_) => break,
                }
            }
            let _ = tx.send(Event::InputClosed);
        });
    if let Err(e) = spawned {
        warn!("Failed to read commands from stdin: {}", e);
    }
}

struct InfoLine {
    line: StatusLine,
    last: Instant,
    quiet: bool,
}

impl InfoLine {
    fn show(&mut self, progress: &Progress) {
        let now = Instant::now();
        let latency = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        if self.quiet {
            return;
        }
        let sample = progress.get_sample();
        let (_, total_time, sample_time) = progress.get_tile();
        let s = format!(
            "{}        Time: {:.2}        Latency: {:.4}        Sample: {}        Average: {:.4}",
            status_string(progress),
            total_time,
            latency,
            sample,
            sample_time
        );
        self.line.print(&s);
    }
}

fn restart(session: &Session) {
    if let Err(e) = session.start() {
        warn!("{}", e);
    }
}

fn run_interactive(session: &Session, buffer_params: &BufferParams, opts: &RenderOptions) -> i32 {
    let samples = opts.samples as u32;
    let progress = session.progress();
    let (tx, rx) = mpsc::channel::<Event>();
    {
        let tx = tx.clone();
        progress.set_update_callback(move || {
            let _ = tx.send(Event::Redraw);
        });
    }
    spawn_input_reader(tx);
    if !opts.quiet {
        println!("{}", INTERACTIVE_HELP);
    }

    let mut buffer_params = *buffer_params;
    let mut info = InfoLine {
        line: StatusLine::new(),
        last: Instant::now(),
        quiet: opts.quiet,
    };
    let mut last_draw = Instant::now();
    session.reset(&buffer_params, samples);
    restart(session);

    loop {
        match rx.recv_timeout(Duration::from_millis(250)) {
            Ok(Event::Redraw) => {
                let state = session.state();
                if last_draw.elapsed() > Duration::from_millis(100) || state.is_terminal() {
                    session.draw(&buffer_params);
                    last_draw = Instant::now();
                }
                info.show(&progress);
            }
            Ok(Event::Command(line)) => {
                let words: Vec<&str> = line.split_whitespace().collect();
                match words.as_slice() {
                    ["r"] => {
                        session.reset(&buffer_params, samples);
                        restart(session);
                    }
                    ["p"] => {
                        let paused = session.state() == SessionState::Paused;
                        session.set_pause(!paused);
                    }
                    ["s", w, h] => match (w.parse::<u32>(), h.parse::<u32>()) {
                        (Ok(w), Ok(h)) => match session.resize(w, h) {
                            Ok(()) => {
                                buffer_params = session.buffer_params();
                                restart(session);
                            }
                            Err(e) => warn!("{}", e),
                        },
                        _ => println!("\nUsage: s W H"),
                    },
                    ["h"] => {
                        println!("\n{}", INTERACTIVE_HELP);
                    }
                    ["q"] => {
                        session.cancel("Canceled");
                        session.wait();
                        break;
                    }
                    [] => {}
                    _ => {
                        println!("\nUnknown command: {}", line.trim());
                    }
                }
            }
            Ok(Event::InputClosed) => {
                session.wait();
                break;
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }
    progress.clear_update_callback();
    session.draw(&buffer_params);
    info.show(&progress);
    if !opts.quiet {
        println!();
    }
    if progress.get_error() {
        error!("{}", progress.get_error_message());
        return 1;
    }
    return 0;
}

fn render(opts: &RenderOptions, display_dirs: &[PathBuf]) -> Result<i32, RenderError> {
    let (session_params, scene_params) = opts.validate()?;
    let path = opts
        .filepath
        .as_ref()
        .ok_or_else(|| RenderError::config("No file path specified"))?;

    if !opts.quiet {
        let nthreads = available_parallelism().map(|n| n.get()).unwrap_or(1);
        let version = env!("CARGO_PKG_VERSION");
        println!("radiance version {} [Detected {} cores]", version, nthreads);
        println!("Device: {}", session_params.device.description);
        println!();
    }

    let scene = load_scene(path, &scene_params)?;
    let buffer_params = opts.buffer_params(&scene.camera)?;
    let session = Session::new(&session_params)?;
    session.set_scene(Arc::new(scene))?;
    session.set_tone_mapper(opts.tone_mapper()?);

    if session_params.background {
        return Ok(run_background(&session, &buffer_params, opts));
    }
    if !display_dirs.is_empty() {
        let mut displays = MultipleDisplay::new();
        for dir in display_dirs {
            let display: Arc<RwLock<dyn Display>> =
                Arc::new(RwLock::new(SequentialDisplay::new(dir, "png")));
            displays.add_display(&display);
        }
        let display: Arc<RwLock<dyn Display>> = Arc::new(RwLock::new(displays));
        session.set_display(Some(display));
    }
    return Ok(run_interactive(&session, &buffer_params, opts));
}

pub fn main() {
    let opts = CommandOptions::parse();
    init_logger(&opts);

    if opts.list_devices {
        print_devices();
        process::exit(0);
    }

    let options = match render_options(&opts) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    match render(&options, &opts.display_dir) {
        Ok(code) => process::exit(code),
        Err(e) => {
            if e.is_configuration() {
                eprintln!("{}", e);
                if options.filepath.is_none() {
                    eprintln!("{}", CommandOptions::command().render_usage());
                }
            } else {
                error!("{}", e);
            }
            process::exit(1);
        }
    }
}
