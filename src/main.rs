//! Arena Vis entry point
//!
//! Receives snapshots over UDP, merges them into the world state and builds
//! one interpolated frame per tick.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{Duration, Instant};

    use arena_vis::net::SnapshotReceiver;
    use arena_vis::renderer::build_line_vertices;
    use arena_vis::{MergeError, Settings, WorldState};

    /// Visualizer instance holding all state
    pub struct App {
        settings: Settings,
        world: WorldState,
        receiver: SnapshotReceiver,
        start: Instant,
        last_frame: f64,
        last_status: f64,
        // Counters since the last status line
        frames: u32,
        merged: u32,
        rejected: u32,
        vertex_count: usize,
    }

    impl App {
        pub fn new(settings: Settings) -> std::io::Result<Self> {
            let receiver = SnapshotReceiver::bind(settings.socket_addr())?;
            let world = WorldState::new().with_stale_rejection(settings.reject_stale_packets);
            Ok(Self {
                settings,
                world,
                receiver,
                start: Instant::now(),
                last_frame: 0.0,
                last_status: 0.0,
                frames: 0,
                merged: 0,
                rejected: 0,
                vertex_count: 0,
            })
        }

        fn now(&self) -> f64 {
            self.start.elapsed().as_secs_f64()
        }

        /// Merge every datagram that arrived since the last frame
        fn drain(&mut self) {
            loop {
                let now = self.now();
                let bytes = match self.receiver.try_recv() {
                    Ok(Some(bytes)) => bytes,
                    Ok(None) => break,
                    Err(e) => {
                        log::error!("Socket receive failed: {e}");
                        break;
                    }
                };
                match self.world.receive(bytes, now) {
                    Ok(()) => self.merged += 1,
                    Err(e @ MergeError::Overlay(_)) => {
                        self.merged += 1;
                        log::warn!("Debug overlay dropped: {e}");
                    }
                    Err(e @ MergeError::Stale { .. }) => {
                        self.rejected += 1;
                        log::debug!("{e}");
                    }
                    Err(e) => {
                        self.rejected += 1;
                        log::warn!("Skipping packet: {e}");
                    }
                }
            }
        }

        fn frame(&mut self) {
            let now = self.now();
            let dt = (now - self.last_frame) as f32;
            self.last_frame = now;

            self.drain();
            if self.settings.extrapolate_rotation {
                self.world.advance_rotation(dt);
            }

            let frame = self.world.frame(self.world.interp_ratio(now));
            let vertices = build_line_vertices(&frame);
            self.vertex_count = vertices.len();
            self.frames += 1;

            let interval = self.settings.status_interval_secs as f64;
            if interval > 0.0 && now - self.last_status >= interval {
                log::info!(
                    "{} fps | {} merged, {} rejected | {} cars, {} pads, {} lines | ratio {:.2} | {} vertices",
                    (self.frames as f64 / (now - self.last_status)).round(),
                    self.merged,
                    self.rejected,
                    frame.cars.len(),
                    frame.pads.len(),
                    frame.debug_lines.len(),
                    frame.ratio,
                    self.vertex_count,
                );
                self.last_status = now;
                self.frames = 0;
                self.merged = 0;
                self.rejected = 0;
            }
        }

        /// Fixed-rate loop; never returns
        pub fn run(&mut self) {
            let interval = Duration::from_secs_f64(self.settings.frame_interval());
            log::info!(
                "Running at {} Hz, {} received so far",
                self.settings.frame_rate_hz,
                self.receiver.received()
            );
            loop {
                let tick_start = Instant::now();
                self.frame();
                if let Some(rest) = interval.checked_sub(tick_start.elapsed()) {
                    std::thread::sleep(rest);
                }
            }
        }
    }

    pub fn init_logging(settings: &Settings) {
        let env = env_logger::Env::default().default_filter_or("info");
        let mut builder = env_logger::Builder::from_env(env);
        if let Some(level) = &settings.log_level {
            builder.parse_filters(level);
        }
        builder.init();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use arena_vis::Settings;

    let path = Settings::resolve_path(std::env::args().nth(1));
    // Logger filter comes from settings, so settings errors are reported after init
    let loaded = Settings::load(&path);
    let mut settings = loaded.as_ref().cloned().unwrap_or_default();
    settings.apply_env();
    native::init_logging(&settings);
    match &loaded {
        Ok(_) => log::info!("Settings path: {}", path.display()),
        Err(e) => log::error!("{e}; using default settings"),
    }

    log::info!("Arena Vis starting...");
    match native::App::new(settings) {
        Ok(mut app) => app.run(),
        Err(e) => {
            log::error!("Failed to bind snapshot socket: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No socket access in the browser
}
