/// Terminal gemstone viewer: keyboard sliders, view presets, ASCII rendering
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use gemview_core::{Camera, GemError, Parameter, ViewPreset, Viewer};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Orbit step per key press, radians
const ORBIT_STEP: f32 = 0.1;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: u32 = 2;

pub fn gem_to_io(err: GemError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err)
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    viewer: Viewer,
    camera: Camera,
    renderer: AsciiRenderer,
    selected: Parameter,
    status: Option<String>,
    running: bool,
    target_fps: u32,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(viewer: Viewer, target_fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(viewer, target_fps, width, height))
    }

    pub fn with_size(viewer: Viewer, target_fps: u32, width: u16, height: u16) -> Self {
        let mut camera = Camera::new(width as u32, height as u32 * CELL_ASPECT);
        camera.apply_orbit(viewer.orbit());
        Self {
            viewer,
            camera,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            selected: Parameter::TableDiameter,
            status: None,
            running: true,
            target_fps: target_fps.max(1),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn selected(&self) -> Parameter {
        self.selected
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / self.target_fps as u64);

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Apply one terminal event to the viewer state
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Resize(width, height) => {
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
                self.camera.resize(width as u32, height as u32 * CELL_ASPECT);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, .. }: KeyEvent) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Tab => self.selected = self.selected.offset(1),
            KeyCode::BackTab => self.selected = self.selected.offset(-1),
            KeyCode::Char('+') | KeyCode::Char('=') => self.step_selected(1),
            KeyCode::Char('-') | KeyCode::Char('_') => self.step_selected(-1),
            KeyCode::PageUp => self.step_selected(10),
            KeyCode::PageDown => self.step_selected(-10),
            KeyCode::Char('w') | KeyCode::Up => self.viewer.orbit_mut().rotate(0.0, -ORBIT_STEP),
            KeyCode::Char('s') | KeyCode::Down => self.viewer.orbit_mut().rotate(0.0, ORBIT_STEP),
            KeyCode::Char('a') | KeyCode::Left => self.viewer.orbit_mut().rotate(-ORBIT_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.viewer.orbit_mut().rotate(ORBIT_STEP, 0.0),
            KeyCode::Char('z') => self.viewer.orbit_mut().zoom(0.9),
            KeyCode::Char('x') => self.viewer.orbit_mut().zoom(1.1),
            KeyCode::Char(c) => {
                if let Some(view) = ViewPreset::from_key(c) {
                    self.viewer.set_view(view);
                }
            }
            _ => {}
        }
    }

    fn step_selected(&mut self, steps: i32) {
        match self.viewer.nudge_parameter(self.selected, steps) {
            Ok(_) => self.status = None,
            Err(err) => {
                tracing::warn!(%err, param = self.selected.name(), "rejected control change");
                self.status = Some(err.to_string());
            }
        }
    }

    /// Lines drawn over the scene: readout, view, selected control, help
    pub fn overlay_lines(&mut self) -> io::Result<Vec<String>> {
        let selected = self.selected;
        let value = self.viewer.params().get(selected);
        let status = self.status.clone();
        let fps = self.fps;
        let frame = self.viewer.frame().map_err(gem_to_io)?;

        let mut lines: Vec<String> = frame.readout.lines.iter().map(|l| l.to_string()).collect();
        lines.push(format!(
            "View: {}",
            frame.view.map(|v| v.label()).unwrap_or("Custom view")
        ));
        lines.push(format!("> {}: {}", selected.label(), value));
        if let Some(status) = status {
            lines.push(status);
        }
        lines.push(format!(
            "FPS {:.1} | Tab select | +/- adjust | 1-4 top/profile/bottom/global | WASD orbit | Q quit",
            fps
        ));
        Ok(lines)
    }

    fn render(&mut self) -> io::Result<()> {
        self.camera.apply_orbit(self.viewer.orbit());

        // Clear renderer
        self.renderer.clear();

        // Render visible solids, outlines on top
        let frame = self.viewer.frame().map_err(gem_to_io)?;
        for solid in &frame.solids {
            self.renderer.render_mesh(&solid.mesh, &solid.model, &self.camera);
        }
        for solid in &frame.solids {
            self.renderer.render_wireframe(&solid.wireframe, &solid.model, &self.camera);
        }

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let width = self.renderer.width();
        for (row, line) in self.overlay_lines()?.into_iter().enumerate() {
            let line: String = line.chars().take(width).collect();
            queue!(
                stdout,
                cursor::MoveTo(0, row as u16),
                terminal::Clear(ClearType::UntilNewLine),
                SetForegroundColor(Color::Yellow),
                Print(line),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }
}
