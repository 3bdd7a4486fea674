use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::ValueEnum;
use crossterm::{
    event::{self, Event, KeyCode},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph},
};

use crate::chip8::Chip8;
use crate::disassembler::{self, DisassembledLine, RegisterDump};
use crate::display::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::error::{Error, Result};

pub const DEFAULT_FRAME_RATE: u64 = 60;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Render the framebuffer, one tick per frame.
    Display,
    /// Render the disassembly and registers, one tick per frame.
    Debug,
    /// Run rom_size / 2 ticks without a UI and print the debug dump.
    Batch,
}

impl Mode {
    /// Default `env_logger` filter. The screen modes draw on the same terminal that stderr
    /// writes to, so per-instruction warnings are only shown in batch mode.
    pub fn default_log_filter(self) -> &'static str {
        match self {
            Mode::Batch => "warn",
            Mode::Display | Mode::Debug => "error",
        }
    }
}

pub struct Settings {
    pub frame_rate: u64,
    pub rom: PathBuf,
    pub mode: Mode,
    pub seed: Option<u64>,
}
impl Settings {
    pub fn new(frame_rate: u64, rom: PathBuf, mode: Mode, seed: Option<u64>) -> Self {
        Settings {
            frame_rate,
            rom,
            mode,
            seed,
        }
    }
}

pub fn load_rom_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| Error::RomRead {
        path: path.to_path_buf(),
        source,
    })
}

pub struct Emulator {
    chip8: Chip8,
    settings: Settings,
}

impl Emulator {
    pub fn new(settings: Settings) -> Self {
        let chip8 = match settings.seed {
            Some(seed) => Chip8::with_seed(seed),
            None => Chip8::new(),
        };
        Emulator { chip8, settings }
    }

    pub fn chip8(&self) -> &Chip8 {
        &self.chip8
    }

    pub fn load(&mut self) -> Result<()> {
        let rom_data = load_rom_file(&self.settings.rom)?;
        self.chip8.initialize();
        self.chip8.load_program(&rom_data)
    }

    fn draw_frame(&self, frame: &mut ratatui::Frame, area: Rect, rom_name: &str) {
        let mut row_string = String::with_capacity(DISPLAY_WIDTH * DISPLAY_HEIGHT + DISPLAY_HEIGHT);
        for row in self.chip8.framebuffer().rows() {
            row_string.extend(row.map(|lit| if lit { '█' } else { ' ' }));
            row_string.push('\n');
        }

        let game_width = (DISPLAY_WIDTH as u16) + 2;
        let game_height = (DISPLAY_HEIGHT as u16) + 2;
        let game_area = Rect {
            width: area.width.min(game_width),
            height: area.height.min(game_height),
            ..area
        };

        let paragraph = Paragraph::new(row_string)
            .block(Block::default().borders(Borders::ALL).title(rom_name))
            .style(Style::default().fg(Color::White));
        frame.render_widget(paragraph, game_area);
    }

    fn draw_debug(
        &self,
        frame: &mut ratatui::Frame,
        area: Rect,
        lines: &[DisassembledLine],
        dump: &RegisterDump,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(40), Constraint::Min(0)])
            .split(area);

        let listing: Vec<Line> = lines
            .iter()
            .map(|line| {
                let style = if line.is_current {
                    Style::default().bg(Color::Red)
                } else {
                    Style::default()
                };
                Line::styled(line.to_string(), style)
            })
            .collect();

        // Keep the current instruction roughly centred.
        let visible = chunks[0].height.saturating_sub(2);
        let current = lines.iter().position(|l| l.is_current).unwrap_or(0) as u16;
        let scroll = current.saturating_sub(visible / 2);

        let listing = Paragraph::new(Text::from(listing))
            .scroll((scroll, 0))
            .block(Block::default().borders(Borders::ALL).title("Disassembly"));
        frame.render_widget(listing, chunks[0]);

        let registers = Paragraph::new(dump.to_string())
            .block(Block::default().borders(Borders::ALL).title("Registers"))
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(registers, chunks[1]);
    }

    /// Runs `rom_size / 2` ticks back to back and returns the resulting text dump.
    pub fn run_batch(&mut self) -> Result<String> {
        let ticks = self.chip8.rom_size() / 2;
        for _ in 0..ticks {
            self.chip8.tick()?;
        }
        info!("Batch run finished after {ticks} ticks");
        disassembler::render_text(&self.chip8)
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        self.load()?;

        if self.settings.mode == Mode::Batch {
            let dump = self.run_batch()?;
            println!("{dump}");
            return Ok(());
        }

        enable_raw_mode()?;
        let stdout = std::io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.main_loop(&mut terminal);

        terminal.clear()?;
        disable_raw_mode()?;
        result
    }

    fn main_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / self.settings.frame_rate.max(1) as f64);
        let rom_stem: String = self
            .settings
            .rom
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Unknown ROM".to_string());

        'mainloop: loop {
            let frame_start = Instant::now();

            while event::poll(Duration::ZERO)? {
                if let Event::Key(key) = event::read()? {
                    if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                        break 'mainloop;
                    }
                }
            }

            match self.settings.mode {
                Mode::Debug => {
                    // Show the instruction about to run, then run it.
                    let lines = disassembler::disassemble(&self.chip8)?;
                    let dump = RegisterDump::capture(&self.chip8);
                    terminal.draw(|frame| {
                        let area = frame.area();
                        self.draw_debug(frame, area, &lines, &dump)
                    })?;
                    self.chip8.tick()?;
                }
                _ => {
                    self.chip8.tick()?;
                    terminal.draw(|frame| {
                        let area = frame.area();
                        self.draw_frame(frame, area, &rom_stem)
                    })?;
                }
            }

            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                std::thread::sleep(frame_duration - elapsed);
            }
        }

        Ok(())
    }
}
