use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use kinmap_core::model::{Action, LoadStatus, Model, Page, update};
use kinmap_core::pipeline::Pipeline;
use kinmap_core::presentation::Scene;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, Paragraph, Wrap,
        canvas::{Canvas, Map, MapResolution},
    },
};
use std::io;

pub mod editor;
pub mod map_view;

use editor::TextBuffer;
use map_view::{CanvasPainter, Viewport};

/// Terminal application state: the core model plus view-local state that
/// never feeds back into the pipeline.
pub struct App {
    model: Model,
    pipeline: Pipeline,
    scene: Scene,
    viewport: Viewport,
    editor: TextBuffer,
    selected_marker: Option<usize>,
    should_quit: bool,
}

impl App {
    pub fn new(model: Model, pipeline: Pipeline) -> Self {
        let mut app = Self {
            editor: TextBuffer::from_text(&model.input),
            scene: Scene::build(&[], &[], &pipeline.config().style),
            model,
            pipeline,
            viewport: Viewport::default(),
            selected_marker: None,
            should_quit: false,
        };
        app.refresh_scene();
        if matches!(app.model.status, LoadStatus::Failed { .. }) {
            app.dispatch(Action::ShowPage(Page::LoadData));
        }
        app
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn editor(&self) -> &TextBuffer {
        &self.editor
    }

    pub fn selected_marker(&self) -> Option<usize> {
        self.selected_marker
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run an action through the reducer. A successful load also resets the
    /// map view and selection.
    pub fn dispatch(&mut self, action: Action) {
        let is_load = matches!(action, Action::Load);
        let model = std::mem::take(&mut self.model);
        self.model = update(model, action, &self.pipeline);

        if is_load && self.model.is_loaded() {
            self.refresh_scene();
        }
    }

    fn refresh_scene(&mut self) {
        self.scene = Scene::build(
            &self.model.markers,
            &self.model.edges,
            &self.pipeline.config().style,
        );
        self.viewport = match self.scene.center {
            Some(center) => Viewport::new(center, self.scene.zoom),
            None => Viewport::default(),
        };
        self.selected_marker = None;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.model.page {
            Page::Map => self.handle_map_key(key),
            Page::LoadData => self.handle_load_key(key),
        }
    }

    fn handle_map_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('l') => self.dispatch(Action::ShowPage(Page::LoadData)),
            KeyCode::Char('+') | KeyCode::Char('=') => self.viewport.zoom_in(),
            KeyCode::Char('-') => self.viewport.zoom_out(),
            KeyCode::Char('c') => {
                let zoom = self.viewport.zoom;
                if let Some(center) = self.scene.center {
                    self.viewport = Viewport::new(center, zoom);
                }
            }
            KeyCode::Left => self.viewport.pan(-0.25, 0.0),
            KeyCode::Right => self.viewport.pan(0.25, 0.0),
            KeyCode::Up => self.viewport.pan(0.0, 0.25),
            KeyCode::Down => self.viewport.pan(0.0, -0.25),
            KeyCode::Tab => self.select_next(),
            KeyCode::BackTab => self.select_previous(),
            KeyCode::Enter => {
                if let Some(marker) = self.selected_marker.and_then(|i| self.scene.markers.get(i)) {
                    self.viewport = Viewport::new(marker.position, self.viewport.zoom);
                }
            }
            _ => {}
        }
    }

    fn handle_load_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('l') => self.dispatch(Action::Load),
                KeyCode::Char('k') => {
                    self.editor.clear();
                    self.sync_input();
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.dispatch(Action::ShowPage(Page::Map)),
            KeyCode::Char(c) => {
                self.editor.insert_char(c);
                self.sync_input();
            }
            KeyCode::Tab => {
                self.editor.insert_char('\t');
                self.sync_input();
            }
            KeyCode::Enter => {
                self.editor.insert_newline();
                self.sync_input();
            }
            KeyCode::Backspace => {
                self.editor.backspace();
                self.sync_input();
            }
            KeyCode::Left => self.editor.move_left(),
            KeyCode::Right => self.editor.move_right(),
            KeyCode::Up => self.editor.move_up(),
            KeyCode::Down => self.editor.move_down(),
            KeyCode::Home => self.editor.home(),
            KeyCode::End => self.editor.end(),
            _ => {}
        }
    }

    fn sync_input(&mut self) {
        self.dispatch(Action::EditInput(self.editor.text()));
    }

    fn select_next(&mut self) {
        let count = self.scene.markers.len();
        if count == 0 {
            return;
        }
        self.selected_marker = Some(match self.selected_marker {
            Some(i) => (i + 1) % count,
            None => 0,
        });
    }

    fn select_previous(&mut self) {
        let count = self.scene.markers.len();
        if count == 0 {
            return;
        }
        self.selected_marker = Some(match self.selected_marker {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        });
    }
}

pub fn run(model: Model, pipeline: Pipeline) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(model, pipeline);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Page tabs
            Constraint::Min(5),    // Page body
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Key hints
        ])
        .split(f.area());

    render_tabs(f, app, chunks[0]);
    match app.model.page {
        Page::Map => render_map_page(f, app, chunks[1]),
        Page::LoadData => render_load_page(f, app, chunks[1]),
    }
    render_status(f, app, chunks[2]);
    render_hints(f, app, chunks[3]);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let tab = |page: Page| {
        let label = format!(" {} ", page.as_str().to_uppercase());
        if app.model.page == page {
            Span::styled(
                label,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(label, Style::default().fg(Color::DarkGray))
        }
    };

    let line = Line::from(vec![
        Span::styled(" kinmap ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        tab(Page::Map),
        Span::raw(" "),
        tab(Page::LoadData),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_map_page(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    render_map(f, app, columns[0]);
    render_details(f, app, columns[1]);
}

fn render_map(f: &mut Frame, app: &App, area: Rect) {
    let viewport = app.viewport;
    let title = format!(
        " Map ({} markers, {} edges, zoom {}) ",
        app.scene.markers.len(),
        app.scene.edges.len(),
        viewport.zoom
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan));

    // Braille packs two dots per cell horizontally
    let dots = f64::from(area.width.saturating_sub(2).max(1)) * 2.0;
    let degrees_per_dot = viewport.lon_span() / dots;
    let selected = app
        .selected_marker
        .and_then(|i| app.scene.markers.get(i))
        .map(|m| m.position);

    let canvas = Canvas::default()
        .block(block)
        .background_color(map_view::background())
        .marker(symbols::Marker::Braille)
        .x_bounds(viewport.x_bounds())
        .y_bounds(viewport.y_bounds())
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::Gray,
                resolution: MapResolution::High,
            });
            ctx.layer();
            let mut painter = CanvasPainter {
                ctx,
                degrees_per_dot,
                selected,
            };
            app.scene.render(&mut painter);
        });

    f.render_widget(canvas, area);
}

fn render_details(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Details ")
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(marker) = app.selected_marker.and_then(|i| app.scene.markers.get(i)) else {
        if app.scene.is_empty() {
            f.render_widget(
                Paragraph::new("No markers loaded. Press l to load data.")
                    .style(Style::default().fg(Color::DarkGray))
                    .wrap(Wrap { trim: true }),
                inner,
            );
            return;
        }
        let items: Vec<ListItem> = app
            .scene
            .markers
            .iter()
            .enumerate()
            .map(|(idx, m)| {
                let first = m.tooltip.lines().next().unwrap_or("").trim_end();
                ListItem::new(format!("{:>3} {}", idx + 1, first))
            })
            .collect();
        f.render_widget(List::new(items), inner);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "({:.4}, {:.4})  {}",
                marker.position.latitude, marker.position.longitude, marker.color
            ),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for title in marker.tooltip.lines() {
        lines.push(Line::from(title.trim_end().to_string()));
    }

    let linked: Vec<_> = app
        .scene
        .edges
        .iter()
        .filter(|e| e.from == marker.position || e.to == marker.position)
        .collect();
    if !linked.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Linked ({})", linked.len()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        for edge in linked {
            let other = if edge.from == marker.position { edge.to } else { edge.from };
            lines.push(Line::from(format!(
                "  -> ({:.4}, {:.4})  {}",
                other.latitude, other.longitude, edge.color
            )));
        }
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn render_load_page(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" location | longitude | latitude | year | name | note | type ")
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let (row, col) = app.editor.cursor();
    let height = inner.height as usize;
    let (scroll, hscroll) = app.editor.scroll_offsets(inner.width as usize, height);

    let error_lines: Vec<usize> = match &app.model.status {
        LoadStatus::Failed { rows, .. } => rows.iter().map(|r| r.line).collect(),
        _ => Vec::new(),
    };

    let lines: Vec<Line> = app
        .editor
        .lines()
        .iter()
        .enumerate()
        .skip(scroll)
        .take(height)
        .map(|(idx, text)| {
            // Tabs are shown as a single visible glyph so the cursor column lines up
            let shown: String = text
                .chars()
                .skip(hscroll)
                .map(|c| if c == '\t' { '⇥' } else { c })
                .collect();
            if error_lines.contains(&(idx + 1)) {
                Line::from(Span::styled(shown, Style::default().fg(Color::Red)))
            } else {
                Line::from(shown)
            }
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);

    f.set_cursor_position((
        inner.x + (col - hscroll).min(u16::MAX as usize) as u16,
        inner.y + (row - scroll).min(u16::MAX as usize) as u16,
    ));
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let (text, color) = match &app.model.status {
        LoadStatus::NotLoaded => ("Not loaded".to_string(), Color::DarkGray),
        LoadStatus::Loaded {
            events,
            skipped,
            warnings,
        } => {
            let mut text = format!("✓ Loaded {} event(s)", events);
            if !skipped.is_empty() {
                text.push_str(&format!(", skipped {} row(s)", skipped.len()));
            }
            for warning in warnings {
                text.push_str(&format!(" | {}", warning));
            }
            let color = if skipped.is_empty() && warnings.is_empty() {
                Color::Green
            } else {
                Color::Yellow
            };
            (text, color)
        }
        LoadStatus::Failed { message, .. } => (format!("✗ {}", message), Color::Red),
    };
    f.render_widget(Paragraph::new(text).style(Style::default().fg(color)), area);
}

fn render_hints(f: &mut Frame, app: &App, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Black).bg(Color::Gray));
    let hints = match app.model.page {
        Page::Map => Line::from(vec![
            key(" q/ESC "),
            Span::raw(" Exit  "),
            key(" l "),
            Span::raw(" Load data  "),
            key(" Tab "),
            Span::raw(" Select  "),
            key(" ←↑↓→ "),
            Span::raw(" Pan  "),
            key(" +/- "),
            Span::raw(" Zoom  "),
            key(" c "),
            Span::raw(" Recenter"),
        ]),
        Page::LoadData => Line::from(vec![
            key(" Ctrl+L "),
            Span::raw(" Load  "),
            key(" ESC "),
            Span::raw(" Back to map  "),
            key(" Tab "),
            Span::raw(" Field separator  "),
            key(" Ctrl+K "),
            Span::raw(" Clear"),
        ]),
    };
    f.render_widget(
        Paragraph::new(hints).style(Style::default().bg(Color::Black).fg(Color::Gray)),
        area,
    );
}
