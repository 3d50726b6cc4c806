use std::{cmp, io, path::PathBuf, thread, time::Duration};

use anyhow::{anyhow, Context, Result};
use bgvr_core::{
    asset::LibraryItemAsset,
    config::AppConfig,
    library::{entry_matches, AssetLibrary, LibraryEntry},
    manifest::ManifestCodec,
    rules::RuleReport,
};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::{
    collections::{Cell, Collection},
    fields::{Field, FieldKind},
};

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_INPUT_LEN: usize = 1024;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Filter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Browse,
    Inspect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Fields,
    Rows(Collection),
}

impl Pane {
    fn next(self) -> Self {
        match self {
            Pane::Fields => Pane::Rows(Collection::PiecePrefabs),
            Pane::Rows(collection) => collection.next().map_or(Pane::Fields, Pane::Rows),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptKind {
    NewAsset,
    LoadSource,
    EditField(Field),
    EditCell(Cell),
}

#[derive(Debug, Clone)]
struct TextPrompt {
    kind: PromptKind,
    title: String,
    input: String,
    cursor: usize,
}

impl TextPrompt {
    fn new(kind: PromptKind, title: impl Into<String>, initial: String) -> Self {
        let cursor = initial.len();
        Self {
            kind,
            title: title.into(),
            input: initial,
            cursor,
        }
    }

    /// `cursor` is a byte offset that always sits on a char boundary.
    fn move_cursor(&mut self, delta: isize) {
        for _ in 0..delta.unsigned_abs() {
            self.cursor = if delta < 0 {
                self.prev_boundary()
            } else {
                self.next_boundary()
            };
        }
    }

    fn prev_boundary(&self) -> usize {
        self.input[..self.cursor]
            .char_indices()
            .next_back()
            .map_or(0, |(idx, _)| idx)
    }

    fn next_boundary(&self) -> usize {
        self.input[self.cursor..]
            .chars()
            .next()
            .map_or(self.cursor, |ch| self.cursor + ch.len_utf8())
    }

    fn cursor_column(&self) -> usize {
        self.input[..self.cursor].chars().count()
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    fn insert(&mut self, ch: char) {
        if ch.is_control() || self.input.chars().count() >= MAX_INPUT_LEN {
            return;
        }
        self.input.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.prev_boundary();
        self.input.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    fn delete(&mut self) {
        let end = self.next_boundary();
        if end > self.cursor {
            self.input.replace_range(self.cursor..end, "");
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal editor for library item assets.
pub struct EditorApp {
    library: AssetLibrary,
    config: AppConfig,
    codec: ManifestCodec,
    state: UiState,
    screen: Screen,
    active: Option<LibraryItemAsset>,
    pane: Pane,
    field_cursor: usize,
    cell_cursor: usize,
    pending_discard: bool,
    prompt: Option<TextPrompt>,
    theme: Theme,
}

impl EditorApp {
    pub fn new(library: AssetLibrary, config: AppConfig) -> Self {
        let codec = config.codec();
        Self {
            library,
            config,
            codec,
            state: UiState::default(),
            screen: Screen::Browse,
            active: None,
            pane: Pane::Fields,
            field_cursor: 0,
            cell_cursor: 0,
            pending_discard: false,
            prompt: None,
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.reload_entries()?;
        self.state.set_status(format!(
            "Found {} library items under {}",
            self.state.filtered.len(),
            self.library.root().display()
        ));

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }
            let Some(event) = event_rx.recv().await else {
                break;
            };
            self.process_app_event(event);
            if self.state.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        Ok(())
    }

    fn reload_entries(&mut self) -> Result<()> {
        self.library.refresh();
        let entries = self.library.entries()?;
        self.state.set_entries(entries);
        self.state.apply_filter();
        info!(total = self.state.all.len(), "Library reloaded");
        Ok(())
    }

    fn process_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(Event::Key(key)) => {
                let result = if self.prompt.is_some() {
                    self.handle_prompt_key(key)
                } else {
                    match self.screen {
                        Screen::Browse => self.handle_browse_key(key),
                        Screen::Inspect => self.handle_inspect_key(key),
                    }
                };
                if let Err(err) = result {
                    error!(?err, "Command failed");
                    self.state.set_status(format!("Error: {err:#}"));
                }
            }
            AppEvent::Input(_) | AppEvent::Tick => {}
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.state.mode == Mode::Filter {
            return self.handle_filter_key(key);
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.state.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_cursor(-1),
            KeyCode::Home | KeyCode::Char('g') => self.state.move_to(0),
            KeyCode::End | KeyCode::Char('G') => self.state.move_to_end(),
            KeyCode::PageDown => self.state.page_down(),
            KeyCode::PageUp => self.state.page_up(),
            KeyCode::Char('/') => {
                self.state.mode = Mode::Filter;
                self.state.set_status("Enter filter text".to_string());
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reload_entries()?;
                self.state
                    .set_status(format!("Rescanned: {} items", self.state.filtered.len()));
            }
            KeyCode::Char('n') => {
                self.prompt = Some(TextPrompt::new(
                    PromptKind::NewAsset,
                    "New library item",
                    bgvr_core::asset::DEFAULT_ASSET_NAME.to_string(),
                ));
            }
            KeyCode::Enter => {
                let Some(entry) = self.state.current_entry().cloned() else {
                    self.state.set_status("No library item selected".to_string());
                    return Ok(());
                };
                self.open_asset(entry.path)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.state.mode = Mode::Browse;
                self.state.filter.clear();
                self.state.apply_filter();
                self.state.set_status("Filter cleared".to_string());
            }
            KeyCode::Enter => {
                self.state.mode = Mode::Browse;
                self.state
                    .set_status(format!("Filter applied: {}", self.state.filter));
            }
            KeyCode::Backspace => {
                self.state.filter.pop();
                self.state.apply_filter();
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.state.filter.push(c);
                    self.state.apply_filter();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_inspect_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code != KeyCode::Esc {
            self.pending_discard = false;
        }
        match key.code {
            KeyCode::Esc => self.close_inspector(),
            KeyCode::Tab => {
                self.pane = self.pane.next();
                self.cell_cursor = 0;
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_inspect_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_inspect_cursor(-1),
            KeyCode::Home => self.set_inspect_cursor(0),
            KeyCode::End => self.set_inspect_cursor(usize::MAX),
            KeyCode::Enter | KeyCode::Char(' ') => match self.pane {
                Pane::Fields => self.edit_current_field()?,
                Pane::Rows(collection) => self.edit_current_cell(collection)?,
            },
            KeyCode::Char('a') => self.add_row()?,
            KeyCode::Char('d') => self.remove_row()?,
            KeyCode::Char('l') => {
                let initial = self
                    .active
                    .as_ref()
                    .and_then(|asset| asset.path().parent())
                    .map(|dir| format!("{}/", dir.display()))
                    .unwrap_or_default();
                self.prompt = Some(TextPrompt::new(
                    PromptKind::LoadSource,
                    "Load from manifest file",
                    initial,
                ));
            }
            KeyCode::Char('s') => self.save_manifest()?,
            KeyCode::Char('w') => self.persist_active()?,
            _ => {}
        }
        Ok(())
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(prompt) = self.prompt.as_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
                self.state.set_status("Cancelled".to_string());
            }
            KeyCode::Enter => {
                if let Some(prompt) = self.prompt.take() {
                    self.submit_prompt(prompt)?;
                }
            }
            KeyCode::Left => prompt.move_cursor(-1),
            KeyCode::Right => prompt.move_cursor(1),
            KeyCode::Home => prompt.move_home(),
            KeyCode::End => prompt.move_end(),
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Delete => prompt.delete(),
            KeyCode::Char(ch) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    prompt.insert(ch);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn submit_prompt(&mut self, prompt: TextPrompt) -> Result<()> {
        match prompt.kind {
            PromptKind::NewAsset => {
                let name = prompt.input.trim();
                let name = (!name.is_empty()).then_some(name);
                let asset = LibraryItemAsset::create(self.library.root(), name)?;
                let path = asset.path().to_path_buf();
                self.reload_entries()?;
                self.open_asset(path)?;
            }
            PromptKind::LoadSource => {
                let source = PathBuf::from(prompt.input.trim());
                let asset = self
                    .active
                    .as_mut()
                    .ok_or_else(|| anyhow!("no library item is open"))?;
                asset.load_manifest_from_file(&source, &self.codec)?;
                self.state
                    .set_status(format!("Loaded manifest from {}", source.display()));
            }
            PromptKind::EditField(field) => {
                let asset = self
                    .active
                    .as_mut()
                    .ok_or_else(|| anyhow!("no library item is open"))?;
                let mut draft = asset.manifest().clone();
                field.set_text(&mut draft, &prompt.input)?;
                *asset.manifest_mut() = draft;
                self.state.set_status(format!("{} updated", field.label()));
            }
            PromptKind::EditCell(cell) => {
                let asset = self
                    .active
                    .as_mut()
                    .ok_or_else(|| anyhow!("no library item is open"))?;
                let mut draft = asset.manifest().clone();
                cell.set_text(&mut draft, &prompt.input)?;
                *asset.manifest_mut() = draft;
                self.state.set_status(format!("{} updated", cell.label()));
            }
        }
        Ok(())
    }

    fn open_asset(&mut self, path: PathBuf) -> Result<()> {
        let asset = LibraryItemAsset::open(&path)?;
        self.state
            .set_status(format!("Editing {}", asset.manifest().display_name()));
        self.active = Some(asset);
        self.pane = Pane::Fields;
        self.field_cursor = 0;
        self.cell_cursor = 0;
        self.pending_discard = false;
        self.screen = Screen::Inspect;
        Ok(())
    }

    fn close_inspector(&mut self) {
        let dirty = self.active.as_ref().is_some_and(|asset| asset.is_dirty());
        if dirty && !self.pending_discard {
            self.pending_discard = true;
            self.state.set_status(
                "Unsaved changes: press w to write the asset, Esc again to discard".to_string(),
            );
            return;
        }
        self.active = None;
        self.pending_discard = false;
        self.screen = Screen::Browse;
        if let Err(err) = self.reload_entries() {
            self.state.set_status(format!("Reload failed: {err:#}"));
        } else {
            self.state.set_status("Returned to library".to_string());
        }
    }

    fn inspect_len(&self) -> usize {
        match self.pane {
            Pane::Fields => Field::ALL.len(),
            Pane::Rows(collection) => self
                .active
                .as_ref()
                .map_or(0, |asset| collection.cells(asset.manifest()).len()),
        }
    }

    fn set_inspect_cursor(&mut self, index: usize) {
        let index = index.min(self.inspect_len().saturating_sub(1));
        match self.pane {
            Pane::Fields => self.field_cursor = index,
            Pane::Rows(_) => self.cell_cursor = index,
        }
    }

    fn move_inspect_cursor(&mut self, delta: isize) {
        let current = match self.pane {
            Pane::Fields => self.field_cursor,
            Pane::Rows(_) => self.cell_cursor,
        };
        self.set_inspect_cursor(current.saturating_add_signed(delta));
    }

    fn current_field(&self) -> Field {
        Field::ALL[self.field_cursor.min(Field::ALL.len() - 1)]
    }

    fn edit_current_field(&mut self) -> Result<()> {
        let field = self.current_field();
        let asset = self
            .active
            .as_mut()
            .ok_or_else(|| anyhow!("no library item is open"))?;
        if field.is_prompted() {
            let initial = field.initial_input(asset.manifest());
            self.prompt = Some(TextPrompt::new(
                PromptKind::EditField(field),
                field.label(),
                initial,
            ));
        } else if field.advance(asset.manifest_mut()) {
            let value = field.display(asset.manifest());
            self.state
                .set_status(format!("{} set to {}", field.label(), value));
        }
        Ok(())
    }

    fn edit_current_cell(&mut self, collection: Collection) -> Result<()> {
        let asset = self
            .active
            .as_mut()
            .ok_or_else(|| anyhow!("no library item is open"))?;
        let Some(cell) = collection
            .cells(asset.manifest())
            .get(self.cell_cursor)
            .copied()
        else {
            self.state.set_status(format!(
                "{} is empty: press a to add a row",
                collection.label()
            ));
            return Ok(());
        };
        if cell.is_prompted() {
            let initial = cell.display(asset.manifest());
            self.prompt = Some(TextPrompt::new(
                PromptKind::EditCell(cell),
                cell.label(),
                initial,
            ));
        } else if cell.advance(asset.manifest_mut()) {
            let value = cell.display(asset.manifest());
            self.state
                .set_status(format!("{} set to {}", cell.label(), value));
        }
        Ok(())
    }

    fn add_row(&mut self) -> Result<()> {
        let Pane::Rows(collection) = self.pane else {
            self.state
                .set_status("Press Tab to pick a collection first".to_string());
            return Ok(());
        };
        let asset = self
            .active
            .as_mut()
            .ok_or_else(|| anyhow!("no library item is open"))?;
        let row = collection.add_row(asset.manifest_mut());
        self.cell_cursor = row * collection.columns().len();
        self.state
            .set_status(format!("Added {} #{row}", collection.label()));
        Ok(())
    }

    fn remove_row(&mut self) -> Result<()> {
        let Pane::Rows(collection) = self.pane else {
            return Ok(());
        };
        let asset = self
            .active
            .as_mut()
            .ok_or_else(|| anyhow!("no library item is open"))?;
        let Some(cell) = collection
            .cells(asset.manifest())
            .get(self.cell_cursor)
            .copied()
        else {
            return Ok(());
        };
        if collection.remove_row(asset.manifest_mut(), cell.row) {
            self.state
                .set_status(format!("Removed {} #{}", collection.label(), cell.row));
        }
        self.set_inspect_cursor(cell.row * collection.columns().len());
        Ok(())
    }

    fn save_manifest(&mut self) -> Result<()> {
        let asset = self
            .active
            .as_ref()
            .ok_or_else(|| anyhow!("no library item is open"))?;
        let path = asset.save_manifest(&self.config.manifest_file_name, &self.codec)?;
        self.state.set_status(format!("Saved {}", path.display()));
        Ok(())
    }

    fn persist_active(&mut self) -> Result<()> {
        let asset = self
            .active
            .as_mut()
            .ok_or_else(|| anyhow!("no library item is open"))?;
        asset.persist()?;
        let message = format!("Wrote {}", asset.path().display());
        self.state.set_status(message);
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        match self.screen {
            Screen::Browse => self.draw_browse(frame),
            Screen::Inspect => self.draw_inspect(frame),
        }
        if let Some(prompt) = &self.prompt {
            self.render_prompt(frame, prompt);
        }
    }

    fn draw_browse(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(3)])
            .split(size);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[0]);

        self.render_entry_list(frame, body[0]);
        self.render_entry_info(frame, body[1]);
        self.render_status(frame, chunks[1], "n new  Enter open  / filter  Ctrl-r rescan  q quit");
    }

    fn draw_inspect(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(3)])
            .split(size);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[0]);

        let help = match self.pane {
            Pane::Fields => {
                self.render_fields(frame, body[0]);
                "Enter/Space edit  Tab collections  l load  s save manifest  w write asset  Esc back"
            }
            Pane::Rows(collection) => {
                self.render_rows(frame, body[0], collection);
                "Enter/Space edit  a add row  d delete row  Tab next  s save manifest  w write asset  Esc back"
            }
        };
        self.render_report(frame, body[1]);
        self.render_status(frame, chunks[1], help);
    }

    fn render_entry_list(&mut self, frame: &mut Frame, area: Rect) {
        self.state.list_height = area.height.saturating_sub(2) as usize;
        self.state.clamp_cursor();
        self.state.ensure_cursor_visible();

        let height = self.state.list_height;
        let entries = self.state.visible_entries(height);
        let mut list_state = ListState::default();
        if !entries.is_empty() {
            let selected = self
                .state
                .cursor
                .saturating_sub(self.state.offset)
                .min(entries.len().saturating_sub(1));
            list_state.select(Some(selected));
        }

        let items: Vec<ListItem> = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let is_selected = self.state.cursor == self.state.offset + idx;
                let marker = if is_selected {
                    Span::styled(
                        "▶ ",
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw("  ")
                };
                let badge = if entry.board_invalid {
                    Span::styled(" !", Style::default().fg(self.theme.danger))
                } else {
                    Span::raw("")
                };
                ListItem::new(Line::from(vec![
                    marker,
                    Span::styled(
                        entry.display_name(),
                        Style::default().fg(self.theme.primary_fg),
                    ),
                    badge,
                ]))
            })
            .collect();

        let title = if self.state.filter.is_empty() {
            "Library".to_string()
        } else {
            format!("Library (filter: {})", self.state.filter)
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_entry_info(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Details");
        let Some(entry) = self.state.current_entry() else {
            let paragraph = Paragraph::new("No library items found. Press n to create one.")
                .block(block)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        };

        let mut lines = vec![Line::from(Span::styled(
            entry.display_name(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        lines.push(Line::from(format!("Id: {}", entry.id)));
        lines.push(Line::from(format!("Asset: {}", entry.path.display())));
        lines.push(if entry.board_invalid {
            Line::from(Span::styled(
                "Board: missing prefab or piece prefabs",
                Style::default().fg(self.theme.danger),
            ))
        } else {
            Line::from(Span::styled(
                "Board: ok",
                Style::default().fg(self.theme.success),
            ))
        });
        lines.push(if entry.has_saved_manifest {
            Line::from(format!("{}: present", self.config.manifest_file_name))
        } else {
            Line::from(Span::styled(
                format!("{}: not saved yet", self.config.manifest_file_name),
                Style::default().fg(self.theme.muted),
            ))
        });

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_fields(&self, frame: &mut Frame, area: Rect) {
        let Some(asset) = self.active.as_ref() else {
            return;
        };
        let manifest = asset.manifest();
        let title = if asset.is_dirty() {
            format!("{} *", asset.name())
        } else {
            asset.name()
        };

        let mut items = Vec::new();
        let mut selected_row = 0;
        let mut section = "";
        for (idx, field) in Field::ALL.iter().enumerate() {
            if field.section() != section {
                section = field.section();
                items.push(ListItem::new(Line::from(Span::styled(
                    section,
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))));
            }
            if idx == self.field_cursor {
                selected_row = items.len();
            }
            let value_style = match field.kind() {
                FieldKind::Toggle | FieldKind::Choice => Style::default().fg(self.theme.warning),
                FieldKind::Text | FieldKind::Integer => Style::default().fg(self.theme.primary_fg),
            };
            items.push(ListItem::new(Line::from(vec![
                Span::raw(format!("  {:<26}", field.label())),
                Span::styled(field.display(manifest), value_style),
            ])));
        }

        let mut list_state = ListState::default();
        list_state.select(Some(selected_row));
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_rows(&self, frame: &mut Frame, area: Rect, collection: Collection) {
        let Some(asset) = self.active.as_ref() else {
            return;
        };
        let manifest = asset.manifest();
        let dirty = if asset.is_dirty() { " *" } else { "" };
        let title = format!(
            "{}{dirty} · {} ({})",
            asset.name(),
            collection.label(),
            collection.len(manifest)
        );

        let mut items = Vec::new();
        let mut selected_row = None;
        let mut current_row = None;
        for (idx, cell) in collection.cells(manifest).into_iter().enumerate() {
            if current_row != Some(cell.row) {
                current_row = Some(cell.row);
                items.push(ListItem::new(Line::from(Span::styled(
                    collection.row_title(manifest, cell.row),
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))));
            }
            if idx == self.cell_cursor {
                selected_row = Some(items.len());
            }
            let value_style = match cell.column.kind() {
                FieldKind::Toggle | FieldKind::Choice => Style::default().fg(self.theme.warning),
                FieldKind::Text | FieldKind::Integer => Style::default().fg(self.theme.primary_fg),
            };
            items.push(ListItem::new(Line::from(vec![
                Span::raw(format!("  {:<26}", cell.column.label())),
                Span::styled(cell.display(manifest), value_style),
            ])));
        }
        if items.is_empty() {
            items.push(ListItem::new(Line::from(Span::styled(
                "No rows yet. Press a to add one.",
                Style::default().fg(self.theme.muted),
            ))));
        }

        let mut list_state = ListState::default();
        list_state.select(selected_row);
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_report(&self, frame: &mut Frame, area: Rect) {
        let Some(asset) = self.active.as_ref() else {
            return;
        };
        let manifest = asset.manifest();
        let logic = &manifest.logic_config;
        let report: RuleReport = manifest.validate();

        let mut lines = vec![
            Line::from(format!(
                "Piece prefabs: {}",
                manifest.board_config.checker_piece_collection.len()
            )),
            Line::from(format!("Starting pieces: {}", logic.checker_pieces.len())),
            Line::from(format!(
                "Winning combinations: {}",
                logic.game_win_custom_winning_positions.len()
            )),
            Line::from(""),
        ];

        if report.is_clean() {
            lines.push(Line::from(Span::styled(
                "No problems found",
                Style::default().fg(self.theme.success),
            )));
        }
        for issue in &report.errors {
            lines.push(Line::from(Span::styled(
                format!("✗ {issue}"),
                Style::default().fg(self.theme.danger),
            )));
        }
        for issue in &report.warnings {
            lines.push(Line::from(Span::styled(
                format!("! {issue}"),
                Style::default().fg(self.theme.warning),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Validation"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, help: &str) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let primary = if self.state.mode == Mode::Filter && self.screen == Screen::Browse {
            format!("Filter: {}", self.state.filter)
        } else {
            self.state.status.clone()
        };
        let line = Line::from(vec![
            Span::raw(primary),
            Span::styled(format!("  │ {help}"), Style::default().fg(self.theme.muted)),
        ]);
        let paragraph = Paragraph::new(line).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_prompt(&self, frame: &mut Frame, prompt: &TextPrompt) {
        let frame_area = frame.size();
        let width = cmp::max(cmp::min(72_u16, frame_area.width.saturating_sub(4)), 24_u16);
        let height = 6_u16.min(frame_area.height.saturating_sub(2)).max(5_u16);
        let area = centered_rect(width, height, frame_area);

        frame.render_widget(Clear, area);

        let input_line = Line::from(vec![
            Span::styled("> ", Style::default().fg(self.theme.accent)),
            Span::raw(prompt.input.clone()),
        ]);
        let helper = Line::from(vec![
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" confirm  "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]);
        let paragraph = Paragraph::new(vec![input_line, Line::from(""), helper])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(prompt.title.clone()),
            );
        frame.render_widget(paragraph, area);

        let cursor_x = (area.x + 3 + prompt.cursor_column() as u16)
            .min(area.x + area.width.saturating_sub(2));
        frame.set_cursor(cursor_x, area.y + 1);
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

struct UiState {
    all: Vec<LibraryEntry>,
    filtered: Vec<LibraryEntry>,
    cursor: usize,
    offset: usize,
    list_height: usize,
    filter: String,
    status: String,
    mode: Mode,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            all: Vec::new(),
            filtered: Vec::new(),
            cursor: 0,
            offset: 0,
            list_height: 1,
            filter: String::new(),
            status: "Ready".to_string(),
            mode: Mode::Browse,
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_entries(&mut self, entries: Vec<LibraryEntry>) {
        self.all = entries;
    }

    fn apply_filter(&mut self) {
        let needle = self.filter.trim().to_lowercase();
        self.filtered = if needle.is_empty() {
            self.all.clone()
        } else {
            self.all
                .iter()
                .filter(|entry| entry_matches(entry, &needle))
                .cloned()
                .collect()
        };
        self.clamp_cursor();
        self.ensure_cursor_visible();
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let last = self.filtered.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
        self.ensure_cursor_visible();
    }

    fn move_to(&mut self, index: usize) {
        if self.filtered.is_empty() {
            return;
        }
        self.cursor = index.min(self.filtered.len() - 1);
        self.ensure_cursor_visible();
    }

    fn move_to_end(&mut self) {
        self.move_to(self.filtered.len().saturating_sub(1));
    }

    fn page_down(&mut self) {
        self.move_cursor(self.list_height.max(1) as isize);
    }

    fn page_up(&mut self) {
        self.move_cursor(-(self.list_height.max(1) as isize));
    }

    fn visible_entries(&self, height: usize) -> &[LibraryEntry] {
        let start = self.offset.min(self.filtered.len());
        let end = (start + height.max(1)).min(self.filtered.len());
        &self.filtered[start..end]
    }

    fn current_entry(&self) -> Option<&LibraryEntry> {
        self.filtered.get(self.cursor)
    }

    fn set_status(&mut self, message: String) {
        self.status = format!("[{}] {}", Local::now().format("%H:%M:%S"), message);
    }

    fn clamp_cursor(&mut self) {
        if self.filtered.is_empty() {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= self.filtered.len() {
            self.cursor = self.filtered.len() - 1;
        }
    }

    fn ensure_cursor_visible(&mut self) {
        let height = self.list_height.max(1);
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(id: &str, title: &str) -> LibraryEntry {
        LibraryEntry {
            path: PathBuf::from(format!("{id}.libitem")),
            name: id.to_string(),
            id: id.to_string(),
            title: title.to_string(),
            board_invalid: false,
            has_saved_manifest: false,
        }
    }

    #[test]
    fn filter_narrows_and_clamps_cursor() {
        let mut state = UiState::default();
        state.set_entries(vec![
            entry("chess", "Chess"),
            entry("checkers", "Checkers"),
            entry("ludo", "Ludo"),
        ]);
        state.apply_filter();
        state.move_to_end();
        assert_eq!(state.current_entry().map(|e| e.id.as_str()), Some("ludo"));

        state.filter = "CHE".to_string();
        state.apply_filter();
        assert_eq!(state.filtered.len(), 2);
        assert_eq!(state.cursor, 1);
        assert_eq!(state.current_entry().map(|e| e.id.as_str()), Some("checkers"));
    }

    #[test]
    fn cursor_scrolls_with_list_height() {
        let mut state = UiState::default();
        state.set_entries((0..10).map(|i| entry(&format!("g{i}"), "")).collect());
        state.apply_filter();
        state.list_height = 3;
        state.page_down();
        assert_eq!(state.cursor, 3);
        assert_eq!(state.offset, 1);
        assert_eq!(state.visible_entries(3).len(), 3);
        state.move_to(0);
        assert_eq!(state.offset, 0);
    }

    #[test]
    fn prompt_editing() {
        let mut prompt = TextPrompt::new(PromptKind::NewAsset, "New", "Chess".to_string());
        prompt.move_cursor(-10);
        prompt.insert('X');
        prompt.move_end();
        prompt.backspace();
        assert_eq!(prompt.input, "XChes");
        prompt.move_home();
        prompt.delete();
        assert_eq!(prompt.input, "Ches");
    }

    #[test]
    fn prompt_steps_over_multibyte_characters() {
        let manifest = bgvr_core::LibraryItemManifest {
            title: "Mühle".to_string(),
            ..Default::default()
        };
        let mut prompt = TextPrompt::new(
            PromptKind::EditField(Field::Title),
            Field::Title.label(),
            Field::Title.initial_input(&manifest),
        );
        prompt.move_cursor(-3);
        assert_eq!(prompt.cursor_column(), 2);
        prompt.backspace();
        assert_eq!(prompt.input, "Mhle");
        prompt.insert('ö');
        assert_eq!(prompt.input, "Möhle");
        assert_eq!(prompt.cursor_column(), 2);
        prompt.move_cursor(-1);
        prompt.delete();
        assert_eq!(prompt.input, "Mhle");
        prompt.move_end();
        prompt.move_cursor(5);
        prompt.delete();
        assert_eq!(prompt.cursor_column(), 4);

        let mut edited = manifest.clone();
        Field::Title.set_text(&mut edited, &prompt.input).unwrap();
        assert_eq!(edited.title, "Mhle");
    }

    #[test]
    fn panes_cycle_through_collections() {
        let mut pane = Pane::Fields;
        let mut seen = Vec::new();
        for _ in 0..4 {
            pane = pane.next();
            seen.push(pane);
        }
        assert_eq!(
            seen,
            vec![
                Pane::Rows(Collection::PiecePrefabs),
                Pane::Rows(Collection::StartingPieces),
                Pane::Rows(Collection::WinningCombinations),
                Pane::Fields,
            ]
        );
    }
}
