use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use unicode_width::UnicodeWidthStr;

use crate::xth_color::{Depth, disk_color, wtmatch};
use crate::xth_config::{Config, MAX_SOLVE_INTERVAL_MS, MIN_SOLVE_INTERVAL_MS, save_config};
use crate::xth_error::{HanoiError, MoveRejection};
use crate::xth_game::{GameState, MAX_DISKS, TOWER_COUNT};
use crate::xth_lang::{Assets, Lang, fill};
use crate::xth_play::{ClickOutcome, Controller};
use crate::xth_solver::optimal_moves;

// Board geometry: every tower column fits the widest disk plus a margin
const COL_W: u16 = 2 * MAX_DISKS as u16 + 3;
const STACK_ROWS: usize = MAX_DISKS + 1;
const BOARD_W: u16 = COL_W * TOWER_COUNT as u16 + 2;
const BOARD_H: u16 = STACK_ROWS as u16 + 3 + 2;
const SPEED_STEP_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Help,
    New,
    Solve,
    Records,
    Disks,
    Options,
    About,
    Exit,
}

// Menu row order; Esc is rendered on the status row instead
const MENU_ITEMS: [(&str, Action); 7] = [
    ("F1", Action::Help),
    ("F2", Action::New),
    ("F3", Action::Solve),
    ("F4", Action::Records),
    ("F5", Action::Disks),
    ("F7", Action::Options),
    ("F9", Action::About),
];

fn action_label(action: Action, a: &Assets) -> &'static str {
    match action {
        Action::Help => a.menu_help,
        Action::New => a.menu_new,
        Action::Solve => a.menu_solve,
        Action::Records => a.menu_records,
        Action::Disks => a.menu_disks,
        Action::Options => a.menu_options,
        Action::About => a.menu_about,
        Action::Exit => a.menu_exit,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modal {
    Help,
    Records,
    Disks,
    Options,
    About,
    Win,
    Warning(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionItem {
    Ascii,
    Labels,
    Speed,
    Language,
}

const OPTION_ITEMS: [OptionItem; 4] = [OptionItem::Ascii, OptionItem::Labels, OptionItem::Speed, OptionItem::Language];

// Group runtime UI variables into a single structure to simplify passing them around
#[derive(Debug)]
struct UiState {
    modal: Option<Modal>,
    cursor: usize,                         // Keyboard cursor tower
    hover_index: Option<usize>,            // Hovered menu item
    clicked_index: Option<usize>,
    click_instant: Option<Instant>,
    menu_hits: Vec<(u16, u16, Action)>,    // (first column, last column, action) on the menu row
    menu_rect: Option<Rect>,
    board_rect: Option<Rect>,
    status_exit: Option<(u16, u16)>,       // Esc label columns on the status row
    status_rect: Option<Rect>,
    modal_rect: Option<Rect>,
    modal_button_rect: Option<Rect>,
    modal_button_hovered: bool,
    options_focus: usize,
    disks_input: String,
    disks_error: bool,
    flash_tower: Option<(usize, Instant)>, // Tower that refused a move
    new_record: bool,
    next_step: Option<Instant>,            // When the animated solve plays its next move
    exit_requested: bool,
}

impl UiState {
    fn new() -> Self {
        UiState {
            modal: None,
            cursor: 0,
            hover_index: None,
            clicked_index: None,
            click_instant: None,
            menu_hits: Vec::new(),
            menu_rect: None,
            board_rect: None,
            status_exit: None,
            status_rect: None,
            modal_rect: None,
            modal_button_rect: None,
            modal_button_hovered: false,
            options_focus: 0,
            disks_input: String::new(),
            disks_error: false,
            flash_tower: None,
            new_record: false,
            next_step: None,
            exit_requested: false,
        }
    }

    fn reset_after_new_game(&mut self) {
        self.modal = None;
        self.cursor = 0;
        self.flash_tower = None;
        self.new_record = false;
        self.next_step = None;
    }
}

/// Colors and glyphs resolved once per run
struct Theme {
    depth: Depth,
    board_bg: Color,
    pole_fg: Color,
    arrow_fg: Color,
    flash_bg: Color,
    menu_key_fg: Color,
    menu_key_bg_hover: Color,
    menu_key_bg_pressed: Color,
    menu_key_fg_pressed: Color,
    cursor_bg: Color,
}

impl Theme {
    fn new() -> Self {
        let depth = Depth::detect();
        Theme {
            depth,
            board_bg: Color::Reset,
            pole_fg: wtmatch(Color::Gray, depth),
            arrow_fg: wtmatch(Color::Red, depth),
            flash_bg: wtmatch(Color::Red, depth),
            menu_key_fg: wtmatch(Color::Yellow, depth),
            menu_key_bg_hover: wtmatch(Color::LightBlue, depth),
            menu_key_bg_pressed: wtmatch(Color::Green, depth),
            menu_key_fg_pressed: wtmatch(Color::Black, depth),
            cursor_bg: wtmatch(Color::LightBlue, depth),
        }
    }
}

pub fn run(cfg: &mut Config, lang: &mut Lang) -> Result<(), Box<dyn Error>> {
    let mut ctl = Controller::new(cfg.disks)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnableMouseCapture, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    info!(disks = cfg.disks, lang = %lang.current_lang, "ui started");

    let theme = Theme::new();
    let mut ui = UiState::new();
    let frame_rate = Duration::from_millis(50);

    while !ui.exit_requested {
        terminal.draw(|f| draw(f, &ctl, cfg, lang, &theme, &mut ui))?;

        let mut timeout = frame_rate;
        if let Some(due) = ui.next_step {
            timeout = timeout.min(due.saturating_duration_since(Instant::now()));
        }
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) => {
                    handle_key(code, &mut ctl, cfg, lang, &mut ui);
                }
                Event::Mouse(me) => handle_mouse(me, &mut ctl, cfg, lang, &mut ui),
                _ => {}
            }
        }

        // animated solve: one move per configured interval
        if let Some(due) = ui.next_step {
            if Instant::now() >= due {
                match ctl.tick() {
                    Some(moved) if moved.just_solved => on_solved(&ctl, cfg, &mut ui),
                    _ => {}
                }
                ui.next_step = if ctl.is_playing() {
                    Some(Instant::now() + Duration::from_millis(cfg.solve_interval_ms))
                } else {
                    None
                };
            }
        }

        // clear click feedback after short duration
        if let Some(t0) = ui.click_instant {
            if t0.elapsed() > Duration::from_millis(200) {
                ui.clicked_index = None;
                ui.click_instant = None;
            }
        }
    }

    // Save preferences before exiting
    save_config(cfg);
    info!("ui exited");

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn menu_width(a: &Assets) -> u16 {
    let items: usize = MENU_ITEMS
        .iter()
        .map(|(k, act)| k.width() + 2 + action_label(*act, a).width())
        .sum();
    (items + 2 * (MENU_ITEMS.len() - 1) + 4) as u16
}

fn draw<B: Backend>(f: &mut Frame<B>, ctl: &Controller, cfg: &Config, lang: &Lang, theme: &Theme, ui: &mut UiState) {
    let a = &lang.assets;
    let size = f.size();
    let min_twidth = menu_width(a).max(BOARD_W + 2).max(80);
    let min_theight = BOARD_H + 6 + 2;
    // If terminal too small, render a centered warning and skip normal UI
    if size.width < min_twidth || size.height < min_theight {
        let warn_lines = vec![
            Spans::from(Span::raw(a.tsmsg_line1)),
            Spans::from(Span::raw(fill(a.tsmsg_line2, &[&min_twidth, &min_theight]))),
        ];
        let warn = Paragraph::new(Text::from(warn_lines))
            .block(Block::default().borders(Borders::ALL).title(a.tsmsg_title))
            .alignment(Alignment::Center);
        f.render_widget(Clear, size);
        let w = 40u16.min(size.width.saturating_sub(2));
        let h = 5u16.min(size.height.saturating_sub(2));
        f.render_widget(warn, center_rect(w, h, size));
        ui.board_rect = None;
        ui.menu_rect = None;
        ui.status_rect = None;
        ui.modal_rect = None;
        ui.modal_button_rect = None;
        return;
    }

    // layout: top menu row, center board, bottom status
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([Constraint::Length(3), Constraint::Min(6), Constraint::Length(3)].as_ref())
        .split(size);

    // menu row, per-item styled so hover/click mapping aligns with mouse offsets
    let mut spans_vec: Vec<Span> = vec![Span::raw(" ")];
    let mut col = chunks[0].x + 2;
    ui.menu_hits.clear();
    for (i, (key, action)) in MENU_ITEMS.iter().enumerate() {
        if i > 0 {
            spans_vec.push(Span::raw("  "));
            col += 2;
        }
        let rest = format!(": {}", action_label(*action, a));
        let (key_style, rest_style) = item_styles(theme, Some(i) == ui.clicked_index, Some(i) == ui.hover_index);
        let item_w = (key.width() + rest.width()) as u16;
        ui.menu_hits.push((col, col + item_w - 1, *action));
        col += item_w;
        spans_vec.push(Span::styled(key.to_string(), key_style));
        spans_vec.push(Span::styled(rest, rest_style));
    }
    spans_vec.push(Span::raw(" "));
    let menu = Paragraph::new(Spans::from(spans_vec)).block(Block::default().borders(Borders::ALL));
    f.render_widget(menu, chunks[0]);
    ui.menu_rect = Some(chunks[0]);

    // status row: progress on the left, Esc: Exit on the right
    let state = ctl.state();
    let left_text = if ctl.is_playing() {
        fill(a.status_solving_fmt, &[&ctl.remaining()])
    } else {
        fill(a.status_fmt, &[&state.disks(), &state.move_count(), &ctl.elapsed().as_secs()])
    };
    let right_rest = format!(": {}", a.menu_exit);
    let inner_w = chunks[2].width.saturating_sub(2) as usize;
    let left_w = left_text.width();
    let right_w = "Esc".width() + right_rest.width();
    let mid_spaces = if inner_w > left_w + right_w + 1 { inner_w - left_w - right_w - 1 } else { 1 };
    let exit_hovered = ui.hover_index == Some(MENU_ITEMS.len());
    let (key_style, rest_style) = item_styles(theme, false, exit_hovered);
    let exit_x = chunks[2].x + 1 + (left_w + mid_spaces) as u16;
    ui.status_exit = Some((exit_x, exit_x + right_w as u16 - 1));
    let status = Paragraph::new(Spans::from(vec![
        Span::raw(left_text),
        Span::raw(" ".repeat(mid_spaces)),
        Span::styled("Esc", key_style),
        Span::styled(right_rest, rest_style),
        Span::raw(" "),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[2]);
    ui.status_rect = Some(chunks[2]);

    // board
    let board_area = center_rect(BOARD_W, BOARD_H, chunks[1]);
    ui.board_rect = Some(board_area);
    let title = format!(" {} / {} ", state.move_count(), optimal_moves(state.disks()));
    let board = Paragraph::new(Text::from(board_lines(state, cfg, theme, ui)))
        .block(Block::default().borders(Borders::ALL).title(title).title_alignment(Alignment::Center));
    f.render_widget(board, board_area);

    // modals
    ui.modal_rect = None;
    ui.modal_button_rect = None;
    if let Some(modal) = ui.modal {
        draw_modal(f, modal, ctl, cfg, lang, theme, ui, size);
    }
}

fn item_styles(theme: &Theme, pressed: bool, hovered: bool) -> (Style, Style) {
    if pressed {
        (
            Style::default().bg(theme.menu_key_bg_pressed).fg(theme.menu_key_fg_pressed).add_modifier(Modifier::BOLD),
            Style::default().bg(theme.menu_key_bg_pressed).fg(theme.menu_key_fg_pressed),
        )
    } else if hovered {
        (
            Style::default().bg(theme.menu_key_bg_hover).fg(theme.menu_key_fg_pressed).add_modifier(Modifier::BOLD),
            Style::default().bg(theme.menu_key_bg_hover).fg(theme.menu_key_fg_pressed),
        )
    } else {
        (Style::default().fg(theme.menu_key_fg).add_modifier(Modifier::BOLD), Style::default())
    }
}

/// Render the three towers, bottom disk on the last stack row
fn board_lines(state: &GameState, cfg: &Config, theme: &Theme, ui: &UiState) -> Vec<Spans<'static>> {
    let ascii = cfg.ascii_icons;
    let pole = if ascii { "|" } else { "│" };
    let arrow = if ascii { "v" } else { "▼" };
    let base = if ascii { "=" } else { "▀" };
    let flashing = ui
        .flash_tower
        .filter(|(_, t0)| t0.elapsed() < Duration::from_millis(350))
        .map(|(t, _)| t);

    let mut lines = vec![Spans::from(Span::raw(""))];
    for row in 0..STACK_ROWS {
        let level = STACK_ROWS - 1 - row;
        let mut spans = Vec::new();
        for (t, tower) in state.towers().iter().enumerate() {
            let bg = if flashing == Some(t) { theme.flash_bg } else { theme.board_bg };
            if let Some(&disk) = tower.get(level) {
                let dw = 2 * disk as usize + 1;
                let pad = (COL_W as usize - dw) / 2;
                let color = disk_color(disk, theme.depth);
                let body = if cfg.show_labels {
                    let half = "=".repeat(disk as usize);
                    if ascii { format!("{half}{disk}{half}") } else { format!("{:^dw$}", disk) }
                } else if ascii {
                    "=".repeat(dw)
                } else {
                    " ".repeat(dw)
                };
                let style = if ascii {
                    Style::default().fg(color).bg(bg).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD)
                };
                spans.push(Span::styled(" ".repeat(pad), Style::default().bg(bg)));
                spans.push(Span::styled(body, style));
                spans.push(Span::styled(" ".repeat(COL_W as usize - pad - dw), Style::default().bg(bg)));
            } else {
                // selection arrow sits on the pole just above the top disk
                let armed = state.selected() == Some(t) && level == tower.len();
                let (glyph, style) = if armed {
                    (arrow, Style::default().fg(theme.arrow_fg).bg(bg).add_modifier(Modifier::BOLD))
                } else {
                    (pole, Style::default().fg(theme.pole_fg).bg(bg))
                };
                let pad = (COL_W as usize - 1) / 2;
                spans.push(Span::styled(" ".repeat(pad), Style::default().bg(bg)));
                spans.push(Span::styled(glyph, style));
                spans.push(Span::styled(" ".repeat(COL_W as usize - pad - 1), Style::default().bg(bg)));
            }
        }
        lines.push(Spans::from(spans));
    }

    let base_w = COL_W as usize - 2;
    let mut base_spans = Vec::new();
    let mut label_spans = Vec::new();
    for t in 0..TOWER_COUNT {
        base_spans.push(Span::raw(" "));
        base_spans.push(Span::styled(base.repeat(base_w), Style::default().fg(theme.pole_fg)));
        base_spans.push(Span::raw(" "));
        let label = format!("{:^w$}", format!(" {} ", t + 1), w = COL_W as usize);
        let style = if ui.cursor == t {
            Style::default().bg(theme.cursor_bg).fg(Color::Black).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        label_spans.push(Span::styled(label, style));
    }
    lines.push(Spans::from(base_spans));
    lines.push(Spans::from(label_spans));
    lines
}

#[allow(clippy::too_many_arguments)]
fn draw_modal<B: Backend>(f: &mut Frame<B>, modal: Modal, ctl: &Controller, cfg: &Config, lang: &Lang, theme: &Theme, ui: &mut UiState, size: Rect) {
    let a = &lang.assets;
    let focus_style = Style::default().bg(theme.menu_key_bg_hover).fg(theme.menu_key_fg_pressed).add_modifier(Modifier::BOLD);
    let mut lines = vec![Spans::from(Span::raw(""))];
    let (title, button): (String, &str) = match modal {
        Modal::Help => {
            for s in [a.help_controls, a.help_click, a.help_keys, a.help_cursor, a.help_cancel, "", a.help_goal] {
                lines.push(Spans::from(Span::raw(s)));
            }
            (a.menu_help.to_string(), a.btn_close)
        }
        Modal::About => {
            lines.push(Spans::from(Span::raw(format!(" {}", a.about_description))));
            lines.push(Spans::from(Span::raw(format!(
                " {}",
                fill(a.about_version_fmt, &[&env!("CARGO_PKG_VERSION"), &env!("CARGO_PKG_AUTHORS")])
            ))));
            (a.menu_about.to_string(), a.btn_close)
        }
        Modal::Records => {
            lines.push(Spans::from(Span::raw(a.rec_header)));
            for disks in 1..=MAX_DISKS {
                let name = format!("{:<12}", fill(a.rec_disks_fmt, &[&disks]));
                let text = match cfg.get_record(disks) {
                    Some(r) => format!("   {} {:>5}  {:>4}  {}", name, r.secs, r.moves, lang.format_date(&r.date)),
                    None => format!("   {} {:>5}", name, a.rec_no_record),
                };
                let style = if disks == ctl.state().disks() { Style::default().add_modifier(Modifier::BOLD) } else { Style::default() };
                lines.push(Spans::from(Span::styled(text, style)));
            }
            (a.menu_records.to_string(), a.btn_close)
        }
        Modal::Disks => {
            lines.push(Spans::from(vec![
                Span::raw(format!(" {} ", a.disks_prompt)),
                Span::styled(format!("{:<3}", ui.disks_input), Style::default().bg(Color::Yellow).fg(Color::Black)),
            ]));
            lines.push(Spans::from(Span::raw("")));
            if ui.disks_error {
                lines.push(Spans::from(Span::styled(
                    format!(" {}", a.disks_error),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )));
            }
            (a.menu_disks.to_string(), a.btn_ok)
        }
        Modal::Options => {
            for (i, item) in OPTION_ITEMS.iter().enumerate() {
                let text = match item {
                    OptionItem::Ascii => format!("[{}] {}", if cfg.ascii_icons { "x" } else { " " }, a.opt_ascii_icons),
                    OptionItem::Labels => format!("[{}] {}", if cfg.show_labels { "x" } else { " " }, a.opt_show_labels),
                    OptionItem::Speed => fill(a.opt_speed_fmt, &[&cfg.solve_interval_ms]),
                    OptionItem::Language => format!("{}: {}", a.opt_language, lang.lang_name()),
                };
                let style = if i == ui.options_focus { focus_style } else { Style::default() };
                lines.push(Spans::from(vec![Span::raw(" "), Span::styled(text, style)]));
            }
            (a.menu_options.to_string(), a.btn_close)
        }
        Modal::Win => {
            let state = ctl.state();
            lines.push(Spans::from(Span::styled(format!(" {}", a.win_message), Style::default().add_modifier(Modifier::BOLD))));
            lines.push(Spans::from(Span::raw(format!(
                " {}",
                fill(a.win_moves_fmt, &[&state.move_count(), &optimal_moves(state.disks())])
            ))));
            if ctl.assisted() {
                lines.push(Spans::from(Span::raw(format!(" {}", a.win_solver))));
            } else {
                lines.push(Spans::from(Span::raw(format!(" {}", fill(a.win_time_fmt, &[&ctl.elapsed().as_secs()])))));
                if ui.new_record {
                    lines.push(Spans::from(Span::styled(format!(" {}", a.win_record), Style::default().fg(Color::Yellow))));
                }
            }
            (a.win_title.to_string(), a.btn_ok)
        }
        Modal::Warning(msg) => {
            lines.push(Spans::from(Span::raw(format!(" {}", msg))));
            (a.warn_title.to_string(), a.btn_ok)
        }
    };

    let content_w = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
    let w = (content_w + 4).max(title.width() as u16 + 6).max(40).min(size.width);
    let h = (lines.len() as u16 + 4).min(size.height);
    let mrect = center_rect(w, h, size);
    ui.modal_rect = Some(mrect);
    f.render_widget(Clear, mrect);
    f.render_widget(Block::default().borders(Borders::ALL).title(title), mrect);
    let inner = Rect::new(mrect.x + 1, mrect.y + 1, mrect.width.saturating_sub(2), mrect.height.saturating_sub(2));
    f.render_widget(Paragraph::new(Text::from(lines)), inner);

    let btn_w = button.width() as u16;
    let btn = Rect::new(mrect.x + mrect.width.saturating_sub(btn_w) / 2, mrect.y + mrect.height.saturating_sub(2), btn_w, 1);
    let btn_style = if ui.modal_button_hovered { focus_style } else { Style::default().add_modifier(Modifier::REVERSED) };
    f.render_widget(Paragraph::new(Span::styled(button, btn_style)), btn);
    ui.modal_button_rect = Some(btn);
}

fn contains(r: Rect, col: u16, row: u16) -> bool {
    col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
}

/// Nearest tower column for a screen column inside the board
fn tower_at(board: Rect, col: u16) -> usize {
    let x = col.saturating_sub(board.x + 1) / COL_W;
    (x as usize).min(TOWER_COUNT - 1)
}

fn open_modal(modal: Modal, ctl: &Controller, ui: &mut UiState) {
    if modal == Modal::Disks {
        ui.disks_input = ctl.state().disks().to_string();
        ui.disks_error = false;
    }
    ui.modal = Some(modal);
    ui.modal_button_hovered = false;
}

fn run_action(action: Action, ctl: &mut Controller, ui: &mut UiState) {
    match action {
        Action::Help => open_modal(Modal::Help, ctl, ui),
        Action::Records => open_modal(Modal::Records, ctl, ui),
        Action::Disks => open_modal(Modal::Disks, ctl, ui),
        Action::Options => open_modal(Modal::Options, ctl, ui),
        Action::About => open_modal(Modal::About, ctl, ui),
        Action::New => {
            let disks = ctl.state().disks();
            if let Err(err) = ctl.start_new_game(disks) {
                warn!(%err, "cannot restart game");
            }
            ui.reset_after_new_game();
        }
        Action::Solve => {
            if ctl.request_solve() {
                ui.next_step = Some(Instant::now());
            }
        }
        Action::Exit => ui.exit_requested = true,
    }
}

fn click_tower(tower: usize, ctl: &mut Controller, cfg: &mut Config, lang: &Lang, ui: &mut UiState) {
    ui.cursor = tower;
    match ctl.select_or_move(tower) {
        Ok(ClickOutcome::Moved(moved)) if moved.just_solved => on_solved(ctl, cfg, ui),
        Ok(_) => {}
        Err(HanoiError::IllegalMove { from, reason, .. }) => {
            ui.flash_tower = Some((tower, Instant::now()));
            let msg = match reason {
                MoveRejection::EmptySource => lang.assets.warn_empty,
                _ => lang.assets.warn_larger,
            };
            info!(from, tower, %reason, "illegal move attempted");
            ui.modal = Some(Modal::Warning(msg));
        }
        Err(err) => warn!(%err, "unexpected click error"),
    }
}

fn on_solved(ctl: &Controller, cfg: &mut Config, ui: &mut UiState) {
    ui.new_record = false;
    if !ctl.assisted() {
        let state = ctl.state();
        if cfg.set_record(state.disks(), ctl.elapsed().as_secs(), state.move_count()) {
            ui.new_record = true;
            save_config(cfg);
        }
    }
    ui.modal = Some(Modal::Win);
}

fn apply_disks_input(ctl: &mut Controller, cfg: &mut Config, ui: &mut UiState) {
    let n = ui.disks_input.trim().parse::<usize>().unwrap_or(0);
    match ctl.start_new_game(n) {
        Ok(()) => {
            cfg.disks = n;
            save_config(cfg);
            ui.reset_after_new_game();
        }
        Err(err) => {
            info!(%err, "disk count rejected");
            ui.disks_error = true;
        }
    }
}

fn change_option(item: OptionItem, delta: i64, cfg: &mut Config, lang: &mut Lang) {
    match item {
        OptionItem::Ascii => cfg.ascii_icons = !cfg.ascii_icons,
        OptionItem::Labels => cfg.show_labels = !cfg.show_labels,
        OptionItem::Speed => {
            let step = if delta < 0 { -(SPEED_STEP_MS as i64) } else { SPEED_STEP_MS as i64 };
            let v = (cfg.solve_interval_ms as i64 + step).clamp(MIN_SOLVE_INTERVAL_MS as i64, MAX_SOLVE_INTERVAL_MS as i64);
            cfg.solve_interval_ms = v as u64;
        }
        OptionItem::Language => {
            lang.switch_to(lang.next_code());
            cfg.language = lang.current_lang.clone();
        }
    }
    save_config(cfg);
}

fn close_modal(ctl: &mut Controller, cfg: &mut Config, ui: &mut UiState) {
    if ui.modal == Some(Modal::Disks) {
        apply_disks_input(ctl, cfg, ui);
    } else {
        ui.modal = None;
    }
}

fn handle_key(code: KeyCode, ctl: &mut Controller, cfg: &mut Config, lang: &mut Lang, ui: &mut UiState) {
    if let Some(modal) = ui.modal {
        match (modal, code) {
            (_, KeyCode::Esc) => ui.modal = None,
            (Modal::Disks, KeyCode::Char(c)) if c.is_ascii_digit() => {
                if ui.disks_input.len() < 2 {
                    ui.disks_input.push(c);
                }
                ui.disks_error = false;
            }
            (Modal::Disks, KeyCode::Backspace) => {
                ui.disks_input.pop();
                ui.disks_error = false;
            }
            (Modal::Disks, KeyCode::Enter) => apply_disks_input(ctl, cfg, ui),
            (Modal::Options, KeyCode::Up) => ui.options_focus = ui.options_focus.saturating_sub(1),
            (Modal::Options, KeyCode::Down | KeyCode::Tab) => {
                ui.options_focus = (ui.options_focus + 1) % OPTION_ITEMS.len();
            }
            (Modal::Options, KeyCode::Char(' ') | KeyCode::Right | KeyCode::Char('+')) => {
                change_option(OPTION_ITEMS[ui.options_focus], 1, cfg, lang);
            }
            (Modal::Options, KeyCode::Left | KeyCode::Char('-')) => {
                change_option(OPTION_ITEMS[ui.options_focus], -1, cfg, lang);
            }
            (Modal::Options, KeyCode::Enter) => ui.modal = None,
            (_, KeyCode::Enter | KeyCode::Char(' ')) => ui.modal = None,
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::F(1) => run_action(Action::Help, ctl, ui),
        KeyCode::F(2) => run_action(Action::New, ctl, ui),
        KeyCode::F(3) | KeyCode::Char('s') => run_action(Action::Solve, ctl, ui),
        KeyCode::F(4) => run_action(Action::Records, ctl, ui),
        KeyCode::F(5) => run_action(Action::Disks, ctl, ui),
        KeyCode::F(7) => run_action(Action::Options, ctl, ui),
        KeyCode::F(9) => run_action(Action::About, ctl, ui),
        KeyCode::Esc | KeyCode::Char('q') => run_action(Action::Exit, ctl, ui),
        KeyCode::Char(c @ '1'..='3') => click_tower(c as usize - '1' as usize, ctl, cfg, lang, ui),
        KeyCode::Left => ui.cursor = ui.cursor.saturating_sub(1),
        KeyCode::Right => ui.cursor = (ui.cursor + 1).min(TOWER_COUNT - 1),
        KeyCode::Char(' ') | KeyCode::Enter => click_tower(ui.cursor, ctl, cfg, lang, ui),
        KeyCode::Backspace | KeyCode::Delete => ctl.deselect(),
        _ => {}
    }
}

fn handle_mouse(me: MouseEvent, ctl: &mut Controller, cfg: &mut Config, lang: &mut Lang, ui: &mut UiState) {
    let (col, row) = (me.column, me.row);

    // a modal captures the mouse: only its button and option rows react
    if let Some(mrect) = ui.modal_rect {
        let on_button = ui.modal_button_rect.is_some_and(|b| contains(b, col, row));
        match me.kind {
            MouseEventKind::Moved => {
                ui.modal_button_hovered = on_button;
                if ui.modal == Some(Modal::Options) && contains(mrect, col, row) {
                    let local = row.saturating_sub(mrect.y + 2) as usize;
                    if row >= mrect.y + 2 && local < OPTION_ITEMS.len() {
                        ui.options_focus = local;
                    }
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if on_button {
                    close_modal(ctl, cfg, ui);
                } else if ui.modal == Some(Modal::Options) && row >= mrect.y + 2 {
                    let local = (row - mrect.y - 2) as usize;
                    if local < OPTION_ITEMS.len() && contains(mrect, col, row) {
                        ui.options_focus = local;
                        change_option(OPTION_ITEMS[local], 1, cfg, lang);
                    }
                }
            }
            _ => {}
        }
        return;
    }

    match me.kind {
        MouseEventKind::Moved => {
            ui.hover_index = None;
            if ui.menu_rect.is_some_and(|r| contains(r, col, row)) {
                ui.hover_index = ui.menu_hits.iter().position(|(x0, x1, _)| col >= *x0 && col <= *x1);
            } else if ui.status_rect.is_some_and(|r| contains(r, col, row)) {
                if ui.status_exit.is_some_and(|(x0, x1)| col >= x0 && col <= x1) {
                    ui.hover_index = Some(MENU_ITEMS.len());
                }
            } else if let Some(board) = ui.board_rect.filter(|r| contains(*r, col, row)) {
                ui.cursor = tower_at(board, col);
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if ui.menu_rect.is_some_and(|r| contains(r, col, row)) {
                if let Some(i) = ui.menu_hits.iter().position(|(x0, x1, _)| col >= *x0 && col <= *x1) {
                    ui.clicked_index = Some(i);
                    ui.click_instant = Some(Instant::now());
                    let action = ui.menu_hits[i].2;
                    run_action(action, ctl, ui);
                }
            } else if ui.status_rect.is_some_and(|r| contains(r, col, row)) {
                if ui.status_exit.is_some_and(|(x0, x1)| col >= x0 && col <= x1) {
                    run_action(Action::Exit, ctl, ui);
                }
            } else if let Some(board) = ui.board_rect.filter(|r| contains(*r, col, row)) {
                click_tower(tower_at(board, col), ctl, cfg, lang, ui);
            }
        }
        MouseEventKind::Down(MouseButton::Right) => ctl.deselect(),
        _ => {}
    }
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_columns_map_to_towers() {
        let board = Rect::new(10, 5, BOARD_W, BOARD_H);
        assert_eq!(tower_at(board, 11), 0);
        assert_eq!(tower_at(board, 11 + COL_W - 1), 0);
        assert_eq!(tower_at(board, 11 + COL_W), 1);
        assert_eq!(tower_at(board, 11 + 2 * COL_W + 3), 2);
        assert_eq!(tower_at(board, 10 + BOARD_W - 1), 2);
        assert_eq!(tower_at(board, 0), 0);
    }

    #[test]
    fn widest_disk_fits_its_column() {
        assert!(2 * MAX_DISKS as u16 + 1 <= COL_W);
    }

    #[test]
    fn center_rect_stays_inside() {
        let area = Rect::new(0, 0, 20, 10);
        let r = center_rect(30, 4, area);
        assert_eq!((r.x, r.width), (0, 20));
        assert_eq!((r.y, r.height), (3, 4));
    }
}
