//! Application event loop for the terminal UI

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::api::HttpChatApi;
use crate::chat::{ChatManager, Notice, NoticeLevel};
use crate::config::Config;
use crate::error::ChatError;
use crate::ui::{Composer, HistoryView, Sidebar, TriageOverlay};
use crate::ui::composer::ComposerResult;

/// Which pane receives keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Sidebar,
    Composer,
}

/// Launch the terminal UI. Restores the terminal on exit, including the
/// error path.
pub async fn run(manager: ChatManager<HttpChatApi>, config: Config) -> Result<()> {
    let mut app = ChatApp::new(manager, config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run_loop(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Top-level UI state
pub struct ChatApp {
    manager: ChatManager<HttpChatApi>,
    config: Config,
    composer: Composer,
    focus: Focus,
    show_triage: bool,
    active_notice: Option<(Notice, Instant)>,
    should_quit: bool,
}

impl ChatApp {
    pub fn new(manager: ChatManager<HttpChatApi>, config: Config) -> Self {
        Self {
            manager,
            config,
            composer: Composer::new("Describe your symptoms or ask a question..."),
            focus: Focus::Sidebar,
            show_triage: false,
            active_notice: None,
            should_quit: false,
        }
    }

    async fn run_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        // One-time startup fetch
        self.manager.refresh().await;
        self.collect_notices();

        while !self.should_quit {
            self.expire_notice();
            self.composer.set_enabled(!self.manager.is_busy());
            self.composer.set_focus(self.focus == Focus::Composer);

            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key).await?;
                    self.collect_notices();
                }
            }
        }

        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.size();

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(20)])
            .split(area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // History
                Constraint::Length(3), // Composer
                Constraint::Length(1), // Status line
            ])
            .split(columns[1]);

        frame.render_widget(
            Sidebar::new(
                self.manager.store().conversations(),
                self.manager.store().selected_id(),
                self.focus == Focus::Sidebar,
            ),
            columns[0],
        );
        frame.render_widget(HistoryView::new(self.manager.current()), rows[0]);
        frame.render_widget(self.composer.clone(), rows[1]);
        frame.render_widget(self.status_line(), rows[2]);

        if self.show_triage {
            if let Some(conversation) = self.manager.current() {
                frame.render_widget(TriageOverlay::new(conversation), area);
            }
        }
    }

    fn status_line(&self) -> Paragraph<'_> {
        let line = if let Some((notice, _)) = &self.active_notice {
            let style = match notice.level {
                NoticeLevel::Info => Style::default().fg(Color::Green),
                NoticeLevel::Error => Style::default().fg(Color::Red),
            };
            Line::from(vec![Span::styled(
                format!(" {}: {}", notice.title, notice.detail),
                style,
            )])
        } else {
            Line::from(vec![Span::styled(
                " Tab: switch pane  Ctrl+N: new  Ctrl+T: triage  Ctrl+R: refresh  Esc: quit",
                Style::default().fg(Color::DarkGray),
            )])
        };
        Paragraph::new(line)
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        // Overlay swallows everything except its own dismissal.
        if self.show_triage {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q'))
                || (key.code == KeyCode::Char('t') && key.modifiers.contains(KeyModifiers::CONTROL))
            {
                self.show_triage = false;
            }
            return Ok(());
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => {
                    self.should_quit = true;
                    return Ok(());
                }
                KeyCode::Char('n') => {
                    match self.manager.create_conversation().await {
                        Ok(Some(_)) => self.focus = Focus::Composer,
                        Ok(None) => {}
                        Err(ChatError::Busy) => {}
                        Err(e) => return Err(e.into()),
                    }
                    return Ok(());
                }
                KeyCode::Char('t') => {
                    if self.manager.current().is_some() {
                        self.show_triage = true;
                    }
                    return Ok(());
                }
                KeyCode::Char('r') => {
                    self.manager.refresh().await;
                    return Ok(());
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Sidebar => Focus::Composer,
                    Focus::Composer => Focus::Sidebar,
                };
            }
            _ => match self.focus {
                Focus::Sidebar => self.handle_sidebar_key(key),
                Focus::Composer => self.handle_composer_key(key).await?,
            },
        }

        Ok(())
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Enter => {
                if self.manager.current().is_some() {
                    self.focus = Focus::Composer;
                }
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    async fn handle_composer_key(&mut self, key: KeyEvent) -> Result<()> {
        if let ComposerResult::Submitted(text) = self.composer.handle_key(key) {
            let Some(chat_id) = self.manager.store().selected_id().map(str::to_string) else {
                return Ok(());
            };
            match self.manager.send_message(&text, &chat_id).await {
                Ok(()) | Err(ChatError::Busy) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Move the sidebar selection by `delta`, clamped to the list.
    fn move_selection(&mut self, delta: isize) {
        let conversations = self.manager.store().conversations();
        if conversations.is_empty() {
            return;
        }

        let current = self
            .manager
            .store()
            .selected_id()
            .and_then(|id| conversations.iter().position(|c| c.id == id));

        let next = match current {
            Some(index) => {
                let len = conversations.len() as isize;
                (index as isize + delta).clamp(0, len - 1) as usize
            }
            None => 0,
        };

        let id = conversations[next].id.clone();
        self.manager.select(id);
    }

    fn collect_notices(&mut self) {
        if let Some(notice) = self.manager.take_notice() {
            self.active_notice = Some((notice, Instant::now()));
        }
    }

    fn expire_notice(&mut self) {
        let lifetime = Duration::from_secs(self.config.ui.notice_seconds);
        if let Some((_, shown_at)) = &self.active_notice {
            if shown_at.elapsed() > lifetime {
                self.active_notice = None;
            }
        }
    }
}
