//! Application state: tabs, input, scrolling and the pitch session.

use std::sync::Arc;

use ratatui::widgets::ScrollbarState;
use tracing::{info, warn};

use crate::config::Config;
use crate::pitch::{HttpPitchClient, PitchBackend, PitchPhase, PitchSession, SubmitOutcome};
use crate::profile::Profile;
use crate::theme::ThemeProvider;

/// Subject line used for the contact mail.
const CONTACT_SUBJECT: &str = "Hello from your portfolio";

/// Portfolio sections, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    About,
    Skills,
    Experience,
    Education,
    Projects,
    Pitch,
}

impl Section {
    /// Returns all sections in display order.
    pub const fn all() -> &'static [Section] {
        &[
            Section::About,
            Section::Skills,
            Section::Experience,
            Section::Education,
            Section::Projects,
            Section::Pitch,
        ]
    }

    /// Returns the tab label for this section.
    pub const fn title(&self) -> &'static str {
        match self {
            Section::About => "About",
            Section::Skills => "Skills",
            Section::Experience => "Experience",
            Section::Education => "Education",
            Section::Projects => "Projects",
            Section::Pitch => "Pitch",
        }
    }

    /// Position of this section in [`Section::all`].
    pub fn index(&self) -> usize {
        Self::all().iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> Self {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}

/// Text input for the business problem.
///
/// The cursor is a character index, so multi-byte input is safe to edit.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current input text
    pub text: String,
    /// Cursor position in characters
    pub cursor: usize,
}

impl InputState {
    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Handle a character input.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Handle backspace key.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.text.remove(at);
            self.cursor -= 1;
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.text.chars().count() {
            self.cursor += 1;
        }
    }

    /// Text before and after the cursor.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.text.split_at(self.byte_index(self.cursor))
    }

    /// Clear input and reset cursor.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

/// Scroll-related state for the content pane.
#[derive(Debug, Default)]
pub struct ScrollState {
    /// Current scroll offset in lines
    pub offset: usize,
    /// Largest useful offset, updated on every draw
    pub max: usize,
    /// Keep the view pinned to the bottom while content grows
    pub follow: bool,
    /// Scrollbar state for ratatui
    pub scrollbar: ScrollbarState,
}

impl ScrollState {
    /// Scroll up one line.
    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
        self.follow = false;
    }

    /// Scroll down one line.
    pub fn scroll_down(&mut self) {
        if self.offset < self.max {
            self.offset += 1;
        }
    }

    /// Scroll up by page size.
    pub fn scroll_page_up(&mut self, page_size: usize) {
        self.offset = self.offset.saturating_sub(page_size);
        self.follow = false;
    }

    /// Scroll down by page size.
    pub fn scroll_page_down(&mut self, page_size: usize) {
        self.offset = (self.offset + page_size).min(self.max);
    }

    /// Scroll to top.
    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
        self.follow = false;
    }

    /// Scroll to bottom and keep following new content.
    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max;
        self.follow = true;
    }

    /// Reset when the content is replaced.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.max = 0;
        self.follow = false;
    }

    /// Update bounds and scrollbar for content of `total_lines` in a
    /// viewport of `viewport` lines.
    pub fn update(&mut self, total_lines: usize, viewport: usize) {
        self.max = total_lines.saturating_sub(viewport);
        if self.follow || self.offset > self.max {
            self.offset = self.max;
        }
        self.scrollbar = self.scrollbar.content_length(self.max);
        self.scrollbar = self.scrollbar.position(self.offset);
    }
}

/// Application state for the portfolio.
pub struct App {
    /// Active tab
    pub section: Section,
    /// Scroll state of the content pane
    pub scroll: ScrollState,
    /// Business problem input on the Pitch tab
    pub input: InputState,
    /// Cursor blink visibility state
    pub cursor_visible: bool,
    /// Pitch generation state
    pub pitch: PitchSession,
    /// Owner of the active theme
    pub theme: ThemeProvider,
    /// Portfolio content
    pub profile: Profile,
    /// Highlighted project on the Projects tab
    pub selected_project: usize,
    /// One-line status notice shown in the footer
    pub notice: Option<String>,
}

impl App {
    /// Create the app with the HTTP pitch backend from config.
    pub fn new(config: &Config, profile: Profile) -> Self {
        let pitch_config = config.pitch.clone().with_env_overrides();
        let backend: Arc<dyn PitchBackend> = Arc::new(HttpPitchClient::new(&pitch_config));
        Self::with_backend(config, profile, backend)
    }

    /// Create the app with a specific pitch backend.
    pub fn with_backend(config: &Config, profile: Profile, backend: Arc<dyn PitchBackend>) -> Self {
        Self {
            section: Section::default(),
            scroll: ScrollState::default(),
            input: InputState::default(),
            cursor_visible: true,
            pitch: PitchSession::new(backend, config.behavior.single_flight),
            theme: ThemeProvider::new(&config.theme),
            profile,
            selected_project: 0,
            notice: None,
        }
    }

    /// Switch to a section, resetting the scroll position.
    pub fn select_section(&mut self, section: Section) {
        if self.section != section {
            self.section = section;
            self.scroll.reset();
            self.scroll.follow = section == Section::Pitch;
        }
    }

    pub fn next_section(&mut self) {
        self.select_section(self.section.next());
    }

    pub fn previous_section(&mut self) {
        self.select_section(self.section.previous());
    }

    /// Toggle cursor visibility for blinking effect.
    pub fn toggle_cursor(&mut self) {
        self.cursor_visible = !self.cursor_visible;
    }

    /// Toggle between dark and light themes.
    pub fn toggle_theme(&mut self) {
        let mode = self.theme.toggle();
        self.notice = Some(format!("Switched to {} theme", mode.label()));
    }

    /// Submit the current input as a business problem.
    pub fn submit_pitch(&mut self) {
        match self.pitch.submit(&self.input.text) {
            SubmitOutcome::Started | SubmitOutcome::Restarted => {
                self.input.clear();
                self.notice = None;
                self.scroll.reset();
                self.scroll.follow = true;
            }
            SubmitOutcome::Busy => {
                self.notice = Some("A pitch is already being generated".to_string());
            }
            SubmitOutcome::Ignored => {}
        }
    }

    /// Cancel the running pitch, if any.
    pub fn cancel_pitch(&mut self) {
        if self.pitch.cancel() {
            self.notice = Some("Pitch generation cancelled".to_string());
        }
    }

    /// Dismiss the inline pitch error.
    pub fn dismiss_error(&mut self) -> bool {
        self.pitch.dismiss_error()
    }

    /// Process streaming events. Call this in the event loop.
    pub fn process_stream(&mut self) -> bool {
        let changed = self.pitch.process_events();
        if changed && matches!(self.pitch.phase(), PitchPhase::Completed) {
            self.notice = Some("Pitch ready".to_string());
        }
        changed
    }

    /// Check if a pitch is being generated.
    pub fn is_streaming(&self) -> bool {
        self.pitch.is_in_flight()
    }

    pub fn select_next_project(&mut self) {
        let count = self.profile.projects.len();
        if count > 0 {
            self.selected_project = (self.selected_project + 1) % count;
        }
    }

    pub fn select_previous_project(&mut self) {
        let count = self.profile.projects.len();
        if count > 0 {
            self.selected_project = (self.selected_project + count - 1) % count;
        }
    }

    /// Link of the highlighted project, if it has one.
    pub fn selected_project_link(&self) -> Option<&str> {
        self.profile
            .projects
            .get(self.selected_project)
            .and_then(|p| p.link.as_deref())
    }

    /// Open the highlighted project's link in the browser.
    pub fn open_selected_project(&mut self) {
        let Some(link) = self.selected_project_link().map(str::to_string) else {
            self.notice = Some("This project has no link".to_string());
            return;
        };
        self.open_url(&link);
    }

    /// Open a mail to the profile owner.
    pub fn open_contact(&mut self) {
        match self.profile.contact_url(CONTACT_SUBJECT) {
            Some(url) => self.open_url(&url),
            None => self.notice = Some("No contact address configured".to_string()),
        }
    }

    fn open_url(&mut self, url: &str) {
        match open::that(url) {
            Ok(()) => {
                info!(url, "opened link");
                self.notice = Some(format!("Opened {}", url));
            }
            Err(e) => {
                warn!(url, error = %e, "failed to open link");
                self.notice = Some(format!("Could not open {}: {}", url, e));
            }
        }
    }
}
