//! Application state types and entry glue.
//!
//! Defines the structs and enums that model the screen state, plus helpers
//! to construct defaults and to run the application loop (re-exported as
//! `run`).

pub mod keymap;
pub mod update;

use ratatui::style::Color;
use std::time::{Duration, Instant};

use crate::api::User;
use crate::cache::QueryCache;
use keymap::Keymap;

/// Where keystrokes go.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Table navigation and action keys.
    Normal,
    /// Form keys edit the selected row inline.
    EditRow,
    /// Form keys edit the add panel.
    AddForm,
    /// Help overlay is open; any key closes it.
    Help,
}

/// Lifecycle of the user collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// Initial fetch has not completed yet.
    Loading,
    /// At least one fetch has succeeded; `users` holds the last one.
    Ready,
    /// The initial fetch failed and there is nothing to show.
    Failed(String),
}

/// Field of the add/edit form currently receiving keystrokes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Id,
    Name,
    Email,
}

/// The single form backing both the add panel and the inline row editor.
/// Cleared after a successful submission and on edit cancel, never on open.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    pub id: String,
    pub name: String,
    pub email: String,
    pub focus: FormField,
}

impl FormState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Load a record into the form for editing. Focus starts on the name,
    /// since the id is displayed but not editable.
    pub fn fill_from(&mut self, user: &User) {
        self.id = user.id.clone();
        self.name = user.name.clone();
        self.email = user.email.clone();
        self.focus = FormField::Name;
    }

    /// All three fields non-empty. Deliberately permissive: any non-empty
    /// string counts, whitespace included.
    pub fn is_complete(&self) -> bool {
        !self.id.is_empty() && !self.name.is_empty() && !self.email.is_empty()
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Id => &mut self.id,
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
        }
    }

    pub fn focused_mut(&mut self) -> &mut String {
        self.field_mut(self.focus)
    }

    /// Advance focus to the next field. With `id_locked` (row editing) the
    /// cycle skips the id.
    pub fn focus_next(&mut self, id_locked: bool) {
        self.focus = match (self.focus, id_locked) {
            (FormField::Id, _) => FormField::Name,
            (FormField::Name, _) => FormField::Email,
            (FormField::Email, true) => FormField::Name,
            (FormField::Email, false) => FormField::Id,
        };
    }

    pub fn focus_prev(&mut self, id_locked: bool) {
        self.focus = match (self.focus, id_locked) {
            (FormField::Id, _) => FormField::Email,
            (FormField::Name, true) => FormField::Email,
            (FormField::Name, false) => FormField::Id,
            (FormField::Email, _) => FormField::Name,
        };
    }

    pub fn as_user(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Transient notification rendered over the bottom-right corner.
#[derive(Clone, Debug)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
            shown_at: Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
            shown_at: Instant::now(),
        }
    }

    pub fn expired(&self) -> bool {
        self.shown_at.elapsed() >= TOAST_TTL
    }
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    /// Dark default theme.
    #[allow(dead_code)]
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            success: Color::Green,
            error: Color::Red,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            success: Color::Rgb(0xa6, 0xe3, 0xa1),      // green
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall
    /// back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "muted" => theme.muted = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "success" => theme.success = color,
                    "error" => theme.error = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or the special name
    /// "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // Named colors get a best-effort hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::White => "#FFFFFF".to_string(),
                other => format!("{:?}", other),
            }
        }

        let mut buf = String::new();
        buf.push_str("# usertable theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");
        for (key, color) in [
            ("text", self.text),
            ("muted", self.muted),
            ("title", self.title),
            ("border", self.border),
            ("header_bg", self.header_bg),
            ("header_fg", self.header_fg),
            ("status_bg", self.status_bg),
            ("status_fg", self.status_fg),
            ("highlight_fg", self.highlight_fg),
            ("highlight_bg", self.highlight_bg),
            ("success", self.success),
            ("error", self.error),
        ] {
            let _ = writeln!(&mut buf, "{} = {}", key, color_to_str(color));
        }

        std::fs::write(path, buf)
    }

    /// Ensure a config file exists; if missing, write one with the default
    /// theme and return it. If present, load from it; on parse errors,
    /// return `mocha`.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let theme = Self::mocha();
        let _ = theme.write_file(path);
        theme
    }
}

pub struct AppState {
    pub started_at: Instant,
    /// Base URL the client was pointed at, shown in the header.
    pub api_url: String,
    /// The last successfully fetched collection, in server order.
    pub users: Vec<User>,
    pub load: LoadState,
    pub cache: QueryCache<Vec<User>>,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub form: FormState,
    /// Id of the row currently rendered as inputs, if any.
    pub editing_id: Option<String>,
    /// Whether the add panel is open. Independent of `editing_id`; both may
    /// be active at once.
    pub adding: bool,
    pub toast: Option<Toast>,
    pub theme: Theme,
    pub keymap: Keymap,
}

impl AppState {
    /// Fresh screen state pointed at `api_url`. Nothing is fetched here;
    /// the event loop performs the initial load.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            started_at: Instant::now(),
            api_url: api_url.into(),
            users: Vec::new(),
            load: LoadState::Loading,
            cache: QueryCache::new(),
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            form: FormState::default(),
            editing_id: None,
            adding: false,
            toast: None,
            theme: Theme::load_or_init("theme.conf"),
            keymap: Keymap::load_or_init("keybinds.conf"),
        }
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.users.get(self.selected_index)
    }

    pub fn toast_success(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::success(message));
    }

    pub fn toast_error(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::error(message));
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
