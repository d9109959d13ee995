//! Application model types: `App` and `InputMode`.

/// What keystrokes are currently feeding.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a file or directory path to add.
    AddPath,
}

/// The terminal view model.
#[derive(Debug, Default)]
pub struct App {
    /// Highlighted row in the track list.
    pub selected: usize,
    pub mode: InputMode,
    /// Text typed into the path prompt.
    pub input: String,
    /// One-line message shown above the controls, e.g. a rejected batch.
    pub notice: Option<String>,
    /// Move the highlight along with the playing track.
    pub follow_playback: bool,
    pending_g: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            follow_playback: true,
            ..Self::default()
        }
    }

    /// Keep `selected` inside a list of `len` rows.
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Move the highlight down, wrapping to the top.
    pub fn next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.follow_playback = false;
        self.selected = (self.selected + 1) % len;
    }

    /// Move the highlight up, wrapping to the bottom.
    pub fn prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.follow_playback = false;
        self.selected = if self.selected == 0 {
            len - 1
        } else {
            self.selected - 1
        };
    }

    pub fn select_first(&mut self) {
        self.follow_playback = false;
        self.selected = 0;
    }

    pub fn select_last(&mut self, len: usize) {
        self.follow_playback = false;
        self.selected = len.saturating_sub(1);
    }

    /// Highlight the playing row if following playback.
    pub fn follow(&mut self, cursor: Option<usize>) {
        if let (true, Some(c)) = (self.follow_playback, cursor) {
            self.selected = c;
        }
    }

    /// Feed a `g` press. Returns true when it completes a `gg`.
    pub fn press_g(&mut self) -> bool {
        let complete = self.pending_g;
        self.pending_g = !complete;
        complete
    }

    /// Forget a half-typed `gg`.
    pub fn reset_prefix(&mut self) {
        self.pending_g = false;
    }

    pub fn enter_add_mode(&mut self) {
        self.mode = InputMode::AddPath;
        self.input.clear();
        self.reset_prefix();
    }

    pub fn cancel_input(&mut self) {
        self.mode = InputMode::Normal;
        self.input.clear();
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// Leave the prompt, returning what was typed.
    pub fn take_input(&mut self) -> String {
        self.mode = InputMode::Normal;
        std::mem::take(&mut self.input)
    }

    pub fn set_notice(&mut self, msg: impl Into<String>) {
        self.notice = Some(msg.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}
