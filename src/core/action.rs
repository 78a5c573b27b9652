//! # Actions
//!
//! Everything the user can ask the browser to do becomes an `Action`.
//! User presses `j`? That's `Action::Down`. Enter on a directory? `Action::Select`.
//!
//! The terminal adapter decodes raw key events into actions; the interaction
//! loop applies them. Nothing here touches the terminal.
//!
//! ```text
//! key event  →  decode_key()  →  Action  →  Browser::apply()
//! ```

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Up,
    Down,
    /// Expand the node under the cursor, or collapse it if already expanded.
    Select,
    /// Anything the loop does not act on. Never triggers a redraw.
    Unknown,
}

impl Action {
    pub fn is_recognized(self) -> bool {
        self != Action::Unknown
    }
}
