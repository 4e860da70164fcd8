/// Keys the viewer understands when keyboard navigation is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Left,
    Right,
    Home,
    End,
}

impl NavKey {
    /// Map a DOM-style key name, e.g. `ArrowLeft`.
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name.trim() {
            "ArrowLeft" | "Left" => Some(NavKey::Left),
            "ArrowRight" | "Right" => Some(NavKey::Right),
            "Home" => Some(NavKey::Home),
            "End" => Some(NavKey::End),
            _ => None,
        }
    }
}

/// Inputs to the viewer.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    ContentChanged(Option<String>),
    NextPage,
    PreviousPage,
    SelectPage(usize),
    FadeOutElapsed { generation: u64 },
    FadeInElapsed { generation: u64 },
    KeyPressed(NavKey),
}
