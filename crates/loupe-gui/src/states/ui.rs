use std::path::PathBuf;

/// Overall UI state.
pub struct UIState {
    pub file_path: Option<PathBuf>,
    pub image_size: Option<[usize; 2]>,

    /// Second native window with the linked original view.
    pub show_original: bool,

    /// Review toggles mirrored into both surfaces.
    pub auto_center: bool,
    pub single_face: bool,
    pub show_annotations: bool,

    /// Log messages.
    pub log_messages: Vec<String>,
}

impl Default for UIState {
    fn default() -> Self {
        Self {
            file_path: None,
            image_size: None,
            show_original: false,
            auto_center: true,
            single_face: false,
            show_annotations: true,
            log_messages: Vec::new(),
        }
    }
}

impl UIState {
    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }
}
