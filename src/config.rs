/// Tunables for one puzzle page. Constructed once by the app and handed to the
/// state machine and the persistence layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PuzzleConfig {
    /// Timer period; each tick adds this much to the elapsed time.
    pub tick_interval_ms: u32,
    /// localStorage key holding the JSON score list.
    pub score_key: &'static str,
    /// Upper bound for the board's side length.
    pub max_board_px: u32,
    /// Horizontal space kept free around the board on narrow screens.
    pub board_gutter_px: u32,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            score_key: "score",
            max_board_px: 512,
            board_gutter_px: 50,
        }
    }
}

impl PuzzleConfig {
    /// Board side length for a given window width.
    pub fn board_px(&self, window_width: f64) -> u32 {
        let width = window_width.max(0.0) as u32;
        if width < self.max_board_px {
            width.saturating_sub(self.board_gutter_px)
        } else {
            self.max_board_px
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_shrinks_on_narrow_windows() {
        let cfg = PuzzleConfig::default();
        assert_eq!(cfg.board_px(1920.0), 512);
        assert_eq!(cfg.board_px(512.0), 512);
        assert_eq!(cfg.board_px(400.0), 350);
        assert_eq!(cfg.board_px(20.0), 0);
    }
}
