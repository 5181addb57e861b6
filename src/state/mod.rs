pub mod board;
pub mod effects;
pub mod pointer;
pub mod scores;
pub mod timer;

pub use board::{BoardPosition, Piece};
pub use effects::EffectCursor;
pub use pointer::PointerState;
pub use scores::{BrowserStore, ScoreBook};
pub use timer::Ticker;
