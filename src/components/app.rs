use super::{
    board_view::BoardView, objective_panel::ObjectivePanel, result_overlay::ResultOverlay,
    score_panel::ScorePanel, status_panel::StatusPanel,
};
use crate::config::PuzzleConfig;
use crate::model::{Effect, Move, PuzzleEvent, PuzzleState};
use crate::state::{BrowserStore, EffectCursor, ScoreBook, Ticker};
use crate::util::{clog, cwarn, format_time};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use yew::prelude::*;

fn read_window_width() -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0)
}

#[hook]
fn use_window_width() -> f64 {
    let width = use_state(read_window_width);
    {
        let width = width.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window();
            let resize_cb = Closure::wrap(Box::new(move |_e: web_sys::Event| {
                width.set(read_window_width());
            }) as Box<dyn FnMut(_)>);
            if let Some(win) = &window {
                win.add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
                    .ok();
            }
            move || {
                if let Some(win) = &window {
                    let _ = win.remove_event_listener_with_callback(
                        "resize",
                        resize_cb.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    }
    *width
}

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| PuzzleConfig::default());
    let puzzle = use_reducer({
        let config = config.clone();
        move || PuzzleState::new(&config)
    });
    let store = use_memo((), |_| BrowserStore::open());
    let scores = use_state({
        let store = store.clone();
        let key = config.score_key;
        move || ScoreBook::load(&*store, key)
    });
    let ticker = use_mut_ref(Ticker::default);
    let cursor = use_mut_ref(EffectCursor::default);
    let window_width = use_window_width();

    // Execute effects queued by the reducer, each exactly once.
    {
        let puzzle = puzzle.clone();
        let config = config.clone();
        let store = store.clone();
        let scores = scores.clone();
        let ticker = ticker.clone();
        let cursor = cursor.clone();
        use_effect_with(puzzle.version, move |_| {
            let pending = cursor.borrow_mut().take_pending(&puzzle);
            for effect in pending {
                match effect {
                    Effect::StartTimer => {
                        let dispatcher = puzzle.dispatcher();
                        let started = ticker
                            .borrow_mut()
                            .start(puzzle.config.tick_interval_ms, move || dispatcher.dispatch(PuzzleEvent::Tick));
                        if let Err(e) = started {
                            cwarn(&format!("timer not started: {e}"));
                        }
                    }
                    Effect::StopTimer => ticker.borrow_mut().stop(),
                    Effect::RecordOutcome(outcome) => {
                        clog(&format!(
                            "game over: won={} time={} squares={}",
                            outcome.won,
                            format_time(outcome.time),
                            outcome.squares_reached
                        ));
                        let mut book = (*scores).clone();
                        if let Err(e) = book.append(outcome, &*store, config.score_key) {
                            cwarn(&format!("score not saved: {e}"));
                        }
                        scores.set(book);
                    }
                }
            }
            || ()
        });
    }

    let on_move = {
        let puzzle = puzzle.clone();
        Callback::from(move |mv: Move| puzzle.dispatch(PuzzleEvent::Move(mv)))
    };
    let on_retry = {
        let puzzle = puzzle.clone();
        Callback::from(move |_: ()| puzzle.dispatch(PuzzleEvent::Reset))
    };

    let board_px = config.board_px(window_width);
    html! {
        <div style="text-align:center; font-family:sans-serif; position:relative;">
            <ObjectivePanel />
            <div style={format!("position:relative; width:{board_px}px; margin:0 auto;")}>
                <BoardView
                    position={puzzle.board}
                    markers={puzzle.markers()}
                    movable={puzzle.accepts_moves()}
                    size_px={board_px}
                    on_move={on_move}
                />
                <ResultOverlay
                    phase={puzzle.phase}
                    elapsed_ms={puzzle.elapsed_ms}
                    squares_reached={puzzle.squares_reached}
                    retry={on_retry.clone()}
                />
            </div>
            <StatusPanel
                phase={puzzle.phase}
                elapsed_ms={puzzle.elapsed_ms}
                squares_reached={puzzle.squares_reached}
                retry={on_retry}
            />
            <ScorePanel scores={(*scores).clone()} />
        </div>
    }
}
