use crate::model::PuzzlePhase;
use crate::util::format_time;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ResultOverlayProps {
    pub phase: PuzzlePhase,
    pub elapsed_ms: u64,
    pub squares_reached: u32,
    pub retry: Callback<()>,
}

#[function_component]
pub fn ResultOverlay(props: &ResultOverlayProps) -> Html {
    let (title, color, detail) = match props.phase {
        PuzzlePhase::Won => (
            "Every square reached!",
            "#2ea043",
            format!("Time: {}", format_time(props.elapsed_ms)),
        ),
        PuzzlePhase::Lost => (
            "Game Over",
            "#f85149",
            format!("Squares reached: {}", props.squares_reached),
        ),
        PuzzlePhase::Idle | PuzzlePhase::Running => return html! {},
    };
    let retry_btn = {
        let cb = props.retry.clone();
        Callback::from(move |_| cb.emit(()))
    };
    // Sits under the board's lower edge so the error markers stay visible.
    html! {
        <div style={format!("position:absolute; left:50%; bottom:8px; transform:translateX(-50%); background:rgba(0,0,0,0.8); color:#fff; border:2px solid {color}; padding:10px 18px; border-radius:10px; pointer-events:auto;")}>
            <div style={format!("font-weight:600; color:{color};")}>{ title }</div>
            <div style="margin:4px 0;">{ detail }</div>
            <button onclick={retry_btn}>{"Try Again"}</button>
        </div>
    }
}
