use crate::model::PuzzlePhase;
use crate::util::format_time;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StatusPanelProps {
    pub phase: PuzzlePhase,
    pub elapsed_ms: u64,
    pub squares_reached: u32,
    pub retry: Callback<()>,
}

#[function_component]
pub fn StatusPanel(props: &StatusPanelProps) -> Html {
    let retry_cb = {
        let cb = props.retry.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let color = match props.phase {
        PuzzlePhase::Lost => "red",
        PuzzlePhase::Won => "green",
        PuzzlePhase::Idle | PuzzlePhase::Running => "black",
    };
    html! {
        <div style="margin-top:20px;">
            <button onclick={retry_cb}>{"Retry"}</button>
            <div style={format!("font-size:40px; margin-top:20px; color:{color}; font-variant-numeric:tabular-nums;")}>
                <div>{ format!("Time: {}", format_time(props.elapsed_ms)) }</div>
                <div>{ format!("Squares reached: {}", props.squares_reached) }</div>
            </div>
        </div>
    }
}
