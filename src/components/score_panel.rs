use crate::state::ScoreBook;
use crate::state::scores::describe_outcome;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ScorePanelProps {
    pub scores: ScoreBook,
}

#[function_component]
pub fn ScorePanel(props: &ScorePanelProps) -> Html {
    let rows = props.scores.ranked().into_iter().enumerate().map(|(i, outcome)| {
        let (label, detail) = describe_outcome(&outcome);
        let label_style = if outcome.won { "color:green;" } else { "" };
        html! { <div key={i}><span style={label_style}>{ label }</span><span>{ detail }</span></div> }
    });
    html! {
        <div style="margin-top:20px; max-height:250px; overflow:scroll;">
            if !props.scores.is_empty() {
                <div style="font-size:19px; margin-bottom:15px;">{"Your scores:"}</div>
            }
            { for rows }
        </div>
    }
}
