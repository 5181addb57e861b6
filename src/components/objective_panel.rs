use yew::prelude::*;

#[function_component(ObjectivePanel)]
pub fn objective_panel() -> Html {
    html! {
        <>
            <div style="padding:20px; font-size:20px;">{"Knight and Queen Game"}</div>
            <div style="padding:0 10% 20px 10%;">
                {"Objective: Get to every square of the board that is not attacked by the queen (without capturing it either), left to right, top to bottom"}
                <div>
                    <a href="https://www.youtube.com/watch?v=SrQlpY_eGYU" target="_blank" rel="noreferrer">
                        {"Inspired by Ben Finegold"}
                    </a>
                </div>
            </div>
        </>
    }
}
