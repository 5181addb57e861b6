use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};
use yew::prelude::*;

use crate::model::{Brush, Marker, Move, Square};
use crate::state::pointer::{square_at, square_center, square_origin};
use crate::state::{BoardPosition, PointerState};

const LIGHT: &str = "#f0d9b5";
const DARK: &str = "#b58863";
const SELECTED: &str = "rgba(20,85,30,0.5)";

#[derive(Properties, PartialEq, Clone)]
pub struct BoardViewProps {
    pub position: BoardPosition,
    pub markers: Vec<Marker>,
    /// False once the game is over; input is ignored.
    pub movable: bool,
    pub size_px: u32,
    pub on_move: Callback<Move>,
}

/// Snapshot of the props the listeners and the draw closure read.
#[derive(Clone, Debug, PartialEq)]
struct BoardScene {
    position: BoardPosition,
    markers: Vec<Marker>,
    movable: bool,
    size_px: f64,
}

impl From<&BoardViewProps> for BoardScene {
    fn from(props: &BoardViewProps) -> Self {
        Self {
            position: props.position,
            markers: props.markers.clone(),
            movable: props.movable,
            size_px: props.size_px as f64,
        }
    }
}

#[function_component(BoardView)]
pub fn board_view(props: &BoardViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let scene = use_mut_ref(|| BoardScene::from(props));
    let pointer = use_mut_ref(PointerState::default);
    let on_move = use_mut_ref(|| props.on_move.clone());
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);

    // Refresh the snapshot and redraw whenever the props change.
    {
        let scene = scene.clone();
        let on_move = on_move.clone();
        let pointer = pointer.clone();
        let draw_ref = draw_ref.clone();
        use_effect_with(props.clone(), move |props| {
            *scene.borrow_mut() = BoardScene::from(props);
            *on_move.borrow_mut() = props.on_move.clone();
            if !props.movable {
                pointer.borrow_mut().cancel();
            }
            if let Some(f) = &*draw_ref.borrow() {
                f();
            }
            || ()
        });
    }

    // Mount: draw closure and input listeners.
    {
        let canvas_ref = canvas_ref.clone();
        let scene = scene.clone();
        let pointer = pointer.clone();
        let on_move = on_move.clone();
        let draw_ref = draw_ref.clone();
        use_effect_with((), move |_| {
            let canvas: Option<HtmlCanvasElement> = canvas_ref.cast::<HtmlCanvasElement>();
            let window = web_sys::window();
            let mut listeners: Vec<(&'static str, Closure<dyn FnMut(web_sys::Event)>)> = Vec::new();
            // Releases are caught on the window so a drop outside the board still ends the drag.
            let mut release_listener: Option<Closure<dyn FnMut(web_sys::Event)>> = None;
            let mut key_listener: Option<Closure<dyn FnMut(KeyboardEvent)>> = None;

            if let Some(canvas) = canvas.clone() {
                let draw: Rc<dyn Fn()> = {
                    let canvas = canvas.clone();
                    let scene = scene.clone();
                    let pointer = pointer.clone();
                    Rc::new(move || {
                        if !canvas.is_connected() {
                            return;
                        }
                        let Some(ctx) = canvas
                            .get_context("2d")
                            .ok()
                            .flatten()
                            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
                        else {
                            return;
                        };
                        draw_board(&ctx, &scene.borrow(), &pointer.borrow());
                    })
                };
                *draw_ref.borrow_mut() = Some(draw.clone());
                draw();

                // Pointer position relative to the canvas.
                let local = {
                    let canvas = canvas.clone();
                    move |client_x: f64, client_y: f64| {
                        let rect = canvas.get_bounding_client_rect();
                        (client_x - rect.left(), client_y - rect.top())
                    }
                };

                let on_press = {
                    let scene = scene.clone();
                    let pointer = pointer.clone();
                    let on_move = on_move.clone();
                    let draw = draw.clone();
                    Rc::new(move |x: f64, y: f64| {
                        let sc = scene.borrow();
                        if !sc.movable {
                            return;
                        }
                        let sq = square_at(x, y, sc.size_px);
                        let has_piece = sq.and_then(|s| sc.position.piece_at(s)).is_some();
                        drop(sc);
                        let mv = pointer.borrow_mut().press(sq, has_piece, x, y);
                        draw();
                        if let Some(mv) = mv {
                            on_move.borrow().emit(mv);
                        }
                    })
                };
                let on_drag = {
                    let pointer = pointer.clone();
                    let draw = draw.clone();
                    Rc::new(move |x: f64, y: f64| {
                        let dragging = pointer.borrow().dragging;
                        if dragging {
                            pointer.borrow_mut().drag_to(x, y);
                            draw();
                        }
                    })
                };
                let on_release = {
                    let scene = scene.clone();
                    let pointer = pointer.clone();
                    let on_move = on_move.clone();
                    let draw = draw.clone();
                    Rc::new(move |x: f64, y: f64| {
                        let size = scene.borrow().size_px;
                        let mv = pointer.borrow_mut().release(square_at(x, y, size));
                        draw();
                        if let Some(mv) = mv {
                            on_move.borrow().emit(mv);
                        }
                    })
                };

                {
                    let local = local.clone();
                    let on_press = on_press.clone();
                    listeners.push((
                        "mousedown",
                        Closure::wrap(Box::new(move |e: web_sys::Event| {
                            if let Some(e) = e.dyn_ref::<MouseEvent>() {
                                if e.button() != 0 {
                                    return;
                                }
                                e.prevent_default();
                                let (x, y) = local(e.client_x() as f64, e.client_y() as f64);
                                on_press(x, y);
                            }
                        }) as Box<dyn FnMut(_)>),
                    ));
                }
                {
                    let local = local.clone();
                    let on_drag = on_drag.clone();
                    listeners.push((
                        "mousemove",
                        Closure::wrap(Box::new(move |e: web_sys::Event| {
                            if let Some(e) = e.dyn_ref::<MouseEvent>() {
                                let (x, y) = local(e.client_x() as f64, e.client_y() as f64);
                                on_drag(x, y);
                            }
                        }) as Box<dyn FnMut(_)>),
                    ));
                }
                if let Some(window) = &window {
                    let local = local.clone();
                    let on_release = on_release.clone();
                    let cb = Closure::wrap(Box::new(move |e: web_sys::Event| {
                        if let Some(e) = e.dyn_ref::<MouseEvent>() {
                            let (x, y) = local(e.client_x() as f64, e.client_y() as f64);
                            on_release(x, y);
                        }
                    }) as Box<dyn FnMut(_)>);
                    window
                        .add_event_listener_with_callback("mouseup", cb.as_ref().unchecked_ref())
                        .ok();
                    release_listener = Some(cb);
                }
                {
                    let local = local.clone();
                    let on_press = on_press.clone();
                    listeners.push((
                        "touchstart",
                        Closure::wrap(Box::new(move |e: web_sys::Event| {
                            if let Some(e) = e.dyn_ref::<TouchEvent>() {
                                if let Some(t) = e.changed_touches().get(0) {
                                    e.prevent_default();
                                    let (x, y) = local(t.client_x() as f64, t.client_y() as f64);
                                    on_press(x, y);
                                }
                            }
                        }) as Box<dyn FnMut(_)>),
                    ));
                }
                {
                    let local = local.clone();
                    let on_drag = on_drag.clone();
                    listeners.push((
                        "touchmove",
                        Closure::wrap(Box::new(move |e: web_sys::Event| {
                            if let Some(e) = e.dyn_ref::<TouchEvent>() {
                                if let Some(t) = e.changed_touches().get(0) {
                                    e.prevent_default();
                                    let (x, y) = local(t.client_x() as f64, t.client_y() as f64);
                                    on_drag(x, y);
                                }
                            }
                        }) as Box<dyn FnMut(_)>),
                    ));
                }
                {
                    let local = local.clone();
                    let on_release = on_release.clone();
                    listeners.push((
                        "touchend",
                        Closure::wrap(Box::new(move |e: web_sys::Event| {
                            if let Some(e) = e.dyn_ref::<TouchEvent>() {
                                if let Some(t) = e.changed_touches().get(0) {
                                    e.prevent_default();
                                    let (x, y) = local(t.client_x() as f64, t.client_y() as f64);
                                    on_release(x, y);
                                }
                            }
                        }) as Box<dyn FnMut(_)>),
                    ));
                }
                for (name, cb) in &listeners {
                    canvas.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref()).ok();
                }

                // Escape drops a selected piece.
                if let Some(window) = &window {
                    let pointer = pointer.clone();
                    let draw = draw.clone();
                    let cb = Closure::wrap(Box::new(move |e: KeyboardEvent| {
                        if e.key() == "Escape" {
                            pointer.borrow_mut().cancel();
                            draw();
                        }
                    }) as Box<dyn FnMut(_)>);
                    window
                        .add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref())
                        .ok();
                    key_listener = Some(cb);
                }
            }

            move || {
                if let Some(canvas) = &canvas {
                    for (name, cb) in &listeners {
                        let _ = canvas.remove_event_listener_with_callback(name, cb.as_ref().unchecked_ref());
                    }
                }
                if let Some(window) = &window {
                    if let Some(cb) = &key_listener {
                        let _ = window.remove_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
                    }
                    if let Some(cb) = &release_listener {
                        let _ = window.remove_event_listener_with_callback("mouseup", cb.as_ref().unchecked_ref());
                    }
                }
                *draw_ref.borrow_mut() = None;
            }
        });
    }

    let size = props.size_px.to_string();
    html! {
        <canvas
            ref={canvas_ref}
            width={size.clone()}
            height={size}
            data-fen={props.position.to_fen()}
            style="touch-action:none; cursor:pointer; display:block;"
        />
    }
}

fn draw_board(ctx: &CanvasRenderingContext2d, scene: &BoardScene, pointer: &PointerState) {
    let size = scene.size_px;
    let cell = size / 8.0;
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
    ctx.clear_rect(0.0, 0.0, size, size);

    for sq in Square::all() {
        let (x, y) = square_origin(sq, size);
        let dark = (sq.file() + sq.rank()) % 2 == 0;
        ctx.set_fill_style_str(if dark { DARK } else { LIGHT });
        ctx.fill_rect(x, y, cell, cell);
        if pointer.selected == Some(sq) {
            ctx.set_fill_style_str(SELECTED);
            ctx.fill_rect(x, y, cell, cell);
        }
        // Coordinates along the bottom and left edges.
        ctx.set_fill_style_str(if dark { LIGHT } else { DARK });
        ctx.set_font(&format!("{}px sans-serif", (cell * 0.18).max(8.0)));
        if sq.rank() == 0 {
            ctx.set_text_align("right");
            ctx.set_text_baseline("bottom");
            ctx.fill_text(&((b'a' + sq.file()) as char).to_string(), x + cell - 3.0, y + cell - 2.0).ok();
        }
        if sq.file() == 0 {
            ctx.set_text_align("left");
            ctx.set_text_baseline("top");
            ctx.fill_text(&(sq.rank() + 1).to_string(), x + 3.0, y + 2.0).ok();
        }
    }

    for marker in &scene.markers {
        draw_marker(ctx, marker, size);
    }

    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_font(&format!("{}px serif", cell * 0.8));
    ctx.set_fill_style_str("#000");
    for (sq, piece) in scene.position.pieces() {
        let held = pointer.dragging && pointer.selected == Some(sq);
        let (cx, cy) = if held { (pointer.x, pointer.y) } else { square_center(sq, size) };
        ctx.fill_text(piece.glyph(), cx, cy).ok();
    }
}

fn draw_marker(ctx: &CanvasRenderingContext2d, marker: &Marker, size: f64) {
    let cell = size / 8.0;
    let line = (cell / 6.4).max(1.0);
    let color = marker.brush.color();
    ctx.set_stroke_style_str(color);
    ctx.set_fill_style_str(color);
    ctx.set_line_width(line);
    ctx.set_global_alpha(if marker.brush == Brush::Hint { 1.0 } else { 0.9 });
    let (ox, oy) = square_center(marker.orig, size);
    match marker.dest {
        None => {
            ctx.begin_path();
            ctx.arc(ox, oy, cell / 2.0 - line / 2.0, 0.0, std::f64::consts::PI * 2.0).ok();
            ctx.stroke();
        }
        Some(dest) => {
            let (dx, dy) = square_center(dest, size);
            let angle = (dy - oy).atan2(dx - ox);
            let head = line * 2.5;
            let (ex, ey) = (dx - angle.cos() * head, dy - angle.sin() * head);
            ctx.set_line_cap("round");
            ctx.begin_path();
            ctx.move_to(ox, oy);
            ctx.line_to(ex, ey);
            ctx.stroke();
            ctx.begin_path();
            ctx.move_to(dx, dy);
            ctx.line_to(ex - (angle.sin() * head), ey + (angle.cos() * head));
            ctx.line_to(ex + (angle.sin() * head), ey - (angle.cos() * head));
            ctx.close_path();
            ctx.fill();
        }
    }
    ctx.set_global_alpha(1.0);
}
