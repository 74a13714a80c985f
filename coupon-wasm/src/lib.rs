use std::cell::RefCell;
use std::rc::Rc;

use coupon_core::{BoardSnapshot, BoardStore, Catalog, PartnerFilter, RewardKind};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlElement, KeyboardEvent, MouseEvent, PointerEvent};

mod barcode;
mod config;
mod constants;
mod render;
mod state;
mod utils;

use crate::constants::*;
use crate::render::{create_html, move_preview, render};
use crate::state::{STATE, State};
use crate::utils::{DomSlotGeometry, client_point, closest_target, html_element, required_element};

fn rerender(state: &State, snap: &BoardSnapshot) {
    if let Err(err) = render(state, snap) {
        tracing::warn!("render failed: {:?}", err);
    }
}

/// Replace the board's children with one `.slot` per configured slot.
fn build_slots(document: &Document, board: &HtmlElement, count: usize) -> Result<Vec<HtmlElement>, JsValue> {
    board.set_inner_html("");
    (0..count)
        .map(|i| -> Result<HtmlElement, JsValue> {
            let slot = create_html(document, "div", "slot")?;
            slot.dataset().set("index", &i.to_string())?;
            board.append_child(&slot)?;
            Ok(slot)
        })
        .collect()
}

/// One "all" button plus one button per catalog partner.
fn build_filters(document: &Document, catalog: &Catalog) -> Result<(), JsValue> {
    let Some(bar) = html_element(document, FILTERS_ID) else {
        return Ok(());
    };
    bar.set_inner_html("");
    let all = create_html(document, "button", "filter-btn all-btn")?;
    all.dataset().set("partner", "")?;
    all.set_text_content(Some(ALL_PARTNERS_TEXT));
    bar.append_child(&all)?;
    for partner in catalog.partners() {
        let btn = create_html(document, "button", "filter-btn")?;
        btn.dataset().set("partner", partner)?;
        btn.style()
            .set_property("background-color", coupon_core::partner_color(partner))?;
        btn.set_text_content(Some(partner));
        bar.append_child(&btn)?;
    }
    Ok(())
}

fn set_dialog(document: &Document, open: bool, kind: Option<RewardKind>) {
    let Some(dialog) = html_element(document, DIALOG_ID) else {
        return;
    };
    if let Some(kind) = kind {
        if let Some(el) = html_element(document, DIALOG_TITLE_ID) {
            el.set_text_content(Some(kind.title()));
        }
        if let Some(el) = html_element(document, DIALOG_TEXT_ID) {
            el.set_text_content(Some(kind.description()));
        }
    }
    dialog.set_hidden(!open);
}

fn on_click(
    document: &Document,
    id: &str,
    handler: impl FnMut(MouseEvent) + 'static,
) -> Result<(), JsValue> {
    if let Some(el) = html_element(document, id) {
        let cb = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(handler));
        el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}

fn attach_ui(state: Rc<State>) -> Result<(), JsValue> {
    let doc = state.document.clone();

    // Drag start on a pool tile. The pool holds the pointer capture because
    // the tile itself is re-rendered away once the drag begins.
    {
        let st = state.clone();
        let down = Closure::<dyn FnMut(PointerEvent)>::wrap(Box::new(move |e: PointerEvent| {
            if !e.is_primary() || e.button() != 0 {
                return;
            }
            let Some(tile) = closest_target(&e, ".coupon") else {
                return;
            };
            let Some(id) = tile.dataset().get("id").and_then(|v| v.parse().ok()) else {
                return;
            };
            if st.store.begin_drag(id, client_point(&e)) {
                e.prevent_default();
                if let Err(err) = st.pool.set_pointer_capture(e.pointer_id()) {
                    tracing::debug!("pointer capture unavailable: {:?}", err);
                }
            }
        }));
        state
            .pool
            .add_event_listener_with_callback("pointerdown", down.as_ref().unchecked_ref())?;
        down.forget();
    }
    {
        let st = state.clone();
        let moved = Closure::<dyn FnMut(PointerEvent)>::wrap(Box::new(move |e: PointerEvent| {
            if !e.is_primary() || st.store.snapshot().drag().is_none() {
                return;
            }
            let p = client_point(&e);
            st.store.update_drag(&DomSlotGeometry { slots: &st.slots }, p);
            // The store only notifies on hover changes; keep the preview on the pointer.
            if let Some(preview) = html_element(&st.document, DRAG_PREVIEW_ID) {
                let _ = move_preview(&preview, (p.x, p.y));
            }
        }));
        state
            .window
            .add_event_listener_with_callback("pointermove", moved.as_ref().unchecked_ref())?;
        moved.forget();
    }
    {
        let st = state.clone();
        let up = Closure::<dyn FnMut(PointerEvent)>::wrap(Box::new(move |e: PointerEvent| {
            if !e.is_primary() {
                return;
            }
            st.store
                .end_drag(&DomSlotGeometry { slots: &st.slots }, client_point(&e));
        }));
        state
            .window
            .add_event_listener_with_callback("pointerup", up.as_ref().unchecked_ref())?;
        up.forget();
    }
    // Abandon the gesture when the browser takes the pointer back or the
    // window loses focus.
    {
        let st = state.clone();
        let cancel = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| {
            st.store.cancel_drag();
        }));
        for event in ["pointercancel", "blur"] {
            state
                .window
                .add_event_listener_with_callback(event, cancel.as_ref().unchecked_ref())?;
        }
        cancel.forget();
    }

    // Clicking a filled slot sends the coupon back to the pool
    {
        let st = state.clone();
        let click = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let Some(slot) = closest_target(&e, ".slot") else {
                return;
            };
            if let Some(index) = slot.dataset().get("index").and_then(|v| v.parse().ok()) {
                st.store.remove(index);
            }
        }));
        state
            .board
            .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
        click.forget();
    }

    // Partner filter buttons
    {
        let st = state.clone();
        on_click(&doc, FILTERS_ID, move |e: MouseEvent| {
            let Some(btn) = closest_target(&e, "button") else {
                return;
            };
            let filter = match btn.dataset().get("partner") {
                Some(p) if !p.is_empty() => PartnerFilter::Partner(p),
                _ => PartnerFilter::All,
            };
            st.store.set_filter(filter);
        })?;
    }

    {
        let st = state.clone();
        on_click(&doc, RECEIVE_BTN_ID, move |_e: MouseEvent| {
            match st.store.issue_reward(js_sys::Math::random) {
                Ok(reward) => set_dialog(&st.document, true, Some(reward.kind)),
                Err(err) => tracing::debug!("reward not issued: {err}"),
            }
        })?;
    }

    {
        let st = state.clone();
        on_click(&doc, RESET_BTN_ID, move |_e: MouseEvent| {
            set_dialog(&st.document, false, None);
            st.store.reset();
        })?;
    }

    {
        let st = state.clone();
        on_click(&doc, GO_COUPON_BTN_ID, move |_e: MouseEvent| {
            let _ = st.window.alert_with_message(COUPON_BOX_ALERT);
        })?;
    }

    {
        let st = state.clone();
        on_click(&doc, DIALOG_CLOSE_ID, move |_e: MouseEvent| {
            set_dialog(&st.document, false, None);
        })?;
    }

    // Escape abandons a drag and closes the dialog
    {
        let st = state.clone();
        let keydown = Closure::<dyn FnMut(KeyboardEvent)>::wrap(Box::new(move |e: KeyboardEvent| {
            if e.key() == "Escape" {
                st.store.cancel_drag();
                set_dialog(&st.document, false, None);
            }
        }));
        state
            .window
            .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        keydown.forget();
    }

    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let board = required_element(&document, BOARD_ID)?;
    let pool = required_element(&document, POOL_ID)?;

    let config = config::load_config(&window, &document);
    tracing::info!(
        variant = ?config.variant,
        slots = config.slot_count,
        coupons = config.catalog_size,
        "starting coupon board"
    );
    let catalog = Catalog::generate(config.catalog_size);
    let slots = build_slots(&document, &board, config.slot_count)?;
    build_filters(&document, &catalog)?;
    set_dialog(&document, false, None);

    let state = Rc::new(State {
        window,
        document,
        store: Rc::new(BoardStore::new(catalog, config)),
        board,
        slots,
        pool,
        subscription: RefCell::new(None),
    });

    STATE.with(|st| st.replace(Some(state.clone())));
    mount(&state)
}

/// Subscribe the renderer to the store, attach listeners and draw once.
fn mount(state: &Rc<State>) -> Result<(), JsValue> {
    let weak = Rc::downgrade(state);
    let subscription = state.store.subscribe(move |snap| {
        if let Some(st) = weak.upgrade() {
            rerender(&st, snap);
        }
    });
    state.subscription.replace(Some(subscription));

    attach_ui(state.clone())?;
    rerender(state, &state.store.snapshot());
    Ok(())
}

/// Current board state as JSON, for debugging from the browser console.
#[wasm_bindgen]
pub fn board_state_json() -> String {
    STATE.with(|st| {
        st.borrow()
            .as_ref()
            .and_then(|s| serde_json::to_string_pretty(&*s.store.snapshot()).ok())
            .unwrap_or_else(|| "{}".to_string())
    })
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use coupon_core::{Catalog, pointer};
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mounted_board(count: usize) -> (Document, HtmlElement, Vec<HtmlElement>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let board = create_html(&document, "div", "board").unwrap();
        board
            .style()
            .set_property("position", "absolute")
            .unwrap();
        board.style().set_property("left", "0px").unwrap();
        board.style().set_property("top", "0px").unwrap();
        board.style().set_property("display", "flex").unwrap();
        document.body().unwrap().append_child(&board).unwrap();
        let slots = build_slots(&document, &board, count).unwrap();
        for slot in &slots {
            slot.style().set_property("width", "50px").unwrap();
            slot.style().set_property("height", "50px").unwrap();
            slot.style().set_property("flex", "none").unwrap();
        }
        (document, board, slots)
    }

    #[wasm_bindgen_test]
    fn slots_are_built_with_indices() {
        let (_doc, board, slots) = mounted_board(5);
        assert_eq!(slots.len(), 5);
        assert_eq!(slots[3].dataset().get("index").as_deref(), Some("3"));
        board.remove();
    }

    #[wasm_bindgen_test]
    fn dom_geometry_hit_tests_live_layout() {
        let (_doc, board, slots) = mounted_board(3);
        let geometry = DomSlotGeometry { slots: &slots };
        let store = BoardStore::new(Catalog::generate(30), Default::default());
        assert_eq!(store.locate_slot(&geometry, pointer(75.0, 25.0)), Some(1));
        assert_eq!(store.locate_slot(&geometry, pointer(50.0, 50.0)), Some(0));
        assert!(store.place(2, &geometry, pointer(125.0, 10.0)));
        assert_eq!(store.locate_slot(&geometry, pointer(125.0, 10.0)), None);
        board.remove();
    }

    fn mounted_widget() -> Rc<State> {
        let (document, board, slots) = mounted_board(3);
        let pool = create_html(&document, "div", "pool").unwrap();
        pool.style().set_property("position", "absolute").unwrap();
        pool.style().set_property("top", "200px").unwrap();
        document.body().unwrap().append_child(&pool).unwrap();
        let config = coupon_core::BoardConfig {
            slot_count: 3,
            catalog_size: 6,
            ..Default::default()
        };
        let state = Rc::new(State {
            window: web_sys::window().unwrap(),
            document,
            store: Rc::new(BoardStore::new(Catalog::generate(6), config)),
            board,
            slots,
            pool,
            subscription: RefCell::new(None),
        });
        mount(&state).unwrap();
        state
    }

    fn pointer_event(kind: &str, x: i32, y: i32) -> PointerEvent {
        let init = web_sys::PointerEventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        init.set_is_primary(true);
        init.set_pointer_id(1);
        init.set_client_x(x);
        init.set_client_y(y);
        PointerEvent::new_with_event_init_dict(kind, &init).unwrap()
    }

    fn press_tile(state: &State, id: u32) {
        let tile = state
            .pool
            .query_selector(&format!(".coupon[data-id='{id}']"))
            .unwrap()
            .unwrap();
        let rect = tile.get_bounding_client_rect();
        let down = pointer_event("pointerdown", rect.left() as i32 + 5, rect.top() as i32 + 5);
        tile.dispatch_event(&down).unwrap();
    }

    fn unmount(state: &State) {
        state.board.remove();
        state.pool.remove();
    }

    #[wasm_bindgen_test]
    fn pointer_drag_drops_coupon_into_slot() {
        let state = mounted_widget();
        press_tile(&state, 2);
        assert_eq!(state.store.snapshot().in_flight(), Some(2));
        assert!(state.pool.query_selector(".coupon[data-id='2']").unwrap().is_none());

        state
            .window
            .dispatch_event(&pointer_event("pointermove", 75, 25))
            .unwrap();
        assert_eq!(state.store.snapshot().hover_slot(), Some(1));
        state
            .window
            .dispatch_event(&pointer_event("pointerup", 75, 25))
            .unwrap();

        let snap = state.store.snapshot();
        assert!(snap.drag().is_none());
        assert_eq!(snap.slots()[1].as_ref().map(|c| c.id), Some(2));
        unmount(&state);
    }

    #[wasm_bindgen_test]
    fn cancelled_pointer_or_lost_focus_abandons_drag() {
        let state = mounted_widget();
        press_tile(&state, 3);
        assert_eq!(state.store.snapshot().in_flight(), Some(3));
        state
            .window
            .dispatch_event(&pointer_event("pointercancel", 75, 25))
            .unwrap();
        assert!(state.store.snapshot().drag().is_none());
        assert!(state.pool.query_selector(".coupon[data-id='3']").unwrap().is_some());

        press_tile(&state, 3);
        assert_eq!(state.store.snapshot().in_flight(), Some(3));
        state
            .window
            .dispatch_event(&Event::new("blur").unwrap())
            .unwrap();
        assert!(state.store.snapshot().drag().is_none());
        assert!(state.store.snapshot().slots().iter().all(Option::is_none));
        unmount(&state);
    }

    #[wasm_bindgen_test]
    fn coupon_tile_carries_id_and_text() {
        let document = web_sys::window().unwrap().document().unwrap();
        let catalog = Catalog::generate(3);
        let tile = render::coupon_tile(&document, &catalog.coupons()[1]).unwrap();
        assert_eq!(tile.dataset().get("id").as_deref(), Some("2"));
        assert_eq!(tile.text_content().as_deref(), Some("200점B 편의점"));
    }
}
