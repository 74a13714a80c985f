use coupon_core::{BoardSnapshot, Coupon, PartnerFilter, RewardKind, claim_label};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::barcode::draw_barcode;
use crate::constants::*;
use crate::state::State;
use crate::utils::html_element;

/// Build a coupon tile: colored card with the point label and partner.
pub fn coupon_tile(document: &Document, coupon: &Coupon) -> Result<HtmlElement, JsValue> {
    let tile = create_html(document, "div", "coupon")?;
    tile.dataset().set("id", &coupon.id.to_string())?;
    tile.style().set_property("background-color", &coupon.color)?;
    let label = create_html(document, "div", "coupon-label")?;
    label.set_text_content(Some(&coupon.label));
    let partner = create_html(document, "div", "coupon-partner")?;
    partner.set_text_content(Some(&coupon.partner));
    tile.append_child(&label)?;
    tile.append_child(&partner)?;
    Ok(tile)
}

pub fn create_html(document: &Document, tag: &str, class: &str) -> Result<HtmlElement, JsValue> {
    let el = document.create_element(tag)?.dyn_into::<HtmlElement>()?;
    el.set_class_name(class);
    Ok(el)
}

fn toggle_class(el: &Element, class: &str, on: bool) -> Result<(), JsValue> {
    el.class_list().toggle_with_force(class, on).map(|_| ())
}

/// Redraw everything that depends on the board snapshot.
pub fn render(state: &State, snap: &BoardSnapshot) -> Result<(), JsValue> {
    render_slots(state, snap)?;
    render_pool(state, snap)?;
    render_filters(state, snap)?;
    render_actions(state, snap)?;
    render_reward(state, snap)?;
    render_preview(state, snap)?;
    Ok(())
}

fn render_slots(state: &State, snap: &BoardSnapshot) -> Result<(), JsValue> {
    let hover = snap.hover_slot();
    for (i, (el, slot)) in state.slots.iter().zip(snap.slots()).enumerate() {
        el.set_inner_html("");
        toggle_class(el, "slot-filled", slot.is_some())?;
        toggle_class(el, "slot-hover", slot.is_none() && hover == Some(i))?;
        match slot {
            Some(coupon) => {
                el.append_child(&coupon_tile(&state.document, coupon)?.into())?;
            }
            None => {
                let placeholder = create_html(&state.document, "span", "placeholder")?;
                placeholder.set_text_content(Some("+"));
                el.append_child(&placeholder)?;
            }
        }
    }
    Ok(())
}

fn render_pool(state: &State, snap: &BoardSnapshot) -> Result<(), JsValue> {
    let pool = &state.pool;
    pool.set_inner_html("");
    let barcode_shown = snap
        .reward()
        .is_some_and(|r| r.kind == RewardKind::Barcode);
    pool.set_hidden(barcode_shown);
    if barcode_shown {
        return Ok(());
    }
    let visible = snap.visible_pool(snap.filter());
    if visible.is_empty() {
        let p = state.document.create_element("p")?;
        p.set_text_content(Some(EMPTY_POOL_TEXT));
        pool.append_child(&p)?;
        return Ok(());
    }
    for coupon in visible {
        pool.append_child(&coupon_tile(&state.document, coupon)?.into())?;
    }
    Ok(())
}

fn render_filters(state: &State, snap: &BoardSnapshot) -> Result<(), JsValue> {
    let Some(bar) = html_element(&state.document, FILTERS_ID) else {
        return Ok(());
    };
    bar.set_hidden(!snap.variant().filters_by_partner());
    let buttons = bar.query_selector_all("button")?;
    for i in 0..buttons.length() {
        let Some(btn) = buttons.get(i) else { continue };
        let Ok(btn) = btn.dyn_into::<HtmlElement>() else {
            continue;
        };
        let partner = btn.dataset().get("partner").unwrap_or_default();
        let active = match snap.filter() {
            PartnerFilter::All => partner.is_empty(),
            PartnerFilter::Partner(p) => *p == partner,
        };
        toggle_class(&btn, "active", active)?;
        btn.toggle_attribute_with_force("disabled", snap.filter_locked())?;
    }
    Ok(())
}

fn render_actions(state: &State, snap: &BoardSnapshot) -> Result<(), JsValue> {
    let doc = &state.document;
    if let Some(el) = html_element(doc, SUMMARY_ID) {
        el.set_text_content(Some(&format!("{}점", snap.point_sum())));
    }
    if let Some(btn) = html_element(doc, RECEIVE_BTN_ID) {
        btn.set_hidden(!snap.can_issue_reward());
        btn.set_text_content(Some(&claim_label(snap.point_sum())));
    }
    if let Some(btn) = html_element(doc, GO_COUPON_BTN_ID) {
        btn.set_hidden(snap.reward().is_none_or(|r| r.kind != RewardKind::Barcode));
    }
    Ok(())
}

fn render_reward(state: &State, snap: &BoardSnapshot) -> Result<(), JsValue> {
    let doc = &state.document;
    let Some(container) = html_element(doc, BARCODE_BOX_ID) else {
        return Ok(());
    };
    let code = snap
        .reward()
        .filter(|r| r.kind == RewardKind::Barcode)
        .map(|r| r.code.as_str());
    container.set_hidden(code.is_none());
    let Some(code) = code else {
        if let Some(text) = html_element(doc, BARCODE_TEXT_ID) {
            text.set_text_content(None);
        }
        return Ok(());
    };
    let text = html_element(doc, BARCODE_TEXT_ID);
    // The symbol only needs drawing once per issued code.
    if text.as_ref().and_then(|t| t.text_content()).as_deref() == Some(code) {
        return Ok(());
    }
    if let Some(text) = text {
        text.set_text_content(Some(code));
    }
    if let Some(svg) = doc.get_element_by_id(BARCODE_SVG_ID)
        && let Err(err) = draw_barcode(&state.window, &svg, code, &state.store.config().barcode)
    {
        tracing::error!("JsBarcode error: {:?}", err);
    }
    Ok(())
}

fn render_preview(state: &State, snap: &BoardSnapshot) -> Result<(), JsValue> {
    let Some(preview) = html_element(&state.document, DRAG_PREVIEW_ID) else {
        return Ok(());
    };
    let dragged = snap
        .drag()
        .and_then(|d| snap.pool().iter().find(|c| c.id == d.coupon_id).map(|c| (d, c)));
    let Some((drag, coupon)) = dragged else {
        preview.set_hidden(true);
        preview.set_inner_html("");
        preview.dataset().set("id", "")?;
        return Ok(());
    };
    if preview.dataset().get("id").as_deref() != Some(coupon.id.to_string().as_str()) {
        preview.set_inner_html("");
        preview.append_child(&coupon_tile(&state.document, coupon)?.into())?;
        preview.dataset().set("id", &coupon.id.to_string())?;
    }
    move_preview(&preview, drag.pointer)?;
    preview.set_hidden(false);
    Ok(())
}

/// Position the floating preview under the pointer. Called on every pointer
/// move, not only when the store notifies.
pub fn move_preview(preview: &HtmlElement, (x, y): (f64, f64)) -> Result<(), JsValue> {
    let style = preview.style();
    style.set_property("left", &format!("{}px", x - PREVIEW_OFFSET_X))?;
    style.set_property("top", &format!("{}px", y - PREVIEW_OFFSET_Y))?;
    Ok(())
}
