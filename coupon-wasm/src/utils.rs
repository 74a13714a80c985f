use coupon_core::{SlotGeometry, SlotRect, slot_rect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlElement, MouseEvent};

/// Look up an element by id and cast it to `HtmlElement`.
pub fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

/// Like [`html_element`] but for elements the widget cannot run without.
pub fn required_element(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    html_element(document, id).ok_or_else(|| JsValue::from_str(&format!("#{id} not found")))
}

/// Nearest ancestor (or self) of the event target matching `selector`.
pub fn closest_target(e: &Event, selector: &str) -> Option<HtmlElement> {
    let target: Element = e.target()?.dyn_into().ok()?;
    target
        .closest(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

/// Pointer position in viewport coordinates, matching `getBoundingClientRect`.
pub fn client_point(e: &MouseEvent) -> coupon_core::Pointer {
    coupon_core::pointer(f64::from(e.client_x()), f64::from(e.client_y()))
}

/// Slot rectangles read from the live DOM on every query, so layout changes
/// between frames are always honored.
pub struct DomSlotGeometry<'a> {
    pub slots: &'a [HtmlElement],
}

impl SlotGeometry for DomSlotGeometry<'_> {
    fn slot_rect(&self, index: usize) -> Option<SlotRect> {
        let rect = self.slots.get(index)?.get_bounding_client_rect();
        Some(slot_rect(rect.left(), rect.top(), rect.right(), rect.bottom()))
    }
}

/// Decoded `key=value` pairs of a URL query string, in order.
pub fn query_pairs(search: &str) -> Vec<(String, String)> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let mut it = pair.splitn(2, '=');
            let k = it.next().unwrap_or("");
            let v = it.next().unwrap_or("");
            (url_decode(k), url_decode(v))
        })
        .collect()
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_decode_in_order() {
        let pairs = query_pairs("?variant=full&slots=7&partner=A%20%ED%8E%B8%EC%9D%98%EC%A0%90");
        assert_eq!(
            pairs,
            vec![
                ("variant".to_string(), "full".to_string()),
                ("slots".to_string(), "7".to_string()),
                ("partner".to_string(), "A 편의점".to_string()),
            ]
        );
    }

    #[test]
    fn query_pairs_handle_empty_and_bare_keys() {
        assert!(query_pairs("").is_empty());
        assert!(query_pairs("?").is_empty());
        assert_eq!(
            query_pairs("?debug&&a=b+c"),
            vec![
                ("debug".to_string(), String::new()),
                ("a".to_string(), "b c".to_string()),
            ]
        );
    }
}
