use coupon_core::BarcodeStyle;
use js_sys::{Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Window};

fn set(obj: &Object, key: &str, value: JsValue) -> Result<(), JsValue> {
    Reflect::set(obj.as_ref(), &JsValue::from_str(key), &value).map(|_| ())
}

fn barcode_options(style: &BarcodeStyle) -> Result<Object, JsValue> {
    let options = Object::new();
    set(&options, "format", JsValue::from_str(&style.format))?;
    set(&options, "lineColor", JsValue::from_str(&style.line_color))?;
    set(&options, "width", JsValue::from_f64(style.width))?;
    set(&options, "height", JsValue::from_f64(style.height))?;
    set(&options, "displayValue", JsValue::from_bool(style.display_value))?;
    set(&options, "margin", JsValue::from_f64(style.margin))?;
    Ok(options)
}

/// Hand `code` to the page's `JsBarcode` global, which draws into `target`.
pub fn draw_barcode(
    window: &Window,
    target: &Element,
    code: &str,
    style: &BarcodeStyle,
) -> Result<(), JsValue> {
    let render = Reflect::get(window.as_ref(), &JsValue::from_str("JsBarcode"))?;
    let render: Function = render
        .dyn_into()
        .map_err(|_| JsValue::from_str("JsBarcode is not loaded"))?;
    let options = barcode_options(style)?;
    render.call3(
        &JsValue::NULL,
        target.as_ref(),
        &JsValue::from_str(code),
        options.as_ref(),
    )?;
    Ok(())
}
