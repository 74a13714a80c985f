use std::cell::RefCell;
use std::rc::Rc;

use coupon_core::{BoardStore, Subscription};
use web_sys::{Document, HtmlElement, Window};

/// Page handles plus the board store, shared across the WASM callbacks.
/// Handlers only borrow it immutably; all board mutation goes through the
/// store, which re-renders via its subscription.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub store: Rc<BoardStore>,
    pub board: HtmlElement,
    pub slots: Vec<HtmlElement>,
    pub pool: HtmlElement,
    pub subscription: RefCell<Option<Subscription>>,
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<State>>> = const { RefCell::new(None) };
}
