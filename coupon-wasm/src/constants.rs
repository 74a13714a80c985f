/// Element ids the host page provides.
pub const BOARD_ID: &str = "board";
pub const POOL_ID: &str = "pool";
pub const FILTERS_ID: &str = "filters";
pub const SUMMARY_ID: &str = "summary";
pub const RECEIVE_BTN_ID: &str = "receiveBtn";
pub const RESET_BTN_ID: &str = "resetBtn";
pub const GO_COUPON_BTN_ID: &str = "goCouponBtn";
pub const BARCODE_BOX_ID: &str = "barcodeBox";
pub const BARCODE_SVG_ID: &str = "barcode";
pub const BARCODE_TEXT_ID: &str = "barcodeText";
pub const DIALOG_ID: &str = "dialog";
pub const DIALOG_TITLE_ID: &str = "dialogTitle";
pub const DIALOG_TEXT_ID: &str = "dialogText";
pub const DIALOG_CLOSE_ID: &str = "dialogClose";
pub const DRAG_PREVIEW_ID: &str = "dragPreview";
/// `<script type="application/json">` block holding the board config.
pub const CONFIG_SCRIPT_ID: &str = "couponConfig";

/// Offset from the pointer to the top-left corner of the drag preview (px),
/// roughly the center of a coupon tile.
pub const PREVIEW_OFFSET_X: f64 = 36.0;
pub const PREVIEW_OFFSET_Y: f64 = 59.0;

pub const EMPTY_POOL_TEXT: &str = "모든 쿠폰을 사용했습니다.";
pub const ALL_PARTNERS_TEXT: &str = "전체";
pub const COUPON_BOX_ALERT: &str = "쿠폰함으로 이동";
