pub mod banner;
pub mod chart_canvas;
pub mod device_card;
pub mod modal;
pub mod page_header;
pub mod password_input;
pub mod payment_panel;
pub mod shell;
pub mod sidebar;
pub mod stat_card;
pub mod status_badge;
