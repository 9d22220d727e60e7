pub mod error_banner;
pub mod file_upload;
pub mod info_card;
pub mod loader;
pub mod quote_display;
pub mod quote_form;
pub mod toast;
