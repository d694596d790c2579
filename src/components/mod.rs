pub mod confirm_button;
