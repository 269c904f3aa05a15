pub mod component;
pub mod input_box;
pub mod main_page;
pub mod notices;
pub mod primary;
pub mod sidebar;
