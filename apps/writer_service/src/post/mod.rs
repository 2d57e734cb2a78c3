pub mod post_controller;
pub mod post_page;
