pub mod charts;
pub mod html;
pub mod layout;
pub mod stat_card;
pub mod status_pill;
