pub mod filter_panel;
pub mod list_parts;
pub mod pagination_controls;
pub mod stat_card;
