pub mod common;
pub mod u501_inventory_lookup;
