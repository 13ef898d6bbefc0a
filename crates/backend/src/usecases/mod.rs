pub mod u501_inventory_lookup;
