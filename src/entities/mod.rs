pub mod batch;
pub mod customer;
pub mod financial_entry;
pub mod formula;
pub mod formula_item;
pub mod product;
pub mod production_record;
pub mod purchase_order;
pub mod quotation;
pub mod sale_record;
pub mod stock_movement;
pub mod supplier;
