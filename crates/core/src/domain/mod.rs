pub mod customer;
pub mod phone;
pub mod quote;
