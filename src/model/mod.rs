pub mod attendance;
pub mod customer;
pub mod employee;
pub mod leave_request;
pub mod purchase_order;
pub mod role;
pub mod sales_order;
pub mod status;
pub mod supplier;
pub mod ticket;
pub mod transaction;
pub mod user;
