pub mod attendance;
pub mod crm;
pub mod data;
pub mod employee;
pub mod finance;
pub mod leave_request;
pub mod procurement;
pub mod reports;

use chrono::{Local, NaiveDate};

/// Date the server considers "today" for defaults and trailing windows.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}
