use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// A status column whose transitions are restricted.
pub trait StatusFlow: Copy + AsRef<str> + 'static {
    /// Statuses a record may currently hold to be moved to `self`.
    fn sources(self) -> &'static [Self];
}

/// Parse a fixed-enumeration field, case-insensitively.
pub fn parse_enum<T>(field: &str, raw: &str) -> AppResult<T>
where
    T: FromStr + IntoEnumIterator + AsRef<str>,
{
    T::from_str(raw.trim()).map_err(|_| {
        let allowed = T::iter()
            .map(|v| v.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        AppError::Validation(format!("Invalid {field} '{raw}'. Allowed: {allowed}"))
    })
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema,
    Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Leave,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema,
    Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum LeaveType {
    Annual,
    Sick,
    Maternity,
    Unpaid,
    Other,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema,
    Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl StatusFlow for LeaveStatus {
    fn sources(self) -> &'static [Self] {
        match self {
            LeaveStatus::Pending => &[],
            LeaveStatus::Approved | LeaveStatus::Rejected => &[LeaveStatus::Pending],
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema,
    Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum TxType {
    Income,
    Expense,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema,
    Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum PoStatus {
    Pending,
    Approved,
    Received,
    Cancelled,
}

impl StatusFlow for PoStatus {
    fn sources(self) -> &'static [Self] {
        match self {
            PoStatus::Pending => &[],
            PoStatus::Approved => &[PoStatus::Pending],
            PoStatus::Received | PoStatus::Cancelled => &[PoStatus::Pending, PoStatus::Approved],
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema,
    Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum TicketStatus {
    Open,
    Closed,
}

impl StatusFlow for TicketStatus {
    fn sources(self) -> &'static [Self] {
        match self {
            TicketStatus::Open => &[],
            TicketStatus::Closed => &[TicketStatus::Open],
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema,
    Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum SalesOrderStatus {
    New,
    Confirmed,
    Fulfilled,
    Cancelled,
}

impl StatusFlow for SalesOrderStatus {
    fn sources(self) -> &'static [Self] {
        match self {
            SalesOrderStatus::New => &[],
            SalesOrderStatus::Confirmed => &[SalesOrderStatus::New],
            SalesOrderStatus::Fulfilled => &[SalesOrderStatus::Confirmed],
            SalesOrderStatus::Cancelled => &[SalesOrderStatus::New, SalesOrderStatus::Confirmed],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        let t: TxType = parse_enum("tx_type", " income ").unwrap();
        assert_eq!(t, TxType::Income);
        let s: AttendanceStatus = parse_enum("status", "ABSENT").unwrap();
        assert_eq!(s, AttendanceStatus::Absent);
    }

    #[test]
    fn rejection_lists_allowed_values() {
        let err = parse_enum::<TxType>("tx_type", "Refund").unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("Income, Expense")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn purchase_order_flow() {
        assert_eq!(PoStatus::Approved.sources(), &[PoStatus::Pending]);
        assert!(PoStatus::Received.sources().contains(&PoStatus::Approved));
        assert!(PoStatus::Pending.sources().is_empty());
    }

    #[test]
    fn display_matches_stored_text() {
        assert_eq!(LeaveStatus::Approved.to_string(), "Approved");
        assert_eq!(SalesOrderStatus::New.as_ref(), "New");
    }
}
