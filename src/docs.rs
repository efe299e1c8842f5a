use crate::api::crm::SalesOrderStatusUpdate;
use crate::api::employee::EmployeeListResponse;
use crate::api::procurement::PoStatusUpdate;
use crate::api::reports::OverviewResponse;
use crate::model::attendance::{Attendance, AttendanceView};
use crate::model::customer::Customer;
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveView};
use crate::model::purchase_order::{PurchaseOrder, PurchaseOrderView};
use crate::model::role::Role;
use crate::model::sales_order::{SalesOrder, SalesOrderView};
use crate::model::status::{
    AttendanceStatus, LeaveStatus, LeaveType, PoStatus, SalesOrderStatus, TicketStatus, TxType,
};
use crate::model::supplier::Supplier;
use crate::model::ticket::{Ticket, TicketView};
use crate::model::transaction::Transaction;
use crate::models::{CreateUserReq, LoginReqDto, TokenPair};
use crate::service::crm::{NewCustomer, NewSalesOrder, NewTicket};
use crate::service::data::{ImportKind, ImportReport};
use crate::service::finance::NewTransaction;
use crate::service::hr::{NewAttendance, NewEmployee, NewLeave};
use crate::service::procurement::{NewPurchaseOrder, NewSupplier};
use crate::service::reports::{
    Bucket, BucketTotal, CrmOverview, DepartmentCount, OverviewCounts, TransactionSummary,
    TypeTotal,
};
use crate::utils::db_utils::TableKind;
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Enterprise Dashboard API",
        version = "1.0.0",
        description = r#"
## Enterprise Management Dashboard

One API over a single SQLite store for four business modules.

### Modules
- **HR**
  - Employees, daily attendance, leave requests with approval
- **Finance**
  - Income and expense transactions, windowed summaries
- **Procurement**
  - Suppliers and purchase orders with a status flow
- **CRM**
  - Customers, support tickets and sales orders
- **Data**
  - Bulk CSV import, CSV export and raw table views
- **Reports**
  - Dashboard counts, finance series, headcount and a PDF snapshot

### Security
Every `/api` endpoint needs a **JWT Bearer** access token from `/auth/login`.
Writes are gated by role (Hr, Finance, Procurement, Sales); Admin passes every gate and any role may read.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,
        crate::auth::handlers::create_user,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::attendance_for_month,

        crate::api::leave_request::create_leave,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::finance::create_transaction,
        crate::api::finance::list_transactions,

        crate::api::procurement::create_supplier,
        crate::api::procurement::list_suppliers,
        crate::api::procurement::create_purchase_order,
        crate::api::procurement::list_purchase_orders,
        crate::api::procurement::update_purchase_order_status,

        crate::api::crm::create_customer,
        crate::api::crm::list_customers,
        crate::api::crm::create_ticket,
        crate::api::crm::list_tickets,
        crate::api::crm::close_ticket,
        crate::api::crm::create_sales_order,
        crate::api::crm::list_sales_orders,
        crate::api::crm::update_sales_order_status,

        crate::api::data::import_csv,
        crate::api::data::export_csv,
        crate::api::data::view_table,

        crate::api::reports::overview,
        crate::api::reports::finance,
        crate::api::reports::headcount,
        crate::api::reports::absences,
        crate::api::reports::crm,
        crate::api::reports::snapshot_pdf
    ),
    components(
        schemas(
            LoginReqDto,
            TokenPair,
            CreateUserReq,
            Role,
            Employee,
            EmployeeListResponse,
            NewEmployee,
            Attendance,
            AttendanceView,
            AttendanceStatus,
            NewAttendance,
            LeaveRequest,
            LeaveView,
            LeaveType,
            LeaveStatus,
            NewLeave,
            Transaction,
            TxType,
            NewTransaction,
            Supplier,
            NewSupplier,
            PurchaseOrder,
            PurchaseOrderView,
            PoStatus,
            NewPurchaseOrder,
            PoStatusUpdate,
            Customer,
            NewCustomer,
            Ticket,
            TicketView,
            TicketStatus,
            NewTicket,
            SalesOrder,
            SalesOrderView,
            SalesOrderStatus,
            NewSalesOrder,
            SalesOrderStatusUpdate,
            ImportKind,
            ImportReport,
            TableKind,
            Bucket,
            TypeTotal,
            BucketTotal,
            TransactionSummary,
            DepartmentCount,
            OverviewCounts,
            CrmOverview,
            OverviewResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login, token rotation and user accounts"),
        (name = "Employee", description = "Employee records"),
        (name = "Attendance", description = "Daily attendance"),
        (name = "Leave", description = "Leave requests and approval"),
        (name = "Finance", description = "Income and expense transactions"),
        (name = "Procurement", description = "Suppliers and purchase orders"),
        (name = "CRM", description = "Customers, tickets and sales orders"),
        (name = "Data", description = "CSV import/export and table views"),
        (name = "Reports", description = "Dashboards and PDF snapshot"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
