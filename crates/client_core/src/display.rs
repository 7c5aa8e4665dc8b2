//! Display records: the last step before rendering, where cents turn into currency text.

use serde::Serialize;
use shared::{
    domain::{Customer, Invoice, InvoiceStatus},
    money::format_currency,
    protocol::{CardSummary, CustomerRow, InvoiceRow, LatestInvoice},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestInvoiceView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: String,
}

impl From<&LatestInvoice> for LatestInvoiceView {
    fn from(value: &LatestInvoice) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.clone(),
            email: value.email.clone(),
            image_url: value.image_url.clone(),
            amount: format_currency(value.amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceRowView {
    pub id: String,
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub date: String,
    pub amount: String,
    pub status: InvoiceStatus,
}

impl From<&InvoiceRow> for InvoiceRowView {
    fn from(value: &InvoiceRow) -> Self {
        Self {
            id: value.id.to_string(),
            customer_id: value.customer_id.to_string(),
            name: value.name.clone(),
            email: value.email.clone(),
            image_url: value.image_url.clone(),
            date: value.date.clone().unwrap_or_default(),
            amount: format_currency(value.amount),
            status: value.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerRowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: u64,
    pub total_pending: String,
    pub total_paid: String,
}

impl From<&CustomerRow> for CustomerRowView {
    fn from(value: &CustomerRow) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.clone(),
            email: value.email.clone(),
            image_url: value.image_url.clone(),
            total_invoices: value.total_invoices,
            total_pending: format_currency(value.total_pending),
            total_paid: format_currency(value.total_paid),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSummaryView {
    pub number_of_customers: u64,
    pub number_of_invoices: u64,
    pub total_paid_invoices: String,
    pub total_pending_invoices: String,
}

impl From<&CardSummary> for CardSummaryView {
    fn from(value: &CardSummary) -> Self {
        Self {
            number_of_customers: value.number_of_customers,
            number_of_invoices: value.number_of_invoices,
            total_paid_invoices: format_currency(value.total_paid_invoices),
            total_pending_invoices: format_currency(value.total_pending_invoices),
        }
    }
}

/// Values prefilled into the invoice edit form; the amount is shown in dollars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceEditView {
    pub id: String,
    pub customer_id: String,
    pub amount: f64,
    pub status: InvoiceStatus,
}

impl From<&Invoice> for InvoiceEditView {
    fn from(value: &Invoice) -> Self {
        Self {
            id: value.id.to_string(),
            customer_id: value.customer_id.to_string(),
            amount: value.amount.to_dollars(),
            status: value.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerEditView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

impl From<&Customer> for CustomerEditView {
    fn from(value: &Customer) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.clone(),
            email: value.email.clone(),
            image_url: value.image_url.clone(),
        }
    }
}
