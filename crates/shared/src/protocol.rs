//! JSON shapes exchanged with the resource API.
//!
//! Request bodies serialize exactly as the API expects them. Response types decode the
//! API's output at the trust boundary; anything that does not fit is a decode error rather
//! than a silently half-filled record.

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::domain::{
    Cents, Customer, CustomerId, Invoice, InvoiceId, InvoiceStatus, LenientNumber, User, UserId,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoicePayload {
    pub customer_id: CustomerId,
    pub amount: Cents,
    pub status: InvoiceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPayload {
    pub name: String,
    pub email: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserByEmailRequest<'a> {
    pub email: &'a str,
}

fn normalized_status<'de, D>(deserializer: D) -> Result<InvoiceStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(InvoiceStatus::normalize(raw.as_deref().unwrap_or_default()))
}

fn lenient_number<E: de::Error>(raw: LenientNumber, what: &str) -> Result<i64, E> {
    raw.to_i64()
        .ok_or_else(|| E::custom(format!("{what} is not a number in range: {raw:?}")))
}

/// Absent or `null` counts are zero; negative or non-numeric ones are decode errors.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<LenientNumber>::deserialize(deserializer)? else {
        return Ok(0);
    };
    let value = lenient_number(raw, "count")?;
    u64::try_from(value).map_err(|_| de::Error::custom(format!("count is negative: {value}")))
}

fn lenient_cents<'de, D>(deserializer: D) -> Result<Cents, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<LenientNumber>::deserialize(deserializer)? {
        Some(raw) => lenient_number(raw, "amount").map(Cents),
        None => Ok(Cents::ZERO),
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_number(LenientNumber::deserialize(deserializer)?, "value")
}

/// `GET /invoices/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceRecord {
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    pub amount: Cents,
    #[serde(deserialize_with = "normalized_status")]
    pub status: InvoiceStatus,
    #[serde(default, alias = "created_at")]
    pub date: Option<String>,
}

impl From<InvoiceRecord> for Invoice {
    fn from(value: InvoiceRecord) -> Self {
        Self {
            id: value.id,
            customer_id: value.customer_id,
            amount: value.amount,
            status: value.status,
            date: value.date,
        }
    }
}

/// `GET /customers/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

impl From<CustomerRecord> for Customer {
    fn from(value: CustomerRecord) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            image_url: value.image_url,
        }
    }
}

/// `GET /invoices/paged/latest_invoices`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestInvoice {
    pub id: InvoiceId,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: Cents,
}

/// `GET /invoices/paged/search_invoices`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRow {
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    pub name: String,
    pub email: String,
    pub image_url: String,
    #[serde(default, alias = "created_at")]
    pub date: Option<String>,
    pub amount: Cents,
    #[serde(deserialize_with = "normalized_status")]
    pub status: InvoiceStatus,
}

/// `GET /customers/paged/search_customers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRow {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub image_url: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_invoices: u64,
    #[serde(default, deserialize_with = "lenient_cents")]
    pub total_pending: Cents,
    #[serde(default, deserialize_with = "lenient_cents")]
    pub total_paid: Cents,
}

/// Entry of the customer select box on invoice forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerField {
    pub id: CustomerId,
    pub name: String,
}

/// `GET /revenues`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revenue {
    pub month: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub revenue: i64,
}

/// `GET /{resource}/paged/search_count`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountResponse {
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: u64,
}

/// `GET /dashboard/counts`; every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    #[serde(default, deserialize_with = "lenient_count")]
    pub number_of_customers: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub number_of_invoices: u64,
    #[serde(default, deserialize_with = "lenient_cents")]
    pub total_paid_invoices: Cents,
    #[serde(default, deserialize_with = "lenient_cents")]
    pub total_pending_invoices: Cents,
}

/// `POST /users/by/email`
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl From<UserRecord> for User {
    fn from(value: UserRecord) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            password: value.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn card_summary_defaults_missing_and_null_fields_to_zero() {
        let summary: CardSummary =
            serde_json::from_value(json!({ "numberOfInvoices": "12", "totalPaidInvoices": null }))
                .expect("decode");
        assert_eq!(summary.number_of_invoices, 12);
        assert_eq!(summary.number_of_customers, 0);
        assert_eq!(summary.total_paid_invoices, Cents::ZERO);
        assert_eq!(summary.total_pending_invoices, Cents::ZERO);
    }

    #[test]
    fn invoice_row_normalizes_unknown_status_to_pending() {
        let row: InvoiceRow = serde_json::from_value(json!({
            "id": 3,
            "customer_id": "c1",
            "name": "Lee",
            "email": "lee@example.com",
            "image_url": "/lee.png",
            "created_at": "2024-01-02",
            "amount": "1500",
            "status": "overdue"
        }))
        .expect("decode");
        assert_eq!(row.id, InvoiceId::new("3"));
        assert_eq!(row.status, InvoiceStatus::Pending);
        assert_eq!(row.amount, Cents(1500));
        assert_eq!(row.date.as_deref(), Some("2024-01-02"));
    }

    #[test]
    fn invoice_record_rejects_non_numeric_amount() {
        let err = serde_json::from_value::<InvoiceRecord>(json!({
            "id": "i1",
            "customer_id": "c1",
            "amount": "lots",
            "status": "paid"
        }))
        .expect_err("must fail");
        assert!(err.to_string().contains("not numeric"), "{err}");
    }

    #[test]
    fn out_of_range_amounts_are_decode_errors() {
        let err = serde_json::from_value::<InvoiceRecord>(json!({
            "id": "i1",
            "customer_id": "c1",
            "amount": 1e30,
            "status": "paid"
        }))
        .expect_err("must fail");
        assert!(err.to_string().contains("out of range"), "{err}");

        let err = serde_json::from_value::<CardSummary>(json!({ "totalPaidInvoices": "1e30" }))
            .expect_err("must fail");
        assert!(err.to_string().contains("amount"), "{err}");
    }

    #[test]
    fn garbage_aggregates_are_decode_errors_not_zero() {
        assert!(serde_json::from_value::<CardSummary>(json!({ "numberOfInvoices": "many" })).is_err());
        assert!(serde_json::from_value::<CardSummary>(json!({ "numberOfCustomers": -3 })).is_err());
        assert!(serde_json::from_value::<CountResponse>(json!({ "count": "n/a" })).is_err());
    }

    #[test]
    fn revenue_keeps_sign_and_rejects_garbage() {
        let loss: Revenue =
            serde_json::from_value(json!({ "month": "Feb", "revenue": "-1200" })).expect("decode");
        assert_eq!(loss.revenue, -1200);

        let err = serde_json::from_value::<Revenue>(json!({ "month": "Mar", "revenue": "lots" }))
            .expect_err("must fail");
        assert!(err.to_string().contains("not a number"), "{err}");
        assert!(serde_json::from_value::<Revenue>(json!({ "month": "Apr", "revenue": null })).is_err());
    }

    #[test]
    fn invoice_payload_serializes_cents_as_integer() {
        let body = serde_json::to_value(InvoicePayload {
            customer_id: CustomerId::new("c1"),
            amount: Cents(4250),
            status: InvoiceStatus::Pending,
        })
        .expect("encode");
        assert_eq!(
            body,
            json!({ "customer_id": "c1", "amount": 4250, "status": "pending" })
        );
    }
}
