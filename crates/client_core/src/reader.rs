//! Read side of the resource API: listings, paging, lookups and aggregates.
//!
//! Every call decodes into the typed records of [`shared::protocol`]. Amounts stay in
//! [`shared::domain::Cents`]; turning them into display strings is left to
//! [`crate::display`].

use serde::Serialize;
use shared::{
    domain::{Customer, Invoice, User},
    protocol::{
        CardSummary, CountResponse, CustomerField, CustomerRecord, CustomerRow, InvoiceRecord,
        InvoiceRow, LatestInvoice, Revenue, UserByEmailRequest, UserRecord,
    },
};
use tracing::info;

use crate::{RemoteError, Resource, ResourceClient};

pub const LATEST_INVOICES_LIMIT: usize = 5;

/// Number of pages needed to show `count` items, `page_size` at a time.
pub fn total_pages(count: u64, page_size: u32) -> u64 {
    count.div_ceil(u64::from(page_size.max(1)))
}

/// Everything the dashboard overview page shows, fetched in one go.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOverview {
    pub cards: CardSummary,
    pub revenue: Vec<Revenue>,
    pub latest_invoices: Vec<LatestInvoice>,
}

impl ResourceClient {
    pub async fn list_latest_invoices(&self) -> Result<Vec<LatestInvoice>, RemoteError> {
        let url = self.endpoint(&["invoices", "paged", "latest_invoices"])?;
        let mut invoices: Vec<LatestInvoice> = self.get_json(url).await?;
        invoices.truncate(LATEST_INVOICES_LIMIT);
        Ok(invoices)
    }

    pub async fn list_filtered_invoices(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<InvoiceRow>, RemoteError> {
        let url = self.search_url(Resource::Invoices, query, page)?;
        self.get_json(url).await
    }

    pub async fn list_filtered_customers(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<CustomerRow>, RemoteError> {
        let url = self.search_url(Resource::Customers, query, page)?;
        self.get_json(url).await
    }

    pub async fn count_invoice_pages(&self, query: &str) -> Result<u64, RemoteError> {
        self.count_pages(Resource::Invoices, query).await
    }

    pub async fn count_customer_pages(&self, query: &str) -> Result<u64, RemoteError> {
        self.count_pages(Resource::Customers, query).await
    }

    pub async fn fetch_invoice_by_id(&self, id: &str) -> Result<Invoice, RemoteError> {
        let url = self.endpoint(&["invoices", id])?;
        let record: InvoiceRecord = self.get_json(url).await?;
        Ok(record.into())
    }

    pub async fn fetch_customer_by_id(&self, id: &str) -> Result<Customer, RemoteError> {
        let url = self.endpoint(&["customers", id])?;
        let record: CustomerRecord = self.get_json(url).await?;
        Ok(record.into())
    }

    /// Customer select-box entries, ordered by name.
    pub async fn fetch_customers(&self) -> Result<Vec<CustomerField>, RemoteError> {
        let url = self.endpoint(&["customers"])?;
        let mut customers: Vec<CustomerField> = self.get_json(url).await?;
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    pub async fn fetch_card_summary(&self) -> Result<CardSummary, RemoteError> {
        let url = self.endpoint(&["dashboard", "counts"])?;
        let summary: Option<CardSummary> = self.get_json(url).await?;
        Ok(summary.unwrap_or_default())
    }

    pub async fn fetch_revenue(&self) -> Result<Vec<Revenue>, RemoteError> {
        let url = self.endpoint(&["revenues"])?;
        self.get_json(url).await
    }

    /// Looks up the account for `email`. No match, as a 404 or a `null` body, is
    /// [`RemoteError::NotFound`] so callers can tell it apart from transport trouble.
    pub async fn fetch_user_by_email(&self, email: &str) -> Result<User, RemoteError> {
        let url = self.endpoint(&["users", "by", "email"])?;
        let url_text = url.to_string();
        let request = Self::with_json_body(self.http().post(url), &UserByEmailRequest { email });
        let response = self.execute(request).await?;
        let record: Option<UserRecord> = Self::decode(response).await?;
        record
            .map(User::from)
            .ok_or(RemoteError::NotFound { url: url_text })
    }

    /// Overview cards, revenue chart and latest invoices; the reads are independent and
    /// run concurrently.
    pub async fn fetch_dashboard_overview(&self) -> Result<DashboardOverview, RemoteError> {
        let (cards, revenue, latest_invoices) = futures::try_join!(
            self.fetch_card_summary(),
            self.fetch_revenue(),
            self.list_latest_invoices(),
        )?;
        Ok(DashboardOverview {
            cards,
            revenue,
            latest_invoices,
        })
    }

    async fn count_pages(&self, resource: Resource, query: &str) -> Result<u64, RemoteError> {
        let mut url = self.endpoint(&[resource.path(), "paged", "search_count"])?;
        url.query_pairs_mut().append_pair("query", query);
        let body: Option<CountResponse> = self.get_json(url).await?;
        let count = body.unwrap_or_default().count;
        let pages = total_pages(count, self.page_size());
        info!(resource = resource.path(), query, count, pages, "reader: counted matches");
        Ok(pages)
    }

    fn search_url(&self, resource: Resource, query: &str, page: u32) -> Result<url::Url, RemoteError> {
        let route = format!("search_{}", resource.path());
        let mut url = self.endpoint(&[resource.path(), "paged", &route])?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("page", &page.max(1).to_string())
            .append_pair("size", &self.page_size().to_string());
        Ok(url)
    }
}

#[cfg(test)]
#[path = "tests/reader_tests.rs"]
mod tests;
