// Ticket endpoints
//
// The `pay_ticket` update is conditional on `status=eq.Active`, so a ticket
// paid concurrently by another officer comes back as `None` instead of
// being charged twice.

use tracing::debug;
use uuid::Uuid;

use super::TICKETS;
use crate::client::RestClient;
use crate::error::Error;
use crate::models::{NewTicketRecord, TicketPaymentPatch, TicketRecord};
use crate::query::Query;

impl RestClient {
    /// List tickets, newest first, optionally filtered by stored status.
    ///
    /// `GET /rest/v1/tickets?order=created_at.desc[&status=eq.{status}]`
    pub async fn list_tickets(&self, status: Option<&str>) -> Result<Vec<TicketRecord>, Error> {
        let mut query = Query::new();
        if let Some(status) = status {
            query = query.eq("status", status);
        }
        let query = query.order("created_at", true);
        debug!(?status, "listing tickets");
        self.select(TICKETS, &query).await
    }

    /// Fetch one ticket by id.
    pub async fn get_ticket(&self, id: Uuid) -> Result<Option<TicketRecord>, Error> {
        let query = Query::new().eq("id", id).limit(1);
        let mut rows: Vec<TicketRecord> = self.select(TICKETS, &query).await?;
        Ok(rows.pop())
    }

    /// Insert a ticket and return the stored row.
    pub async fn insert_ticket(&self, ticket: &NewTicketRecord) -> Result<TicketRecord, Error> {
        debug!(plate = %ticket.license_plate, spot = %ticket.spot_id, "inserting ticket");
        let rows: Vec<TicketRecord> = self.insert(TICKETS, ticket).await?;
        first_row(rows, TICKETS)
    }

    /// Mark an Active ticket paid. `None` if the ticket is gone or no
    /// longer Active.
    ///
    /// `PATCH /rest/v1/tickets?id=eq.{id}&status=eq.Active`
    pub async fn pay_ticket(
        &self,
        id: Uuid,
        patch: &TicketPaymentPatch,
    ) -> Result<Option<TicketRecord>, Error> {
        let query = Query::new().eq("id", id).eq("status", "Active");
        debug!(%id, fine = %patch.fine_amount, "marking ticket paid");
        let mut rows: Vec<TicketRecord> = self.update(TICKETS, &query, patch).await?;
        Ok(rows.pop())
    }

    /// Delete a ticket, returning the removed row if it existed.
    pub async fn delete_ticket(&self, id: Uuid) -> Result<Option<TicketRecord>, Error> {
        let query = Query::new().eq("id", id);
        debug!(%id, "deleting ticket");
        let mut rows: Vec<TicketRecord> = self.delete(TICKETS, &query).await?;
        Ok(rows.pop())
    }
}

/// Take the single row of a `return=representation` response.
pub(super) fn first_row<T>(rows: Vec<T>, table: &str) -> Result<T, Error> {
    rows.into_iter().next().ok_or_else(|| Error::Deserialization {
        message: format!("store returned no representation for {table} write"),
        body: String::new(),
    })
}
