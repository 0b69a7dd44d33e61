//! Seams between the screen controllers and the remote API.

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::{FleetClient, Resource};
use crate::controller::FetchTicket;
use crate::envelope::PageEnvelope;
use crate::error::ConsoleError;
use crate::export::ExportFormat;
use crate::models::{Report, ReportKind};
use crate::report::{ReportPeriod, ReportTicket};

/// Source of server-paged rows.
pub trait ListEndpoint<T>: Send + Sync + 'static {
    fn fetch_page(
        &self,
        ticket: &FetchTicket,
    ) -> impl Future<Output = Result<PageEnvelope<T>, ConsoleError>> + Send;
}

/// Source of one report payload.
pub trait ReportEndpoint<R>: Send + Sync + 'static {
    fn fetch_report(
        &self,
        ticket: &ReportTicket,
    ) -> impl Future<Output = Result<R, ConsoleError>> + Send;
}

/// Source of rendered report files.
pub trait ExportEndpoint: Send + Sync {
    fn download(
        &self,
        kind: ReportKind,
        period: Option<&ReportPeriod>,
        format: ExportFormat,
    ) -> impl Future<Output = Result<Vec<u8>, ConsoleError>> + Send;
}

impl<T> ListEndpoint<T> for Resource<T>
where
    T: DeserializeOwned + Serialize + Send + Sync + 'static,
{
    fn fetch_page(
        &self,
        ticket: &FetchTicket,
    ) -> impl Future<Output = Result<PageEnvelope<T>, ConsoleError>> + Send {
        self.list_page(ticket)
    }
}

impl<R: Report> ReportEndpoint<R> for FleetClient {
    fn fetch_report(
        &self,
        ticket: &ReportTicket,
    ) -> impl Future<Output = Result<R, ConsoleError>> + Send {
        self.fetch_report_for(ticket)
    }
}

impl ExportEndpoint for FleetClient {
    fn download(
        &self,
        kind: ReportKind,
        period: Option<&ReportPeriod>,
        format: ExportFormat,
    ) -> impl Future<Output = Result<Vec<u8>, ConsoleError>> + Send {
        self.export_bytes(kind, period, format)
    }
}
