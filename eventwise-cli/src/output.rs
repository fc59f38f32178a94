//! JSON documents printed by the CLI.

use std::io::Write;

use chrono::NaiveDate;
use eventwise_core::{Event, PreferenceSnapshot};
use serde::Serialize;

use crate::CliError;

/// One event as printed in listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventSummary<'a> {
    pub(crate) id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) category: Option<&'a str>,
    pub(crate) date: Option<NaiveDate>,
    pub(crate) rating: f64,
    pub(crate) registrations: u32,
    pub(crate) society: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) score: Option<f64>,
}

impl<'a> EventSummary<'a> {
    pub(crate) fn new(event: &'a Event) -> Self {
        Self {
            id: event.id.as_str(),
            title: &event.title,
            category: event.category(),
            date: event.date,
            rating: event.rating,
            registrations: event.registrations,
            society: &event.society,
            score: None,
        }
    }

    pub(crate) const fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// Ranked or filtered events.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventListing<'a> {
    pub(crate) events: Vec<EventSummary<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) active_filters: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) notice: Option<String>,
}

impl<'a> EventListing<'a> {
    pub(crate) const fn new(events: Vec<EventSummary<'a>>) -> Self {
        Self {
            events,
            active_filters: None,
            notice: None,
        }
    }
}

/// Outcome of a preference mutation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InteractionReport<'a> {
    pub(crate) action: &'static str,
    pub(crate) event: &'a str,
    pub(crate) changed: bool,
    pub(crate) preferences: &'a PreferenceSnapshot,
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
