//! The lookup widget's state: the query being typed, the last result and the
//! last error.
//!
//! A search is split in two so the host can run the network call wherever it
//! likes: [`WeatherWidget::begin_search`] validates and resets, handing out a
//! [`SearchTicket`]; [`WeatherWidget::complete`] applies the outcome for that
//! ticket. Only the most recently issued ticket is honoured, so a slow
//! response from an earlier search can never overwrite a newer one.

use tracing::{debug, warn};

use crate::{WeatherError, WeatherProvider, WeatherResult};

/// Where the latest search invocation ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// No search has been started yet.
    #[default]
    Idle,
    /// The query was blank; no request was made.
    Rejected,
    Fetching,
    Succeeded,
    Failed,
}

/// Identifies one in-flight fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    city: String,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// City to request, already trimmed.
    pub fn city(&self) -> &str {
        &self.city
    }
}

#[derive(Debug, Default)]
pub struct WeatherWidget {
    query: String,
    result: Option<WeatherResult>,
    error: Option<String>,
    phase: SearchPhase,
    issued: u64,
}

impl WeatherWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the query. No validation happens until a search starts.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    pub fn result(&self) -> Option<&WeatherResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Start a search for the current query.
    ///
    /// Every call supersedes tickets issued earlier. Returns `None` when the
    /// query is blank, in which case the widget already shows the rejection.
    pub fn begin_search(&mut self) -> Option<SearchTicket> {
        self.issued += 1;
        self.result = None;

        let city = self.query.trim();
        if city.is_empty() {
            debug!(seq = self.issued, "rejecting blank query");
            self.error = Some(WeatherError::EmptyInput.user_message().to_string());
            self.phase = SearchPhase::Rejected;
            return None;
        }

        self.error = None;
        self.phase = SearchPhase::Fetching;

        Some(SearchTicket {
            seq: self.issued,
            city: city.to_string(),
        })
    }

    /// Apply the outcome of the fetch identified by `ticket`.
    ///
    /// Returns `false` and leaves the state untouched if a newer search has
    /// started since the ticket was issued.
    pub fn complete(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<WeatherResult, WeatherError>,
    ) -> bool {
        if ticket.seq != self.issued {
            debug!(
                seq = ticket.seq,
                latest = self.issued,
                city = %ticket.city,
                "discarding stale weather response"
            );
            return false;
        }

        match outcome {
            Ok(result) => {
                debug!(city = %result.city, "weather lookup succeeded");
                self.result = Some(result);
                self.error = None;
                self.phase = SearchPhase::Succeeded;
            }
            Err(err) => {
                warn!(city = %ticket.city, error = %err, "weather lookup failed");
                self.result = None;
                self.error = Some(err.user_message().to_string());
                self.phase = SearchPhase::Failed;
            }
        }

        true
    }

    /// Run a whole search against `provider`, waiting for the response.
    pub async fn search<P>(&mut self, provider: &P)
    where
        P: WeatherProvider + ?Sized,
    {
        let Some(ticket) = self.begin_search() else {
            return;
        };

        let outcome = provider.current_weather(ticket.city()).await;
        self.complete(&ticket, outcome);
    }
}
