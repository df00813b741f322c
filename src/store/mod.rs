//! Remote collection store.
//!
//! Holds the authoritative copy of one resource's list (last successful fetch) and the
//! working copy derived from it by the current filter. Loads are tagged with a sequence
//! ticket; a response for anything but the most recently issued load is discarded.

use crate::api::ApiClient;
use crate::errors::AppError;
use crate::models::{Record, Resource};
use crate::search::{self, Facet, Filter};

/// Issued by [`CollectionStore::begin_load`] and handed back with the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
}

impl LoadTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// What happened to a finished load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Both copies replaced; carries the record count
    Applied(usize),
    /// A newer load was issued meanwhile; response ignored
    Stale,
}

#[derive(Debug, Clone)]
pub struct CollectionStore {
    id_field: &'static str,
    authoritative: Vec<Record>,
    working: Vec<Record>,
    filter: Filter,
    issued: u64,
}

impl CollectionStore {
    pub fn new(resource: &Resource) -> Self {
        Self {
            id_field: resource.id_field,
            authoritative: Vec::new(),
            working: Vec::new(),
            filter: Filter {
                deep: resource.deep_search,
                ..Filter::default()
            },
            issued: 0,
        }
    }

    /// Start a load. Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket { seq: self.issued }
    }

    /// Apply the outcome of a load started with `ticket`.
    ///
    /// On failure the previous copies are left as they were and the error is returned.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Record>, AppError>,
    ) -> Result<LoadOutcome, AppError> {
        if ticket.seq != self.issued {
            tracing::debug!(
                ticket = ticket.seq,
                latest = self.issued,
                "discarding stale list response"
            );
            return Ok(LoadOutcome::Stale);
        }

        match result {
            Ok(records) => {
                let count = records.len();
                self.authoritative = records;
                self.refilter();
                Ok(LoadOutcome::Applied(count))
            }
            Err(e) => {
                tracing::error!("Failed to load collection: {}", e);
                Err(e)
            }
        }
    }

    /// Fetch the list and replace both copies.
    pub async fn load(
        &mut self,
        client: &ApiClient,
        resource: &Resource,
    ) -> Result<LoadOutcome, AppError> {
        let ticket = self.begin_load();
        let result = client.list(resource).await;
        self.finish_load(ticket, result)
    }

    /// Re-fetch after a mutation. Same as [`CollectionStore::load`]; stale data stays visible
    /// until the response arrives.
    pub async fn invalidate(
        &mut self,
        client: &ApiClient,
        resource: &Resource,
    ) -> Result<LoadOutcome, AppError> {
        self.load(client, resource).await
    }

    /// Narrow the working copy to records matching `query`. Empty restores the full list.
    pub fn apply_filter(&mut self, query: &str) {
        self.filter.query = query.to_string();
        self.refilter();
    }

    pub fn set_facet(&mut self, facet: Option<Facet>) {
        self.filter.facet = facet;
        self.refilter();
    }

    fn refilter(&mut self) {
        self.working = search::apply(&self.authoritative, &self.filter);
    }

    /// Working copy.
    pub fn records(&self) -> &[Record] {
        &self.working
    }

    /// Authoritative copy.
    pub fn all(&self) -> &[Record] {
        &self.authoritative
    }

    pub fn query(&self) -> &str {
        &self.filter.query
    }

    pub fn facet(&self) -> Option<&Facet> {
        self.filter.facet.as_ref()
    }

    /// Look a record up in the authoritative copy.
    pub fn find(&self, id: &str) -> Option<&Record> {
        self.authoritative
            .iter()
            .find(|r| r.id(self.id_field).as_deref() == Some(id))
    }

    pub fn len(&self) -> usize {
        self.working.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }
}
