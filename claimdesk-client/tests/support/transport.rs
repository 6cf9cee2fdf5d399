//! Scripted in-memory transport.
//!
//! Each endpoint has a queue of scripted results consumed in order. An
//! unscripted call parks forever, which both fails misconfigured tests fast
//! (under `start_paused` time) and lets cancellation tests hold an update
//! in flight indefinitely. Transient failures are scripted as 5xx API
//! errors, matching the client's transient classification.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use claimdesk_client::{ClaimTransport, ClientError};
use claimdesk_core::{
    ChangeLogEntry, Claim, ClaimId, Envelope, HistoryFilters, Page, SearchFilters,
};

type Scripted<T> = Result<Envelope<T>, u16>;

#[derive(Default)]
struct Inner {
    puts: Mutex<VecDeque<Scripted<Claim>>>,
    gets: Mutex<VecDeque<Scripted<Claim>>>,
    lists: Mutex<VecDeque<Scripted<Vec<Claim>>>>,
    histories: Mutex<VecDeque<Scripted<Vec<ChangeLogEntry>>>>,
    put_bodies: Mutex<Vec<JsonValue>>,
    put_count: AtomicU32,
    get_count: AtomicU32,
}

/// Cloneable handle; clones share the same scripts and counters.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Inner>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_put_ok(&self, claim: Claim) -> &Self {
        self.inner.puts.lock().unwrap().push_back(Ok(Envelope::ok(claim)));
        self
    }

    pub fn script_put_failure(&self, status: u16) -> &Self {
        self.inner.puts.lock().unwrap().push_back(Err(status));
        self
    }

    pub fn script_get_ok(&self, claim: Claim) -> &Self {
        self.inner.gets.lock().unwrap().push_back(Ok(Envelope::ok(claim)));
        self
    }

    pub fn script_get_null(&self) -> &Self {
        self.inner.gets.lock().unwrap().push_back(Ok(Envelope::ok_or_null(None)));
        self
    }

    pub fn script_get_failure(&self, status: u16) -> &Self {
        self.inner.gets.lock().unwrap().push_back(Err(status));
        self
    }

    pub fn script_list_ok(&self, claims: Vec<Claim>) -> &Self {
        self.inner.lists.lock().unwrap().push_back(Ok(Envelope::ok(claims)));
        self
    }

    pub fn script_history_ok(&self, entries: Vec<ChangeLogEntry>) -> &Self {
        self.inner
            .histories
            .lock()
            .unwrap()
            .push_back(Ok(Envelope::ok(entries)));
        self
    }

    pub fn put_count(&self) -> u32 {
        self.inner.put_count.load(Ordering::SeqCst)
    }

    pub fn get_count(&self) -> u32 {
        self.inner.get_count.load(Ordering::SeqCst)
    }

    pub fn put_bodies(&self) -> Vec<JsonValue> {
        self.inner.put_bodies.lock().unwrap().clone()
    }
}

fn take<T>(queue: &Mutex<VecDeque<Scripted<T>>>) -> Option<Scripted<T>> {
    queue.lock().unwrap().pop_front()
}

async fn resolve<T>(scripted: Option<Scripted<T>>) -> Result<Envelope<T>, ClientError> {
    match scripted {
        Some(Ok(envelope)) => Ok(envelope),
        Some(Err(status)) => Err(ClientError::Api {
            status,
            message: format!("scripted failure {}", status),
        }),
        // Unscripted: park until the caller gives up or is cancelled.
        None => std::future::pending().await,
    }
}

#[async_trait]
impl ClaimTransport for ScriptedTransport {
    async fn get_claim(&self, _id: ClaimId) -> Result<Envelope<Claim>, ClientError> {
        self.inner.get_count.fetch_add(1, Ordering::SeqCst);
        resolve(take(&self.inner.gets)).await
    }

    async fn list_claims(
        &self,
        _filters: &SearchFilters,
    ) -> Result<Envelope<Vec<Claim>>, ClientError> {
        resolve(take(&self.inner.lists)).await
    }

    async fn put_claim(
        &self,
        _id: ClaimId,
        body: &JsonValue,
    ) -> Result<Envelope<Claim>, ClientError> {
        self.inner.put_count.fetch_add(1, Ordering::SeqCst);
        self.inner.put_bodies.lock().unwrap().push(body.clone());
        resolve(take(&self.inner.puts)).await
    }

    async fn claim_history(
        &self,
        _id: ClaimId,
    ) -> Result<Envelope<Vec<ChangeLogEntry>>, ClientError> {
        resolve(take(&self.inner.histories)).await
    }

    async fn history_all(
        &self,
        _filters: &HistoryFilters,
        _page: Page,
    ) -> Result<Envelope<Vec<ChangeLogEntry>>, ClientError> {
        resolve(take(&self.inner.histories)).await
    }
}
