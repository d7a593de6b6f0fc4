//! A scripted in-memory directory that records every call made to it.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;

use crate::{
    config::TlsConfig,
    transport::{Connection, Dialer, TransportError},
    Entry,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Dial(String),
    DialTls(String, bool),
    StartTls,
    Bind(String),
    Search { base: String, filter: String },
    Close,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Call>,
    opened: usize,
    closed: usize,
    fail_dial: bool,
    fail_start_tls: bool,
    fail_search: bool,
    unauthenticated_binds: bool,
    accounts: HashMap<String, String>,
    results: HashMap<String, Vec<Entry>>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeDirectory {
    state: Arc<Mutex<State>>,
}

impl FakeDirectory {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Accept binds as `dn` with `password`. Anonymous binds are always
    /// accepted.
    pub fn account(self, dn: &str, password: &str) -> Self {
        self.state()
            .accounts
            .insert(dn.to_owned(), password.to_owned());
        self
    }

    /// Answer searches using `filter` with `entries`; other filters match
    /// nothing.
    pub fn search_result(self, filter: &str, entries: Vec<Entry>) -> Self {
        self.state().results.insert(filter.to_owned(), entries);
        self
    }

    /// Accept a DN with an empty password, as servers allowing
    /// unauthenticated binds do.
    pub fn unauthenticated_binds(self) -> Self {
        self.state().unauthenticated_binds = true;
        self
    }

    pub fn failing_dial(self) -> Self {
        self.state().fail_dial = true;
        self
    }

    pub fn failing_start_tls(self) -> Self {
        self.state().fail_start_tls = true;
        self
    }

    pub fn failing_search(self) -> Self {
        self.state().fail_search = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn binds(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Bind(dn) => Some(dn.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn searches(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, Call::Search { .. }))
            .count()
    }

    pub fn opened(&self) -> usize {
        self.state().opened
    }

    pub fn closed(&self) -> usize {
        self.state().closed
    }

    fn open(&self, call: Call) -> Result<FakeConnection, TransportError> {
        let mut state = self.state();
        state.calls.push(call);
        if state.fail_dial {
            return Err(TransportError::new("connection refused"));
        }
        state.opened += 1;
        Ok(FakeConnection {
            state: self.state.clone(),
        })
    }
}

#[async_trait]
impl Dialer for FakeDirectory {
    type Conn = FakeConnection;

    async fn dial(&self, host: &str, port: u16) -> Result<FakeConnection, TransportError> {
        self.open(Call::Dial(format!("{host}:{port}")))
    }

    async fn dial_tls(
        &self,
        host: &str,
        port: u16,
        tls: Option<&TlsConfig>,
    ) -> Result<FakeConnection, TransportError> {
        let allow_invalid_certs = tls.is_some_and(|tls| tls.allow_invalid_certs);
        self.open(Call::DialTls(format!("{host}:{port}"), allow_invalid_certs))
    }
}

#[derive(Debug)]
pub struct FakeConnection {
    state: Arc<Mutex<State>>,
}

impl FakeConnection {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl Connection for FakeConnection {
    async fn start_tls(&mut self, _tls: Option<&TlsConfig>) -> Result<(), TransportError> {
        let mut state = self.state();
        state.calls.push(Call::StartTls);
        if state.fail_start_tls {
            return Err(TransportError::new("tls handshake failed"));
        }
        Ok(())
    }

    async fn bind(&mut self, dn: &str, password: &str) -> Result<(), TransportError> {
        let mut state = self.state();
        state.calls.push(Call::Bind(dn.to_owned()));

        let anonymous = dn.is_empty() && password.is_empty();
        let unauthenticated = password.is_empty() && state.unauthenticated_binds;
        if anonymous || unauthenticated || state.accounts.get(dn).is_some_and(|p| p == password) {
            Ok(())
        } else {
            Err(TransportError::new("invalidCredentials (49)"))
        }
    }

    async fn search(&mut self, base: &str, filter: &str) -> Result<Vec<Entry>, TransportError> {
        let mut state = self.state();
        state.calls.push(Call::Search {
            base: base.to_owned(),
            filter: filter.to_owned(),
        });
        if state.fail_search {
            return Err(TransportError::new("operationsError (1)"));
        }
        Ok(state.results.get(filter).cloned().unwrap_or_default())
    }

    async fn close(&mut self) {
        let mut state = self.state();
        state.calls.push(Call::Close);
        state.closed += 1;
    }
}
