// ── In-memory gateway ──
//
// A complete `Gateway` backed by process memory: registered tables with
// generated ids, to-one embeds, a refuse-overwrite object store and a
// password table for auth. Every call is logged, and failures can be
// injected per operation and target, so store behavior under partial
// failure is testable without a network.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::DateTime;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use crate::auth::{Session, User};
use crate::error::Error;
use crate::gateway::{Gateway, UploadOptions};
use crate::query::{Filter, Order, Select};
use crate::row::Row;

const PUBLIC_BASE: &str = "http://memory.local";

/// First logical timestamp handed out for `created_at`.
const EPOCH_SECS: i64 = 1_700_000_000;

// ── Public types ─────────────────────────────────────────────────────

/// How a table generates its primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// `bigserial`-style integers starting at 1.
    Serial,
    /// Opaque text ids, unique per table.
    Uuid,
}

/// Gateway operations, as recorded in the call log and targeted by faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
    Upload,
    Remove,
    GetSession,
    SignIn,
    SignOut,
}

/// One logged gateway call: the operation and its table or bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub operation: Operation,
    pub target: String,
}

// ── Internal state ───────────────────────────────────────────────────

struct Table {
    id_kind: IdKind,
    defaults: Row,
    rows: Vec<Row>,
    next_id: i64,
}

struct Fault {
    operation: Operation,
    target: Option<String>,
    message: String,
    /// `None` fails forever; `Some(n)` fails the next `n` matching calls.
    remaining: Option<usize>,
    /// Matching calls let through before the fault arms.
    skip: usize,
}

#[derive(Default)]
struct MemoryState {
    tables: BTreeMap<String, Table>,
    objects: BTreeMap<(String, String), Bytes>,
    credentials: HashMap<String, String>,
    faults: Vec<Fault>,
    calls: Vec<Call>,
    clock: i64,
    tokens: u64,
}

impl MemoryState {
    /// Log the call, then fail it if a fault matches.
    fn enter(&mut self, operation: Operation, target: &str) -> Result<(), Error> {
        self.calls.push(Call {
            operation,
            target: target.to_owned(),
        });

        let Some(idx) = self.faults.iter().position(|f| {
            f.operation == operation && f.target.as_deref().is_none_or(|t| t == target)
        }) else {
            return Ok(());
        };

        if self.faults[idx].skip > 0 {
            self.faults[idx].skip -= 1;
            return Ok(());
        }

        let message = self.faults[idx].message.clone();
        if let Some(remaining) = self.faults[idx].remaining.as_mut() {
            *remaining -= 1;
            if *remaining == 0 {
                self.faults.remove(idx);
            }
        }

        debug!(?operation, target, "injected failure");
        Err(match operation {
            Operation::Upload | Operation::Remove => Error::Storage {
                message,
                status: 500,
            },
            Operation::GetSession | Operation::SignIn | Operation::SignOut => {
                Error::Authentication { message }
            }
            _ => Error::Api {
                message,
                code: None,
                status: 500,
            },
        })
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut Table, Error> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| Error::table_missing(name))
    }

    fn table(&self, name: &str) -> Result<&Table, Error> {
        self.tables.get(name).ok_or_else(|| Error::table_missing(name))
    }

    fn tick(&mut self) -> String {
        self.clock += 1;
        DateTime::from_timestamp(EPOCH_SECS + self.clock, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_default()
    }
}

// ── Gateway ──────────────────────────────────────────────────────────

/// An in-process gateway for tests and offline use.
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
    session: watch::Sender<Option<Session>>,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGateway {
    pub fn new() -> Self {
        let (session, _) = watch::channel(None);
        Self {
            state: Mutex::new(MemoryState::default()),
            session,
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Setup ────────────────────────────────────────────────────────

    /// Register a table. Tables that are never registered do not exist.
    pub fn with_table(self, name: &str, id_kind: IdKind) -> Self {
        self.with_table_defaults(name, id_kind, Row::new())
    }

    /// Register a table whose inserts fill in `defaults` for absent columns.
    pub fn with_table_defaults(self, name: &str, id_kind: IdKind, defaults: Row) -> Self {
        self.state().tables.insert(
            name.to_owned(),
            Table {
                id_kind,
                defaults,
                rows: Vec::new(),
                next_id: 1,
            },
        );
        self
    }

    /// Accept `email` / `password` at sign-in.
    pub fn with_user(self, email: &str, password: &str) -> Self {
        self.state()
            .credentials
            .insert(email.to_owned(), password.to_owned());
        self
    }

    /// Insert rows directly, bypassing the call log and faults.
    pub fn seed(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, Error> {
        let mut state = self.state();
        insert_into(&mut state, table, rows)
    }

    /// Fail every matching call until [`clear_faults`](Self::clear_faults).
    ///
    /// `target` is a table or bucket name; `None` matches any target.
    pub fn fail(&self, operation: Operation, target: Option<&str>, message: &str) {
        self.push_fault(operation, target, message, None);
    }

    /// Fail only the next matching call.
    pub fn fail_once(&self, operation: Operation, target: Option<&str>, message: &str) {
        self.push_fault(operation, target, message, Some(1));
    }

    /// Let `skip` matching calls succeed, then fail the next one.
    pub fn fail_after(&self, skip: usize, operation: Operation, target: Option<&str>, message: &str) {
        self.push_fault(operation, target, message, Some(1));
        if let Some(fault) = self.state().faults.last_mut() {
            fault.skip = skip;
        }
    }

    fn push_fault(
        &self,
        operation: Operation,
        target: Option<&str>,
        message: &str,
        remaining: Option<usize>,
    ) {
        self.state().faults.push(Fault {
            operation,
            target: target.map(str::to_owned),
            message: message.to_owned(),
            remaining,
            skip: 0,
        });
    }

    pub fn clear_faults(&self) {
        self.state().faults.clear();
    }

    /// Replace the live session, as a token refresh or expiry would.
    pub fn set_session(&self, session: Option<Session>) {
        self.session.send_replace(session);
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// Current rows of a table, in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.state()
            .tables
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    pub fn object(&self, bucket: &str, path: &str) -> Option<Bytes> {
        self.state()
            .objects
            .get(&(bucket.to_owned(), path.to_owned()))
            .cloned()
    }

    /// All object paths in a bucket, sorted.
    pub fn object_paths(&self, bucket: &str) -> Vec<String> {
        self.state()
            .objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Number of logged calls of `operation` against `target`.
    pub fn call_count(&self, operation: Operation, target: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.operation == operation && c.target == target)
            .count()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }
}

// ── Row helpers ──────────────────────────────────────────────────────

fn insert_into(state: &mut MemoryState, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, Error> {
    // Validate before ticking the clock so a failed insert leaves no trace.
    state.table(table)?;
    let mut stored = Vec::with_capacity(rows.len());
    for mut row in rows {
        let created_at = state.tick();
        let t = state.table_mut(table)?;
        for (k, v) in &t.defaults {
            row.entry(k.clone()).or_insert_with(|| v.clone());
        }
        if !row.contains_key("id") {
            let id = match t.id_kind {
                IdKind::Serial => Value::from(t.next_id),
                IdKind::Uuid => Value::from(format!("{table}-{:04}", t.next_id)),
            };
            t.next_id += 1;
            row.insert("id".into(), id);
        }
        row.entry("created_at").or_insert_with(|| created_at.into());
        t.rows.push(row.clone());
        stored.push(row);
    }
    Ok(stored)
}

fn matches_all(row: &Row, filters: &[Filter]) -> bool {
    filters.iter().all(|f| f.matches(row))
}

/// Postgres-like ordering: numbers numerically, strings lexically, nulls last.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

fn sort_rows(rows: &mut [Row], order: &[Order]) {
    rows.sort_by(|a, b| {
        order
            .iter()
            .map(|o| {
                let ord = compare_values(a.get(&o.column), b.get(&o.column));
                if o.ascending { ord } else { ord.reverse() }
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn select(&self, query: &Select) -> Result<Vec<Row>, Error> {
        let mut state = self.state();
        state.enter(Operation::Select, &query.table)?;

        let mut rows: Vec<Row> = state
            .table(&query.table)?
            .rows
            .iter()
            .filter(|r| matches_all(r, &query.filters))
            .cloned()
            .collect();

        for embed in &query.embeds {
            let target = state.table(&embed.table)?;
            for row in &mut rows {
                let embedded = row
                    .get(&embed.column)
                    .and_then(|fk| target.rows.iter().find(|t| t.get("id") == Some(fk)))
                    .map_or(Value::Null, |t| Value::Object(t.clone()));
                row.insert(embed.alias.clone(), embedded);
            }
        }

        sort_rows(&mut rows, &query.order);
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, Error> {
        let mut state = self.state();
        state.enter(Operation::Insert, table)?;
        insert_into(&mut state, table, rows)
    }

    async fn update(&self, table: &str, patch: Row, filters: &[Filter]) -> Result<(), Error> {
        let mut state = self.state();
        state.enter(Operation::Update, table)?;
        let t = state.table_mut(table)?;
        for row in t.rows.iter_mut().filter(|r| matches_all(r, filters)) {
            for (k, v) in &patch {
                row.insert(k.clone(), v.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), Error> {
        let mut state = self.state();
        state.enter(Operation::Delete, table)?;
        let t = state.table_mut(table)?;
        t.rows.retain(|r| !matches_all(r, filters));
        Ok(())
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: &UploadOptions,
    ) -> Result<(), Error> {
        let mut state = self.state();
        state.enter(Operation::Upload, bucket)?;
        let key = (bucket.to_owned(), path.to_owned());
        if !options.upsert && state.objects.contains_key(&key) {
            return Err(Error::Storage {
                message: "The resource already exists".into(),
                status: 409,
            });
        }
        state.objects.insert(key, data);
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{PUBLIC_BASE}/storage/v1/object/public/{bucket}/{path}")
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), Error> {
        let mut state = self.state();
        state.enter(Operation::Remove, bucket)?;
        for path in paths {
            state.objects.remove(&(bucket.to_owned(), path.clone()));
        }
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, Error> {
        self.state().enter(Operation::GetSession, "auth")?;
        Ok(self.session.borrow().clone())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, Error> {
        let session = {
            let mut state = self.state();
            state.enter(Operation::SignIn, "auth")?;
            let accepted = state
                .credentials
                .get(email)
                .is_some_and(|p| p == password.expose_secret());
            if !accepted {
                return Err(Error::Authentication {
                    message: "Invalid login credentials".into(),
                });
            }
            state.tokens += 1;
            Session::new(
                format!("memory-token-{}", state.tokens),
                User {
                    id: format!("user:{email}"),
                    email: Some(email.to_owned()),
                },
            )
        };
        self.session.send_replace(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), Error> {
        self.state().enter(Operation::SignOut, "auth")?;
        self.session.send_replace(None);
        Ok(())
    }

    fn subscribe_auth(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }
}
