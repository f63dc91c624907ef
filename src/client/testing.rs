//! Scripted transport for exercising retry and dispatch logic offline

use crate::client::transport::{Transport, TransportError, TransportResponse};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type Reply = Result<TransportResponse, TransportError>;

/// What the transport answers
pub enum FetchScript {
    /// Same reply for every call
    Always(Reply),

    /// Replies in order; the last one repeats once the list runs out
    Sequence(Vec<Reply>),

    /// Per-URL replies; unknown URLs get a 404
    PerUrl(HashMap<String, Reply>),
}

pub struct ScriptedTransport {
    script: Mutex<(FetchScript, VecDeque<Reply>)>,
    latency: Duration,
    first_latency: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    proxies_seen: Mutex<Vec<Option<String>>>,
}

impl ScriptedTransport {
    pub fn new(script: FetchScript) -> Self {
        let queue = match &script {
            FetchScript::Sequence(replies) => replies.iter().cloned().collect(),
            _ => VecDeque::new(),
        };
        Self {
            script: Mutex::new((script, queue)),
            latency: Duration::ZERO,
            first_latency: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            proxies_seen: Mutex::new(Vec::new()),
        }
    }

    /// Every call sleeps this long before replying
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Only the first call sleeps this long
    pub fn with_latency_for_first(mut self, latency: Duration) -> Self {
        self.first_latency = Some(latency);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn proxies_seen(&self) -> Vec<Option<String>> {
        self.proxies_seen.lock().unwrap().clone()
    }

    fn next_reply(&self, url: &str) -> Reply {
        let mut guard = self.script.lock().unwrap();
        let (script, queue) = &mut *guard;
        match script {
            FetchScript::Always(reply) => reply.clone(),
            FetchScript::Sequence(replies) => {
                if queue.len() > 1 {
                    queue.pop_front().unwrap()
                } else {
                    queue
                        .front()
                        .cloned()
                        .or_else(|| replies.last().cloned())
                        .unwrap_or_else(|| Ok(TransportResponse::new(404, "")))
                }
            }
            FetchScript::PerUrl(map) => map
                .get(url)
                .cloned()
                .unwrap_or_else(|| Ok(TransportResponse::new(404, ""))),
        }
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, proxy: Option<&str>) -> Result<TransportResponse, TransportError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.proxies_seen
            .lock()
            .unwrap()
            .push(proxy.map(str::to_string));
        let reply = self.next_reply(url);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let latency = match (call, self.first_latency) {
            (0, Some(first)) => first,
            _ => self.latency,
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        reply
    }
}
