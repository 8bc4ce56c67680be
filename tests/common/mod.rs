#![allow(dead_code)]

// std
use std::{
	collections::{HashMap, VecDeque},
	sync::Arc,
	time::Duration,
};
// crates.io
use parking_lot::Mutex;
// self
use modiva_client::{
	auth::TokenSecret,
	client::ApiClient,
	config::ClientConfig,
	http::{HttpTransport, TransportFailure, TransportFuture, TransportRequest, TransportResponse},
	serde_json::{Value, json},
	session::Session,
	store::{CredentialStore, MemoryStore, StorageKey},
};

pub const BASE_URL: &str = "https://api.modiva.test/v1";
pub const REFRESH_PATH: &str = "/v1/auth/refresh";

/// Canned outcome for one scripted exchange.
#[derive(Clone, Debug)]
pub enum Reply {
	Respond(TransportResponse),
	Timeout,
	NoResponse,
}
impl Reply {
	pub fn json(status: u16, body: Value) -> Self {
		Self::Respond(TransportResponse::json(status, &body))
	}

	pub fn ok(body: Value) -> Self {
		Self::json(200, body)
	}

	pub fn unauthorized() -> Self {
		Self::json(401, json!({ "message": "Token expired" }))
	}
}

type Handler = Arc<dyn Fn(&TransportRequest) -> Reply + Send + Sync>;

/// In-process transport that replays scripted replies and records every request it sees.
///
/// Routes are keyed by URL path. Queued replies are consumed in order and the last one repeats;
/// handlers compute a reply from the request (for example from its bearer header).
#[derive(Default)]
pub struct ScriptedTransport {
	queues: Mutex<HashMap<String, VecDeque<Reply>>>,
	handlers: Mutex<HashMap<String, Handler>>,
	delays: Mutex<HashMap<String, Duration>>,
	requests: Mutex<Vec<TransportRequest>>,
}
impl ScriptedTransport {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn push(&self, path: &str, reply: Reply) {
		self.queues.lock().entry(path.to_owned()).or_default().push_back(reply);
	}

	pub fn handle<F>(&self, path: &str, handler: F)
	where
		F: 'static + Fn(&TransportRequest) -> Reply + Send + Sync,
	{
		self.handlers.lock().insert(path.to_owned(), Arc::new(handler));
	}

	pub fn delay(&self, path: &str, delay: Duration) {
		self.delays.lock().insert(path.to_owned(), delay);
	}

	pub fn requests(&self) -> Vec<TransportRequest> {
		self.requests.lock().clone()
	}

	pub fn requests_to(&self, path: &str) -> Vec<TransportRequest> {
		self.requests.lock().iter().filter(|request| request.url.path() == path).cloned().collect()
	}

	pub fn count(&self, path: &str) -> usize {
		self.requests_to(path).len()
	}

	fn reply_for(&self, request: &TransportRequest) -> Reply {
		let path = request.url.path();
		let handler = self.handlers.lock().get(path).cloned();

		if let Some(handler) = handler {
			return handler(request);
		}

		let mut queues = self.queues.lock();

		match queues.get_mut(path) {
			Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(not_found),
			Some(queue) => queue.front().cloned().unwrap_or_else(not_found),
			None => not_found(),
		}
	}
}
impl HttpTransport for ScriptedTransport {
	fn send(&self, request: TransportRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let delay = self.delays.lock().get(request.url.path()).copied();

			self.requests.lock().push(request.clone());

			if let Some(delay) = delay {
				tokio::time::sleep(delay).await;
			}

			match self.reply_for(&request) {
				Reply::Respond(response) => Ok(response),
				Reply::Timeout => Err(TransportFailure::Timeout { source: None }),
				Reply::NoResponse => Err(TransportFailure::no_response(std::io::Error::new(
					std::io::ErrorKind::ConnectionRefused,
					"connection refused",
				))),
			}
		})
	}
}

fn not_found() -> Reply {
	Reply::json(404, json!({ "message": "route not scripted" }))
}

pub fn bearer(request: &TransportRequest) -> Option<&str> {
	request.header("authorization")
}

pub fn config() -> ClientConfig {
	ClientConfig::builder().base_url(BASE_URL).build().expect("Test config should build.")
}

/// Builds a client over `transport` with the given tokens already stored.
pub async fn client_with_tokens(
	transport: Arc<ScriptedTransport>,
	access: Option<&str>,
	refresh: Option<&str>,
) -> (ApiClient<ScriptedTransport>, Arc<MemoryStore>) {
	let store = Arc::new(MemoryStore::default());
	let session = Session::new(store.clone());

	if let Some(access) = access {
		session
			.set_access_token(&TokenSecret::new(access))
			.await
			.expect("Seeding the access token should succeed.");
	}
	if let Some(refresh) = refresh {
		session
			.set_refresh_token(&TokenSecret::new(refresh))
			.await
			.expect("Seeding the refresh token should succeed.");
	}

	(ApiClient::with_transport(config(), session, transport), store)
}

pub async fn stored(store: &MemoryStore, key: StorageKey) -> Option<String> {
	store.get(key).await.expect("Reading the memory store should succeed.")
}
