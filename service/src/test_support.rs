//! Test doubles shared across modules: in-memory image sources and object
//! stores, one-shot HTTP responders for the real clients, and a span recorder
//! for asserting on tracing output.

use crate::client::ImageSource;
use crate::domain::error::HandlerError;
use crate::domain::error::HandlerError::{DogApiError, StorageError};
use crate::domain::{ImageReference, StoredObjectDescriptor};
use crate::repository::ObjectStore;
use bytes::Bytes;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::subscriber::DefaultGuard;
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Hands out one fixed image, optionally failing the API call.
pub struct FakeSource {
    pub url: String,
    pub bytes: Bytes,
    pub api_down: bool,
    pub downloads: Mutex<usize>,
}

impl FakeSource {
    pub fn new(url: &str, bytes: &'static [u8]) -> FakeSource {
        FakeSource {
            url: url.to_string(),
            bytes: Bytes::from_static(bytes),
            api_down: false,
            downloads: Mutex::new(0),
        }
    }

    pub fn unreachable() -> FakeSource {
        FakeSource {
            api_down: true,
            ..FakeSource::new("https://images.dog.ceo/breeds/pug/rex.jpg", b"")
        }
    }

    pub fn downloads(&self) -> usize {
        *self.downloads.lock().unwrap()
    }
}

impl ImageSource for FakeSource {
    async fn random_image(&self) -> Result<ImageReference, HandlerError> {
        if self.api_down {
            return Err(DogApiError {
                reason: "connection refused".to_string(),
            });
        }
        ImageReference::from_url(&self.url)
    }

    async fn download(&self, _image: &ImageReference) -> Result<Bytes, HandlerError> {
        *self.downloads.lock().unwrap() += 1;
        tokio::task::yield_now().await;
        Ok(self.bytes.clone())
    }
}

/// Keeps uploads in memory; `missing_bucket` makes every upload fail.
#[derive(Default)]
pub struct FakeStore {
    pub missing_bucket: bool,
    pub uploads: Mutex<Vec<(StoredObjectDescriptor, Bytes)>>,
}

impl FakeStore {
    pub fn missing_bucket() -> FakeStore {
        FakeStore {
            missing_bucket: true,
            ..FakeStore::default()
        }
    }

    pub fn uploads(&self) -> Vec<(StoredObjectDescriptor, Bytes)> {
        self.uploads.lock().unwrap().clone()
    }
}

impl ObjectStore for FakeStore {
    async fn upload(
        &self,
        descriptor: &StoredObjectDescriptor,
        bytes: Bytes,
    ) -> Result<(), HandlerError> {
        if self.missing_bucket {
            return Err(StorageError {
                bucket: descriptor.bucket_name.clone(),
                key: descriptor.key.clone(),
                reason: "NoSuchBucket".to_string(),
            });
        }
        self.uploads
            .lock()
            .unwrap()
            .push((descriptor.clone(), bytes));
        Ok(())
    }
}

/// Serve `response` verbatim to each of the next `connections` requests and
/// return the base URL.
pub async fn serve(response: Vec<u8>, connections: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        for _ in 0..connections {
            let (mut stream, _) = listener.accept().await.unwrap();
            drain_request(&mut stream).await;
            stream.write_all(&response).await.unwrap();
            let _ = stream.shutdown().await;
        }
    });
    format!("http://{addr}")
}

pub fn http_response(status: &str, body: &[u8]) -> Vec<u8> {
    let mut response = format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);
    response
}

/// Read until the client goes quiet so closing never discards unread bytes.
async fn drain_request(stream: &mut TcpStream) {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let idle = if request.windows(4).any(|w| w == b"\r\n\r\n") {
            Duration::from_millis(50)
        } else {
            Duration::from_secs(5)
        };
        match timeout(idle, stream.read(&mut buf)).await {
            Ok(Ok(n)) if n > 0 => request.extend_from_slice(&buf[..n]),
            _ => break,
        }
    }
}

/// Remembers every span opened and every field recorded on a span after
/// creation, keyed by span name.
#[derive(Clone, Default)]
pub struct SpanRecorder {
    opened: Arc<Mutex<Vec<String>>>,
    recorded: Arc<Mutex<Vec<(String, String, String)>>>,
}

impl SpanRecorder {
    /// Make this recorder the current thread's subscriber until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    /// Last value recorded for `field` on the most recent span named `span`.
    pub fn value(&self, span: &str, field: &str) -> Option<String> {
        self.recorded
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(s, f, _)| s == span && f == field)
            .map(|(_, _, v)| v.clone())
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
}

impl<S> Layer<S> for SpanRecorder
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        self.opened
            .lock()
            .unwrap()
            .push(attrs.metadata().name().to_string());
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut visitor = FieldVisitor(Vec::new());
        values.record(&mut visitor);
        let mut recorded = self.recorded.lock().unwrap();
        for (field, value) in visitor.0 {
            recorded.push((span.name().to_string(), field, value));
        }
    }
}
