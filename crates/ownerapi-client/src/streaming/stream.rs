//! Telemetry stream implementation

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::types::{StreamError, StreamOptions, StreamResult};

/// An open telemetry stream.
///
/// Implements `Stream<Item = Result<Bytes, StreamError>>`, yielding raw body
/// chunks exactly as the host sends them. The body is newline-delimited rows
/// of comma-separated column values; interpreting them is left to the caller.
/// The stream ends when the host closes the connection.
pub struct TelemetryStream {
    inner: Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>,
}

impl TelemetryStream {
    /// Open the stream.
    ///
    /// The URL is the streaming portal followed directly by the numeric
    /// vehicle id and the `values` query parameter; authentication is HTTP
    /// basic auth with the account username and password.
    pub(crate) async fn connect(
        http_client: Client,
        streaming_portal: &str,
        options: &StreamOptions,
    ) -> StreamResult<Self> {
        let url = Url::parse(&format!(
            "{}{}/?values={}",
            streaming_portal,
            options.vehicle_id,
            options.values_param()
        ))?;

        debug!("Connecting to telemetry stream: {}", url);

        let response = http_client
            .get(url)
            .basic_auth(&options.username, Some(&options.password))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(StreamError::Server { status, message });
        }

        Ok(Self {
            inner: Box::pin(response.bytes_stream()),
        })
    }

    /// Get the next raw chunk from the stream.
    ///
    /// Returns `None` when the host closes the connection.
    pub async fn next(&mut self) -> Option<StreamResult<Bytes>> {
        <Self as StreamExt>::next(self).await
    }
}

impl Stream for TelemetryStream {
    type Item = StreamResult<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(bytes))) => Poll::Ready(Some(Ok(bytes))),
            Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(StreamError::Connection(e)))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl std::fmt::Debug for TelemetryStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryStream").finish_non_exhaustive()
    }
}
