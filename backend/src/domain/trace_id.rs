//! Request-scoped trace identifier.
//!
//! The HTTP `Trace` middleware opens one scope per request. Every
//! [`crate::domain::Error`] built inside that scope records the id, and the
//! middleware echoes it in the `trace-id` response header, so a rider quoting
//! the header of a failed accept or payment points straight at the matching
//! log lines.
//!
//! Task-locals do not follow `tokio::spawn`. Wrap spawned work with
//! [`TraceId::propagate`] to keep it correlated with its request.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use uuid::Uuid;

tokio::task_local! {
    static CURRENT: TraceId;
}

/// Correlation id for one inbound request.
///
/// # Examples
/// ```
/// use ride_dispatch::TraceId;
///
/// async fn complete_ride() {
///     match TraceId::current() {
///         Some(id) => tracing::info!(trace_id = %id, "completing ride"),
///         None => tracing::info!("completing ride outside a request"),
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random id for a new request.
    #[must_use]
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The id of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current id.
    ///
    /// # Examples
    /// ```
    /// use ride_dispatch::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let trace_id: TraceId = "6f1c1c52-55b4-4f5e-9e3c-1f0b8c1c0d2a"
    ///     .parse()
    ///     .expect("valid UUID");
    /// let seen = TraceId::scope(trace_id, async { TraceId::current() }).await;
    /// assert_eq!(seen, Some(trace_id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }

    /// Carry the current id, if any, into `fut` so it survives a spawn.
    pub fn propagate<Fut>(fut: Fut) -> impl Future<Output = Fut::Output>
    where
        Fut: Future,
    {
        let inherited = Self::current();
        async move {
            match inherited {
                Some(trace_id) => Self::scope(trace_id, fut).await,
                None => fut.await,
            }
        }
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw).map(Self)
    }
}
