//! Token-bucket gate every request must pass before it leaves the process.
//!
//! The bucket starts full and refills continuously at `capacity / window`. Bucket arithmetic is
//! serialized by a synchronous mutex, and waiters queue on an async mutex so a woken waiter never
//! races a newer caller for the token it slept for. A token is only debited when it is granted,
//! so dropping or cancelling a pending [`RateLimiter::acquire`] leaves the bucket untouched.

// crates.io
use tokio::time::{self, Instant};
// self
use crate::{_prelude::*, error::ConfigError};

/// Request ceiling applied by a [`RateLimiter`].
///
/// Capacity and window are always non-zero; [`RatePolicy::new`] is the only way to pick custom
/// values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RatePolicy {
	capacity: u32,
	window: StdDuration,
}
impl RatePolicy {
	/// Requests per minute granted to clients without a credential.
	pub const UNAUTHENTICATED_PER_MINUTE: u32 = 25;
	/// Requests per minute granted to clients with a credential.
	pub const AUTHENTICATED_PER_MINUTE: u32 = 60;

	/// Creates a validated policy.
	pub fn new(capacity: u32, window: StdDuration) -> Result<Self, ConfigError> {
		if capacity == 0 || window.is_zero() {
			return Err(ConfigError::InvalidRatePolicy);
		}

		Ok(Self { capacity, window })
	}

	/// Burst size and number of tokens refilled per window.
	pub const fn capacity(&self) -> u32 {
		self.capacity
	}

	/// Window over which [`capacity`](Self::capacity) tokens are refilled.
	pub const fn window(&self) -> StdDuration {
		self.window
	}

	/// 25 requests per minute.
	pub const fn unauthenticated() -> Self {
		Self { capacity: Self::UNAUTHENTICATED_PER_MINUTE, window: StdDuration::from_secs(60) }
	}

	/// 60 requests per minute.
	pub const fn authenticated() -> Self {
		Self { capacity: Self::AUTHENTICATED_PER_MINUTE, window: StdDuration::from_secs(60) }
	}

	/// Picks the ceiling matching the client's authentication state.
	pub const fn for_authentication(authenticated: bool) -> Self {
		if authenticated { Self::authenticated() } else { Self::unauthenticated() }
	}

	fn tokens_per_second(&self) -> f64 {
		self.capacity as f64 / self.window.as_secs_f64()
	}
}
impl Default for RatePolicy {
	fn default() -> Self {
		Self::unauthenticated()
	}
}

#[derive(Debug)]
struct Bucket {
	tokens: f64,
	last_refill: Instant,
}
impl Bucket {
	fn full(policy: &RatePolicy) -> Self {
		Self { tokens: policy.capacity as f64, last_refill: Instant::now() }
	}

	fn refill(&mut self, policy: &RatePolicy, now: Instant) {
		let elapsed = now.saturating_duration_since(self.last_refill);
		let refilled = self.tokens + elapsed.as_secs_f64() * policy.tokens_per_second();

		self.tokens = refilled.min(policy.capacity as f64);
		self.last_refill = now;
	}

	/// Debits one token, or reports how long until one is available.
	fn take(&mut self, policy: &RatePolicy, now: Instant) -> Result<(), StdDuration> {
		self.refill(policy, now);

		if self.tokens >= 1.0 {
			self.tokens -= 1.0;

			Ok(())
		} else {
			Err(StdDuration::from_secs_f64((1.0 - self.tokens) / policy.tokens_per_second()))
		}
	}
}

/// Shared token bucket consulted by every dispatch from one client.
#[derive(Debug)]
pub struct RateLimiter {
	policy: RatePolicy,
	bucket: Mutex<Bucket>,
	waiters: AsyncMutex<()>,
}
impl RateLimiter {
	/// Creates a full bucket for `policy`.
	pub fn new(policy: RatePolicy) -> Self {
		Self { bucket: Mutex::new(Bucket::full(&policy)), policy, waiters: AsyncMutex::new(()) }
	}

	/// Returns the policy fixed at construction.
	pub fn policy(&self) -> RatePolicy {
		self.policy
	}

	/// Number of whole tokens currently available.
	pub fn available(&self) -> u32 {
		let mut bucket = self.bucket.lock();

		bucket.refill(&self.policy, Instant::now());

		bucket.tokens.floor() as u32
	}

	/// Takes a token if one is available right now.
	pub fn try_acquire(&self) -> bool {
		self.bucket.lock().take(&self.policy, Instant::now()).is_ok()
	}

	/// Suspends until a token is granted or `cancel` fires.
	///
	/// A token that is already cancelled fails immediately without touching the bucket.
	pub async fn acquire(&self, cancel: &CancellationToken) -> Result<()> {
		if cancel.is_cancelled() {
			return Err(Error::RateLimitWaitCanceled);
		}

		let wait = async {
			let _turn = self.waiters.lock().await;

			loop {
				let taken = self.bucket.lock().take(&self.policy, Instant::now());
				let delay = match taken {
					Ok(()) => return,
					Err(delay) => delay,
				};

				#[cfg(feature = "tracing")]
				tracing::debug!(
					delay_ms = delay.as_millis() as u64,
					"Waiting for a rate limit token."
				);

				time::sleep(delay).await;
			}
		};

		tokio::select! {
			biased;
			_ = cancel.cancelled() => Err(Error::RateLimitWaitCanceled),
			_ = wait => Ok(()),
		}
	}
}
