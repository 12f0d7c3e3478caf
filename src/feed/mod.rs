// Price sample producers
pub mod replay;
pub mod synthetic;

pub use replay::ReplaySource;
pub use synthetic::{MarketScenario, SyntheticPriceGenerator};

use crate::error::FeedError;
use crate::models::PriceSnapshot;
use tokio::sync::mpsc;

/// Anything that yields price snapshots in arrival order
pub trait PriceSource: Iterator<Item = Result<PriceSnapshot, FeedError>> {}

impl<T> PriceSource for T where T: Iterator<Item = Result<PriceSnapshot, FeedError>> {}

/// Drain a (possibly blocking) price source on a dedicated thread and forward
/// its items through the returned channel.
///
/// `make_source` runs on the feed thread, so sources that are not `Send`
/// (a locked stdin, for instance) can be built there. The thread stops when
/// the source is exhausted or the receiver is dropped.
pub fn spawn_feed<F, S>(
    make_source: F,
    buffer: usize,
) -> Result<mpsc::Receiver<Result<PriceSnapshot, FeedError>>, FeedError>
where
    F: FnOnce() -> S + Send + 'static,
    S: PriceSource,
{
    let (tx, rx) = mpsc::channel(buffer.max(1));

    // A plain thread rather than `spawn_blocking`: a reader stuck on input
    // must not hold up runtime shutdown.
    std::thread::Builder::new()
        .name("price-feed".to_string())
        .spawn(move || {
            for item in make_source() {
                if tx.blocking_send(item).is_err() {
                    tracing::debug!("Feed receiver dropped, stopping reader");
                    break;
                }
            }
        })?;

    Ok(rx)
}
