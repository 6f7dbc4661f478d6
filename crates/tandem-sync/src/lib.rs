//! Client-side state synchronization against the change feed.
//!
//! Every data-backed view follows the same convention: load an ordered
//! collection, subscribe to its feed, reflect the local user's edits
//! immediately, and reconcile speculative edits against the confirmed
//! events the server rebroadcasts. [`SyncedCollection`] is that convention
//! implemented once, so call sites configure it instead of re-deriving it.

pub mod collection;
pub mod subscription;

pub use collection::{Entry, Placement, Record, RecordKey, Removed, Snapshot, SyncedCollection};
pub use subscription::SubscriptionGuard;

use uuid::Uuid;

use tandem_types::models::{
    FinanceItem, ItineraryItem, LifeVisionItem, Memory, Message, Profile, RequestItem, Task,
    TaskComment,
};

macro_rules! impl_record {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Record for $t {
                fn id(&self) -> Uuid {
                    self.id
                }
            }
        )+
    };
}

impl_record!(
    Profile,
    Message,
    Task,
    TaskComment,
    RequestItem,
    Memory,
    ItineraryItem,
    FinanceItem,
    LifeVisionItem,
);
