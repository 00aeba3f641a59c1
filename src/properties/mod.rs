//! Properties Module
//!
//! Property records, their source-of-truth store, the cache-aside read path
//! and the write-triggered invalidation.

mod accessor;
mod invalidation;
mod model;
mod store;

pub use accessor::PropertyCache;
pub use invalidation::InvalidationHook;
pub use model::{
    validate_fields, NewProperty, Property, PropertyChanges, PropertyRecord,
    MAX_LOCATION_LENGTH, MAX_TITLE_LENGTH,
};
pub use store::{MemoryRecordStore, RecordStore, WriteEvent, WriteKind, WriteObserver};
