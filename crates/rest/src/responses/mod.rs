//! Response bodies for the ZTC REST API.
//!
//! - [`collection`] - the `{"results": [...]}` list envelope
//!
//! Detail responses are the resolved [`ResourceNode`](ztc_view::ResourceNode)
//! itself, without an envelope.

pub mod collection;

pub use collection::CollectionResponse;
