//! cloudnorm - canonical records and list filters for cloud API resources
//!
//! Raw records returned by compute, image and network services are mapped to
//! one canonical shape per resource kind by [`resource::Normalizer`], and lists
//! of records are narrowed by the helpers in [`filter`].
//!
//! No I/O happens here: callers hand in already-deserialized JSON and a
//! [`context::CloudContext`] snapshot, and get JSON back.

pub mod context;
pub mod error;
pub mod filter;
pub mod resource;
pub mod value;

pub use context::{CloudContext, FloatingIpSource, Location, ProjectInfo};
pub use error::{Error, Result};
pub use filter::{filter_list, range_filter, Filters};
pub use resource::{Normalized, Normalizer, ResourceKind};
