//! Cartography: normalize fetched payloads, deduplicate entities, and map
//! static pages and entities to URL records.

pub mod aggregator;
pub mod entity;
pub mod normalize;
pub mod record;
pub mod source;
