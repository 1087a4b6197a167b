//! boletim: data core for a COVID-19 Brazil dashboard. Indexes the two daily
//! bulletin tables (national aggregate, per-state) and answers the snapshot,
//! series and map queries the rendering layer consumes, plus the location
//! selection state the widgets share.

pub mod cli;
pub mod data;
pub mod query;
pub mod selection;
pub mod server;
