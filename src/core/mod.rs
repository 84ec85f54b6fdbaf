pub mod blueprints;
pub mod entries;
pub mod navs;

pub use crate::domain::model::{
    Blueprint, Entry, EntryRef, Fieldset, Nav, NavTree, Origin, SchemaFile,
};
pub use crate::domain::ports::{
    EntrySink, EntrySource, NavSink, NavSource, Progress, SchemaFiles, SchemaSink,
};
pub use crate::utils::error::Result;
