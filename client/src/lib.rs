//! # Relay Sync Client
//! Sends typed field commands to a relay and routes the relay's broadcasts
//! into per-update income collectors, keyed by object, field or template.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use relay_sync_shared as shared;

mod client;
mod config;
mod dispatcher;
mod error;
mod income;
mod object_builder;
mod object_constructor;
pub mod router;
pub mod transport;

pub use client::RelayClient;
pub use config::ClientConfig;
pub use dispatcher::Dispatcher;
pub use error::{ClientError, ListenerError};
pub use income::{
    Collector, CompareAndSetLongIncomeByField, CompareAndSetLongIncomeByObject,
    CreatedObjectByTemplateIncome, DeleteFieldIncomeByField, DeleteFieldIncomeByObject,
    DeletedObjectByTemplateIncome, DeletedObjectIncomeByObject, DoubleIncomeByField,
    DoubleIncomeByObject, DoubleIncrementIncomeByField, DoubleIncrementIncomeByObject,
    EventIncomeByField, EventIncomeByObject, FieldItem, LongIncomeByField, LongIncomeByObject,
    LongIncrementIncomeByField, LongIncrementIncomeByObject, StructureIncomeByField,
    StructureIncomeByObject,
};
pub use object_builder::ObjectBuilder;
pub use object_constructor::ObjectConstructor;
pub use router::{CreatedObject, DeletedObject};
pub use transport::{MemoryTransport, Transport, TransportError};
