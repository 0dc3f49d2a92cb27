//! Request settings model
//!
//! Every mock request carries an `ExtendableSettings` object. The shared
//! part (failure probability, source) is typed here; the per-simulator part
//! is an opaque JSON map keyed by namespace. Each simulator decodes only its
//! own slice into one of the typed settings structs below.

mod body;
mod connection;
mod delay;
mod header;
mod incoming;
mod request;
mod source;

pub use body::BodyMutationSettings;
pub use connection::ConnectionFaultDescriptor;
pub use delay::DelayDescriptor;
pub use header::{HeaderMutationSettings, HeaderPair};
pub use incoming::{ExtendableSettings, IncomingData};
pub use request::{CounterSettings, FailOn, RequestVerificationSettings, UrlVerification};
pub use source::{ProxySettings, SourceDescriptor, StoreSettings, UpstreamMethod};

use validator::Validate;

use crate::errors::DomainError;

/// Run `validator` checks and fold the report into a `DomainError`
/// attributed to `namespace`.
pub(crate) fn check<T: Validate>(namespace: &str, value: &T) -> Result<(), DomainError> {
    value.validate().map_err(|e| {
        let reasons: Vec<String> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    format!(
                        "{}: {}",
                        field,
                        error
                            .message
                            .as_ref()
                            .map_or_else(|| error.code.to_string(), ToString::to_string)
                    )
                })
            })
            .collect();
        DomainError::invalid_settings(namespace, reasons.join("; "))
    })
}
