//! # Handler Contract
//!
//! Failure instances, category-bound handlers, and the uniform handling
//! result they produce.
//!
//! ## Overview
//!
//! A [`Failure`] is any runtime value that knows its [`FailureCategory`]. A
//! [`FailureHandler`] is a pure function from a failure instance to a
//! [`HandlingResult`]; it is bound to exactly one category through the
//! [`HandlerRegistration`] it is supplied in. Payloads carried by results are
//! type-erased so handlers with different payload types can share one
//! registry; callers that need the concrete type downcast with
//! [`HandlingResult::payload_as`].
//!
//! ## Usage
//!
//! ```rust
//! use failure_dispatch::handler::{HandlerRegistration, HandlingResult};
//!
//! let registration = HandlerRegistration::from_fn("timeout_failure", |failure| {
//!     let detail = failure.message().unwrap_or("deadline exceeded").to_string();
//!     HandlingResult::with_payload(504, detail)
//! });
//!
//! assert_eq!(registration.category().as_str(), "timeout_failure");
//! ```

use crate::taxonomy::FailureCategory;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A runtime failure instance that can be dispatched
pub trait Failure: Send + Sync {
    /// The concrete category of this failure
    fn category(&self) -> FailureCategory;

    /// Optional human-readable description, available to handlers
    fn message(&self) -> Option<&str> {
        None
    }

    /// Concrete access for handlers that inspect the instance they are bound to
    fn as_any(&self) -> &dyn Any;
}

/// A pure handler bound to one failure category
pub trait FailureHandler: Send + Sync {
    /// Convert the failure into a handling result
    fn handle(&self, failure: &dyn Failure) -> HandlingResult;

    /// Handler name for diagnostics
    fn name(&self) -> &str {
        "unnamed_handler"
    }
}

impl<F> FailureHandler for F
where
    F: Fn(&dyn Failure) -> HandlingResult + Send + Sync,
{
    fn handle(&self, failure: &dyn Failure) -> HandlingResult {
        self(failure)
    }
}

/// Uniform result of handling a failure: a status code plus an optional
/// type-erased payload.
///
/// A payload-carrying result can only be built through
/// [`with_payload`](Self::with_payload), which takes the payload by value, so
/// "with payload" and "present payload" coincide by construction.
pub struct HandlingResult {
    status_code: u16,
    payload: Option<Box<dyn Any + Send + Sync>>,
}

impl HandlingResult {
    /// Build a result carrying a payload
    pub fn with_payload<P: Any + Send + Sync>(status_code: u16, payload: P) -> Self {
        Self {
            status_code,
            payload: Some(Box::new(payload)),
        }
    }

    /// Build a result carrying only a status code
    pub fn just_status(status_code: u16) -> Self {
        Self {
            status_code,
            payload: None,
        }
    }

    /// The status code of this result
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Whether a payload is present
    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// The erased payload, if any
    pub fn payload(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.payload.as_deref()
    }

    /// Downcast the payload to a concrete type
    pub fn payload_as<P: Any>(&self) -> Option<&P> {
        self.payload.as_deref().and_then(|payload| payload.downcast_ref())
    }
}

impl fmt::Debug for HandlingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlingResult")
            .field("status_code", &self.status_code)
            .field(
                "payload",
                &self.payload.as_ref().map(|_| "<erased payload>"),
            )
            .finish()
    }
}

/// A handler together with the explicit category it is bound to.
///
/// The registration tag replaces the type-parameter introspection the engine
/// cannot rely on; the bound category is validated against the taxonomy when
/// the registry is built.
#[derive(Clone)]
pub struct HandlerRegistration {
    category: FailureCategory,
    handler: Arc<dyn FailureHandler>,
}

impl HandlerRegistration {
    /// Bind an existing handler to a category
    pub fn new(category: impl Into<FailureCategory>, handler: Arc<dyn FailureHandler>) -> Self {
        Self {
            category: category.into(),
            handler,
        }
    }

    /// Bind a plain function or closure to a category
    pub fn from_fn<F>(category: impl Into<FailureCategory>, handler: F) -> Self
    where
        F: Fn(&dyn Failure) -> HandlingResult + Send + Sync + 'static,
    {
        Self::new(category, Arc::new(handler))
    }

    /// The bound category
    pub fn category(&self) -> &FailureCategory {
        &self.category
    }

    /// The registered handler
    pub fn handler(&self) -> &Arc<dyn FailureHandler> {
        &self.handler
    }

    /// Split the registration into its parts
    pub fn into_parts(self) -> (FailureCategory, Arc<dyn FailureHandler>) {
        (self.category, self.handler)
    }
}

impl fmt::Debug for HandlerRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistration")
            .field("category", &self.category)
            .field("handler", &self.handler.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ParseFailure {
        line: u32,
    }

    impl Failure for ParseFailure {
        fn category(&self) -> FailureCategory {
            FailureCategory::new("parse_failure")
        }

        fn message(&self) -> Option<&str> {
            Some("unexpected token")
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_result_with_payload() {
        let result = HandlingResult::with_payload(422, "bad input".to_string());

        assert_eq!(result.status_code(), 422);
        assert!(result.has_payload());
        assert_eq!(result.payload_as::<String>().unwrap(), "bad input");
    }

    #[test]
    fn test_result_without_payload() {
        let result = HandlingResult::just_status(500);

        assert_eq!(result.status_code(), 500);
        assert!(!result.has_payload());
        assert!(result.payload().is_none());
        assert!(result.payload_as::<String>().is_none());
    }

    #[test]
    fn test_payload_downcast_to_wrong_type() {
        let result = HandlingResult::with_payload(400, 42u32);

        assert!(result.payload_as::<String>().is_none());
        assert_eq!(result.payload_as::<u32>(), Some(&42));
    }

    #[test]
    fn test_closure_handlers_use_instance_data() {
        let registration = HandlerRegistration::from_fn("parse_failure", |failure| {
            let parse = failure
                .as_any()
                .downcast_ref::<ParseFailure>()
                .expect("bound to parse_failure");
            HandlingResult::with_payload(400, format!("parse error at line {}", parse.line))
        });

        let result = registration.handler().handle(&ParseFailure { line: 7 });
        assert_eq!(result.status_code(), 400);
        assert_eq!(
            result.payload_as::<String>().unwrap(),
            "parse error at line 7"
        );
    }

    #[test]
    fn test_handler_message_access() {
        let registration = HandlerRegistration::from_fn("parse_failure", |failure| {
            HandlingResult::with_payload(400, failure.message().unwrap_or("unknown").to_string())
        });

        let result = registration.handler().handle(&ParseFailure { line: 1 });
        assert_eq!(result.payload_as::<String>().unwrap(), "unexpected token");
    }

    #[test]
    fn test_registration_debug_uses_handler_name() {
        let registration = HandlerRegistration::from_fn("parse_failure", |_failure| {
            HandlingResult::just_status(400)
        });

        let rendered = format!("{registration:?}");
        assert!(rendered.contains("parse_failure"));
        assert!(rendered.contains("unnamed_handler"));
    }
}
