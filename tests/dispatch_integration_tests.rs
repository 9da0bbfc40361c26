//! End-to-end dispatch scenarios over a realistic failure hierarchy.
//!
//! The hierarchy used throughout:
//!
//! ```text
//! failure
//! └── runtime_failure
//!     ├── null_reference_failure
//!     ├── illegal_argument_failure
//!     └── missing_element_failure   (never registered)
//! ```

use failure_dispatch::{
    DispatchError, Failure, FailureCategory, FailureDispatcher, FailureHandler, FailureTaxonomy,
    HandlerRegistration, HandlingResult,
};
use std::any::Any;
use std::sync::Arc;

struct TestFailure {
    category: FailureCategory,
}

impl TestFailure {
    fn of(category: &str) -> Self {
        Self {
            category: category.into(),
        }
    }
}

impl Failure for TestFailure {
    fn category(&self) -> FailureCategory {
        self.category.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct NullReferenceHandler;

impl FailureHandler for NullReferenceHandler {
    fn handle(&self, _failure: &dyn Failure) -> HandlingResult {
        HandlingResult::with_payload(400, "was null".to_string())
    }

    fn name(&self) -> &str {
        "null_reference_handler"
    }
}

struct IllegalArgumentHandler;

impl FailureHandler for IllegalArgumentHandler {
    fn handle(&self, _failure: &dyn Failure) -> HandlingResult {
        HandlingResult::with_payload(400, "illegal argument".to_string())
    }

    fn name(&self) -> &str {
        "illegal_argument_handler"
    }
}

struct RuntimeHandler;

impl FailureHandler for RuntimeHandler {
    fn handle(&self, _failure: &dyn Failure) -> HandlingResult {
        HandlingResult::with_payload(500, "runtime".to_string())
    }

    fn name(&self) -> &str {
        "runtime_handler"
    }
}

struct RootHandler;

impl FailureHandler for RootHandler {
    fn handle(&self, _failure: &dyn Failure) -> HandlingResult {
        HandlingResult::with_payload(500, "a failure was not caught".to_string())
    }

    fn name(&self) -> &str {
        "root_handler"
    }
}

fn sample_taxonomy() -> Arc<FailureTaxonomy> {
    Arc::new(
        FailureTaxonomy::new("failure")
            .with_category("runtime_failure", "failure")
            .unwrap()
            .with_category("null_reference_failure", "runtime_failure")
            .unwrap()
            .with_category("illegal_argument_failure", "runtime_failure")
            .unwrap()
            .with_category("missing_element_failure", "runtime_failure")
            .unwrap(),
    )
}

fn full_registrations() -> Vec<HandlerRegistration> {
    vec![
        HandlerRegistration::new("null_reference_failure", Arc::new(NullReferenceHandler)),
        HandlerRegistration::new("illegal_argument_failure", Arc::new(IllegalArgumentHandler)),
        HandlerRegistration::new("runtime_failure", Arc::new(RuntimeHandler)),
        HandlerRegistration::new("failure", Arc::new(RootHandler)),
    ]
}

fn assert_result(result: &HandlingResult, status_code: u16, payload: &str) {
    assert_eq!(result.status_code(), status_code);
    assert_eq!(result.payload_as::<String>().unwrap(), payload);
}

#[test]
fn test_handler_list_with_root_handler() {
    let dispatcher = FailureDispatcher::new(sample_taxonomy(), full_registrations()).unwrap();

    let result = dispatcher
        .handle(Some(&TestFailure::of("null_reference_failure")))
        .unwrap();
    assert_result(&result, 400, "was null");

    let result = dispatcher
        .handle(Some(&TestFailure::of("illegal_argument_failure")))
        .unwrap();
    assert_result(&result, 400, "illegal argument");

    let result = dispatcher
        .handle(Some(&TestFailure::of("runtime_failure")))
        .unwrap();
    assert_result(&result, 500, "runtime");

    // A runtime failure subcategory without its own handler
    let result = dispatcher
        .handle(Some(&TestFailure::of("missing_element_failure")))
        .unwrap();
    assert_result(&result, 500, "runtime");

    // The root itself
    let result = dispatcher.handle(Some(&TestFailure::of("failure"))).unwrap();
    assert_result(&result, 500, "a failure was not caught");
}

#[test]
fn test_handler_list_without_root_handler() {
    let registrations = vec![
        HandlerRegistration::new("null_reference_failure", Arc::new(NullReferenceHandler)),
        HandlerRegistration::new("illegal_argument_failure", Arc::new(IllegalArgumentHandler)),
        HandlerRegistration::new("runtime_failure", Arc::new(RuntimeHandler)),
    ];
    let dispatcher = FailureDispatcher::new(sample_taxonomy(), registrations).unwrap();

    // Specific handlers still win
    let result = dispatcher
        .handle(Some(&TestFailure::of("null_reference_failure")))
        .unwrap();
    assert_result(&result, 400, "was null");

    // A root failure lands on the synthesized default
    let result = dispatcher.handle(Some(&TestFailure::of("failure"))).unwrap();
    assert_eq!(result.status_code(), 500);
    assert!(!result.has_payload());
    assert!(dispatcher.stats().default_root_installed);
}

#[test]
fn test_empty_handler_list_gets_the_default() {
    let dispatcher = FailureDispatcher::new(sample_taxonomy(), vec![]).unwrap();

    let result = dispatcher.handle(Some(&TestFailure::of("failure"))).unwrap();
    assert_eq!(result.status_code(), 500);
    assert!(!result.has_payload());
}

#[test]
fn test_most_specific_handler_wins() {
    let registrations = vec![
        HandlerRegistration::new("runtime_failure", Arc::new(RuntimeHandler)),
        HandlerRegistration::new("null_reference_failure", Arc::new(NullReferenceHandler)),
    ];
    let dispatcher = FailureDispatcher::new(sample_taxonomy(), registrations).unwrap();

    let result = dispatcher
        .handle(Some(&TestFailure::of("null_reference_failure")))
        .unwrap();
    assert_result(&result, 400, "was null");
}

#[test]
fn test_unregistered_sibling_falls_back_to_shared_ancestor() {
    let registrations = vec![
        HandlerRegistration::new("runtime_failure", Arc::new(RuntimeHandler)),
        HandlerRegistration::new("null_reference_failure", Arc::new(NullReferenceHandler)),
    ];
    let dispatcher = FailureDispatcher::new(sample_taxonomy(), registrations).unwrap();

    // Sibling of null_reference_failure, itself unregistered
    let result = dispatcher
        .handle(Some(&TestFailure::of("illegal_argument_failure")))
        .unwrap();
    assert_result(&result, 500, "runtime");
}

#[test]
fn test_duplicate_registration_first_wins() {
    let registrations = vec![
        HandlerRegistration::new("illegal_argument_failure", Arc::new(IllegalArgumentHandler)),
        HandlerRegistration::from_fn("illegal_argument_failure", |_failure| {
            HandlingResult::with_payload(422, "should never run".to_string())
        }),
    ];
    let dispatcher = FailureDispatcher::new(sample_taxonomy(), registrations).unwrap();

    let result = dispatcher
        .handle(Some(&TestFailure::of("illegal_argument_failure")))
        .unwrap();
    assert_result(&result, 400, "illegal argument");
    assert_eq!(dispatcher.stats().duplicates_discarded, 1);
}

#[test]
fn test_repeated_handling_is_idempotent() {
    let dispatcher = FailureDispatcher::new(sample_taxonomy(), full_registrations()).unwrap();

    let first_instance = TestFailure::of("null_reference_failure");
    let second_instance = TestFailure::of("null_reference_failure");

    let first = dispatcher.handle(Some(&first_instance)).unwrap();
    let second = dispatcher.handle(Some(&second_instance)).unwrap();
    let third = dispatcher.handle(Some(&first_instance)).unwrap();

    for result in [&first, &second, &third] {
        assert_result(result, 400, "was null");
    }
}

#[test]
fn test_absent_failure_is_a_caller_bug() {
    let dispatcher = FailureDispatcher::new(sample_taxonomy(), full_registrations()).unwrap();

    let result = dispatcher.handle(None);
    assert!(matches!(result, Err(DispatchError::NullFailure)));

    // The dispatcher stays usable afterwards
    let result = dispatcher
        .handle(Some(&TestFailure::of("runtime_failure")))
        .unwrap();
    assert_result(&result, 500, "runtime");
}

#[test]
fn test_category_outside_the_taxonomy_is_surfaced_loudly() {
    let dispatcher = FailureDispatcher::new(sample_taxonomy(), full_registrations()).unwrap();

    let result = dispatcher.handle(Some(&TestFailure::of("escaped_failure")));
    assert!(matches!(
        result,
        Err(DispatchError::NoHandler { ref category }) if category == "escaped_failure"
    ));
}

#[test]
fn test_unbindable_registration_aborts_construction() {
    let mut registrations = full_registrations();
    registrations.push(HandlerRegistration::from_fn("orphan_failure", |_failure| {
        HandlingResult::just_status(500)
    }));

    let result = FailureDispatcher::new(sample_taxonomy(), registrations);
    assert!(matches!(
        result,
        Err(DispatchError::HandlerBinding { ref category, .. }) if category == "orphan_failure"
    ));
}

#[test]
fn test_registry_invariants_after_build() {
    let mut registrations = full_registrations();
    // Duplicate two of the categories
    registrations.push(HandlerRegistration::new(
        "runtime_failure",
        Arc::new(RuntimeHandler),
    ));
    registrations.push(HandlerRegistration::new(
        "null_reference_failure",
        Arc::new(NullReferenceHandler),
    ));

    let dispatcher = FailureDispatcher::new(sample_taxonomy(), registrations).unwrap();
    let stats = dispatcher.stats();

    assert_eq!(stats.total_handlers, 4);
    assert_eq!(stats.duplicates_discarded, 2);
    assert!(!stats.default_root_installed);
    assert_eq!(
        stats.categories,
        vec![
            "failure",
            "illegal_argument_failure",
            "null_reference_failure",
            "runtime_failure",
        ]
    );
}

#[test]
fn test_concurrent_dispatch_needs_no_coordination() {
    let dispatcher = Arc::new(
        FailureDispatcher::new(sample_taxonomy(), full_registrations()).unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let dispatcher = dispatcher.clone();
            std::thread::spawn(move || {
                for _ in 0..100 {
                    let result = dispatcher
                        .handle(Some(&TestFailure::of("missing_element_failure")))
                        .unwrap();
                    assert_eq!(result.status_code(), 500);
                    assert_eq!(result.payload_as::<String>().unwrap(), "runtime");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_handlers_can_downcast_their_instances() {
    struct QueryFailure {
        table: String,
    }

    impl Failure for QueryFailure {
        fn category(&self) -> FailureCategory {
            FailureCategory::new("runtime_failure")
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    let registrations = vec![HandlerRegistration::from_fn("runtime_failure", |failure| {
        let query = failure
            .as_any()
            .downcast_ref::<QueryFailure>()
            .expect("bound to runtime_failure");
        HandlingResult::with_payload(500, format!("query against {} failed", query.table))
    })];
    let dispatcher = FailureDispatcher::new(sample_taxonomy(), registrations).unwrap();

    let failure = QueryFailure {
        table: "orders".to_string(),
    };
    let result = dispatcher.handle(Some(&failure)).unwrap();
    assert_result(&result, 500, "query against orders failed");
}
