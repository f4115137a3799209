//! Overload selection on `business.service.mint` types

mod common;

use cakerouter::{DispatchError, MethodMismatch};
use common::{dispatcher, get, DESIGN};
use http::Method;
use loan_bank::resources::{METHOD_GET_P0, METHOD_GET_P1, METHOD_GET_P3};

fn text(value: &cakerouter::ResourceValue) -> &'static str {
    value.downcast_ref::<&'static str>().copied().unwrap()
}

#[test]
fn test_overloads_by_arity() {
    let dispatcher = dispatcher();
    assert_eq!(text(&get(&dispatcher, DESIGN).unwrap()), METHOD_GET_P0);
    assert_eq!(text(&get(&dispatcher, &format!("{DESIGN}/1")).unwrap()), METHOD_GET_P1);
    assert_eq!(
        text(&get(&dispatcher, &format!("{DESIGN}/1/ana/ana%40bank.com")).unwrap()),
        METHOD_GET_P3
    );
}

#[test]
fn test_declaration_order_breaks_ties() {
    let dispatcher = dispatcher();
    let design = dispatcher.registry().lookup("business.service.mint.Design").unwrap();
    let args = |v: &[&str]| -> Vec<String> { v.iter().map(|s| (*s).to_string()).collect() };

    // Both arity-3 overloads accept "30"; the first declared one wins.
    let chosen = dispatcher
        .select(&design, &Method::GET, &args(&["1", "ana", "30"]))
        .unwrap();
    assert_eq!(chosen.signature(), "get(i32, String, String)");
    assert_eq!(chosen.position(), 2);

    // Same answer from the cached path.
    let again = dispatcher
        .select(&design, &Method::GET, &args(&["1", "ana", "30"]))
        .unwrap();
    assert_eq!(again.position(), 2);
}

#[test]
fn test_arity_three_with_bad_id() {
    let dispatcher = dispatcher();
    let err = get(&dispatcher, &format!("{DESIGN}/x/ana/30")).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::NoMatchingMethod {
            arity: 3,
            reason: MethodMismatch::ArgumentMismatch { .. },
            ..
        }
    ));
}

#[test]
fn test_unsupported_parameter_type_never_matches() {
    let dispatcher = dispatcher();
    let err = get(&dispatcher, &format!("{DESIGN}/1/ana/ana%40bank.com/1.5/2024-01-01")).unwrap_err();
    match err {
        DispatchError::NoMatchingMethod {
            arity: 5,
            reason: MethodMismatch::ArgumentMismatch { last_error },
            ..
        } => assert_eq!(last_error, "Unsupported parameter type: Date"),
        other => panic!("unexpected error: {other:?}"),
    }

    let err = get(&dispatcher, "/business/service/mint/getWithParameters/1").unwrap_err();
    match err {
        DispatchError::NoMatchingMethod {
            resource,
            reason: MethodMismatch::ArgumentMismatch { last_error },
            ..
        } => {
            assert_eq!(resource, "business.service.mint.GetWithParameters");
            assert!(last_error.contains("GetParam"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_invoke_reports_unsupported_parameter_directly() {
    let dispatcher = dispatcher();
    let resource = dispatcher
        .registry()
        .lookup("business.service.mint.GetWithParameters")
        .unwrap();
    let method = resource.methods()[0].clone();
    let mut instance = resource.instantiate().unwrap();
    let err = dispatcher
        .invoke(&resource, &mut *instance, &method, &["1".to_string()])
        .unwrap_err();
    assert_eq!(
        err,
        DispatchError::UnsupportedParameterType {
            target: "GetParam".to_string()
        }
    );
}
