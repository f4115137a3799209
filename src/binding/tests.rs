use super::*;
use crate::error::DispatchError;
use crate::exchange::QueryParams;
use crate::registry::{Bindable, Bindings, Instance, ResourceType};
use crate::value::ResourceValue;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Account {
    owner: Option<String>,
    limit: i64,
    active: bool,
    note: Option<String>,
}

fn account_bindings() -> Bindings {
    Bindings::builder::<Account>()
        .setter("owner", |a: &mut Account, v: String| a.owner = Some(v))
        .setter("limit", |a: &mut Account, v: i64| a.limit = v)
        .field("active", |a: &mut Account, v: bool| a.active = v)
        .field("note", |a: &mut Account, v: String| a.note = Some(v))
        .build()
}

fn account() -> Box<Instance> {
    Box::new(Account::default())
}

fn view(instance: &Instance) -> &Account {
    instance.downcast_ref::<Account>().unwrap()
}

#[test]
fn test_query_binds_first_value_via_setter_then_field() {
    let bindings = account_bindings();
    let mut target = account();
    let query: QueryParams = [
        ("OWNER", "ada"),
        ("limit", "500"),
        ("limit", "900"),
        ("active", "true"),
    ]
    .into_iter()
    .collect();

    assert_eq!(bind_query(&bindings, &mut *target, &query), 3);
    let acct = view(&*target);
    assert_eq!(acct.owner.as_deref(), Some("ada"));
    assert_eq!(acct.limit, 500);
    assert!(acct.active);
}

#[test]
fn test_unmatched_or_unconvertible_values_are_ignored() {
    let bindings = account_bindings();
    let mut target = account();
    let query: QueryParams = [("unknown", "x"), ("limit", "lots"), ("Active", "true")]
        .into_iter()
        .collect();

    assert_eq!(bind_query(&bindings, &mut *target, &query), 0);
    let acct = view(&*target);
    assert_eq!(acct.limit, 0);
    assert!(!acct.active);
}

#[derive(Debug, Default, crate::Bindable)]
struct ContactDto {
    name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Default, crate::Bindable)]
struct ApplicationDto {
    amount: Option<f64>,
    approved: Option<bool>,
    #[bind(nested)]
    contact: Option<ContactDto>,
}

#[derive(Default)]
struct Application {
    body: ApplicationDto,
}

fn application_type() -> ResourceType {
    ResourceType::builder::<Application>("loans.Application")
        .body(|a: &mut Application| &mut a.body)
        .build()
}

#[test]
fn test_body_populates_nested_objects() {
    let ty = application_type();
    let mut instance = ty.instantiate().unwrap();
    let text = r#"{
        "amount": 2500.5,
        "approved": false,
        "contact": {"name": "John, \"JD\" Doe", "email": "j@x.com", "extra": {"a": 1}},
        "tags": ["a", "b"],
        "missing": null
    }"#;

    let bound = parse_body(ty.body().unwrap(), &mut *instance, text).unwrap();
    assert_eq!(bound, 3);
    let app = instance.downcast_ref::<Application>().unwrap();
    assert_eq!(app.body.amount, Some(2500.5));
    assert_eq!(app.body.approved, Some(false));
    let contact = app.body.contact.as_ref().unwrap();
    assert_eq!(contact.name.as_deref(), Some("John, \"JD\" Doe"));
    assert_eq!(contact.email.as_deref(), Some("j@x.com"));
}

#[test]
fn test_malformed_body_names_the_body_type() {
    let ty = application_type();
    let mut instance = ty.instantiate().unwrap();
    let err = parse_body(ty.body().unwrap(), &mut *instance, r#"{"amount": 1"#).unwrap_err();
    match err {
        DispatchError::BodyParse { target, .. } => assert_eq!(target, "ApplicationDto"),
        other => panic!("expected body parse failure, got {other:?}"),
    }

    let err = parse_body(ty.body().unwrap(), &mut *instance, "[1, 2]").unwrap_err();
    assert!(err.to_string().contains("an array"));
}

#[test]
fn test_body_values_go_through_coercion() {
    let bindings = ApplicationDto::bindings();
    let mut dto: Box<Instance> = Box::new(ApplicationDto::default());
    let fields = serde_json::json!({"amount": "12.5", "approved": "maybe"});
    let bound = apply_object(&bindings, &mut *dto, fields.as_object().unwrap());
    assert_eq!(bound, 1);
    let dto = dto.downcast_ref::<ApplicationDto>().unwrap();
    assert_eq!(dto.amount, Some(12.5));
    assert_eq!(dto.approved, None);
}

#[derive(Debug, Serialize)]
struct OwnerResult {
    id: i32,
}

#[derive(Debug, Serialize)]
struct OwnerEntity {
    id: i32,
}

#[derive(Default)]
struct Child {
    named: Option<Arc<OwnerResult>>,
    stripped: Option<Arc<OwnerResult>>,
    any: Option<Arc<OwnerResult>>,
    field: Option<Arc<OwnerEntity>>,
}

fn suffixes() -> Vec<String> {
    vec!["Result".into(), "DTO".into(), "Entity".into()]
}

#[test]
fn test_strip_suffix_removes_first_match_once() {
    let suffixes = suffixes();
    assert_eq!(strip_suffix("CustomerResult", &suffixes), Some("Customer"));
    assert_eq!(strip_suffix("ProposalDTO", &suffixes), Some("Proposal"));
    assert_eq!(strip_suffix("Result", &suffixes), None);
    assert_eq!(strip_suffix("Customer", &suffixes), None);
}

#[test]
fn test_injection_prefers_named_setter() {
    let bindings = Bindings::builder::<Child>()
        .object_setter("anything", |c: &mut Child, v: Arc<OwnerResult>| c.any = Some(v))
        .object_setter("owner", |c: &mut Child, v: Arc<OwnerResult>| c.stripped = Some(v))
        .object_setter("ownerResult", |c: &mut Child, v: Arc<OwnerResult>| c.named = Some(v))
        .build();
    let parent = ResourceValue::new(OwnerResult { id: 1 });
    let mut child: Box<Instance> = Box::new(Child::default());

    let via = inject_parent(&bindings, &mut *child, Some(&parent), &suffixes());
    assert_eq!(via, Injection::NamedSetter);
    let child = child.downcast_ref::<Child>().unwrap();
    assert!(child.named.is_some());
    assert!(child.stripped.is_none());
    assert!(child.any.is_none());
}

#[test]
fn test_injection_falls_back_through_rules() {
    let parent = ResourceValue::new(OwnerResult { id: 7 });

    let stripped = Bindings::builder::<Child>()
        .object_setter("anything", |c: &mut Child, v: Arc<OwnerResult>| c.any = Some(v))
        .object_setter("owner", |c: &mut Child, v: Arc<OwnerResult>| c.stripped = Some(v))
        .build();
    let mut child: Box<Instance> = Box::new(Child::default());
    assert_eq!(
        inject_parent(&stripped, &mut *child, Some(&parent), &suffixes()),
        Injection::StrippedSetter
    );
    let injected = child.downcast_ref::<Child>().unwrap().stripped.clone().unwrap();
    assert!(parent.ptr_eq(&ResourceValue::from_arc(injected)));

    let any = Bindings::builder::<Child>()
        .object_setter("anything", |c: &mut Child, v: Arc<OwnerResult>| c.any = Some(v))
        .build();
    let mut child: Box<Instance> = Box::new(Child::default());
    assert_eq!(
        inject_parent(&any, &mut *child, Some(&parent), &suffixes()),
        Injection::AnySetter
    );
}

#[test]
fn test_injection_uses_first_compatible_field_or_skips() {
    let bindings = Bindings::builder::<Child>()
        .object_setter("owner", |c: &mut Child, v: Arc<OwnerResult>| c.stripped = Some(v))
        .object_field("field", |c: &mut Child, v: Arc<OwnerEntity>| c.field = Some(v))
        .build();

    let entity = ResourceValue::new(OwnerEntity { id: 3 });
    let mut child: Box<Instance> = Box::new(Child::default());
    assert_eq!(
        inject_parent(&bindings, &mut *child, Some(&entity), &suffixes()),
        Injection::Field
    );
    assert_eq!(child.downcast_ref::<Child>().unwrap().field.as_ref().unwrap().id, 3);

    let unrelated = ResourceValue::new(String::from("nobody wants me"));
    assert_eq!(
        inject_parent(&bindings, &mut *child, Some(&unrelated), &suffixes()),
        Injection::Skipped
    );
    assert_eq!(
        inject_parent(&bindings, &mut *child, None, &suffixes()),
        Injection::Skipped
    );
}
