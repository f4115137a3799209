use super::*;
use crate::error::{BusinessError, DispatchError, FrameworkErrorKind};
use http::Method;

#[derive(Default)]
struct Ledger {
    owner: Option<String>,
}

impl Ledger {
    fn get(&mut self) -> Result<String, BusinessError> {
        Ok(self.owner.clone().unwrap_or_default())
    }

    fn get_entry(&mut self, id: i64) -> Result<i64, BusinessError> {
        Ok(id)
    }
}

fn ledger(name: &str) -> ResourceType {
    ResourceType::builder::<Ledger>(name)
        .verb(Method::GET, Ledger::get)
        .verb(Method::GET, Ledger::get_entry)
        .setter("owner", |l: &mut Ledger, v: String| l.owner = Some(v))
        .build()
}

#[test]
fn test_register_preserves_order_and_replaces_duplicates() {
    let mut registry = TypeRegistry::new();
    registry
        .register(ledger("acme.books.Ledger"))
        .register(ledger("acme.books.Journal"));
    registry.register(
        ResourceType::builder::<Ledger>("acme.books.Ledger")
            .verb(Method::GET, Ledger::get)
            .build(),
    );

    let names: Vec<&str> = registry.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["acme.books.Ledger", "acme.books.Journal"]);
    let replaced = registry.lookup("acme.books.Ledger").unwrap();
    assert_eq!(replaced.methods().len(), 1);
}

#[test]
fn test_lookup_is_counted_and_exact() {
    let mut registry = TypeRegistry::new();
    registry.register(ledger("acme.books.Ledger"));
    assert!(registry.lookup("acme.books.ledger").is_none());
    assert!(registry.lookup("acme.books.Ledger").is_some());
    assert_eq!(registry.lookups(), 2);
}

#[test]
fn test_has_namespace_uses_whole_segments() {
    let mut registry = TypeRegistry::new();
    registry.register(ledger("acme.books.Ledger"));
    assert!(registry.has_namespace("acme"));
    assert!(registry.has_namespace("acme.books"));
    assert!(!registry.has_namespace("acme.book"));
    assert!(!registry.has_namespace("acme.books.Ledger"));
}

#[test]
fn test_resource_type_metadata() {
    let ty = ledger("acme.books.Ledger");
    assert_eq!(ty.simple_name(), "Ledger");
    assert_eq!(ty.namespace(), "acme.books");
    assert_eq!(ty.type_id(), std::any::TypeId::of::<Ledger>());
    let signatures: Vec<String> = ty.methods().iter().map(|m| m.signature()).collect();
    assert_eq!(signatures, vec!["get()", "get(i64)"]);
    assert!(ty.body().is_none());
}

#[test]
fn test_instantiate_uses_factory() {
    let ty = ledger("acme.books.Ledger");
    let instance = ty.instantiate().unwrap();
    assert!(instance.downcast_ref::<Ledger>().is_some());
}

#[test]
fn test_failing_factory_is_construction_error() {
    let ty = ResourceType::builder_with::<Ledger, _>("acme.books.Broken", || {
        Err(anyhow::anyhow!("database offline"))
    })
    .build();
    match ty.instantiate() {
        Err(DispatchError::Framework { kind, resource, cause }) => {
            assert_eq!(kind, FrameworkErrorKind::Construction);
            assert_eq!(resource, "acme.books.Broken");
            assert!(cause.contains("database offline"));
        }
        other => panic!("expected construction failure, got {other:?}"),
    }
}

#[test]
fn test_panicking_factory_is_construction_error() {
    let ty = ResourceType::builder_with::<Ledger, _>("acme.books.Panics", || {
        panic!("constructor exploded")
    })
    .build();
    let err = ty.instantiate().unwrap_err();
    assert!(err.to_string().contains("constructor exploded"));
}

#[derive(Default, crate::Bindable)]
struct Address {
    city: Option<String>,
    zip: i32,
}

#[derive(Default, crate::Bindable)]
struct Applicant {
    name: Option<String>,
    #[bind(nested)]
    address: Option<Address>,
    #[bind(skip)]
    #[allow(dead_code)]
    audit: Vec<String>,
    #[bind(rename = "e-mail")]
    email: String,
}

#[test]
fn test_derived_bindings_follow_declaration_order() {
    let table = Applicant::bindings();
    let names: Vec<&str> = table.members().iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["name", "address", "e-mail"]);
    assert!(table.members().iter().all(|m| m.kind() == MemberKind::Field));
    assert!(matches!(table.members()[1].slot(), Slot::Nested { .. }));
}

#[test]
fn test_bindable_builder_appends_derived_members() {
    #[derive(Default, crate::Bindable)]
    struct Search {
        term: Option<String>,
    }

    impl Search {
        fn get(&mut self) -> Result<String, BusinessError> {
            Ok(self.term.clone().unwrap_or_default())
        }
    }

    let ty = ResourceType::builder::<Search>("acme.Search")
        .verb(Method::GET, Search::get)
        .setter("query", |s: &mut Search, v: String| s.term = Some(v))
        .bindable()
        .build();
    let names: Vec<&str> = ty.bindings().members().iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["query", "term"]);
}

#[test]
fn test_body_slot_reports_body_type() {
    #[derive(Default)]
    struct Intake {
        applicant: Applicant,
    }

    let ty = ResourceType::builder::<Intake>("acme.Intake")
        .body(|i: &mut Intake| &mut i.applicant)
        .build();
    let body = ty.body().unwrap();
    assert_eq!(body.type_name(), "Applicant");
    assert_eq!(body.bindings().len(), 3);

    let mut instance = ty.instantiate().unwrap();
    assert!(body.project(&mut *instance).is_some());
}
