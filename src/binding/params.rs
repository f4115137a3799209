use crate::coercion::coerce;
use crate::exchange::QueryParams;
use crate::registry::{Bindings, Instance, Member, MemberKind, Slot};
use tracing::debug;

fn try_scalar(member: &Member, target: &mut Instance, value: &str) -> bool {
    let Slot::Scalar { ty, .. } = member.slot() else {
        return false;
    };
    match coerce(value, ty) {
        Ok(coerced) => member.assign_scalar(target, coerced),
        Err(e) => {
            debug!(member = %member.name(), error = %e, "Attribute value rejected");
            false
        }
    }
}

/// Set one named attribute: a matching setter first, then a same-named field.
///
/// Returns whether anything was assigned. Never fails: a name that matches
/// nothing, or a value that does not convert, is simply not bound.
pub fn bind_attribute(bindings: &Bindings, target: &mut Instance, name: &str, value: &str) -> bool {
    bindings
        .of_kind(MemberKind::Setter)
        .filter(|m| m.matches(name))
        .any(|m| try_scalar(m, target, value))
        || bindings
            .of_kind(MemberKind::Field)
            .filter(|m| m.matches(name))
            .any(|m| try_scalar(m, target, value))
}

/// Bind the first value of every query parameter onto `target`.
///
/// Returns the number of keys that were bound.
pub fn bind_query(bindings: &Bindings, target: &mut Instance, query: &QueryParams) -> usize {
    let mut bound = 0;
    for (key, values) in query.iter() {
        let Some(value) = values.first() else {
            continue;
        };
        if bind_attribute(bindings, target, key, value) {
            bound += 1;
        } else {
            debug!(key = %key, "Query parameter ignored");
        }
    }
    bound
}
