use crate::registry::{Bindings, Instance, Member, MemberKind};
use crate::value::ResourceValue;
use std::fmt;
use tracing::{debug, warn};

/// Which rule placed the parent result into the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Injection {
    /// Setter named after the parent's type (`setCustomerResult`)
    NamedSetter,
    /// Setter named after the parent's type without its suffix (`setCustomer`)
    StrippedSetter,
    /// The first setter of a compatible type, whatever its name
    AnySetter,
    /// The first field of a compatible type
    Field,
    /// No parent, or nothing on the child accepts it
    Skipped,
}

impl fmt::Display for Injection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Injection::NamedSetter => "named_setter",
            Injection::StrippedSetter => "stripped_setter",
            Injection::AnySetter => "any_setter",
            Injection::Field => "field",
            Injection::Skipped => "skipped",
        };
        f.write_str(name)
    }
}

/// `name` without the first suffix it ends with, if the remainder is non-empty.
#[must_use]
pub fn strip_suffix<'a>(name: &'a str, suffixes: &[String]) -> Option<&'a str> {
    suffixes
        .iter()
        .find(|s| name.len() > s.len() && name.ends_with(s.as_str()))
        .map(|s| &name[..name.len() - s.len()])
}

fn first_accepting<'b>(
    members: impl Iterator<Item = &'b Member>,
    target: &mut Instance,
    parent: &ResourceValue,
) -> bool {
    for member in members {
        if member.accepts_object(parent.value_type_id()) && member.assign_object(target, parent) {
            return true;
        }
    }
    false
}

/// Seed `child` with the result of the previous handler in the chain.
///
/// Rules are tried in order until one assigns: a setter named after the parent's
/// type, a setter named after it with one of `suffixes` removed, any setter of a
/// compatible type, then the first compatible field. When none applies the
/// child is left as constructed.
pub fn inject_parent(
    bindings: &Bindings,
    child: &mut Instance,
    parent: Option<&ResourceValue>,
    suffixes: &[String],
) -> Injection {
    let Some(parent) = parent else {
        return Injection::Skipped;
    };
    let type_name = parent.type_name();
    let setters = || bindings.of_kind(MemberKind::Setter);

    let injected = if first_accepting(setters().filter(|m| m.matches(type_name)), child, parent) {
        Injection::NamedSetter
    } else if strip_suffix(type_name, suffixes).is_some_and(|stripped| {
        first_accepting(setters().filter(|m| m.matches(stripped)), child, parent)
    }) {
        Injection::StrippedSetter
    } else if first_accepting(setters(), child, parent) {
        Injection::AnySetter
    } else if first_accepting(bindings.of_kind(MemberKind::Field), child, parent) {
        Injection::Field
    } else {
        Injection::Skipped
    };

    if injected == Injection::Skipped {
        warn!(parent_type = %type_name, "Parent result not injected: no compatible member");
    } else {
        debug!(parent_type = %type_name, via = %injected, "Parent result injected");
    }
    injected
}
