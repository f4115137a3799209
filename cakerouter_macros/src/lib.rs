use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Data, DeriveInput, Field, Fields, GenericArgument, LitStr, PathArguments,
    Result as SynResult, Type,
};

#[derive(Default)]
struct BindAttrs {
    skip: bool,
    nested: bool,
    object: bool,
    rename: Option<String>,
}

impl BindAttrs {
    fn from_field(field: &Field) -> SynResult<Self> {
        let mut attrs = BindAttrs::default();
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("bind")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    attrs.skip = true;
                } else if meta.path.is_ident("nested") {
                    attrs.nested = true;
                } else if meta.path.is_ident("object") {
                    attrs.object = true;
                } else if meta.path.is_ident("rename") {
                    let name: LitStr = meta.value()?.parse()?;
                    attrs.rename = Some(name.value());
                } else {
                    return Err(meta.error("expected one of: skip, nested, object, rename"));
                }
                Ok(())
            })?;
        }
        if attrs.nested && attrs.object {
            return Err(syn::Error::new_spanned(
                field,
                "a field cannot be both `nested` and `object`",
            ));
        }
        Ok(attrs)
    }
}

/// Returns `T` when `ty` is `<wrapper><T>` (matched on the last path segment).
fn unwrap_generic<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(p) = ty else { return None };
    let seg = p.path.segments.last()?;
    if seg.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

fn member_for(field: &Field) -> SynResult<Option<TokenStream2>> {
    let attrs = BindAttrs::from_field(field)?;
    if attrs.skip {
        return Ok(None);
    }
    let Some(ident) = field.ident.as_ref() else {
        return Ok(None);
    };
    let name = attrs.rename.clone().unwrap_or_else(|| {
        let raw = ident.to_string();
        raw.strip_prefix("r#").map(str::to_string).unwrap_or(raw)
    });
    let ty = &field.ty;
    let optional = unwrap_generic(ty, "Option");

    let tokens = if attrs.nested {
        match optional {
            Some(inner) => quote! {
                .nested::<#inner>(#name, |t: &mut Self| {
                    t.#ident.get_or_insert_with(::core::default::Default::default)
                })
            },
            None => quote! {
                .nested::<#ty>(#name, |t: &mut Self| &mut t.#ident)
            },
        }
    } else if attrs.object {
        let (shared, wrap) = match optional {
            Some(inner) => (inner, quote! { ::core::option::Option::Some(v) }),
            None => (ty, quote! { v }),
        };
        let Some(pointee) = unwrap_generic(shared, "Arc") else {
            return Err(syn::Error::new_spanned(
                ty,
                "`object` fields must be `Arc<T>` or `Option<Arc<T>>`",
            ));
        };
        quote! {
            .object_field::<#pointee, _>(#name, |t: &mut Self, v: ::std::sync::Arc<#pointee>| {
                t.#ident = #wrap;
            })
        }
    } else {
        match optional {
            Some(inner) => quote! {
                .field::<#inner, _>(#name, |t: &mut Self, v: #inner| {
                    t.#ident = ::core::option::Option::Some(v);
                })
            },
            None => quote! {
                .field::<#ty, _>(#name, |t: &mut Self, v: #ty| {
                    t.#ident = v;
                })
            },
        }
    };
    Ok(Some(tokens))
}

fn expand(input: &DeriveInput) -> SynResult<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Bindable can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Bindable requires named fields",
        ));
    };

    let mut members = Vec::new();
    for field in &fields.named {
        if let Some(member) = member_for(field)? {
            members.push(member);
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::cakerouter::registry::Bindable for #name #ty_generics #where_clause {
            fn bindings() -> ::cakerouter::registry::Bindings {
                ::cakerouter::registry::Bindings::builder::<Self>()
                    #(#members)*
                    .build()
            }
        }
    })
}

/// Derive a member table from a struct's named fields.
///
/// Every field becomes a field member named after it, in declaration order:
///
/// - `X` or `Option<X>` where `X: Param` is a scalar slot (`Option` fields are
///   assigned `Some(value)`)
/// - `#[bind(nested)]` marks an embedded `Bindable` struct; an absent `Option`
///   is created with `Default` the first time a nested payload reaches it
/// - `#[bind(object)]` marks an `Arc<P>` or `Option<Arc<P>>` slot that accepts a
///   shared verb-method result of type `P`
/// - `#[bind(skip)]` leaves the field out
/// - `#[bind(rename = "...")]` binds under a different name
#[proc_macro_derive(Bindable, attributes(bind))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
