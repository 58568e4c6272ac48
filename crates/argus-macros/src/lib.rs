use proc_macro::TokenStream;
use quote::quote;
use syn::{
    meta::ParseNestedMeta, parse_macro_input, Data, DeriveInput, Fields, Ident, LitChar, LitInt,
    LitStr, Result, Type,
};

/// Derive `argus::Arguments` for a struct with named fields.
///
/// This generates:
/// - `declarations()`, one `argus::Declaration` per annotated field
/// - `slot_mut()`, mapping each annotated field name to `&mut dyn argus::FieldSlot`
///
/// Fields without an `#[argus(..)]` attribute are left alone.
///
/// ```ignore
/// #[derive(Default, argus::Arguments)]
/// struct Options {
///     #[argus(positional(order = 0, name = "ConfigFile", description = "The path to the config file"))]
///     config_file: String,
///     #[argus(named(name = "Date", short = 'd', description = "Sets the execution date"))]
///     date: Option<chrono::NaiveDate>,
///     #[argus(switch(name = "Force", short = 'f'))]
///     force: bool,
///     #[argus(positional(order = 1, params, name = "TargetFiles"))]
///     target_files: Vec<String>,
/// }
/// ```
#[proc_macro_derive(Arguments, attributes(argus))]
pub fn derive_arguments(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

enum Kind {
    Positional { order: LitInt, params: bool },
    Named,
    Switch,
}

struct FieldDecl {
    ident: Ident,
    ty: Type,
    kind: Kind,
    name: Option<LitStr>,
    short: Option<LitChar>,
    description: Option<LitStr>,
}

fn expand(input: DeriveInput) -> Result<proc_macro2::TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Arguments can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Arguments requires a struct with named fields",
        ));
    };

    let mut decls = Vec::new();
    for field in &fields.named {
        if let Some(decl) = parse_field(field)? {
            decls.push(decl);
        }
    }

    let decl_exprs: Vec<proc_macro2::TokenStream> = decls.iter().map(declaration_expr).collect();
    let idents: Vec<&Ident> = decls.iter().map(|d| &d.ident).collect();
    let field_names: Vec<LitStr> = decls.iter().map(|d| field_lit(&d.ident)).collect();

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::argus::Arguments for #ident #ty_generics #where_clause {
            fn declarations() -> ::std::vec::Vec<::argus::Declaration> {
                ::std::vec![ #(#decl_exprs),* ]
            }

            fn slot_mut(
                &mut self,
                field: &str,
            ) -> ::std::option::Option<&mut dyn ::argus::FieldSlot> {
                match field {
                    #( #field_names => ::std::option::Option::Some(
                        &mut self.#idents as &mut dyn ::argus::FieldSlot
                    ), )*
                    _ => ::std::option::Option::None,
                }
            }
        }
    })
}

fn parse_field(field: &syn::Field) -> Result<Option<FieldDecl>> {
    let Some(ident) = field.ident.clone() else {
        return Ok(None);
    };
    let mut found: Option<FieldDecl> = None;

    for attr in &field.attrs {
        if !attr.path().is_ident("argus") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let kind = if meta.path.is_ident("positional") {
                Kind::Positional {
                    order: LitInt::new("0", proc_macro2::Span::call_site()),
                    params: false,
                }
            } else if meta.path.is_ident("named") {
                Kind::Named
            } else if meta.path.is_ident("switch") {
                Kind::Switch
            } else {
                return Err(meta.error("expected `positional`, `named` or `switch`"));
            };
            if found.is_some() {
                return Err(meta.error("a field takes only one argus declaration"));
            }
            let decl = parse_decl(&meta, ident.clone(), field.ty.clone(), kind)?;
            found = Some(decl);
            Ok(())
        })?;
    }

    Ok(found)
}

fn parse_decl(meta: &ParseNestedMeta, ident: Ident, ty: Type, kind: Kind) -> Result<FieldDecl> {
    let mut decl = FieldDecl {
        ident,
        ty,
        kind,
        name: None,
        short: None,
        description: None,
    };
    let mut order: Option<LitInt> = None;
    let mut params = false;

    meta.parse_nested_meta(|inner| {
        let positional = matches!(decl.kind, Kind::Positional { .. });
        if inner.path.is_ident("name") {
            decl.name = Some(inner.value()?.parse()?);
        } else if inner.path.is_ident("description") {
            decl.description = Some(inner.value()?.parse()?);
        } else if inner.path.is_ident("order") && positional {
            let lit: LitInt = inner.value()?.parse()?;
            let value = lit.base10_parse::<usize>()?;
            // Drop any suffix so the literal infers as usize.
            order = Some(LitInt::new(&value.to_string(), lit.span()));
        } else if inner.path.is_ident("params") && positional {
            params = true;
        } else if inner.path.is_ident("short") && !positional {
            decl.short = Some(inner.value()?.parse()?);
        } else {
            return Err(inner.error("unsupported argus attribute key"));
        }
        Ok(())
    })?;

    match &mut decl.kind {
        Kind::Positional {
            order: slot,
            params: is_params,
        } => {
            let Some(order) = order else {
                return Err(meta.error("positional is missing required key: order"));
            };
            *slot = order;
            *is_params = params;
        }
        Kind::Named | Kind::Switch => {
            let Some(name) = &decl.name else {
                return Err(meta.error("option is missing required key: name"));
            };
            if name.value().chars().count() < 2 {
                return Err(syn::Error::new_spanned(
                    name,
                    "option names must be at least 2 characters long",
                ));
            }
        }
    }

    Ok(decl)
}

fn declaration_expr(decl: &FieldDecl) -> proc_macro2::TokenStream {
    let field = field_lit(&decl.ident);
    let ty = &decl.ty;
    let kind = quote! { <#ty as ::argus::FieldSlot>::declared_kind() };

    let mut expr = match &decl.kind {
        Kind::Positional { order, params } => {
            let mut expr = quote! { ::argus::Declaration::positional(#field, #order, #kind) };
            if let Some(name) = &decl.name {
                expr = quote! { #expr.with_name(#name) };
            }
            if *params {
                expr = quote! { #expr.params() };
            }
            expr
        }
        Kind::Named => {
            let name = &decl.name;
            quote! { ::argus::Declaration::named(#field, #name, #kind) }
        }
        Kind::Switch => {
            let name = &decl.name;
            quote! { ::argus::Declaration::switch(#field, #name, #kind) }
        }
    };

    if let Some(short) = &decl.short {
        expr = quote! { #expr.with_short(#short) };
    }
    if let Some(description) = &decl.description {
        expr = quote! { #expr.with_description(#description) };
    }
    expr
}

fn field_lit(ident: &Ident) -> LitStr {
    let name = ident.to_string();
    let name = name.strip_prefix("r#").unwrap_or(&name);
    LitStr::new(name, ident.span())
}
