//! Derive macros for the Vitrine reducer architecture
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Implements `vitrine_core::action::Action` for action enums
//! - `#[derive(State)]` - Generates revision helpers for state structs
//!
//! # Example
//!
//! ```ignore
//! use vitrine_macros::Action;
//! use vitrine_core::action::Action as _;
//!
//! #[derive(Action, Clone, Debug)]
//! enum CartAction {
//!     #[command]
//!     Clear,
//!
//!     #[event]
//!     CartCleared,
//! }
//!
//! assert!(CartAction::Clear.is_command());
//! assert_eq!(CartAction::CartCleared.name(), "CartCleared");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident};

/// Derive macro for Action enums
///
/// Implements `vitrine_core::action::Action`:
/// - `name()` - The variant name, for every variant
/// - `is_command()` - True for variants marked `#[command]`
/// - `is_event()` - True for variants marked `#[event]`
///
/// Variants with neither attribute (for example wrappers around a child
/// feature's actions) are neither commands nor events.
///
/// # Attributes
///
/// - `#[command]` - Mark a variant as a command
/// - `#[event]` - Mark a variant as an event
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - A variant has both `#[command]` and `#[event]` attributes
#[proc_macro_derive(Action, attributes(command, event))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut name_arms = Vec::new();
    let mut command_arms = Vec::new();
    let mut event_arms = Vec::new();

    for variant in &data_enum.variants {
        let is_command = has_attribute(&variant.attrs, "command");
        let is_event = has_attribute(&variant.attrs, "event");

        if is_command && is_event {
            return syn::Error::new_spanned(variant, "Variant cannot be both #[command] and #[event]")
                .to_compile_error()
                .into();
        }

        let pattern = variant_pattern(&variant.ident, &variant.fields);
        let label = variant.ident.to_string();
        name_arms.push(quote! { #pattern => #label, });

        if is_command {
            command_arms.push(quote! { #pattern => true, });
        }
        if is_event {
            event_arms.push(quote! { #pattern => true, });
        }
    }

    let expanded = quote! {
        impl #impl_generics ::vitrine_core::action::Action for #name #ty_generics #where_clause {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }

            #[allow(unreachable_patterns)]
            fn is_command(&self) -> bool {
                match self {
                    #(#command_arms)*
                    _ => false,
                }
            }

            #[allow(unreachable_patterns)]
            fn is_event(&self) -> bool {
                match self {
                    #(#event_arms)*
                    _ => false,
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Derive macro for State structs
///
/// When one field is marked `#[revision]` (it must be a
/// `vitrine_core::state::Revision`), generates:
/// - `revision()` - The current revision
/// - `bump_revision()` - Advance to the next revision and return it
///
/// Structs without a `#[revision]` field derive nothing.
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-struct type
/// - More than one field is marked `#[revision]`
/// - The marked field is unnamed
///
/// # Example
///
/// ```ignore
/// use vitrine_macros::State;
/// use vitrine_core::state::Revision;
///
/// #[derive(State, Clone, Debug, Default)]
/// struct CartState {
///     items: Vec<String>,
///     #[revision]
///     revision: Revision,
/// }
/// ```
#[proc_macro_derive(State, attributes(revision))]
pub fn derive_state(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(State)] can only be used on structs")
            .to_compile_error()
            .into();
    };

    let marked: Vec<_> = data_struct
        .fields
        .iter()
        .filter(|field| has_attribute(&field.attrs, "revision"))
        .collect();

    let field = match marked.as_slice() {
        [] => return TokenStream::new(),
        [field] => *field,
        [_, second, ..] => {
            return syn::Error::new_spanned(second, "Only one field can be marked #[revision]")
                .to_compile_error()
                .into();
        },
    };

    let Some(field_name) = field.ident.as_ref() else {
        return syn::Error::new_spanned(field, "#[revision] requires a named field")
            .to_compile_error()
            .into();
    };

    let expanded = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// The current revision of this state
            #[must_use]
            pub const fn revision(&self) -> ::vitrine_core::state::Revision {
                self.#field_name
            }

            /// Advance to the next revision and return it
            pub fn bump_revision(&mut self) -> ::vitrine_core::state::Revision {
                self.#field_name = self.#field_name.next();
                self.#field_name
            }
        }
    };

    TokenStream::from(expanded)
}

/// Match pattern that ignores a variant's payload
fn variant_pattern(ident: &Ident, fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
