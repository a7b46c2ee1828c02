// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Field, Fields, GenericArgument, PathArguments, Type, Visibility};

/// How an `#[embed]` field reaches its record: directly or through one
/// level of pointer indirection.
enum EmbedStyle {
    Plain,
    Optional,
    Boxed,
    OptionalBoxed,
}

struct FieldModel<'a> {
    index: usize,
    ident: &'a syn::Ident,
    ty: &'a Type,
    exported: bool,
    embedded: bool,
    annotations: Vec<(String, String)>,
}

pub fn derive_record(ast: &DeriveInput) -> TokenStream {
    let name = &ast.ident;
    if !ast.generics.params.is_empty() {
        panic!("Record cannot be derived for generic types");
    }
    let fields = match &ast.data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => panic!("Record requires named fields"),
        },
        Data::Enum(_) => panic!("Record cannot be derived for enums"),
        Data::Union(_) => panic!("Record cannot be derived for unions"),
    };

    let models: Vec<FieldModel> = fields
        .iter()
        .enumerate()
        .map(|(index, field)| field_model(index, field))
        .collect();

    let name_str = name.to_string();
    let accessor_fns: Vec<TokenStream2> = models.iter().map(|m| gen_accessors(name, m)).collect();
    let entries: Vec<TokenStream2> = models.iter().map(|m| gen_raw_field(m)).collect();
    let field_count = models.len();
    let default_fields: Vec<TokenStream2> = models
        .iter()
        .map(|m| {
            let ident = m.ident;
            quote! { #ident: tagwire_core::coder::ReflectDefault::reflect_default() }
        })
        .collect();

    let gen = quote! {
        const _: () = {
            #(#accessor_fns)*

            static __FIELDS: [tagwire_core::coder::record::RawField; #field_count] = [
                #(#entries),*
            ];

            impl tagwire_core::coder::Reflect for #name {
                fn make_encoder(
                    driver: &tagwire_core::resolver::DriverHandle,
                ) -> Result<tagwire_core::coder::EncoderFn, tagwire_core::error::Error> {
                    tagwire_core::coder::record::record_encoder::<#name>(driver)
                }

                fn make_decoder(
                    driver: &tagwire_core::resolver::DriverHandle,
                ) -> Result<tagwire_core::coder::DecoderFn, tagwire_core::error::Error> {
                    tagwire_core::coder::record::record_decoder::<#name>(driver)
                }

                fn dyn_coders(
                    &self,
                    driver: &tagwire_core::resolver::DriverHandle,
                ) -> Result<tagwire_core::coder::CoderPair, tagwire_core::error::Error> {
                    tagwire_core::resolver::type_coders::<#name>(driver)
                }

                fn is_empty_value(&self) -> bool {
                    false
                }

                fn marshal_cast() -> Option<tagwire_core::coder::MarshalCast> {
                    #[allow(unused_imports)]
                    use tagwire_core::coder::capability::NoMarshalCapability as _;
                    tagwire_core::coder::capability::MarshalProbe::<#name>::CAST
                }

                fn unmarshal_cast() -> Option<tagwire_core::coder::UnmarshalCast> {
                    #[allow(unused_imports)]
                    use tagwire_core::coder::capability::NoUnmarshalCapability as _;
                    tagwire_core::coder::capability::UnmarshalProbe::<#name>::CAST
                }

                fn as_any(&self) -> &dyn ::std::any::Any {
                    self
                }

                fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                    self
                }

                fn dyn_type_name(&self) -> &'static str {
                    #name_str
                }
            }

            impl tagwire_core::coder::ReflectDefault for #name {
                fn reflect_default() -> Self {
                    #name {
                        #(#default_fields),*
                    }
                }
            }

            impl tagwire_core::coder::record::Record for #name {
                fn record_name() -> &'static str {
                    #name_str
                }

                fn record_fields() -> &'static [tagwire_core::coder::record::RawField] {
                    &__FIELDS
                }
            }
        };
    };
    gen.into()
}

fn field_model<'a>(index: usize, field: &'a Field) -> FieldModel<'a> {
    let ident = field
        .ident
        .as_ref()
        .expect("named struct fields carry an identifier");
    let exported = matches!(field.vis, Visibility::Public(_));
    let mut embedded = false;
    let mut annotations = Vec::new();

    for attr in &field.attrs {
        if attr.path().is_ident("embed") {
            embedded = true;
        } else if attr.path().is_ident("tag") {
            attr.parse_nested_meta(|meta| {
                let key = meta
                    .path
                    .get_ident()
                    .map(|ident| ident.to_string())
                    .ok_or_else(|| meta.error("annotation keys must be plain identifiers"))?;
                let value: syn::LitStr = meta.value()?.parse()?;
                annotations.push((key, value.value()));
                Ok(())
            })
            .unwrap_or_else(|err| panic!("malformed #[tag(...)] attribute: {}", err));
        }
    }

    FieldModel {
        index,
        ident,
        ty: &field.ty,
        exported,
        embedded,
        annotations,
    }
}

fn gen_accessors(name: &syn::Ident, model: &FieldModel) -> TokenStream2 {
    let ident = model.ident;
    let index = model.index;
    if model.embedded {
        let (style, target) = embed_target(model.ty);
        let target_str = type_display(&target);
        let get_fn = format_ident!("__embed_get_{}", index);
        let get_mut_fn = format_ident!("__embed_get_mut_{}", index);
        let new_fn = format_ident!("__embed_new_{}", index);
        let shape = format_ident!("__EMBED_{}", index);

        let (get_expr, get_mut_expr) = match style {
            EmbedStyle::Plain => (
                quote! { Some(&record.#ident as &dyn tagwire_core::coder::Reflect) },
                quote! { Some(&mut record.#ident as &mut dyn tagwire_core::coder::Reflect) },
            ),
            EmbedStyle::Optional => (
                quote! { record.#ident.as_ref().map(|inner| inner as &dyn tagwire_core::coder::Reflect) },
                quote! { record.#ident.as_mut().map(|inner| inner as &mut dyn tagwire_core::coder::Reflect) },
            ),
            EmbedStyle::Boxed => (
                quote! { Some(&*record.#ident as &dyn tagwire_core::coder::Reflect) },
                quote! { Some(&mut *record.#ident as &mut dyn tagwire_core::coder::Reflect) },
            ),
            EmbedStyle::OptionalBoxed => (
                quote! { record.#ident.as_deref().map(|inner| inner as &dyn tagwire_core::coder::Reflect) },
                quote! { record.#ident.as_deref_mut().map(|inner| inner as &mut dyn tagwire_core::coder::Reflect) },
            ),
        };

        quote! {
            fn #get_fn(
                v: &dyn tagwire_core::coder::Reflect,
            ) -> Result<Option<&dyn tagwire_core::coder::Reflect>, tagwire_core::error::Error> {
                let record = tagwire_core::coder::concrete::<#name>(v)?;
                Ok(#get_expr)
            }

            fn #get_mut_fn(
                v: &mut dyn tagwire_core::coder::Reflect,
            ) -> Result<Option<&mut dyn tagwire_core::coder::Reflect>, tagwire_core::error::Error> {
                let record = tagwire_core::coder::concrete_mut::<#name>(v)?;
                Ok(#get_mut_expr)
            }

            fn #new_fn() -> Box<dyn tagwire_core::coder::Reflect> {
                Box::new(<#target as tagwire_core::coder::ReflectDefault>::reflect_default())
            }

            static #shape: tagwire_core::coder::record::EmbedShape =
                tagwire_core::coder::record::EmbedShape {
                    fields: tagwire_core::resolver::cached_fields::<#target>,
                    get: #get_fn,
                    get_mut: #get_mut_fn,
                    synthesize: #new_fn,
                    target: #target_str,
                };
        }
    } else {
        let get_fn = format_ident!("__get_{}", index);
        let get_mut_fn = format_ident!("__get_mut_{}", index);
        quote! {
            fn #get_fn(
                v: &dyn tagwire_core::coder::Reflect,
            ) -> Result<&dyn tagwire_core::coder::Reflect, tagwire_core::error::Error> {
                Ok(&tagwire_core::coder::concrete::<#name>(v)?.#ident)
            }

            fn #get_mut_fn(
                v: &mut dyn tagwire_core::coder::Reflect,
            ) -> Result<&mut dyn tagwire_core::coder::Reflect, tagwire_core::error::Error> {
                Ok(&mut tagwire_core::coder::concrete_mut::<#name>(v)?.#ident)
            }
        }
    }
}

fn gen_raw_field(model: &FieldModel) -> TokenStream2 {
    let index = model.index;
    let name_str = model.ident.to_string();
    let type_str = type_display(model.ty);
    let exported = model.exported;
    let keys = model.annotations.iter().map(|(key, _)| key);
    let values = model.annotations.iter().map(|(_, value)| value);

    let access = if model.embedded {
        let shape = format_ident!("__EMBED_{}", index);
        quote! { tagwire_core::coder::record::RawAccess::Embedded(&#shape) }
    } else {
        let ty = model.ty;
        let get_fn = format_ident!("__get_{}", index);
        let get_mut_fn = format_ident!("__get_mut_{}", index);
        quote! {
            tagwire_core::coder::record::RawAccess::Leaf {
                get: #get_fn,
                get_mut: #get_mut_fn,
                coders: tagwire_core::resolver::type_coders::<#ty>,
            }
        }
    };

    quote! {
        tagwire_core::coder::record::RawField {
            index: #index,
            name: #name_str,
            type_name: #type_str,
            exported: #exported,
            annotations: &[#((#keys, #values)),*],
            access: #access,
        }
    }
}

/// Resolves the record type behind an embedded field, unwrapping one level
/// of `Option`/`Box` indirection.
fn embed_target(ty: &Type) -> (EmbedStyle, Type) {
    if let Some(inner) = wrapped_type(ty, "Option") {
        if let Some(inner) = wrapped_type(&inner, "Box") {
            return (EmbedStyle::OptionalBoxed, inner);
        }
        return (EmbedStyle::Optional, inner);
    }
    if let Some(inner) = wrapped_type(ty, "Box") {
        return (EmbedStyle::Boxed, inner);
    }
    (EmbedStyle::Plain, ty.clone())
}

fn wrapped_type(ty: &Type, wrapper: &str) -> Option<Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner.clone()),
        _ => None,
    }
}

/// Renders a type the way it was written, without token-stream spacing.
fn type_display(ty: &Type) -> String {
    let raw = quote!(#ty).to_string();
    raw.replace(" :: ", "::")
        .replace(" < ", "<")
        .replace(" <", "<")
        .replace("< ", "<")
        .replace(" > ", ">")
        .replace(" >", ">")
        .replace(" ,", ",")
}
