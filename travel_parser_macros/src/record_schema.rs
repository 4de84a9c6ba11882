use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{spanned::Spanned, Fields, Ident, ItemStruct, LitStr};

use crate::schema_extraction::{
    collect_doc_comments, parse_record_schema_args, serde_string_arg, RecordSchemaArgs,
};

/// Expands `#[record_schema(...)]` on `item` into the struct plus its `RecordSchema` impl.
pub fn expand(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let args = parse_record_schema_args(attr)?;
    let item: ItemStruct = syn::parse2(item)?;
    let spec = RecordSpec::from_item(args, &item)?;
    let impl_block = spec.impl_tokens();

    Ok(quote! {
        #item
        #impl_block
    })
}

/// Everything the generated impl needs to know about one record struct.
struct RecordSpec {
    ident: Ident,
    schema_name: String,
    description: Option<String>,
    field_docs: Vec<FieldDoc>,
}

/// A field doc comment, keyed by the name serde writes the field under.
#[derive(Debug, PartialEq)]
struct FieldDoc {
    wire_name: String,
    doc: String,
}

impl RecordSpec {
    fn from_item(args: RecordSchemaArgs, item: &ItemStruct) -> syn::Result<Self> {
        let Fields::Named(fields) = &item.fields else {
            return Err(syn::Error::new(
                item.struct_token.span(),
                "`#[record_schema]` only supports structs with named fields",
            ));
        };

        if !item.generics.params.is_empty() {
            return Err(syn::Error::new(
                item.generics.span(),
                "`#[record_schema]` does not support generic structs",
            ));
        }

        let casing = match serde_string_arg(&item.attrs, "rename_all") {
            Some(rule) => FieldCasing::from_serde_rule(&rule).ok_or_else(|| {
                syn::Error::new(
                    item.ident.span(),
                    format!("unsupported `rename_all` rule `{rule}`"),
                )
            })?,
            None => FieldCasing::Unchanged,
        };

        let field_docs = fields
            .named
            .iter()
            .filter_map(|field| {
                let ident = field.ident.as_ref()?;
                let doc = collect_doc_comments(&field.attrs)?;
                let wire_name = serde_string_arg(&field.attrs, "rename").unwrap_or_else(|| {
                    let raw = ident.to_string();
                    casing.apply(raw.trim_start_matches("r#"))
                });
                Some(FieldDoc { wire_name, doc })
            })
            .collect();

        let description = args
            .description
            .map(|lit| lit.value())
            .or_else(|| collect_doc_comments(&item.attrs));

        Ok(Self {
            ident: item.ident.clone(),
            schema_name: args
                .name
                .map_or_else(|| item.ident.to_string(), |lit| lit.value()),
            description,
            field_docs,
        })
    }

    fn impl_tokens(&self) -> TokenStream {
        let ident = &self.ident;
        let type_name = LitStr::new(&ident.to_string(), ident.span());
        let schema_name = LitStr::new(&self.schema_name, Span::call_site());
        let description = match &self.description {
            Some(text) => {
                let text = LitStr::new(text, Span::call_site());
                quote! { Some(#text) }
            }
            None => quote! { None },
        };
        let field_docs = self.field_docs.iter().map(|field| {
            let name = LitStr::new(&field.wire_name, Span::call_site());
            let doc = LitStr::new(&field.doc, Span::call_site());
            quote! { (#name, #doc) }
        });

        quote! {
            impl travel_parser_rs::schema::RecordSchema for #ident {
                fn schema() -> &'static travel_parser_rs::schema::SchemaHandle {
                    const FIELD_DOCS: &[(&str, &str)] = &[#(#field_docs),*];
                    static HANDLE: ::std::sync::OnceLock<travel_parser_rs::schema::SchemaHandle> =
                        ::std::sync::OnceLock::new();

                    HANDLE.get_or_init(|| {
                        let mut root = travel_parser_rs::schemars::schema_for!(#ident);
                        travel_parser_rs::schema::apply_doc_comments(
                            &mut root,
                            #schema_name,
                            #description,
                            FIELD_DOCS,
                        );
                        travel_parser_rs::schema::SchemaHandle::from_root_schema::<#ident>(
                            #schema_name,
                            #type_name,
                            root,
                        )
                    })
                }
            }
        }
    }
}

/// The `#[serde(rename_all = "...")]` rules, applied to snake_case field names.
#[derive(Clone, Copy, Debug, PartialEq)]
enum FieldCasing {
    Unchanged,
    Lower,
    Upper,
    Pascal,
    Camel,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl FieldCasing {
    fn from_serde_rule(rule: &str) -> Option<Self> {
        Some(match rule {
            "snake_case" => Self::Unchanged,
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            "PascalCase" => Self::Pascal,
            "camelCase" => Self::Camel,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            "kebab-case" => Self::Kebab,
            "SCREAMING-KEBAB-CASE" => Self::ScreamingKebab,
            _ => return None,
        })
    }

    fn apply(self, field: &str) -> String {
        match self {
            Self::Unchanged => field.to_string(),
            Self::Lower => field.to_ascii_lowercase(),
            Self::Upper | Self::ScreamingSnake => field.to_ascii_uppercase(),
            Self::Pascal => pascal_case(field),
            Self::Camel => {
                let pascal = pascal_case(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => pascal,
                }
            }
            Self::Kebab => field.replace('_', "-"),
            Self::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

fn pascal_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = true;

    for ch in snake.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }

    out
}
