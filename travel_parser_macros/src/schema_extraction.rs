use proc_macro2::TokenStream;
use syn::{
    parse::Parser, punctuated::Punctuated, Attribute, Expr, ExprLit, Lit, LitStr, MetaNameValue,
    Token,
};

#[derive(Default)]
pub struct RecordSchemaArgs {
    pub name: Option<LitStr>,
    pub description: Option<LitStr>,
}

pub fn parse_record_schema_args(attr: TokenStream) -> syn::Result<RecordSchemaArgs> {
    if attr.is_empty() {
        return Ok(RecordSchemaArgs::default());
    }

    let parser = Punctuated::<MetaNameValue, Token![,]>::parse_terminated;
    let args = parser.parse2(attr)?;

    let mut result = RecordSchemaArgs::default();

    for nested in args {
        let ident = nested
            .path
            .get_ident()
            .ok_or_else(|| syn::Error::new_spanned(&nested.path, "expected identifier"))?;

        let lit_str = match &nested.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(lit), ..
            }) => lit.clone(),
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "expected string literal value",
                ));
            }
        };

        let slot = match ident.to_string().as_str() {
            "name" => &mut result.name,
            "description" => &mut result.description,
            other => {
                return Err(syn::Error::new(
                    ident.span(),
                    format!("unsupported argument `{other}`"),
                ));
            }
        };

        if slot.is_some() {
            return Err(syn::Error::new(
                ident.span(),
                format!("duplicate `{ident}` argument"),
            ));
        }
        *slot = Some(lit_str);
    }

    Ok(result)
}

pub fn collect_doc_comments(attrs: &[Attribute]) -> Option<String> {
    let docs: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            syn::Meta::NameValue(MetaNameValue {
                value: Expr::Lit(ExprLit {
                    lit: Lit::Str(lit), ..
                }),
                ..
            }) => Some(lit.value().trim().to_string()),
            _ => None,
        })
        .collect();

    if docs.is_empty() {
        None
    } else {
        Some(docs.join("\n"))
    }
}

/// Reads `key = "value"` out of `#[serde(...)]` attributes, skipping anything else.
pub fn serde_string_arg(attrs: &[Attribute], key: &str) -> Option<String> {
    let mut found = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(key) {
                let lit: LitStr = meta.value()?.parse()?;
                found = Some(lit.value());
            } else if meta.input.peek(Token![=]) {
                let _: Expr = meta.value()?.parse()?;
            }
            Ok(())
        });
    }

    found
}
