mod record_schema;
mod schema_extraction;

use proc_macro::TokenStream;

/// Derives a cached JSON schema handle for a record type.
///
/// The struct must also derive `schemars::JsonSchema`. Doc comments on the
/// struct and its fields become the schema title/description metadata, keyed
/// by the field's serialized name (honouring every `#[serde(rename_all)]`
/// rule and `#[serde(rename)]`). Generic and tuple structs are rejected.
///
/// ```ignore
/// #[derive(Serialize, Deserialize, JsonSchema)]
/// #[serde(rename_all = "camelCase")]
/// #[record_schema(name = "destination")]
/// pub struct Destination { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn record_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    record_schema::expand(attr.into(), item.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
