use proc_macro::TokenStream;

mod tagged_key;

/// Implement `ordkey::key::TaggedKey` for an enum of single-payload
/// tuple variants. Declaration order fixes each variant's position.
#[proc_macro_derive(TaggedKey)]
pub fn derive_tagged_key(input: TokenStream) -> TokenStream {
    tagged_key::derive_tagged_key(input.into()).into()
}
