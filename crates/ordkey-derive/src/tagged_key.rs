use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, Ident, Type};

// Tag bits hold positions 0..=7, but the alternative lists stop at seven.
const MAX_ALTERNATIVES: usize = 7;

///
/// Alternative
///

struct Alternative {
    ident: Ident,
    payload: Type,
}

// derive_tagged_key
pub fn derive_tagged_key(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let alternatives = match parse_alternatives(&input) {
        Ok(alternatives) => alternatives,
        Err(err) => return err.to_compile_error(),
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let payloads = alternatives.iter().map(|alt| &alt.payload);
    let names = alternatives.iter().map(|alt| alt.ident.to_string());

    let position_arms = alternatives.iter().enumerate().map(|(position, alt)| {
        let variant = &alt.ident;
        quote! {
            Self::#variant(_) => #position,
        }
    });

    let magnitude_arms = alternatives.iter().map(|alt| {
        let variant = &alt.ident;
        quote! {
            Self::#variant(value) => ::ordkey::key::KeyAlternative::to_magnitude(value),
        }
    });

    quote! {
        impl #impl_generics ::ordkey::key::TaggedKey for #ident #ty_generics #where_clause {
            type Alternatives = ( #( #payloads, )* );

            const ALTERNATIVE_NAMES: &'static [&'static str] = &[ #( #names ),* ];

            fn position(&self) -> usize {
                match self {
                    #( #position_arms )*
                }
            }

            fn magnitude(&self) -> u64 {
                match self {
                    #( #magnitude_arms )*
                }
            }
        }
    }
}

fn parse_alternatives(input: &DeriveInput) -> Result<Vec<Alternative>, Error> {
    let Data::Enum(data) = &input.data else {
        return Err(Error::new_spanned(
            &input.ident,
            "TaggedKey can only be derived for enums",
        ));
    };

    if data.variants.is_empty() {
        return Err(Error::new_spanned(
            &input.ident,
            "TaggedKey requires at least one variant",
        ));
    }

    if data.variants.len() > MAX_ALTERNATIVES {
        return Err(Error::new_spanned(
            &input.ident,
            format!(
                "TaggedKey supports at most {MAX_ALTERNATIVES} variants, found {}",
                data.variants.len()
            ),
        ));
    }

    data.variants
        .iter()
        .map(|variant| match &variant.fields {
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => Ok(Alternative {
                ident: variant.ident.clone(),
                payload: fields.unnamed[0].ty.clone(),
            }),
            _ => Err(Error::new_spanned(
                variant,
                "TaggedKey variants must be tuple variants with exactly one payload",
            )),
        })
        .collect()
}
