use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr, Meta, Token};

/// Derive macro that turns a struct with named fields into a CSV export row.
///
/// For each field, in declaration order:
/// - Column header (respects #[serde(rename = "...")], falls back to the field name)
/// - Description (from doc comments)
/// - Cell value, through the `CsvValue` trait of the field type
///
/// Generates an `impl crate::export::CsvRecord` for the struct.
#[proc_macro_derive(CsvRecord, attributes(serde))]
pub fn derive_csv_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("CsvRecord only supports structs with named fields"),
        },
        _ => panic!("CsvRecord only supports structs"),
    };

    let columns: Vec<_> = fields
        .iter()
        .map(|field| {
            let ident = field.ident.as_ref().expect("named field");
            let header = get_serde_rename(&field.attrs).unwrap_or_else(|| ident.to_string());
            let doc = get_doc_comment(&field.attrs);
            (ident, header, doc)
        })
        .collect();

    let schema_entries = columns.iter().map(|(_, header, desc)| {
        quote! {
            crate::export::CsvField {
                name: #header,
                description: #desc,
            }
        }
    });

    let headers = columns.iter().map(|(_, header, _)| header);
    let values = columns.iter().map(|(ident, _, _)| {
        quote! { crate::export::CsvValue::csv_value(&self.#ident) }
    });

    let expanded = quote! {
        impl #impl_generics crate::export::CsvRecord for #name #ty_generics #where_clause {
            fn csv_schema() -> &'static [crate::export::CsvField] {
                static SCHEMA: &[crate::export::CsvField] = &[
                    #(#schema_entries),*
                ];
                SCHEMA
            }

            fn csv_headers() -> &'static [&'static str] {
                static HEADERS: &[&str] = &[#(#headers),*];
                HEADERS
            }

            fn csv_values(&self) -> Vec<Option<String>> {
                vec![#(#values),*]
            }
        }
    };

    TokenStream::from(expanded)
}

fn get_serde_rename(attrs: &[syn::Attribute]) -> Option<String> {
    let mut rename = None;
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }

        // Other serde keys are consumed and ignored.
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                rename = Some(lit.value());
            } else if meta.input.peek(Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        });
    }
    rename
}

fn get_doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter_map(|attr| {
            if !attr.path().is_ident("doc") {
                return None;
            }
            if let Meta::NameValue(meta) = &attr.meta {
                if let syn::Expr::Lit(expr_lit) = &meta.value {
                    if let syn::Lit::Str(lit_str) = &expr_lit.lit {
                        return Some(lit_str.value().trim().to_string());
                    }
                }
            }
            None
        })
        .collect::<Vec<_>>()
        .join(" ")
}
