use anyhow::Context;
use proc_macro2::TokenStream;
use quote::quote;

/// Pretty-print tokens of a whole source file
pub fn format_file(tokens: &TokenStream) -> anyhow::Result<String> {
    let code = tokens.to_string();
    let parsed = syn::parse_file(&code)
        .with_context(|| format!("Failed to parse:\n{}", code))?;
    Ok(prettyplease::unparse(&parsed))
}

/// Pretty-print an expression by wrapping it in a dummy static item
pub fn format_expr(tokens: TokenStream) -> anyhow::Result<String> {
    format_file(&quote! {
        static EXPR: ExprType = #tokens;
    })
}

#[cfg(test)]
pub fn assert_tokens_eq(left: TokenStream, right: TokenStream) {
    let left = format_expr(left).unwrap();
    let right = format_expr(right).unwrap();
    similar_asserts::assert_eq!(left, right);
}
