use proc_macro2::TokenStream;
use quote::{quote, ToTokens, TokenStreamExt};
use serde::{Serialize, Deserialize};
use schemars::JsonSchema;

use crate::impl_struct_to_tokens;

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub struct FaderConfig {
    pub start_delay_ms: u32,
    pub step_ms: u32,
    pub steps: u8,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub struct GlowConfig {
    pub start_delay_ms: u32,
    pub steps: Vec<GlowStep>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub struct GlowStep {
    pub color: RGB8,
    pub duration_ms: u32,
}

/// Color as `[r, g, b]`
#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub struct RGB8(pub u8, pub u8, pub u8);

impl_struct_to_tokens! {
    struct FaderConfig: crate::arcade::FaderConfig { start_delay_ms, step_ms, steps, }
    struct GlowConfig: crate::arcade::GlowConfig { start_delay_ms, &[steps], }
    struct GlowStep: crate::arcade::GlowStep { color, duration_ms, }
}

impl ToTokens for RGB8 {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let RGB8(r, g, b) = self;
        tokens.append_all(quote! {
            rgb::RGB8::new(#r, #g, #b)
        })
    }
}
