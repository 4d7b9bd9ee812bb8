pub mod format;
pub mod game;
pub mod leds;

use std::{path::Path, fs::File, io::{Write, BufReader}};

use anyhow::{ensure, Context};
use proc_macro2::TokenStream;
use quote::{quote, ToTokens, TokenStreamExt};
use serde::{Serialize, Deserialize};
use schemars::{JsonSchema, schema_for, schema::RootSchema};

/// Highest value of the 16-bit reaction stopwatch
const STOPWATCH_MAX: u32 = u16::MAX as u32;

/// Firmware configuration as read from JSON
#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq)]
pub struct ReactionConfig {
    game: game::GameConfig,
    fader: leds::FaderConfig,
    glow: leds::GlowConfig,
    /// Counting frequency of the reaction stopwatch
    stopwatch_hz: u32,
}

impl ReactionConfig {
    /// Reject values that would make the firmware misbehave at runtime
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.game.max_rounds > 0, "max_rounds must be positive");
        ensure!(self.game.max_start_delay_s > 0, "max_start_delay_s must be positive");
        ensure!(self.stopwatch_hz > 0, "stopwatch_hz must be positive");
        let window = (self.stopwatch_hz as u64) * (self.game.round_duration_s as u64);
        ensure!(
            window > 0 && window <= STOPWATCH_MAX as u64,
            "reaction window of {} ticks does not fit the stopwatch (max {})", window, STOPWATCH_MAX
        );
        ensure!(self.fader.start_delay_ms > 0 && self.fader.step_ms > 0, "fader delays must be positive");
        ensure!(self.fader.steps > 0, "fader steps must be positive");
        ensure!(self.glow.start_delay_ms > 0, "glow start delay must be positive");
        for (i, step) in self.glow.steps.iter().enumerate() {
            ensure!(step.duration_ms > 0, "glow step {} has zero duration", i);
        }
        Ok(())
    }

    fn file_tokens(&self) -> TokenStream {
        quote! {
            pub static CONFIG: crate::config::AppConfig = #self;
        }
    }

    pub fn to_file(&self, path: &Path) -> anyhow::Result<()> {
        let mut file = File::create(path)?;
        let code = format::format_file(&self.file_tokens())?;
        file.write_all(code.as_bytes())?;
        Ok(())
    }

    /// Read and validate
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let config: Self = serde_json::from_reader(&mut reader)?;
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    pub fn schema() -> RootSchema {
        schema_for!(Self)
    }

    pub fn schema_to_file(path: &Path) -> anyhow::Result<()> {
        let mut file = File::create(path)?;
        let schema = Self::schema();
        let string = serde_json::to_string_pretty(&schema)?;
        file.write_all(string.as_bytes())?;
        Ok(())
    }
}

/// Implement ToTokens for a regular struct
///
/// Generates implementations of ToTokens for a list of structs. Will use $path
/// as the name of struct in generated tokens. Each field in struct def has to
/// end with a comma (even the last one).
#[macro_export]
macro_rules! impl_struct_to_tokens {
    // Main entry point, accept a list of struct definitions
    ( $( struct $struct:ident: $path:path { $($field_defs:tt)* } )* ) => {
        $(
            impl_struct_to_tokens! { @struct $struct: $path { $($field_defs)* } }
        )*
    };

    // Generate ToTokens for a single struct
    ( @struct $struct:ident: $path:path { $($field_defs:tt)* } ) => {
        impl ToTokens for $struct {
            fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
                impl_struct_to_tokens! { @vars self $($field_defs)* }
                tokens.append_all( quote! { $path } );
                let mut fields = proc_macro2::TokenStream::new();
                impl_struct_to_tokens! { @tokens fields $($field_defs)* }
                tokens.append(proc_macro2::Group::new(proc_macro2::Delimiter::Brace, fields));
            }
        }
    };

    // Bind each field to a local so that quote! can interpolate it
    ( @vars $self:ident $field:ident, $($field_defs:tt)* ) => {
        let $field = &$self.$field;
        impl_struct_to_tokens! { @vars $self $($field_defs)* }
    };
    ( @vars $self:ident &[ $field:ident ], $($field_defs:tt)* ) => {
        impl_struct_to_tokens! { @vars $self $field, $($field_defs)* }
    };
    ( @vars $self:ident ) => {};

    // `field: field,`
    ( @tokens $tokens:ident $field:ident, $($field_defs:tt)* ) => {
        $tokens.append_all(quote! {
            $field: #$field,
        });
        impl_struct_to_tokens! { @tokens $tokens $($field_defs)* }
    };
    // Vec field as a static slice, `field: &[a, b, ...],`
    ( @tokens $tokens:ident &[ $field:ident ], $($field_defs:tt)* ) => {
        $tokens.append_all(quote! {
            $field: &[ #( #$field ),* ],
        });
        impl_struct_to_tokens! { @tokens $tokens $($field_defs)* }
    };
    ( @tokens $tokens:ident ) => {};
}

impl_struct_to_tokens! {
    struct ReactionConfig: crate::config::AppConfig { game, fader, glow, stopwatch_hz, }
}
