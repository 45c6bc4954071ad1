//! Normalization of free-form category tokens to wire enumeration values.

use crate::pbs::{
    AlphaMissenseClass, BioType, ClinSignificance, Consequence, FeatureType, Impact, VariantType,
    WireEnum,
};

/// A categorical filter axis that tokens can be normalized into.
pub trait Token: WireEnum {
    /// Prefix prepended to the normalized token before lookup.
    const PREFIX: &'static str = "";
}

impl Token for Impact {}
impl Token for BioType {}
impl Token for FeatureType {}
impl Token for VariantType {}
impl Token for Consequence {}
impl Token for ClinSignificance {}
impl Token for AlphaMissenseClass {
    const PREFIX: &'static str = "AM_";
}

/// Normalize `token` into a value of `T`.
///
/// The token is trimmed, uppercased and has spaces and hyphens replaced by
/// underscores; then `T::PREFIX` is prepended and the result looked up by
/// exact name.  Returns `None` on empty input or when nothing matches.  The
/// `UNSPECIFIED` value is never returned.
pub fn normalize<T: Token>(token: &str) -> Option<T> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    let name = format!(
        "{}{}",
        T::PREFIX,
        token.to_uppercase().replace([' ', '-'], "_")
    );
    T::from_wire_name(&name).filter(|value| !value.is_unspecified())
}

/// The tokens accepted for `T`, i.e., the wire names without `T::PREFIX`.
pub fn accepted_tokens<T: Token>() -> Vec<&'static str> {
    T::values()
        .into_iter()
        .map(|value| {
            let name = value.wire_name();
            name.strip_prefix(T::PREFIX).unwrap_or(name)
        })
        .collect()
}
