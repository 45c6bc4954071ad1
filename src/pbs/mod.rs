//! Protocol buffer messages and gRPC stubs of the `varquery.v1` package.
//!
//! Generated from `src/proto/varquery/v1/variant_db.proto` by `build.rs`.

#![allow(clippy::derive_partial_eq_without_eq)]

tonic::include_proto!("varquery.v1");

/// Common interface of the enumerations used on the wire.
///
/// Each enumeration has an `UNSPECIFIED` zero value that is never a valid
/// query value; the remaining values are numbered contiguously from 1.
pub trait WireEnum:
    Copy + Eq + std::hash::Hash + std::fmt::Debug + TryFrom<i32> + Into<i32> + 'static
{
    /// String value of the enum field names used in the ProtoBuf definition.
    fn wire_name(&self) -> &'static str;

    /// Creates an enum from field names used in the ProtoBuf definition.
    fn from_wire_name(value: &str) -> Option<Self>;

    /// All values except `UNSPECIFIED`, in wire order.
    fn values() -> Vec<Self> {
        (1i32..)
            .map_while(|value| Self::try_from(value).ok())
            .collect()
    }

    /// Whether this is the `UNSPECIFIED` zero value.
    fn is_unspecified(&self) -> bool {
        let value: i32 = (*self).into();
        value == 0
    }
}

macro_rules! impl_wire_enum {
    ($($name:ident),* $(,)?) => {
        $(
            impl WireEnum for $name {
                fn wire_name(&self) -> &'static str {
                    self.as_str_name()
                }

                fn from_wire_name(value: &str) -> Option<Self> {
                    Self::from_str_name(value)
                }
            }
        )*
    };
}

impl_wire_enum!(
    ReferenceAssembly,
    Chromosome,
    Impact,
    BioType,
    FeatureType,
    VariantType,
    Consequence,
    ClinSignificance,
    AlphaMissenseClass,
    RelatednessDegree,
);
