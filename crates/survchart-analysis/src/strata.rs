//! Strata descriptors and chart grouping keys
//!
//! A strata descriptor is a comma-separated list of `field=value` pairs, such as
//! `eth_european=1, snz_sex_gender_code=Male`. Raw field names are mapped to
//! readable names through a fixed table; the names form chart titles and the
//! values form the labels of the curves within a chart.

/// Raw strata field names and their readable names.
const FIELD_NAMES: [(&str, &str); 16] = [
    ("eth_european", "European"),
    ("eth_maori", "Maori"),
    ("eth_pasifika", "Pasifika"),
    ("eth_asian", "Asian"),
    ("eth_melaa", "MELAA"),
    ("dep_index_ind", "Deprivation Index"),
    ("apc_employed_ind", "Employment"),
    ("snz_sex_gender_code", "Gender"),
    ("rural_ind", "Rural"),
    ("is_benefit", "Benefit"),
    ("addr_transience", "Address Transience"),
    ("young_mother_ind", "Young Mothers"),
    ("young_mother_before_19_ind", "Young Mothers (Before 19)"),
    ("NZDep2018_1_3", "Deprivation Index (1-3)"),
    ("NZDep2018_8_10", "Deprivation Index (8-10)"),
    ("is_study_ind", "Studying"),
];

const JOINER: &str = " & ";

/// Returns the readable name of a raw strata field.
#[must_use]
pub fn display_name(field: &str) -> Option<&'static str> {
    FIELD_NAMES
        .iter()
        .find(|(raw, _)| *raw == field)
        .map(|(_, name)| *name)
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum StrataError {
    #[display("malformed strata pair {pair:?} (expected field=value)")]
    MalformedPair { pair: String },
    #[display("unknown strata field {field:?}")]
    UnknownField { field: String },
}

/// One `field=value` pair of a strata descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrataDimension {
    pub field: String,
    pub name: &'static str,
    pub value: String,
}

/// A parsed strata descriptor. Always holds at least one dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strata {
    pub dimensions: Vec<StrataDimension>,
}

impl Strata {
    /// Parses a descriptor such as `eth_maori=1, rural_ind=0`.
    ///
    /// Field names and values are trimmed. A value ends at the next `=`, if any.
    /// Every field must be present in the name table.
    pub fn parse(descriptor: &str) -> Result<Self, StrataError> {
        let dimensions = descriptor
            .split(',')
            .map(|pair| {
                let mut parts = pair.split('=');
                let (Some(field), Some(value)) = (parts.next(), parts.next()) else {
                    return Err(StrataError::MalformedPair {
                        pair: pair.to_owned(),
                    });
                };
                let field = field.trim();
                let name = display_name(field).ok_or_else(|| StrataError::UnknownField {
                    field: field.to_owned(),
                })?;
                Ok(StrataDimension {
                    field: field.to_owned(),
                    name,
                    value: value.trim().to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { dimensions })
    }
}

/// How strata dimensions are split between the chart title and the curve label.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr, derive_more::Display)]
pub enum StrataSplit {
    /// All dimension names form the title, all values form the label.
    #[default]
    #[display("joined")]
    Joined,
    /// The first dimension name forms the title, the remaining values form the label.
    #[display("leading")]
    Leading,
}

/// Chart title and curve label of a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub title: String,
    pub label: String,
}

impl StrataSplit {
    #[must_use]
    pub fn group_key(self, metric: &str, strata: &Strata) -> GroupKey {
        let dims = &strata.dimensions;
        let (names, values) = match self {
            StrataSplit::Joined => (dims.as_slice(), dims.as_slice()),
            StrataSplit::Leading if dims.len() > 1 => (&dims[..1], &dims[1..]),
            StrataSplit::Leading => (&dims[..1], &dims[..1]),
        };
        let names = names.iter().map(|d| d.name).collect::<Vec<_>>();
        let values = values.iter().map(|d| d.value.as_str()).collect::<Vec<_>>();
        GroupKey {
            title: format!("{metric} - {}", names.join(JOINER)),
            label: values.join(JOINER),
        }
    }
}
