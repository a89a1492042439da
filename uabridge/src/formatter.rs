use colored::*;
use uabridge_core::types::{ArrayType, DataType, ValueRank, Variant};

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

/// The outcome of a `convert` run: the typed variant and its canonical JSON.
pub struct Conversion {
    pub variant: Variant,
    pub value_rank: ValueRank,
    pub json: serde_json::Value,
}

pub struct TypeList(pub Vec<DataType>);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.0)?;
        Ok(())
    }
}

impl From<serde_json::Value> for FormattedString {
    fn from(value: serde_json::Value) -> Self {
        FormattedString(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
    }
}

impl From<anyhow::Error> for FormattedString {
    fn from(err: anyhow::Error) -> Self {
        FormattedString(format!("{}\n\n'{:#}'", "Conversion Failed:".red().bold(), err))
    }
}

impl From<Conversion> for FormattedString {
    fn from(conversion: Conversion) -> Self {
        let Conversion {
            variant,
            value_rank,
            json,
        } = conversion;

        let shape = match variant.array_type() {
            ArrayType::Scalar if variant.is_empty() => "Empty".to_string(),
            ArrayType::Scalar => "Scalar".to_string(),
            ArrayType::Array => format!("Array[{}]", variant.values().len()),
            ArrayType::Matrix => format!("Matrix{:?}", variant.dimensions().unwrap_or_default()),
        };

        let mut out = String::new();
        out.push_str(&format!(
            "{} {} {} {}\n",
            "variant".cyan(),
            variant.data_type().to_string().green(),
            shape.yellow(),
            format!("(value rank {value_rank})").dimmed()
        ));
        out.push_str(&FormattedString::from(json).0);

        FormattedString(out)
    }
}

impl From<TypeList> for FormattedString {
    fn from(TypeList(types): TypeList) -> Self {
        let mut out = String::new();
        out.push_str("Built-in Data Types:\n");
        for data_type in types {
            out.push_str(&format!(
                "  {:>2}  {}\n",
                data_type.id().to_string().cyan(),
                data_type.name().green()
            ));
        }
        FormattedString(out.trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_conversion_shows_type_and_shape() {
        colored::control::set_override(false);

        let variant = Variant::matrix(
            DataType::Int32,
            vec![2, 2],
            (1..=4).map(uabridge_core::types::Scalar::Int32).collect(),
        )
        .unwrap();

        let out = FormattedString::from(Conversion {
            variant,
            value_rank: ValueRank::dimensions(2),
            json: json!([[1, 2], [3, 4]]),
        });

        assert!(out.0.starts_with("variant Int32 Matrix[2, 2] (value rank 2)\n"));
    }

    #[test]
    fn test_type_list_has_one_line_per_type() {
        colored::control::set_override(false);

        let out = FormattedString::from(TypeList(DataType::ALL.to_vec()));

        assert_eq!(out.0.lines().count(), DataType::ALL.len() + 1);
        assert!(out.0.contains(" 6  Int32"));
    }
}
