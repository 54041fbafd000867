//! Builtin skill: unit conversion.
//!
//! Length, weight, and volume convert through a base unit per category
//! (metre, kilogram, litre). Temperature is its own category and funnels
//! through Celsius so every pair of scales shares one set of formulas.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::SkillError;
use crate::skills::{args, Skill, SkillContext};

/// Factors to the category base unit (metre).
const LENGTH_UNITS: &[(&str, f64)] = &[
    ("m", 1.0),
    ("km", 1000.0),
    ("cm", 0.01),
    ("mm", 0.001),
    ("ft", 0.3048),
    ("in", 0.0254),
    ("yd", 0.9144),
    ("mi", 1609.34),
];

/// Factors to the category base unit (kilogram).
const WEIGHT_UNITS: &[(&str, f64)] = &[
    ("kg", 1.0),
    ("g", 0.001),
    ("mg", 0.000001),
    ("lb", 0.453592),
    ("oz", 0.0283495),
];

/// Factors to the category base unit (litre).
const VOLUME_UNITS: &[(&str, f64)] = &[
    ("l", 1.0),
    ("liter", 1.0),
    ("ml", 0.001),
    ("gallon", 3.78541),
    ("quart", 0.946353),
    ("pint", 0.473176),
    ("cup", 0.236588),
    ("fl oz", 0.0295735),
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Category {
    Length,
    Weight,
    Volume,
    Temperature,
}

impl Category {
    fn label(self) -> &'static str {
        match self {
            Category::Length => "length",
            Category::Weight => "weight",
            Category::Volume => "volume",
            Category::Temperature => "temperature",
        }
    }
}

fn factor(table: &[(&str, f64)], unit: &str) -> Option<f64> {
    table.iter().find(|(name, _)| *name == unit).map(|(_, f)| *f)
}

/// Temperature units are matched by substring so "degrees celsius" and
/// plain "celsius" both work.
fn to_celsius(value: f64, unit: &str) -> Option<f64> {
    if unit.contains("celsius") {
        Some(value)
    } else if unit.contains("fahrenheit") {
        Some((value - 32.0) * 5.0 / 9.0)
    } else if unit.contains("kelvin") {
        Some(value - 273.15)
    } else {
        None
    }
}

fn from_celsius(celsius: f64, unit: &str) -> Option<f64> {
    if unit.contains("celsius") {
        Some(celsius)
    } else if unit.contains("fahrenheit") {
        Some(celsius * 9.0 / 5.0 + 32.0)
    } else if unit.contains("kelvin") {
        Some(celsius + 273.15)
    } else {
        None
    }
}

/// Classifies the pair into exactly one category and converts.
/// Cross-category pairs and unknown units are hard errors.
fn convert(value: f64, from_unit: &str, to_unit: &str) -> Result<(f64, Category), SkillError> {
    let from = from_unit.trim().to_lowercase();
    let to = to_unit.trim().to_lowercase();

    for (table, category) in [
        (LENGTH_UNITS, Category::Length),
        (WEIGHT_UNITS, Category::Weight),
        (VOLUME_UNITS, Category::Volume),
    ] {
        if let Some(from_factor) = factor(table, &from) {
            let to_factor = factor(table, &to).ok_or_else(|| {
                SkillError::invalid(
                    "to_unit",
                    format!("'{to}' is not a {} unit", category.label()),
                )
            })?;
            return Ok((value * from_factor / to_factor, category));
        }
    }

    if let Some(celsius) = to_celsius(value, &from) {
        let converted = from_celsius(celsius, &to).ok_or_else(|| {
            SkillError::invalid("to_unit", format!("'{to}' is not a temperature unit"))
        })?;
        return Ok((converted, Category::Temperature));
    }

    Err(SkillError::invalid(
        "from_unit",
        format!("unsupported unit '{from}'"),
    ))
}

/// Builtin skill converting values between units of measure.
pub struct UnitConversionSkill;

#[async_trait]
impl Skill for UnitConversionSkill {
    fn name(&self) -> &str {
        "convert_units"
    }

    fn description(&self) -> &str {
        "Convert a value between units of length, weight, volume, or temperature \
         (e.g. miles to km, lb to kg, celsius to fahrenheit)."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "value": {
                    "type": "number",
                    "description": "The numeric value to convert"
                },
                "from_unit": {
                    "type": "string",
                    "description": "Source unit, e.g. 'mi', 'kg', 'celsius'"
                },
                "to_unit": {
                    "type": "string",
                    "description": "Target unit, e.g. 'km', 'lb', 'fahrenheit'"
                }
            },
            "required": ["value", "from_unit", "to_unit"]
        })
    }

    async fn execute(&self, a: &Value, _context: &SkillContext) -> Result<Value, SkillError> {
        let value = args::required_f64(a, "value")?;
        let from_unit = args::required_str(a, "from_unit")?;
        let to_unit = args::required_str(a, "to_unit")?;

        let (converted, category) = convert(value, from_unit, to_unit)?;

        Ok(json!({
            "value": converted,
            "from_value": value,
            "from_unit": from_unit,
            "to_unit": to_unit,
            "category": category.label(),
        }))
    }
}
