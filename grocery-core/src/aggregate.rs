//! Ingredient aggregation.
//!
//! Merges ingredient lines that name the same foodstuff (case-insensitively)
//! and measure it in compatible units. Volume lines sum together, weight lines
//! sum together, and every count or non-standard unit only sums with itself.

use crate::types::IngredientLine;
use crate::units::{convert, Dimension, Unit};
use std::collections::HashMap;
use std::fmt;

/// Which lines may be summed together after conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitClass {
    Volume,
    Weight,
    Count(Unit),
    NonStandard(Unit),
    /// No unit at all ("3 eggs", "salt").
    Unknown,
}

impl UnitClass {
    pub fn of(unit: Option<Unit>) -> Self {
        let Some(unit) = unit else {
            return UnitClass::Unknown;
        };
        match unit.dimension() {
            Dimension::Volume => UnitClass::Volume,
            Dimension::Weight => UnitClass::Weight,
            Dimension::Count => UnitClass::Count(unit),
            Dimension::NonStandard => UnitClass::NonStandard(unit),
        }
    }
}

impl fmt::Display for UnitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitClass::Volume => f.write_str("volume"),
            UnitClass::Weight => f.write_str("weight"),
            UnitClass::Count(unit) => write!(f, "count_{unit}"),
            UnitClass::NonStandard(unit) => write!(f, "non_standard_{unit}"),
            UnitClass::Unknown => f.write_str("unknown_none"),
        }
    }
}

struct UnitGroup {
    first: IngredientLine,
    rest: Vec<IngredientLine>,
}

struct NameGroup {
    classes: Vec<(UnitClass, UnitGroup)>,
}

/// Merge lines into one line per (lowercase name, unit class).
///
/// Output is grouped by name in order of first appearance, and within a name
/// by unit class in order of first appearance.
pub fn aggregate(lines: Vec<IngredientLine>) -> Vec<IngredientLine> {
    let mut names: Vec<NameGroup> = Vec::new();
    let mut name_index: HashMap<String, usize> = HashMap::new();

    for line in lines {
        let key = line.name.to_lowercase();
        let class = UnitClass::of(line.unit);

        let idx = *name_index.entry(key).or_insert_with(|| {
            names.push(NameGroup {
                classes: Vec::new(),
            });
            names.len() - 1
        });
        let group = &mut names[idx];

        match group.classes.iter_mut().find(|(c, _)| *c == class) {
            Some((_, unit_group)) => unit_group.rest.push(line),
            None => group.classes.push((
                class,
                UnitGroup {
                    first: line,
                    rest: Vec::new(),
                },
            )),
        }
    }

    names
        .into_iter()
        .flat_map(|group| group.classes)
        .map(|(_, unit_group)| combine(unit_group))
        .collect()
}

/// Sum a unit group into its first line's unit, name and category.
fn combine(group: UnitGroup) -> IngredientLine {
    let UnitGroup { first, rest } = group;
    if rest.is_empty() {
        return first;
    }

    let base_unit = first.unit;
    let mut total = first.quantity;

    for line in rest {
        let Some(quantity) = line.quantity else {
            continue;
        };
        let amount = match (line.unit, base_unit) {
            (from, to) if from == to => quantity,
            (Some(from), Some(to)) => convert(quantity, from, to).unwrap_or_else(|e| {
                // Grouping by unit class should make this unreachable.
                tracing::warn!(
                    item = %first.name,
                    error = %e,
                    "conversion failed inside a compatible unit group, adding unconverted"
                );
                quantity
            }),
            _ => quantity,
        };
        total = Some(total.unwrap_or(0.0) + amount);
    }

    IngredientLine {
        quantity: total,
        ..first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn line(name: &str, quantity: f64, unit: Unit, category: Category) -> IngredientLine {
        IngredientLine {
            name: name.to_string(),
            quantity: Some(quantity),
            unit: Some(unit),
            category,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    fn find<'a>(lines: &'a [IngredientLine], name: &str, unit: Unit) -> &'a IngredientLine {
        lines
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name) && l.unit == Some(unit))
            .unwrap_or_else(|| panic!("no {name} in {unit}: {lines:?}"))
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(Vec::new()).is_empty());
    }

    #[test]
    fn test_single_line_unchanged() {
        let input = vec![line("Milk", 1.0, Unit::Cup, Category::Dairy)];
        assert_eq!(aggregate(input.clone()), input);
    }

    #[test]
    fn test_cup_and_pint_sum_in_cups() {
        let result = aggregate(vec![
            line("milk", 1.0, Unit::Cup, Category::Dairy),
            line("milk", 1.0, Unit::Pint, Category::Dairy),
        ]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].unit, Some(Unit::Cup));
        assert_close(result[0].quantity.unwrap(), 3.0);
    }

    #[test]
    fn test_order_does_not_change_total() {
        let a = line("milk", 1.0, Unit::Cup, Category::Dairy);
        let b = line("milk", 1.0, Unit::Pint, Category::Dairy);

        let forward = aggregate(vec![a.clone(), b.clone()]);
        let backward = aggregate(vec![b, a]);

        let in_cups = |l: &IngredientLine| {
            convert(l.quantity.unwrap(), l.unit.unwrap(), Unit::Cup).unwrap()
        };
        assert_close(in_cups(&forward[0]), in_cups(&backward[0]));
        assert_eq!(backward[0].unit, Some(Unit::Pint));
    }

    #[test]
    fn test_names_group_case_insensitively() {
        let result = aggregate(vec![
            line("Milk", 1.0, Unit::Cup, Category::Dairy),
            line("milk", 2.0, Unit::Cup, Category::Dairy),
            line("MILK", 0.5, Unit::Cup, Category::Dairy),
        ]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Milk");
        assert_close(result[0].quantity.unwrap(), 3.5);
    }

    #[test]
    fn test_category_comes_from_first_line() {
        let result = aggregate(vec![
            line("butter", 2.0, Unit::Tbsp, Category::Dairy),
            line("Butter", 1.0, Unit::Tbsp, Category::Pantry),
        ]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category, Category::Dairy);
    }

    #[test]
    fn test_weight_and_volume_stay_separate() {
        let result = aggregate(vec![
            line("flour", 2.0, Unit::Cup, Category::Pantry),
            line("flour", 1.0, Unit::Lb, Category::Pantry),
            line("flour", 8.0, Unit::Oz, Category::Pantry),
        ]);
        assert_eq!(result.len(), 2);
        assert_close(find(&result, "flour", Unit::Cup).quantity.unwrap(), 2.0);
        assert_close(find(&result, "flour", Unit::Lb).quantity.unwrap(), 1.5);
    }

    #[test]
    fn test_each_count_unit_is_isolated() {
        let result = aggregate(vec![
            line("garlic", 2.0, Unit::Clove, Category::Produce),
            line("garlic", 1.0, Unit::Whole, Category::Produce),
            line("garlic", 3.0, Unit::Clove, Category::Produce),
        ]);
        assert_eq!(result.len(), 2);
        assert_close(find(&result, "garlic", Unit::Clove).quantity.unwrap(), 5.0);
        assert_close(find(&result, "garlic", Unit::Whole).quantity.unwrap(), 1.0);
    }

    #[test]
    fn test_non_standard_units_are_isolated() {
        let result = aggregate(vec![
            line("salt", 1.0, Unit::Pinch, Category::Pantry),
            line("salt", 1.0, Unit::Dash, Category::Pantry),
            line("salt", 2.0, Unit::Pinch, Category::Pantry),
        ]);
        assert_eq!(result.len(), 2);
        assert_close(find(&result, "salt", Unit::Pinch).quantity.unwrap(), 3.0);
    }

    #[test]
    fn test_missing_quantities_and_units() {
        let unitless = |q: Option<f64>| IngredientLine {
            name: "eggs".to_string(),
            quantity: q,
            unit: None,
            category: Category::Dairy,
        };

        let result = aggregate(vec![unitless(Some(2.0)), unitless(None), unitless(Some(3.0))]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].quantity, Some(5.0));

        let result = aggregate(vec![unitless(None), unitless(None)]);
        assert_eq!(result[0].quantity, None);

        let result = aggregate(vec![unitless(None), unitless(Some(1.0))]);
        assert_eq!(result[0].quantity, Some(1.0));
    }

    #[test]
    fn test_output_grouped_by_name() {
        let result = aggregate(vec![
            line("garlic", 2.0, Unit::Clove, Category::Produce),
            line("onion", 1.0, Unit::Whole, Category::Produce),
            line("garlic", 1.0, Unit::Tsp, Category::Produce),
        ]);
        let names: Vec<&str> = result.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["garlic", "garlic", "onion"]);
    }

    /// Lines grouped into one class must always convert to each other,
    /// otherwise the unconverted fallback in `combine` silently kicks in.
    #[test]
    fn test_unit_classes_agree_with_converter() {
        for from in Unit::ALL {
            for to in Unit::ALL {
                let same_class = UnitClass::of(Some(*from)) == UnitClass::of(Some(*to));
                assert_eq!(
                    convert(1.0, *from, *to).is_ok(),
                    same_class,
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_class_keys() {
        assert_eq!(UnitClass::of(Some(Unit::Ml)).to_string(), "volume");
        assert_eq!(UnitClass::of(Some(Unit::Kg)).to_string(), "weight");
        assert_eq!(UnitClass::of(Some(Unit::Slice)).to_string(), "count_slice");
        assert_eq!(
            UnitClass::of(Some(Unit::ToTaste)).to_string(),
            "non_standard_to_taste"
        );
        assert_eq!(UnitClass::of(None).to_string(), "unknown_none");
    }
}
