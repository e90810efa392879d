//! Serving-size scaling.
//!
//! Scaling is plain multiplication and knows nothing about units. Defaults
//! for a missing multiplier are applied by the caller when it reads the
//! meal assignment, never here.

use crate::types::IngredientLine;

pub fn scale(quantity: f64, multiplier: f64) -> f64 {
    quantity * multiplier
}

/// Scale every line that carries a quantity. Lines without one pass through.
pub fn scale_ingredients(lines: Vec<IngredientLine>, multiplier: f64) -> Vec<IngredientLine> {
    lines
        .into_iter()
        .map(|line| IngredientLine {
            quantity: line.quantity.map(|q| scale(q, multiplier)),
            ..line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use crate::units::Unit;

    fn line(name: &str, quantity: Option<f64>, unit: Option<Unit>) -> IngredientLine {
        IngredientLine {
            name: name.to_string(),
            quantity,
            unit,
            category: Category::Pantry,
        }
    }

    #[test]
    fn test_scale() {
        assert_eq!(scale(2.0, 1.5), 3.0);
        assert_eq!(scale(4.0, 0.25), 1.0);
        assert_eq!(scale(3.0, 0.0), 0.0);
    }

    #[test]
    fn test_scale_composes() {
        let q = 1.5;
        assert_eq!(scale(q, 2.0 * 4.0), scale(scale(q, 2.0), 4.0));
    }

    #[test]
    fn test_scale_ingredients_keeps_unit_and_name() {
        let scaled = scale_ingredients(vec![line("Flour", Some(2.0), Some(Unit::Cup))], 1.5);
        assert_eq!(scaled, vec![line("Flour", Some(3.0), Some(Unit::Cup))]);
    }

    #[test]
    fn test_missing_quantity_passes_through() {
        let input = vec![
            line("salt", None, Some(Unit::ToTaste)),
            line("eggs", Some(2.0), Some(Unit::Whole)),
        ];
        let scaled = scale_ingredients(input, 3.0);
        assert_eq!(scaled[0], line("salt", None, Some(Unit::ToTaste)));
        assert_eq!(scaled[1].quantity, Some(6.0));
    }

    #[test]
    fn test_scale_ingredients_is_deterministic() {
        let input = vec![
            line("milk", Some(1.0), Some(Unit::Cup)),
            line("butter", Some(0.5), Some(Unit::Lb)),
        ];
        assert_eq!(
            scale_ingredients(input.clone(), 2.5),
            scale_ingredients(input, 2.5)
        );
    }
}
