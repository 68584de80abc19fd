//! Score-menu policy for application points.
//!
//! An activity's `score_options` field is loosely typed in the source
//! data: a JSON number, an array of numbers, or a comma-separated
//! string. [`normalize_score_options`] flattens all of those into a
//! clean list, and [`select_points`] applies the submission policy: a
//! client-submitted value that matches a configured option is kept,
//! anything else silently falls back to the first option. Clients are
//! not trusted to pick their own score.

use serde_json::Value;

/// Flatten a raw score-menu value into a list of non-negative point options.
///
/// Unparseable or negative entries are dropped. An absent or empty menu
/// yields an empty list.
pub fn normalize_score_options(raw: &Value) -> Vec<i64> {
    match raw {
        Value::Number(n) => number_to_points(n).into_iter().collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Number(n) => number_to_points(n),
                Value::String(s) => parse_points_str(s),
                _ => None,
            })
            .collect(),
        Value::String(s) => s.split(',').filter_map(parse_points_str).collect(),
        _ => Vec::new(),
    }
}

/// Fix the points value for a new or resubmitted application.
///
/// Returns the submitted value when it is one of the configured options;
/// otherwise the first configured option; otherwise the submitted value
/// clamped to be non-negative (menu-less activities keep whatever the
/// client sent).
pub fn select_points(options: &[i64], submitted: i64) -> i64 {
    if options.contains(&submitted) {
        return submitted;
    }
    match options.first() {
        Some(&first) => first,
        None => submitted.max(0),
    }
}

fn number_to_points(n: &serde_json::Number) -> Option<i64> {
    let value = if let Some(i) = n.as_i64() {
        i
    } else {
        // Score menus occasionally carry floats; truncate like Number() did.
        n.as_f64().filter(|f| f.is_finite())? as i64
    };
    (value >= 0).then_some(value)
}

fn parse_points_str(s: &str) -> Option<i64> {
    let value: i64 = s.trim().parse().ok()?;
    (value >= 0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- normalize_score_options ----------------------------------------------

    #[test]
    fn single_number_menu() {
        assert_eq!(normalize_score_options(&json!(5)), vec![5]);
    }

    #[test]
    fn array_menu() {
        assert_eq!(normalize_score_options(&json!([2, 5, 10])), vec![2, 5, 10]);
    }

    #[test]
    fn string_menu_with_commas() {
        assert_eq!(normalize_score_options(&json!("2, 5,10")), vec![2, 5, 10]);
    }

    #[test]
    fn mixed_array_drops_garbage() {
        assert_eq!(
            normalize_score_options(&json!([3, "4", null, "x", -2])),
            vec![3, 4]
        );
    }

    #[test]
    fn absent_menu_is_empty() {
        assert_eq!(normalize_score_options(&json!(null)), Vec::<i64>::new());
        assert_eq!(normalize_score_options(&json!({})), Vec::<i64>::new());
    }

    // -- select_points --------------------------------------------------------

    #[test]
    fn submitted_value_on_menu_is_kept() {
        assert_eq!(select_points(&[2, 5, 10], 5), 5);
    }

    #[test]
    fn off_menu_value_falls_back_to_first_option() {
        assert_eq!(select_points(&[2, 5, 10], 7), 2);
    }

    #[test]
    fn empty_menu_keeps_submitted_value() {
        assert_eq!(select_points(&[], 7), 7);
    }

    #[test]
    fn empty_menu_clamps_negative_to_zero() {
        assert_eq!(select_points(&[], -3), 0);
    }
}
