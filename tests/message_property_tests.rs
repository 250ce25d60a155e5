//! Property tests for positional message formatting.

use proptest::prelude::*;
use resbundle::message::{format_positional, max_placeholder_index, placeholder_indices};

fn text_strategy() -> impl Strategy<Value = String> {
    // Free text without braces, including multibyte characters.
    proptest::string::string_regex("[A-Za-z0-9 _\\-\\.,!\\?éüß€]{0,20}").expect("valid text regex")
}

fn args_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        proptest::string::string_regex("[A-Za-z0-9 ]{0,10}").expect("valid arg regex"),
        0..5,
    )
}

proptest! {
    #[test]
    fn formatting_never_panics(template in ".{0,64}", args in args_strategy()) {
        let arg_refs: Vec<&dyn std::fmt::Display> =
            args.iter().map(|a| a as &dyn std::fmt::Display).collect();
        let _ = format_positional(&template, &arg_refs);
    }

    #[test]
    fn brace_free_templates_are_unchanged(template in text_strategy(), args in args_strategy()) {
        let arg_refs: Vec<&dyn std::fmt::Display> =
            args.iter().map(|a| a as &dyn std::fmt::Display).collect();
        prop_assert_eq!(format_positional(&template, &arg_refs), template);
    }

    #[test]
    fn all_supplied_placeholders_are_replaced(
        prefix in text_strategy(),
        suffix in text_strategy(),
        args in prop::collection::vec("[a-z]{1,8}", 1..4),
    ) {
        // Build "<prefix>{0}<suffix>{1}…" using every argument once.
        let mut template = prefix.clone();
        for i in 0..args.len() {
            template.push_str(&format!("{{{i}}}"));
            template.push_str(&suffix);
        }

        let arg_refs: Vec<&dyn std::fmt::Display> =
            args.iter().map(|a| a as &dyn std::fmt::Display).collect();
        let formatted = format_positional(&template, &arg_refs);

        prop_assert!(!formatted.contains('{'), "formatted output still contains an open brace");
        for arg in &args {
            prop_assert!(formatted.contains(arg.as_str()));
        }
    }

    #[test]
    fn extraction_matches_construction(indices in prop::collection::vec(0usize..10, 0..6)) {
        let template: String = indices
            .iter()
            .map(|i| format!("x{{{i}}}"))
            .collect();
        prop_assert_eq!(placeholder_indices(&template), indices.clone());
        prop_assert_eq!(max_placeholder_index(&template), indices.iter().copied().max());
    }
}

#[test]
fn no_arguments_short_circuits() {
    assert_eq!(format_positional("keep {0} as-is", &[]), "keep {0} as-is");
}
