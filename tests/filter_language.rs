// tests/filter_language.rs

use std::collections::HashMap;

use snapctl::filter::{AndGroup, TagCondition, TagFilter};

fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn and_filter_requires_every_condition() {
    let filter = TagFilter::parse("tag:Environment=prod AND tag:Owner=devops");

    assert!(filter.matches(&tags(&[("Environment", "prod"), ("Owner", "devops")])));
    assert!(!filter.matches(&tags(&[("Environment", "prod")])));
}

#[test]
fn or_filter_matches_any_group() {
    let filter = TagFilter::parse("tag:Owner=devops OR tag:Critical=yes");

    assert!(filter.matches(&tags(&[("Critical", "yes")])));
    assert!(filter.matches(&tags(&[("Owner", "devops")])));
    assert!(!filter.matches(&tags(&[("Owner", "dev"), ("Critical", "no")])));
}

#[test]
fn mixed_filter_parses_into_dnf_groups() {
    let filter = TagFilter::parse("tag:Owner=devops AND tag:Backup=true OR tag:Critical=yes");

    assert_eq!(
        filter,
        TagFilter::new(vec![
            AndGroup::new(vec![
                TagCondition::new("Owner", "devops"),
                TagCondition::new("Backup", "true"),
            ]),
            AndGroup::new(vec![TagCondition::new("Critical", "yes")]),
        ])
    );
}

#[test]
fn empty_string_matches_nothing() {
    let filter = TagFilter::parse("");

    assert!(filter.is_empty());
    assert!(!filter.matches(&HashMap::new()));
    assert!(!filter.matches(&tags(&[("Environment", "prod")])));
}

#[test]
fn keys_and_values_are_trimmed() {
    let filter = TagFilter::parse("  tag: Environment =  prod  AND tag:Owner= devops ");

    assert_eq!(
        filter.groups[0].conditions,
        vec![
            TagCondition::new("Environment", "prod"),
            TagCondition::new("Owner", "devops"),
        ]
    );
}

#[test]
fn tokens_without_tag_prefix_are_dropped_and_reported() {
    let parsed =
        TagFilter::parse_with_diagnostics("tag:Environment=prod AND Owner=devops OR junk");

    assert_eq!(
        parsed.filter,
        TagFilter::new(vec![AndGroup::new(vec![TagCondition::new(
            "Environment",
            "prod"
        )])])
    );
    assert_eq!(parsed.dropped, vec!["Owner=devops".to_string(), "junk".to_string()]);

    // The dropped token no longer constrains the group.
    assert!(parsed.filter.matches(&tags(&[("Environment", "prod")])));
}

#[test]
fn group_with_only_dropped_tokens_does_not_match_everything() {
    let filter = TagFilter::parse("Owner=devops OR tag:Critical=yes");

    assert_eq!(filter.groups.len(), 1);
    assert!(!filter.matches(&tags(&[("Owner", "devops")])));
}

#[test]
fn condition_without_equals_is_dropped() {
    let parsed = TagFilter::parse_with_diagnostics("tag:Environment AND tag:Owner=devops");

    assert_eq!(parsed.dropped, vec!["tag:Environment".to_string()]);
    assert_eq!(
        parsed.filter.groups[0].conditions,
        vec![TagCondition::new("Owner", "devops")]
    );
}

#[test]
fn value_keeps_everything_after_first_equals() {
    let filter = TagFilter::parse("tag:Query=a=b");

    assert_eq!(filter.groups[0].conditions, vec![TagCondition::new("Query", "a=b")]);
}

#[test]
fn quoted_value_may_contain_separators() {
    let filter = TagFilter::parse(r#"tag:Team="R AND D" OR tag:Tier="gold OR silver""#);

    assert_eq!(
        filter,
        TagFilter::new(vec![
            AndGroup::new(vec![TagCondition::new("Team", "R AND D")]),
            AndGroup::new(vec![TagCondition::new("Tier", "gold OR silver")]),
        ])
    );
    assert!(filter.matches(&tags(&[("Team", "R AND D")])));
}

#[test]
fn separators_need_surrounding_spaces() {
    let filter = TagFilter::parse("tag:Platform=ANDROID AND tag:Region=ORegon");

    assert_eq!(
        filter.groups[0].conditions,
        vec![
            TagCondition::new("Platform", "ANDROID"),
            TagCondition::new("Region", "ORegon"),
        ]
    );
}

#[test]
fn comparison_is_exact_and_case_sensitive() {
    let filter = TagFilter::parse("tag:Environment=prod");

    assert!(!filter.matches(&tags(&[("Environment", "Prod")])));
    assert!(!filter.matches(&tags(&[("environment", "prod")])));
    assert!(!filter.matches(&tags(&[("Environment", "prod ")])));
}

#[test]
fn matches_pairs_keeps_last_value_for_repeated_key() {
    let filter = TagFilter::parse("tag:Environment=prod");

    assert!(filter.matches_pairs([("Environment", "staging"), ("Environment", "prod")]));
    assert!(!filter.matches_pairs([("Environment", "prod"), ("Environment", "staging")]));
}

#[test]
fn display_renders_canonical_syntax() {
    let filter = TagFilter::parse(
        r#"tag:Owner = devops   AND tag:Team="R AND D" OR tag:Critical=yes"#,
    );

    assert_eq!(
        filter.to_string(),
        r#"tag:Owner=devops AND tag:Team="R AND D" OR tag:Critical=yes"#
    );
    assert_eq!(TagFilter::parse(&filter.to_string()), filter);
}

#[test]
fn unmatched_quote_falls_back_to_literal_splitting() {
    let parsed = TagFilter::parse_with_diagnostics(r#"tag:Size=3.5" OR tag:Critical=yes"#);

    assert_eq!(
        parsed.filter,
        TagFilter::new(vec![
            AndGroup::new(vec![TagCondition::new("Size", r#"3.5""#)]),
            AndGroup::new(vec![TagCondition::new("Critical", "yes")]),
        ])
    );
    assert_eq!(parsed.stray_quotes, vec![r#"tag:Size=3.5""#.to_string()]);
    assert!(parsed.dropped.is_empty());
    assert!(parsed.filter.matches(&tags(&[("Critical", "yes")])));
}

#[test]
fn unmatched_quote_only_affects_its_own_piece() {
    let parsed = TagFilter::parse_with_diagnostics(
        r#"tag:Team="R AND D" AND tag:Size=3.5" OR tag:Critical=yes"#,
    );

    assert_eq!(
        parsed.filter,
        TagFilter::new(vec![
            AndGroup::new(vec![
                TagCondition::new("Team", "R AND D"),
                TagCondition::new("Size", r#"3.5""#),
            ]),
            AndGroup::new(vec![TagCondition::new("Critical", "yes")]),
        ])
    );
    assert_eq!(parsed.stray_quotes.len(), 1);
}

#[test]
fn balanced_quotes_report_no_stray_quote() {
    let parsed = TagFilter::parse_with_diagnostics(r#"tag:Team="R AND D""#);

    assert!(parsed.stray_quotes.is_empty());
}

#[test]
fn or_takes_precedence_when_separators_overlap() {
    let filter = TagFilter::parse("tag:a=b AND OR tag:c=d");

    assert_eq!(
        filter,
        TagFilter::new(vec![
            AndGroup::new(vec![TagCondition::new("a", "b AND")]),
            AndGroup::new(vec![TagCondition::new("c", "d")]),
        ])
    );
}
