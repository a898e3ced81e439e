// ==========================================
// 同步规则与导出的性质测试
// ==========================================
// 默认 256 组; 加压: PROPTEST_CASES=10000 cargo test --release
// ==========================================

use std::collections::{BTreeSet, HashSet};

use pos_stock_sync::config::ResolvedConfig;
use pos_stock_sync::domain::{Article, TargetStatus};
use pos_stock_sync::engine::SyncRuleEngine;
use pos_stock_sync::export::{sanitize_value, serialize, ExportRecord, FORMULA_PREFIXES};
use proptest::prelude::*;

// ==========================================
// 配置与生成器
// ==========================================

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn arb_stock_level() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        Just(-0.0),
        Just(0.001),
        Just(-0.001),
        -1_000_000.0..1_000_000.0f64,
    ]
}

fn arb_unit() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("Stück"), Just("kg"), Just("Liter"), Just("")]
}

/// 生成商品列表, 编号按位置唯一
fn arb_articles(max_len: usize) -> impl Strategy<Value = Vec<Article>> {
    prop::collection::vec((arb_stock_level(), any::<bool>(), arb_unit()), 0..max_len).prop_map(
        |items| {
            items
                .into_iter()
                .enumerate()
                .map(|(idx, (stock_level, is_pos_enabled, unit))| Article {
                    id: format!("A{idx}"),
                    name: format!("Artikel {idx}"),
                    stock_level,
                    is_pos_enabled,
                    unit: unit.to_string(),
                    barcode: String::new(),
                    external_number: String::new(),
                })
                .collect()
        },
    )
}

fn arb_exclude_ids() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set((0usize..40).prop_map(|i| format!("A{i}")), 0..10)
}

fn config_with(
    exclude_ids: &BTreeSet<String>,
    suppress_piece_units: bool,
    only_positive_changes: bool,
) -> ResolvedConfig {
    ResolvedConfig {
        exclude_ids: exclude_ids.clone(),
        suppress_piece_units,
        only_positive_changes,
        ..ResolvedConfig::default()
    }
}

fn proposed_ids(articles: &[Article], config: &ResolvedConfig) -> HashSet<String> {
    SyncRuleEngine::new(config)
        .execute(articles)
        .proposals
        .into_iter()
        .map(|p| p.id)
        .collect()
}

// ==========================================
// 目标状态
// ==========================================

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn target_status_matches_stock_and_flag(
        stock_level in arb_stock_level(),
        is_pos_enabled in any::<bool>(),
        unit in arb_unit(),
    ) {
        let article = Article {
            id: "1".to_string(),
            name: "x".to_string(),
            stock_level,
            is_pos_enabled,
            unit: unit.to_string(),
            barcode: String::new(),
            external_number: String::new(),
        };

        let expected = if stock_level > 0.0 && !is_pos_enabled {
            Some(TargetStatus::Yes)
        } else if stock_level <= 0.0 && is_pos_enabled {
            Some(TargetStatus::No)
        } else {
            None
        };
        prop_assert_eq!(article.compute_target_status(), expected);
    }
}

// ==========================================
// 排除 / 可重复 / 过滤组合
// ==========================================

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn excluded_ids_never_proposed(
        articles in arb_articles(40),
        exclude_ids in arb_exclude_ids(),
        suppress in any::<bool>(),
        only_positive in any::<bool>(),
    ) {
        let config = config_with(&exclude_ids, suppress, only_positive);
        let ids = proposed_ids(&articles, &config);
        prop_assert!(ids.is_disjoint(&exclude_ids.iter().cloned().collect()));
    }

    #[test]
    fn engine_runs_are_identical(
        articles in arb_articles(40),
        exclude_ids in arb_exclude_ids(),
        suppress in any::<bool>(),
        only_positive in any::<bool>(),
    ) {
        let config = config_with(&exclude_ids, suppress, only_positive);
        let engine = SyncRuleEngine::new(&config);
        let first = engine.execute(&articles);
        let second = engine.execute(&articles);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn combined_filters_equal_intersection(
        articles in arb_articles(40),
        exclude_ids in arb_exclude_ids(),
    ) {
        let unit_only = proposed_ids(&articles, &config_with(&exclude_ids, true, false));
        let positive_only = proposed_ids(&articles, &config_with(&exclude_ids, false, true));
        let both = proposed_ids(&articles, &config_with(&exclude_ids, true, true));

        let intersection: HashSet<String> =
            unit_only.intersection(&positive_only).cloned().collect();
        prop_assert_eq!(both, intersection);
    }
}

// ==========================================
// 防公式注入
// ==========================================

fn arb_prefix() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(""),
        Just("="),
        Just("+"),
        Just("-"),
        Just("@"),
        Just("\t"),
        Just("\r"),
    ]
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn sanitize_value_quotes_dangerous_prefixes(
        prefix in arb_prefix(),
        body in "[a-zA-Z0-9 ,.]{0,12}",
    ) {
        let value = format!("{prefix}{body}");
        let sanitized = sanitize_value(&value);

        if value.starts_with(FORMULA_PREFIXES) {
            prop_assert_eq!(&*sanitized, format!("'{value}"));
        } else {
            prop_assert_eq!(&*sanitized, value.as_str());
        }
    }

    #[test]
    fn serialized_field_is_sanitized(
        prefix in prop_oneof![Just(""), Just("="), Just("+"), Just("-"), Just("@")],
        body in "[a-zA-Z0-9 ,.]{1,12}",
    ) {
        let value = format!("{prefix}{body}");
        let records = vec![ExportRecord::new().with("v", value.clone())];
        let text = serialize(&records, Some(&["v"][..])).unwrap();

        let expected = if prefix.is_empty() { value } else { format!("'{value}") };
        prop_assert_eq!(text, format!("v\r\n{expected}\r\n"));
    }
}
