use super::*;

fn rules() -> Result<FieldRules> {
    FieldRules::new(&EnhancerConfig::default())
}

#[test]
fn required_empty_or_blank_fails_for_every_kind() -> Result<()> {
    let rules = rules()?;
    for kind in [
        FieldKind::Text,
        FieldKind::Email,
        FieldKind::Telephone,
        FieldKind::Other,
    ] {
        for value in ["", "   ", "\t\n", "\u{00A0}\u{3000}", "\u{FEFF}"] {
            assert_eq!(
                rules.check(kind, true, value)?,
                ValidationResult::Invalid("This field is required".into()),
                "kind={kind:?} value={value:?}"
            );
        }
    }
    Ok(())
}

#[test]
fn optional_empty_passes() -> Result<()> {
    let rules = rules()?;
    assert!(rules.check(FieldKind::Email, false, "")?.is_valid());
    assert!(rules.check(FieldKind::Telephone, false, "  ")?.is_valid());
    Ok(())
}

#[test]
fn email_rule_follows_the_pattern_literally() -> Result<()> {
    let rules = rules()?;
    let bad = ValidationResult::Invalid("Please enter a valid email address".into());
    assert!(rules.check(FieldKind::Email, false, "a@b.c")?.is_valid());
    assert!(rules.check(FieldKind::Email, true, "user.name@shop.co.jp")?.is_valid());
    assert!(rules.check(FieldKind::Email, true, "  a@b.c  ")?.is_valid());
    assert_eq!(rules.check(FieldKind::Email, false, "a@b")?, bad);
    assert_eq!(rules.check(FieldKind::Email, false, "@b.c")?, bad);
    assert_eq!(rules.check(FieldKind::Email, false, "a b@c.d")?, bad);
    assert_eq!(rules.check(FieldKind::Email, false, "a@@b.c")?, bad);
    Ok(())
}

#[test]
fn telephone_rule_counts_every_allowed_character() -> Result<()> {
    let rules = rules()?;
    let bad = ValidationResult::Invalid("Please enter a valid phone number".into());
    assert!(rules.check(FieldKind::Telephone, false, "1234567890")?.is_valid());
    assert!(rules.check(FieldKind::Telephone, false, "+81 (3) 1234-5678")?.is_valid());
    assert!(rules.check(FieldKind::Telephone, false, "(----)----")?.is_valid());
    assert_eq!(rules.check(FieldKind::Telephone, false, "123456789")?, bad);
    assert_eq!(rules.check(FieldKind::Telephone, false, "12345abcde")?, bad);
    assert_eq!(rules.check(FieldKind::Telephone, false, "++1234567890")?, bad);
    Ok(())
}

#[test]
fn text_and_other_kinds_only_check_required() -> Result<()> {
    let rules = rules()?;
    assert!(rules.check(FieldKind::Text, true, "anything")?.is_valid());
    assert!(rules.check(FieldKind::Other, true, "not-an-email")?.is_valid());
    Ok(())
}

#[test]
fn custom_messages_flow_from_config() -> Result<()> {
    let config = EnhancerConfig {
        required_message: "必須項目です".into(),
        ..EnhancerConfig::default()
    };
    let rules = FieldRules::new(&config)?;
    assert_eq!(
        rules.check(FieldKind::Text, true, "")?.message(),
        Some("必須項目です")
    );
    Ok(())
}

#[test]
fn field_kind_maps_tag_and_type() {
    assert_eq!(FieldKind::from_control("input", None), FieldKind::Text);
    assert_eq!(FieldKind::from_control("input", Some("text")), FieldKind::Text);
    assert_eq!(FieldKind::from_control("input", Some("search")), FieldKind::Text);
    assert_eq!(FieldKind::from_control("INPUT", Some(" EMAIL ")), FieldKind::Email);
    assert_eq!(FieldKind::from_control("input", Some("tel")), FieldKind::Telephone);
    assert_eq!(FieldKind::from_control("input", Some("number")), FieldKind::Other);
    assert_eq!(FieldKind::from_control("textarea", None), FieldKind::Text);
    assert_eq!(FieldKind::from_control("select", Some("email")), FieldKind::Text);
    assert_eq!(FieldKind::from_control("div", None), FieldKind::Other);
}

#[test]
fn js_trim_strips_unicode_space_and_bom() {
    assert_eq!(js_trim("\u{FEFF}\u{2003} x y \n"), "x y");
    assert_eq!(js_trim("plain"), "plain");
}

#[test]
fn next_line_is_content_and_bom_is_space() -> Result<()> {
    let rules = rules()?;
    assert_eq!(js_trim("\u{0085}x\u{0085}"), "\u{0085}x\u{0085}");
    assert!(rules.check(FieldKind::Text, true, "\u{0085}")?.is_valid());

    let bad_email = ValidationResult::Invalid("Please enter a valid email address".into());
    assert_eq!(rules.check(FieldKind::Email, false, "a\u{FEFF}b@c.d")?, bad_email);
    assert!(rules.check(FieldKind::Email, false, "a\u{0085}b@c.d")?.is_valid());

    let bad_phone = ValidationResult::Invalid("Please enter a valid phone number".into());
    assert!(rules.check(FieldKind::Telephone, false, "123\u{FEFF}4567890")?.is_valid());
    assert!(rules.check(FieldKind::Telephone, false, "123\u{2028}4567890")?.is_valid());
    assert_eq!(rules.check(FieldKind::Telephone, false, "123\u{0085}4567890")?, bad_phone);
    Ok(())
}

#[test]
fn config_validation_rejects_bad_values() {
    let cases = [
        EnhancerConfig {
            success_hide_delay_ms: -1,
            ..EnhancerConfig::default()
        },
        EnhancerConfig::default().with_search_debounce_ms(Some(-5)),
        EnhancerConfig {
            timer_step_limit: 0,
            ..EnhancerConfig::default()
        },
        EnhancerConfig {
            error_class: "two words".into(),
            ..EnhancerConfig::default()
        },
        EnhancerConfig {
            success_class: String::new(),
            ..EnhancerConfig::default()
        },
    ];
    for config in cases {
        assert!(
            matches!(config.validate(), Err(Error::Runtime(_))),
            "{config:?}"
        );
    }
    assert!(EnhancerConfig::default().validate().is_ok());
}

#[test]
fn invalid_pattern_surfaces_as_regex_error() {
    let err = Regex::new("(unclosed").map_err(Error::from);
    assert!(matches!(err, Err(Error::Regex(_))));
}
