use super::*;
use selector::{SelectorAttrCondition, SelectorCombinator, parse_selector_groups};
use submission::SubmitControl;

mod scheduler_queue;
mod validation_rules;

const CONTACT_FORM_HTML: &str = r#"
    <form id='contact' action='/contact' method='post'>
      <div class='group'><input id='name' name='name' required></div>
      <div class='group'><input id='email' name='email' type='email'></div>
      <div class='group'><input id='phone' name='phone' type='tel' required></div>
      <div class='group'><textarea id='message' name='message'>Hello</textarea></div>
      <input id='send' type='submit' value='Send'>
    </form>
"#;

#[test]
fn page_wires_submit_blur_and_input_listeners() -> Result<()> {
    let html = r#"
        <form id='a'><input id='x' name='x'><textarea id='y'></textarea></form>
        <form id='b'><select id='z'><option>1</option></select></form>
        <input id='outside'>
        <input id='searchBox'>
        "#;
    let page = Page::from_html(html)?;
    assert_eq!(page.listener_count("submit"), 2);
    assert_eq!(page.listener_count("blur"), 3);
    // Three form controls clear their error, and the search box filters.
    assert_eq!(page.listener_count("input"), 4);
    Ok(())
}

#[test]
fn missing_search_box_is_not_wired() -> Result<()> {
    let page = Page::from_html("<table id='menuTable'><tr><td>a</td></tr></table>")?;
    assert_eq!(page.listener_count("input"), 0);
    Ok(())
}

#[test]
fn validate_field_node_creates_one_slot_and_reuses_it() -> Result<()> {
    let mut page = Page::from_html(CONTACT_FORM_HTML)?;
    let name = page.select_one("#name")?;

    let first = page.validate_field_node(name)?;
    assert_eq!(first.message(), Some("This field is required"));
    page.dom.set_value(name, "Taro")?;
    assert!(page.validate_field_node(name)?.is_valid());
    page.dom.set_value(name, " ")?;
    page.validate_field_node(name)?;

    let group = page.dom.parent(name).ok_or_else(|| Error::Runtime("no parent".into()))?;
    let slots = page.dom.query_selector_all_from(group, ".error")?;
    assert_eq!(slots.len(), 1);
    assert!(page.dom.is_displayed(slots[0])?);
    assert_eq!(page.dom.text_content(slots[0]), "This field is required");
    Ok(())
}

#[test]
fn valid_field_still_gets_hidden_slot() -> Result<()> {
    let mut page = Page::from_html(CONTACT_FORM_HTML)?;
    let email = page.select_one("#email")?;
    assert!(page.validate_field_node(email)?.is_valid());

    let slot = ErrorPresenter::new(&page.config)
        .slot(&page.dom, email)?
        .ok_or_else(|| Error::Runtime("slot missing".into()))?;
    assert!(!page.dom.is_displayed(slot)?);
    assert!(!page.dom.class_contains(email, "input-error")?);
    Ok(())
}

#[test]
fn showing_an_error_twice_keeps_the_latest_message() -> Result<()> {
    let mut page = Page::from_html(CONTACT_FORM_HTML)?;
    let phone = page.select_one("#phone")?;
    let presenter = ErrorPresenter::new(&page.config);
    presenter.show(&mut page.dom, phone, "first")?;
    presenter.show(&mut page.dom, phone, "second")?;

    let group = page.dom.parent(phone).ok_or_else(|| Error::Runtime("no parent".into()))?;
    let slots = page.dom.query_selector_all_from(group, ".error")?;
    assert_eq!(slots.len(), 1);
    assert_eq!(page.dom.text_content(slots[0]), "second");
    assert!(page.dom.class_contains(phone, "input-error")?);
    Ok(())
}

#[test]
fn success_presenter_tokens_advance_per_show() -> Result<()> {
    let mut page = Page::from_html(CONTACT_FORM_HTML)?;
    let form = page.select_one("#contact")?;
    let first = page.success.show(&mut page.dom, &page.config, form)?;
    let second = page.success.show(&mut page.dom, &page.config, form)?;
    assert!(second > first);

    assert!(!page.success.hide(&mut page.dom, &page.config, form, first)?);
    assert!(page.success.hide(&mut page.dom, &page.config, form, second)?);
    page.assert_hidden("#contact .success-message")?;
    Ok(())
}

#[test]
fn every_timer_policy_hides_on_stale_token() -> Result<()> {
    let config = EnhancerConfig::default().with_success_timer_policy(SuccessTimerPolicy::EveryTimer);
    let mut page = Page::with_config(CONTACT_FORM_HTML, config)?;
    let form = page.select_one("#contact")?;
    let first = page.success.show(&mut page.dom, &page.config, form)?;
    page.success.show(&mut page.dom, &page.config, form)?;
    assert!(page.success.hide(&mut page.dom, &page.config, form, first)?);
    Ok(())
}

#[test]
fn submit_event_bubbles_from_the_form_only() -> Result<()> {
    let mut page = Page::from_html(CONTACT_FORM_HTML)?;
    let form = page.select_one("#contact")?;
    let event = page.dispatch_event(form, "submit")?;
    assert!(event.default_prevented);
    assert_eq!(event.target, form);
    assert_eq!(event.current_target, page.dom.root);
    Ok(())
}

#[test]
fn trace_records_tagged_lines_and_respects_limit() -> Result<()> {
    let mut page = Page::from_html(CONTACT_FORM_HTML)?;
    page.enable_trace(true);
    page.set_trace_log_forward(false);
    page.submit("#contact")?;
    let logs = page.take_trace_logs();
    assert!(logs.iter().any(|line| line.starts_with("[event] submit")));
    assert!(logs.iter().any(|line| line.starts_with("[form] validate form=form#contact valid=false")));

    page.set_trace_log_limit(2)?;
    page.submit("#contact")?;
    assert_eq!(page.take_trace_logs().len(), 2);
    Ok(())
}

#[test]
fn trace_categories_can_be_muted() -> Result<()> {
    let mut page = Page::from_html(CONTACT_FORM_HTML)?;
    page.enable_trace(true);
    page.set_trace_log_forward(false);
    page.set_trace_events(false);
    page.set_trace_timers(false);
    page.submit("#contact")?;
    page.advance_time(10)?;
    let logs = page.take_trace_logs();
    assert!(!logs.is_empty());
    assert!(logs.iter().all(|line| !line.starts_with("[event]")));
    assert!(logs.iter().all(|line| !line.starts_with("[timer]")));
    Ok(())
}

#[test]
fn trace_log_limit_rejects_zero() -> Result<()> {
    let mut page = Page::from_html(CONTACT_FORM_HTML)?;
    match page.set_trace_log_limit(0) {
        Err(Error::Runtime(msg)) => assert!(msg.contains("at least 1")),
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}

#[test]
fn dispatcher_tracks_busy_forms() -> Result<()> {
    let mut page = Page::from_html(CONTACT_FORM_HTML)?;
    let form = page.select_one("#contact")?;
    assert!(!page.dispatcher.is_busy(form));
    assert!(page.begin_ajax_submission(form)?);
    assert!(page.dispatcher.is_busy(form));
    assert_eq!(page.dispatcher.state(form), SubmitControlState::Busy);
    assert!(!page.begin_ajax_submission(form)?);
    assert_eq!(page.in_flight_count(), 1);

    assert_eq!(page.settle_in_flight()?, 1);
    assert_eq!(page.dispatcher.state(form), SubmitControlState::Idle);
    Ok(())
}

#[test]
fn truncate_chars_marks_cut_text() {
    assert_eq!(truncate_chars("abcdef", 3), "abc...");
    assert_eq!(truncate_chars("abc", 3), "abc");
    assert_eq!(truncate_chars("", 3), "");
}

#[test]
fn error_display_is_readable() {
    let err = Error::TypeMismatch {
        selector: "#x".into(),
        expected: "form".into(),
        actual: "div".into(),
    };
    assert_eq!(
        err.to_string(),
        "type mismatch for #x: expected form, actual div"
    );
    assert_eq!(
        Error::SelectorNotFound("#nope".into()).to_string(),
        "selector not found: #nope"
    );
}
