use storefront_forms::{Error, Page, Result, ValidationResult};

const CONTACT_HTML: &str = r#"
<!DOCTYPE html>
<html>
<body>
  <form id="contact" action="/contact" method="post">
    <div class="form-group" id="name-group">
      <label for="name">Name</label>
      <input id="name" name="name" type="text" required>
    </div>
    <div class="form-group" id="email-group">
      <input id="email" name="email" type="email" required>
    </div>
    <div class="form-group" id="phone-group">
      <input id="phone" name="phone" type="tel">
    </div>
    <div class="form-group">
      <textarea id="message" name="message"></textarea>
    </div>
    <input id="send" type="submit" value="Send Message">
  </form>
</body>
</html>
"#;

#[test]
fn empty_required_field_cancels_native_submit() -> Result<()> {
    let mut page = Page::from_html(CONTACT_HTML)?;
    page.type_text("#email", "guest@shop.jp")?;
    page.click("#send")?;

    assert!(page.take_native_submissions().is_empty());
    assert_eq!(page.count_visible("#contact .error")?, 1);
    page.assert_text("#name-group .error", "This field is required")?;
    page.assert_hidden("#email-group .error")?;
    page.assert_class("#name", "input-error", true)?;
    page.assert_class("#email", "input-error", false)?;
    assert_eq!(page.count("#contact .success-message")?, 0);
    Ok(())
}

#[test]
fn every_required_field_reports_its_own_error() -> Result<()> {
    let mut page = Page::from_html(CONTACT_HTML)?;
    page.type_text("#email", "not-an-email")?;
    page.submit("#contact")?;

    assert_eq!(page.count_visible("#contact .error")?, 2);
    page.assert_text("#name-group .error", "This field is required")?;
    page.assert_text("#email-group .error", "Please enter a valid email address")?;
    // The optional phone field is not part of the form pass.
    assert_eq!(page.count("#phone-group .error")?, 0);
    Ok(())
}

#[test]
fn valid_form_submits_natively_and_shows_success() -> Result<()> {
    let mut page = Page::from_html_with_url("https://mamzos.example/contact.html", CONTACT_HTML)?;
    page.type_text("#name", "Hanako")?;
    page.type_text("#email", "hanako@example.jp")?;
    page.type_text("#message", "Table for two")?;
    page.click("#send")?;

    let submissions = page.take_native_submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].form_id.as_deref(), Some("contact"));
    assert_eq!(submissions[0].method, "POST");
    assert_eq!(submissions[0].action, "/contact");
    assert_eq!(
        submissions[0].body,
        "name=Hanako&email=hanako%40example.jp&phone=&message=Table+for+two"
    );
    page.assert_visible("#contact .success-message")?;
    page.assert_text(
        "#contact .success-message",
        "Thank you! Your message has been sent successfully.",
    )?;
    Ok(())
}

#[test]
fn only_required_fields_decide_validity() -> Result<()> {
    let html = r#"
        <form id="f">
          <div><input id="req" required value="ok"></div>
          <div><input id="opt" type="email"></div>
        </form>
    "#;
    let mut page = Page::from_html(html)?;
    assert!(page.validate_form("#f")?);
    page.assert_visible("#f .success-message")?;

    // An invalid optional field is never checked by the form pass.
    page.type_text("#opt", "broken")?;
    assert!(page.validate_form("#f")?);
    Ok(())
}

#[test]
fn blur_validates_optional_field_and_typing_clears() -> Result<()> {
    let mut page = Page::from_html(CONTACT_HTML)?;
    page.focus("#phone")?;
    page.type_text("#phone", "12-34")?;
    page.blur("#phone")?;

    page.assert_visible("#phone-group .error")?;
    page.assert_text("#phone-group .error", "Please enter a valid phone number")?;
    assert_eq!(page.count_visible("#contact .error")?, 1);
    page.assert_class("#phone", "input-error", true)?;

    page.type_text("#phone", "12-345")?;
    assert_eq!(page.count_visible("#contact .error")?, 0);
    page.assert_class("#phone", "input-error", false)?;
    Ok(())
}

#[test]
fn blur_without_focus_does_nothing() -> Result<()> {
    let mut page = Page::from_html(CONTACT_HTML)?;
    page.blur("#name")?;
    assert_eq!(page.count("#contact .error")?, 0);

    page.focus("#name")?;
    page.focus("#email")?;
    // Moving focus blurs the previous field.
    assert_eq!(page.count_visible("#contact .error")?, 1);
    Ok(())
}

#[test]
fn validate_field_reports_message_and_updates_slot() -> Result<()> {
    let mut page = Page::from_html(CONTACT_HTML)?;
    page.type_text("#phone", "(----)----")?;
    assert_eq!(page.validate_field("#phone")?, ValidationResult::Valid);

    page.type_text("#phone", "123456789")?;
    assert_eq!(
        page.validate_field("#phone")?,
        ValidationResult::Invalid("Please enter a valid phone number".into())
    );
    assert_eq!(page.count("#contact .error")?, 1);

    page.type_text("#phone", "1234567890")?;
    assert!(page.validate_field("#phone")?.is_valid());
    assert_eq!(page.count("#contact .error")?, 1);
    assert_eq!(page.count_visible("#contact .error")?, 0);
    Ok(())
}

#[test]
fn checkable_inputs_report_their_value_attribute() -> Result<()> {
    let html = r#"
        <form id="terms">
          <div><input id="agree" name="agree" type="checkbox" required></div>
          <div><input id="plan" name="plan" type="radio" value="basic" required></div>
          <div><input id="blank" name="blank" type="checkbox" value="" required></div>
        </form>
    "#;
    let mut page = Page::from_html(html)?;
    assert_eq!(page.validate_field("#agree")?, ValidationResult::Valid);
    assert_eq!(page.validate_field("#plan")?, ValidationResult::Valid);
    assert_eq!(
        page.validate_field("#blank")?,
        ValidationResult::Invalid("This field is required".into())
    );

    page.set_checked("#agree", true)?;
    assert!(page.validate_field("#agree")?.is_valid());
    assert!(!page.validate_form("#terms")?);
    assert_eq!(page.count_visible("#terms .error")?, 1);
    Ok(())
}

#[test]
fn existing_error_slot_in_markup_is_reused() -> Result<()> {
    let html = r#"
        <form id="f">
          <div><input id="n" required><span class="error" style="display: none"></span></div>
        </form>
    "#;
    let mut page = Page::from_html(html)?;
    page.submit("#f")?;
    assert_eq!(page.count("#f .error")?, 1);
    page.assert_text("#f span.error", "This field is required")?;
    page.assert_visible("#f span.error")?;
    Ok(())
}

#[test]
fn selector_and_type_errors_surface() -> Result<()> {
    let mut page = Page::from_html(CONTACT_HTML)?;
    assert!(matches!(
        page.validate_form("#missing"),
        Err(Error::SelectorNotFound(_))
    ));
    assert!(matches!(
        page.validate_form("#name"),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        page.validate_field("#contact"),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        page.type_text("#contact", "x"),
        Err(Error::TypeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn assertion_failures_carry_a_dom_snippet() -> Result<()> {
    let mut page = Page::from_html(CONTACT_HTML)?;
    page.type_text("#name", "Ken")?;
    match page.assert_value("#name", "Kenji") {
        Err(Error::AssertionFailed {
            expected,
            actual,
            dom_snippet,
            ..
        }) => {
            assert_eq!(expected, "Kenji");
            assert_eq!(actual, "Ken");
            assert!(dom_snippet.starts_with("<input"));
        }
        other => panic!("unexpected assertion result: {other:?}"),
    }
    Ok(())
}
