use super::*;

pub(crate) fn is_form_control(dom: &Dom, node_id: NodeId) -> bool {
    let Some(element) = dom.element(node_id) else {
        return false;
    };

    element.tag_name.eq_ignore_ascii_case("input")
        || element.tag_name.eq_ignore_ascii_case("select")
        || element.tag_name.eq_ignore_ascii_case("textarea")
}

fn input_type(dom: &Dom, node_id: NodeId) -> String {
    dom.attr(node_id, "type")
        .map(|kind| kind.trim().to_ascii_lowercase())
        .unwrap_or_else(|| "text".to_string())
}

pub(crate) fn is_submit_control(dom: &Dom, node_id: NodeId) -> bool {
    if dom.has_tag(node_id, "button") {
        return dom
            .attr(node_id, "type")
            .map(|kind| kind.trim().eq_ignore_ascii_case("submit"))
            .unwrap_or(true);
    }

    dom.has_tag(node_id, "input") && matches!(input_type(dom, node_id).as_str(), "submit" | "image")
}

fn is_checkable(dom: &Dom, node_id: NodeId) -> bool {
    dom.has_tag(node_id, "input") && matches!(input_type(dom, node_id).as_str(), "checkbox" | "radio")
}

/// Value a checkbox or radio reports: its `value` attribute, else `"on"`.
/// `None` for every other control.
pub(crate) fn checkable_value(dom: &Dom, node_id: NodeId) -> Option<String> {
    if !is_checkable(dom, node_id) {
        return None;
    }
    Some(dom.attr(node_id, "value").unwrap_or_else(|| "on".into()))
}

/// Name/value pairs a form would send, in document order.
pub(crate) fn form_data_entries(dom: &Dom, form: NodeId) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for control in dom.query_selector_all_from(form, "input, select, textarea")? {
        if dom.disabled(control) {
            continue;
        }
        let name = dom.attr(control, "name").unwrap_or_default();
        if name.is_empty() {
            continue;
        }

        if dom.has_tag(control, "input") {
            let kind = input_type(dom, control);
            if matches!(kind.as_str(), "button" | "submit" | "reset" | "file" | "image") {
                continue;
            }
            if let Some(value) = checkable_value(dom, control) {
                if dom.checked(control)? {
                    out.push((name, value));
                }
                continue;
            }
        }

        out.push((name, dom.value(control)?));
    }
    Ok(out)
}

/// Puts every control of `form` back to its markup default.
pub(crate) fn reset_form(dom: &mut Dom, form: NodeId) -> Result<usize> {
    let controls = dom.query_selector_all_from(form, "input, select, textarea")?;
    let mut reset = 0usize;
    for control in controls {
        if is_checkable(dom, control) {
            let default_checked = dom.has_attr(control, "checked");
            dom.set_checked(control, default_checked)?;
        } else if dom.has_tag(control, "input")
            && matches!(
                input_type(dom, control).as_str(),
                "button" | "submit" | "reset" | "image"
            )
        {
            continue;
        } else {
            let element = dom
                .element_mut(control)
                .ok_or_else(|| Error::Runtime("reset target is not an element".into()))?;
            element.value = element.default_value.clone();
        }
        reset += 1;
    }
    Ok(reset)
}

pub(crate) fn serialize_form_urlencoded(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                encode_form_urlencoded_component(name),
                encode_form_urlencoded_component(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_form_urlencoded_component(src: &str) -> String {
    let mut out = String::new();
    for b in src.as_bytes() {
        if is_form_urlencoded_unescaped_byte(*b) {
            out.push(*b as char);
        } else if *b == b' ' {
            out.push('+');
        } else {
            out.push('%');
            out.push(to_hex_upper((*b >> 4) & 0x0F));
            out.push(to_hex_upper(*b & 0x0F));
        }
    }
    out
}

fn is_form_urlencoded_unescaped_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'*' | b'-' | b'.' | b'_')
}

fn to_hex_upper(nibble: u8) -> char {
    char::from_digit(u32::from(nibble), 16)
        .map(|ch| ch.to_ascii_uppercase())
        .unwrap_or('0')
}
