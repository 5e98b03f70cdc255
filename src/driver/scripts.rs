//! JavaScript snippets for element lookup and interaction over CDP
//!
//! Found elements are tagged with a [`MARKER_ATTRIBUTE`]; every later operation
//! re-resolves the node by that marker and evaluates to `null` when it is gone,
//! which the CDP driver reports as a stale reference.

use super::locator::Locator;

/// Attribute used to tag elements handed out by the CDP driver
pub const MARKER_ATTRIBUTE: &str = "data-chaser-id";

/// Escape a string for use inside a single-quoted JavaScript literal
pub fn escape_js_str(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('"', r#"\""#)
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Expression evaluating to the first element matching `locator`, or `null`
pub fn element_query(locator: &Locator) -> String {
    let value = escape_js_str(locator.value());
    match locator {
        Locator::Css(_) => format!("document.querySelector('{}')", value),
        Locator::XPath(_) => format!(
            "document.evaluate('{}', document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
            value
        ),
        Locator::Id(_) => format!("document.getElementById('{}')", value),
        Locator::Name(_) => format!("(document.getElementsByName('{}')[0] || null)", value),
    }
}

/// Tag the first match of `locator` with `marker` (keeping an existing tag)
/// and evaluate to the tag, or `null` when nothing matches
pub fn tag_element_script(locator: &Locator, marker: &str) -> String {
    format!(
        r#"(() => {{ const el = {query}; if (!el) return null;
            if (!el.hasAttribute('{attr}')) el.setAttribute('{attr}', '{marker}');
            return el.getAttribute('{attr}'); }})()"#,
        query = element_query(locator),
        attr = MARKER_ATTRIBUTE,
        marker = escape_js_str(marker),
    )
}

/// Run `body` against the tagged element bound to `el`; `null` when detached
pub fn on_element(marker: &str, body: &str) -> String {
    format!(
        r#"(() => {{ const el = document.querySelector('[{attr}="{marker}"]');
            if (!el || !el.isConnected) return null; {body} }})()"#,
        attr = MARKER_ATTRIBUTE,
        marker = escape_js_str(marker),
        body = body,
    )
}

pub fn clear_script(marker: &str) -> String {
    on_element(
        marker,
        r#"if ('value' in el) el.value = ''; else if (el.isContentEditable) el.textContent = '';
           el.dispatchEvent(new Event('input', {bubbles: true}));
           el.dispatchEvent(new Event('change', {bubbles: true})); return 'cleared';"#,
    )
}

pub fn focus_script(marker: &str) -> String {
    on_element(marker, "el.focus(); return 'focused';")
}

/// Evaluates to `'submitted'`, or `'no-form'` when the element has no form
pub fn submit_script(marker: &str) -> String {
    on_element(
        marker,
        r#"const form = el.form || el.closest('form'); if (!form) return 'no-form';
           if (form.requestSubmit) form.requestSubmit(); else form.submit(); return 'submitted';"#,
    )
}

pub fn click_script(marker: &str) -> String {
    on_element(
        marker,
        "el.scrollIntoView({block: 'center'}); el.click(); return 'clicked';",
    )
}

pub fn text_script(marker: &str) -> String {
    on_element(marker, "return el.innerText || el.textContent || '';")
}

/// Display check; scroll position does not matter
pub fn is_displayed_script(marker: &str) -> String {
    on_element(
        marker,
        r#"const style = window.getComputedStyle(el);
           const rect = el.getBoundingClientRect();
           return style.display !== 'none'
               && style.visibility !== 'hidden'
               && style.opacity !== '0'
               && rect.width > 0 && rect.height > 0;"#,
    )
}

/// Enabled check, including a disabled ancestor fieldset
pub fn is_enabled_script(marker: &str) -> String {
    on_element(
        marker,
        r#"if (el.disabled) return false;
           let parent = el.parentElement;
           while (parent) {
               if (parent.tagName === 'FIELDSET' && parent.disabled) return false;
               parent = parent.parentElement;
           }
           return true;"#,
    )
}

/// Evaluates to a JSON array of option labels
pub fn options_script(marker: &str) -> String {
    on_element(
        marker,
        "return JSON.stringify(Array.from(el.options || []).map(o => o.text));",
    )
}

/// Evaluates to `'selected'`, or `'out-of-range'`
pub fn select_index_script(marker: &str, index: usize) -> String {
    on_element(
        marker,
        &format!(
            r#"if (!el.options || {index} >= el.options.length) return 'out-of-range';
               el.selectedIndex = {index};
               el.dispatchEvent(new Event('input', {{bubbles: true}}));
               el.dispatchEvent(new Event('change', {{bubbles: true}})); return 'selected';"#,
            index = index
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_js_str() {
        assert_eq!(escape_js_str("test"), "test");
        assert_eq!(escape_js_str("test's"), "test\\'s");
        assert_eq!(escape_js_str("test\"s"), r#"test\"s"#);
        assert_eq!(escape_js_str("test\\s"), "test\\\\s");
        assert_eq!(escape_js_str("a\nb"), "a\\nb");
    }

    #[test]
    fn test_element_query_per_strategy() {
        assert!(element_query(&Locator::css("button.submit")).contains("querySelector('button.submit')"));
        assert!(element_query(&Locator::xpath("//select")).contains("XPathResult"));
        assert!(element_query(&Locator::id("email")).contains("getElementById('email')"));
        assert!(element_query(&Locator::name("q")).contains("getElementsByName('q')"));
    }

    #[test]
    fn test_tag_script_embeds_marker() {
        let script = tag_element_script(&Locator::id("country"), "abc-123");
        assert!(script.contains("getElementById('country')"));
        assert!(script.contains("'abc-123'"));
        assert!(script.contains(MARKER_ATTRIBUTE));
    }

    #[test]
    fn test_on_element_returns_null_when_detached() {
        let script = click_script("abc-123");
        assert!(script.contains(r#"[data-chaser-id="abc-123"]"#));
        assert!(script.contains("if (!el || !el.isConnected) return null;"));
        assert!(script.contains("el.click()"));
    }

    #[test]
    fn test_select_index_script() {
        let script = select_index_script("m", 2);
        assert!(script.contains("el.selectedIndex = 2"));
        assert!(script.contains("'out-of-range'"));
    }
}
